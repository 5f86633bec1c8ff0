pub mod answer_optimizer;

pub use answer_optimizer::{AnswerOptimizer, OptimizeError, OptimizeRequest, OptimizedAnswer};
