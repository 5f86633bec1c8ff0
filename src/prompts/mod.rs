pub mod new_answer;

pub use new_answer::{build_new_answer_prompt, Language};
