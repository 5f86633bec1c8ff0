pub mod dataset;
pub mod progress;

pub use dataset::{ConfirmedFilter, CotFilter, Dataset, DatasetId, DatasetListQuery, DatasetPage, SearchField};
pub use progress::BatchProgress;
