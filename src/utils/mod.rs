pub mod json_extract;
pub mod logging;

pub use json_extract::extract_json_from_llm_output;
