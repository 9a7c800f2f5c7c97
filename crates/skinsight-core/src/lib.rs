pub mod labels;
pub mod result;

pub use labels::{SkinCondition, UNKNOWN_LABEL, label_for_index};
pub use result::{ClassificationResult, ErrorBody, Health, format_percent};
