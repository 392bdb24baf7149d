pub mod dto;
pub mod marker;
pub mod service;

pub use dto::{MergeRequest, SegmentRef};
pub use service::SegmentMergeOrchestrator;
