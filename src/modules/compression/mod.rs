pub mod dto;
pub mod service;

pub use dto::{CompressRequest, CompressResult, CompressedVariant, VariantSpec};
pub use service::CompressionOrchestrator;
