pub mod upload;
pub mod workspace;
