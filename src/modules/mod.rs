pub mod compression;
pub mod merge;
pub mod thumbnail;
