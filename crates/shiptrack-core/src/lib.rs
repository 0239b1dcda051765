pub mod cache;
pub mod config;
pub mod error;
pub mod filter;
pub mod ingestion;
pub mod preview;
pub mod render;
pub mod trajectory;
pub mod types;

pub use error::{PipelineError, Result};
pub use shiptrack_parser::AliasTable;
