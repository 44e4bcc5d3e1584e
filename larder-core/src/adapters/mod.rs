//! Adapter implementations
//!
//! Adapters connect the core to external technology: the DuckDB store,
//! the vision API, and the demo data generators.

pub mod demo;
pub mod duckdb;
pub mod openai_vision;
pub mod vision_mock;

pub use duckdb::DuckDbRepository;
pub use openai_vision::OpenAiVision;
pub use vision_mock::MockVision;
