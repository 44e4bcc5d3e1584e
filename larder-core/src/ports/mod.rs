//! Port trait definitions
//!
//! Ports define the seams between business logic and external technology.

mod vision;

pub use vision::{VisionError, VisionProvider, VisionResult};
