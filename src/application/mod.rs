//! Application layer: services and use cases
//!
//! This layer orchestrates domain logic and depends on I/O boundary traits.

pub mod error;
pub mod error_ext;
pub mod render;
pub mod services;

pub use error::{Anomaly, AnomalyKind, ApplicationError, ApplicationResult};
pub use error_ext::IoResultExt;
pub use render::{render, DotRenderer, OutputFormat};
