//! Vela driver: API-description loading, parallel generation, output
//! assembly, and diagnostic reporting.

pub mod error;
pub mod pipeline;
pub mod reporting;
pub mod resolver;

pub use error::DriverError;
pub use pipeline::{generate, load_description, GeneratedFile, GenerationOutput};
pub use resolver::ApiResolver;
