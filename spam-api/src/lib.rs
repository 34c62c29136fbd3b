//! spam-api: HTTP front end for spam detection
//!
//! Serves predictions from models trained lazily on the first request.

pub mod config;
pub mod error;
pub mod handlers;
pub mod registry;
pub mod server;

pub use config::ApiConfig;
pub use error::{ApiError, Result};
pub use registry::ModelRegistry;
pub use server::ApiServer;
