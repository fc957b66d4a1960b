pub mod api;
pub mod codec;
pub mod config;
pub mod error;
pub mod models;
pub mod service;

pub use config::{AppConfig, ReconConfig};
pub use error::{ErrorKind, ReconError};
pub use models::{ReconOutput, ReconStats, Table, TableKind, Value};
pub use service::Reconciler;
