pub mod handlers;

pub use handlers::{health_check, index, process_files, process_workbooks, OutputFormat};

use crate::service::Reconciler;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;

/// 构建路由
pub fn router(reconciler: Arc<Reconciler>, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health_check))
        .route("/process", post(process_files))
        .layer(ServiceBuilder::new().layer(DefaultBodyLimit::max(max_upload_bytes)))
        .with_state(reconciler)
}
