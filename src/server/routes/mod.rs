//! HTTP route modules

pub mod health;
pub mod providers;

use crate::utils::error::SentinelError;
use actix_web::{HttpRequest, web};

/// Standard API response structure
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ApiResponse<T> {
    /// Whether the request was successful
    pub success: bool,
    /// Response data (if successful)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Error message (if failed)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T>
where
    T: serde::Serialize,
{
    /// Create a successful response
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
}

/// Configure every route
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.configure(health::configure_routes)
        .configure(providers::configure_routes);
}

/// Fallback for unknown paths
pub async fn not_found(req: HttpRequest) -> Result<actix_web::HttpResponse, SentinelError> {
    Err(SentinelError::not_found(format!(
        "No route for {} {}",
        req.method(),
        req.path()
    )))
}
