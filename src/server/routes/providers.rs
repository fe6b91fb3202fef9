//! Provider call registration, status and presence endpoints

use crate::server::routes::ApiResponse;
use crate::server::state::AppState;
use actix_web::{HttpResponse, Result as ActixResult, web};
use tracing::debug;

/// Configure provider and presence routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/v1")
            .route("/providers", web::get().to(list_providers))
            .route("/providers/{provider}/calls", web::post().to(register_call))
            .route("/providers/{provider}/status", web::get().to(provider_status))
            .route("/presence", web::get().to(presence)),
    );
}

/// Record one call to a provider
async fn register_call(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> ActixResult<HttpResponse> {
    let provider = path.into_inner();
    debug!(provider = %provider, "Registering call");

    let status = state.monitor.register_call(&provider);
    Ok(HttpResponse::Ok().json(ApiResponse::success(status)))
}

/// Current status of a provider
async fn provider_status(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> ActixResult<HttpResponse> {
    let status = state.monitor.get_status(&path.into_inner());
    Ok(HttpResponse::Ok().json(ApiResponse::success(status)))
}

/// Statuses of all configured providers
async fn list_providers(state: web::Data<AppState>) -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(ApiResponse::success(state.monitor.statuses())))
}

/// Propagator state
async fn presence(state: web::Data<AppState>) -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(ApiResponse::success(state.propagator.snapshot())))
}
