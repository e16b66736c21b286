use crate::middleware::rate_limiter::ClientRateLimiter;
use crate::services::proof_service::ProofService;
use actix_web::web;
use std::sync::Arc;

pub mod sign;
pub mod verify;

#[derive(Clone)]
pub struct AppState {
    pub proof_service: Arc<ProofService>,
    pub sign_limiter: ClientRateLimiter,
}

pub fn init_routes(cfg: &mut web::ServiceConfig, state: &AppState) {
    cfg.service(
        web::scope("/api")
            .configure(|cfg| sign::init_routes(cfg, state.sign_limiter.clone()))
            .configure(verify::init_routes),
    );
}
