use crate::{
    errors::ServiceError,
    middleware::rate_limiter::ClientRateLimiter,
    models::{requests::SignRequest, responses::TokenResponse},
    routes::AppState,
};
use actix_web::{web, HttpResponse};
use validator::Validate;

pub fn init_routes(cfg: &mut web::ServiceConfig, limiter: ClientRateLimiter) {
    cfg.service(
        web::resource("/sign")
            .wrap(limiter)
            .route(web::post().to(sign)),
    );
}

/// Issues a signed token for a claim
/// POST /api/sign
async fn sign(
    state: web::Data<AppState>,
    req: web::Json<SignRequest>,
) -> Result<HttpResponse, ServiceError> {
    let request = req.into_inner();
    request
        .validate()
        .map_err(|e| ServiceError::Validation(e.to_string()))?;

    let token = state.proof_service.issue(&request.into_claim())?;
    Ok(HttpResponse::Ok().json(TokenResponse { token }))
}
