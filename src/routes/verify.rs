use crate::{
    errors::ServiceError,
    models::{requests::VerifyRequest, responses::PublicKeyResponse},
    routes::AppState,
};
use actix_web::{web, HttpResponse};
use chrono::Utc;
use validator::Validate;

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/verify", web::post().to(verify))
        .route("/public-key", web::get().to(public_key));
}

/// Verifies a token scanned out of a proof image
/// POST /api/verify
async fn verify(
    state: web::Data<AppState>,
    req: web::Json<VerifyRequest>,
) -> Result<HttpResponse, ServiceError> {
    let request = req.into_inner();
    request
        .validate()
        .map_err(|e| ServiceError::Validation(e.to_string()))?;

    let report = state.proof_service.verify(&request.token, Utc::now())?;
    Ok(HttpResponse::Ok().json(report))
}

/// Returns the public key verifiers should trust
/// GET /api/public-key
async fn public_key(state: web::Data<AppState>) -> Result<HttpResponse, ServiceError> {
    Ok(HttpResponse::Ok().json(PublicKeyResponse {
        public_key: state.proof_service.public_key_base64()?,
    }))
}

#[cfg(test)]
mod tests {
    use crate::proof::fixtures::{alice, public_key_base64, signer};
    use crate::proof::issue_token;
    use crate::routes::sign::tests::signing_state;
    use actix_web::{http::StatusCode, test, web, App};
    use serde_json::json;

    macro_rules! app {
        () => {{
            let state = signing_state();
            test::init_service(
                App::new()
                    .app_data(web::Data::new(state.clone()))
                    .configure(|cfg| crate::routes::init_routes(cfg, &state)),
            )
            .await
        }};
    }

    #[actix_web::test]
    async fn test_verify_accepts_issued_token() {
        let app = app!();
        let token = issue_token(&alice(), &signer()).unwrap();
        let req = test::TestRequest::post()
            .uri("/api/verify")
            .set_json(json!({ "token": token }))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["ok"], true);
        assert_eq!(body["claim"]["handle"], "@alice");
        assert_eq!(body["claim"]["issuedAt"], "2024-01-01");
        // the fixture claim expired long ago but still verifies
        assert_eq!(body["freshness"], "expired");
        assert!(body["payloadJson"]
            .as_str()
            .unwrap()
            .starts_with(r#"{"challenge":"banana""#));
    }

    #[actix_web::test]
    async fn test_verify_failure_statuses() {
        let app = app!();
        let token = issue_token(&alice(), &signer()).unwrap();
        let (message, _) = token.split_once('.').unwrap();
        let forged = format!("{}.{}", message, "A".repeat(86));

        let cases = [
            ("abc".to_string(), StatusCode::BAD_REQUEST, "MalformedToken"),
            (forged, StatusCode::UNPROCESSABLE_ENTITY, "SignatureInvalid"),
            (String::new(), StatusCode::BAD_REQUEST, "Validation"),
        ];
        for (token, status, kind) in cases {
            let req = test::TestRequest::post()
                .uri("/api/verify")
                .set_json(json!({ "token": token }))
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), status);
            let body: serde_json::Value = test::read_body_json(resp).await;
            assert_eq!(body["kind"], kind);
        }
    }

    #[actix_web::test]
    async fn test_public_key_endpoint() {
        let app = app!();
        let req = test::TestRequest::get().uri("/api/public-key").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["publicKey"], public_key_base64());
    }
}
