use crate::common::Actor;
use crate::domains::auth::JwtService;
use axum::{middleware::Next, response::Response};
use std::sync::Arc;
use tracing::debug;

/// JWT authentication middleware
///
/// Extracts JWT token from Authorization header, verifies it, and adds an
/// `Actor` to request extensions. Missing or invalid tokens yield an
/// anonymous actor (public read access).
pub async fn jwt_auth_middleware(
    jwt_service: Arc<JwtService>,
    mut request: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    let actor = extract_actor(&request, &jwt_service);

    if let Some(subject) = &actor.subject {
        debug!(subject = %subject, admin = actor.is_admin, "Authenticated request");
    } else {
        debug!("No valid authentication token");
    }

    request.extensions_mut().insert(actor);
    next.run(request).await
}

/// Extract and verify JWT token from request
fn extract_actor(request: &axum::http::Request<axum::body::Body>, jwt_service: &JwtService) -> Actor {
    let token = request
        .headers()
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        // Accept both "Bearer <token>" and a raw token
        .map(|raw| raw.strip_prefix("Bearer ").unwrap_or(raw).trim());

    match token.map(|t| jwt_service.verify_token(t)) {
        Some(Ok(claims)) => Actor::authenticated(claims.sub, claims.is_admin),
        _ => Actor::anonymous(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn service() -> JwtService {
        JwtService::new("test_secret", "test_issuer".to_string())
    }

    fn request(header: Option<String>) -> axum::http::Request<axum::body::Body> {
        let mut builder = axum::http::Request::builder();
        if let Some(value) = header {
            builder = builder.header("authorization", value);
        }
        builder.body(axum::body::Body::empty()).unwrap()
    }

    #[test]
    fn test_extract_token_with_bearer() {
        let jwt_service = service();
        let token = jwt_service
            .create_token("editor", true, Duration::hours(1))
            .unwrap();

        let actor = extract_actor(&request(Some(format!("Bearer {}", token))), &jwt_service);
        assert_eq!(actor.subject.as_deref(), Some("editor"));
        assert!(actor.is_admin());
    }

    #[test]
    fn test_extract_token_without_bearer() {
        let jwt_service = service();
        let token = jwt_service
            .create_token("viewer", false, Duration::hours(1))
            .unwrap();

        let actor = extract_actor(&request(Some(token)), &jwt_service);
        assert!(actor.is_authenticated());
        assert!(!actor.is_admin());
    }

    #[test]
    fn test_no_auth_header() {
        let actor = extract_actor(&request(None), &service());
        assert!(!actor.is_authenticated());
    }

    #[test]
    fn test_invalid_token() {
        let actor = extract_actor(&request(Some("Bearer invalid_token".into())), &service());
        assert!(!actor.is_authenticated());
    }
}
