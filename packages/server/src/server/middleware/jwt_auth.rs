use std::sync::Arc;

use axum::{middleware::Next, response::Response};
use tracing::debug;

use crate::common::ResidentId;
use crate::domains::auth::JwtService;

/// Authenticated resident information from JWT
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub resident_id: ResidentId,
    /// Verified email, also the notification recipient for submissions
    /// filed on this session.
    pub email: String,
}

/// JWT authentication middleware
///
/// Extracts JWT token from Authorization header, verifies it, and adds
/// AuthUser to request extensions. If no token or invalid token, the request
/// continues without AuthUser (public access); handlers that need identity
/// reject on the missing extension.
pub async fn jwt_auth_middleware(
    jwt_service: Arc<JwtService>,
    mut request: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    let auth_user = extract_auth_user(&request, &jwt_service);

    if let Some(user) = auth_user {
        debug!("Authenticated resident: {}", user.resident_id);
        request.extensions_mut().insert(user);
    } else {
        debug!("No valid authentication token");
    }

    next.run(request).await
}

/// Extract and verify JWT token from request
fn extract_auth_user(
    request: &axum::http::Request<axum::body::Body>,
    jwt_service: &JwtService,
) -> Option<AuthUser> {
    // Get Authorization header
    let auth_header = request.headers().get("authorization")?;
    let auth_str = auth_header.to_str().ok()?;

    // Extract token (handle both "Bearer <token>" and raw token)
    let token = auth_str.strip_prefix("Bearer ").unwrap_or(auth_str);

    // Verify token
    let claims = jwt_service.verify_token(token).ok()?;

    Some(AuthUser {
        resident_id: ResidentId::from_uuid(claims.resident_id),
        email: claims.email,
    })
}
