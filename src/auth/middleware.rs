//! Access Gate Middleware
//! Mission: Authenticate the caller and enforce a per-route role allowlist

use crate::auth::{
    jwt::JwtHandler,
    models::{Identity, UserRole},
};
use crate::errors::AppError;
use anyhow::bail;
use async_trait::async_trait;
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tracing::warn;

/// Token verification plus a non-empty set of accepted roles for one route group.
#[derive(Clone)]
pub struct AccessGate {
    jwt: Arc<JwtHandler>,
    roles: Arc<[UserRole]>,
}

impl AccessGate {
    /// An empty role set would make the routes unreachable; refuse to build it.
    pub fn require(jwt: Arc<JwtHandler>, roles: &[UserRole]) -> anyhow::Result<Self> {
        if roles.is_empty() {
            bail!("access gate requires at least one accepted role");
        }
        Ok(Self {
            jwt,
            roles: roles.into(),
        })
    }

    /// Unauthenticated -> TokenPresented -> Authenticated.
    pub fn authenticate(&self, authorization: Option<&str>) -> Result<Identity, AppError> {
        let token = bearer_token(authorization).ok_or(AppError::MissingToken)?;
        Ok(self.jwt.verify(token)?)
    }

    /// Authenticated -> Authorized. Literal membership, no role hierarchy.
    pub fn authorize(&self, identity: Identity) -> Result<Identity, AppError> {
        if self.roles.contains(&identity.role) {
            Ok(identity)
        } else {
            Err(AppError::Forbidden)
        }
    }

    pub fn check(&self, authorization: Option<&str>) -> Result<Identity, AppError> {
        let identity = self.authenticate(authorization)?;
        self.authorize(identity)
    }
}

/// Extract the token from a single `Bearer <token>` credential.
///
/// Any other scheme, an empty token, or extra parts yield `None`.
pub fn bearer_token(authorization: Option<&str>) -> Option<&str> {
    let (scheme, token) = authorization?.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    if token.is_empty() || token.contains(char::is_whitespace) {
        return None;
    }
    Some(token)
}

/// Gate middleware; mount with `middleware::from_fn_with_state(gate, access_gate)`.
pub async fn access_gate(
    State(gate): State<AccessGate>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let authorization = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let identity = gate.check(authorization).map_err(|e| {
        warn!(
            method = %req.method(),
            path = %req.uri().path(),
            reason = %e,
            "Access gate rejected request"
        );
        e
    })?;

    req.extensions_mut().insert(identity);

    let mut response = next.run(req).await;
    // Outer layers (request logging) see who was served.
    response.extensions_mut().insert(identity);
    Ok(response)
}

#[async_trait]
impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Identity>()
            .copied()
            .ok_or(AppError::MissingToken)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request as HttpRequest, StatusCode},
        middleware,
        routing::get,
        Json, Router,
    };
    use chrono::Duration;
    use parking_lot::Mutex;
    use tower::ServiceExt;

    fn jwt() -> Arc<JwtHandler> {
        Arc::new(JwtHandler::new(
            b"gate-test-secret",
            "edulearn",
            Duration::hours(1),
        ))
    }

    #[test]
    fn test_bearer_token_parsing() {
        assert_eq!(bearer_token(Some("Bearer abc.def.ghi")), Some("abc.def.ghi"));
        assert_eq!(bearer_token(Some("bearer abc")), Some("abc"));
        assert_eq!(bearer_token(None), None);
        assert_eq!(bearer_token(Some("")), None);
        assert_eq!(bearer_token(Some("Bearer")), None);
        assert_eq!(bearer_token(Some("Bearer   ")), None);
        assert_eq!(bearer_token(Some("Basic dXNlcjpwdw==")), None);
        assert_eq!(bearer_token(Some("Token abc")), None);
        assert_eq!(bearer_token(Some("Bearer a b")), None);
    }

    #[test]
    fn test_empty_role_set_is_configuration_error() {
        assert!(AccessGate::require(jwt(), &[]).is_err());
        assert!(AccessGate::require(jwt(), &[UserRole::Admin]).is_ok());
    }

    #[test]
    fn test_gate_state_machine() {
        let jwt = jwt();
        let gate = AccessGate::require(jwt.clone(), &[UserRole::Instructor]).unwrap();

        assert!(matches!(gate.check(None), Err(AppError::MissingToken)));
        assert!(matches!(
            gate.check(Some("Basic abc")),
            Err(AppError::MissingToken)
        ));
        assert!(matches!(
            gate.check(Some("Bearer not.a.jwt")),
            Err(AppError::TokenInvalid)
        ));

        let expired = jwt
            .issue_at(Identity::new(1, UserRole::Instructor), 100)
            .unwrap();
        assert!(matches!(
            gate.check(Some(&format!("Bearer {}", expired.token))),
            Err(AppError::TokenExpired)
        ));

        let student = jwt.issue(Identity::new(2, UserRole::Student)).unwrap();
        assert!(matches!(
            gate.check(Some(&format!("Bearer {}", student.token))),
            Err(AppError::Forbidden)
        ));

        let instructor = jwt.issue(Identity::new(3, UserRole::Instructor)).unwrap();
        let identity = gate
            .check(Some(&format!("Bearer {}", instructor.token)))
            .unwrap();
        assert_eq!(identity, Identity::new(3, UserRole::Instructor));
    }

    #[test]
    fn test_admin_does_not_satisfy_student_route() {
        let jwt = jwt();
        let gate = AccessGate::require(jwt.clone(), &[UserRole::Student]).unwrap();
        let admin = jwt.issue(Identity::new(1, UserRole::Admin)).unwrap();

        assert!(matches!(
            gate.check(Some(&format!("Bearer {}", admin.token))),
            Err(AppError::Forbidden)
        ));
    }

    #[test]
    fn test_wrongly_signed_token_rejected() {
        let gate = AccessGate::require(jwt(), &UserRole::ALL).unwrap();
        let forged = JwtHandler::new(b"attacker-secret", "edulearn", Duration::hours(1))
            .issue(Identity::new(1, UserRole::Admin))
            .unwrap();

        assert!(matches!(
            gate.check(Some(&format!("Bearer {}", forged.token))),
            Err(AppError::TokenInvalid)
        ));
    }

    fn gated_app(jwt: Arc<JwtHandler>, seen: Arc<Mutex<Vec<Identity>>>) -> Router {
        let gate = AccessGate::require(jwt, &[UserRole::Student]).unwrap();
        Router::new()
            .route(
                "/protected",
                get(move |identity: Identity| {
                    let seen = seen.clone();
                    async move {
                        seen.lock().push(identity);
                        Json(identity)
                    }
                }),
            )
            .route_layer(middleware::from_fn_with_state(gate, access_gate))
    }

    async fn call(app: Router, authorization: Option<String>) -> StatusCode {
        let mut builder = HttpRequest::builder().uri("/protected");
        if let Some(value) = authorization {
            builder = builder.header(AUTHORIZATION, value);
        }
        app.oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap()
            .status()
    }

    #[tokio::test]
    async fn test_rejected_requests_never_reach_handler() {
        let jwt = jwt();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let app = gated_app(jwt.clone(), seen.clone());

        assert_eq!(call(app.clone(), None).await, StatusCode::UNAUTHORIZED);
        assert_eq!(
            call(app.clone(), Some("Basic dXNlcjpwdw==".into())).await,
            StatusCode::UNAUTHORIZED
        );

        let instructor = jwt.issue(Identity::new(9, UserRole::Instructor)).unwrap();
        assert_eq!(
            call(app, Some(format!("Bearer {}", instructor.token))).await,
            StatusCode::FORBIDDEN
        );

        assert!(seen.lock().is_empty());
    }

    #[tokio::test]
    async fn test_handler_observes_exact_identity() {
        let jwt = jwt();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let app = gated_app(jwt.clone(), seen.clone());

        let student = jwt.issue(Identity::new(11, UserRole::Student)).unwrap();
        assert_eq!(
            call(app, Some(format!("Bearer {}", student.token))).await,
            StatusCode::OK
        );
        assert_eq!(
            seen.lock().as_slice(),
            &[Identity::new(11, UserRole::Student)]
        );
    }

    #[tokio::test]
    async fn test_admitted_identity_is_attached_to_response() {
        let jwt = jwt();
        let app = gated_app(jwt.clone(), Arc::new(Mutex::new(Vec::new())));
        let student = jwt.issue(Identity::new(5, UserRole::Student)).unwrap();

        let response = app
            .oneshot(
                HttpRequest::builder()
                    .uri("/protected")
                    .header(AUTHORIZATION, format!("Bearer {}", student.token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(
            response.extensions().get::<Identity>(),
            Some(&Identity::new(5, UserRole::Student))
        );
    }

    #[tokio::test]
    async fn test_identity_extractor_without_gate_is_unauthenticated() {
        let app = Router::new().route("/open", get(|identity: Identity| async move { Json(identity) }));
        let response = app
            .oneshot(HttpRequest::builder().uri("/open").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
