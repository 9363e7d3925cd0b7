//! HTTP API
//! Mission: Bind requests to use cases behind role-gated route groups

pub mod courses;
pub mod enrollments;
pub mod materials;
pub mod users;

use crate::auth::{
    self,
    jwt::JwtHandler,
    middleware::{access_gate, AccessGate},
    models::UserRole,
    password::PasswordHasher,
};
use crate::errors::{AppError, AppResult};
use crate::middleware::request_logging;
use crate::store::Database;
use crate::usecase::{AuthUseCase, CourseUseCase, EnrollmentUseCase, MaterialUseCase, UserUseCase};
use async_trait::async_trait;
use axum::{
    extract::{FromRequest, Request},
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthUseCase>,
    pub users: Arc<UserUseCase>,
    pub courses: Arc<CourseUseCase>,
    pub materials: Arc<MaterialUseCase>,
    pub enrollments: Arc<EnrollmentUseCase>,
    pub jwt: Arc<JwtHandler>,
}

impl AppState {
    pub fn new(db: Arc<Database>, jwt: Arc<JwtHandler>, hasher: PasswordHasher) -> Self {
        let users = Arc::new(UserUseCase::new(db.clone(), hasher));
        Self {
            auth: Arc::new(AuthUseCase::new(users.clone(), hasher, jwt.clone())),
            users,
            courses: Arc::new(CourseUseCase::new(db.clone())),
            materials: Arc::new(MaterialUseCase::new(db.clone())),
            enrollments: Arc::new(EnrollmentUseCase::new(db)),
            jwt,
        }
    }

    fn gate(&self, roles: &[UserRole]) -> anyhow::Result<AccessGate> {
        AccessGate::require(self.jwt.clone(), roles)
    }
}

/// Create the API router.
///
/// Each role group gets its own access gate; groups sharing a path are merged
/// per method, so e.g. `GET /api/courses/:id` stays public while `PUT` on the
/// same path requires an instructor.
pub fn create_router(state: AppState) -> anyhow::Result<Router> {
    let public_routes = Router::new()
        .route("/health", get(health_check))
        .route("/api/register", post(auth::api::register))
        .route("/api/login", post(auth::api::login))
        .route("/api/courses", get(courses::list_courses))
        .route("/api/courses/:id", get(courses::get_course));

    let any_role_routes = Router::new()
        .route("/api/me", get(auth::api::me))
        .route("/api/users/:id", get(users::get_user))
        .route_layer(middleware::from_fn_with_state(
            state.gate(&UserRole::ALL)?,
            access_gate,
        ));

    let student_routes = Router::new()
        .route("/api/me/courses", get(enrollments::my_courses))
        .route("/api/courses/:id/enroll", post(enrollments::enroll))
        .route_layer(middleware::from_fn_with_state(
            state.gate(&[UserRole::Student])?,
            access_gate,
        ));

    let learner_routes = Router::new()
        .route("/api/courses/:id/materials", get(materials::list_materials))
        .route(
            "/api/courses/:id/materials/:material_id",
            get(materials::get_material),
        )
        .route_layer(middleware::from_fn_with_state(
            state.gate(&[UserRole::Student, UserRole::Instructor])?,
            access_gate,
        ));

    let instructor_routes = Router::new()
        .route("/api/courses", post(courses::create_course))
        .route(
            "/api/courses/:id",
            put(courses::update_course).delete(courses::delete_course),
        )
        .route("/api/courses/:id/materials", post(materials::create_material))
        .route(
            "/api/courses/:id/materials/:material_id",
            put(materials::update_material).delete(materials::delete_material),
        )
        .route_layer(middleware::from_fn_with_state(
            state.gate(&[UserRole::Instructor])?,
            access_gate,
        ));

    let admin_routes = Router::new()
        .route("/api/users", get(users::list_users))
        .route(
            "/api/users/:id",
            put(users::update_user).delete(users::delete_user),
        )
        .route_layer(middleware::from_fn_with_state(
            state.gate(&[UserRole::Admin])?,
            access_gate,
        ));

    Ok(Router::new()
        .merge(public_routes)
        .merge(any_role_routes)
        .merge(student_routes)
        .merge(learner_routes)
        .merge(instructor_routes)
        .merge(admin_routes)
        .layer(middleware::from_fn(request_logging))
        .layer(CorsLayer::permissive())
        .with_state(state))
}

// ===== Request / Response plumbing =====

/// JSON body extractor whose rejection renders as a validation error.
pub struct ApiJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(ApiJson(value))
    }
}

/// Success envelope: `{"message": ..., "data": ...}`
pub struct ApiResponse<T> {
    status: StatusCode,
    message: &'static str,
    data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(message: &'static str, data: T) -> Self {
        Self {
            status: StatusCode::OK,
            message,
            data,
        }
    }

    pub fn created(message: &'static str, data: T) -> Self {
        Self {
            status: StatusCode::CREATED,
            message,
            data,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "message": self.message,
            "data": self.data,
        }));
        (self.status, body).into_response()
    }
}

/// Path ids must be positive integers.
pub fn parse_id(raw: &str, what: &str) -> AppResult<i64> {
    match raw.parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(AppError::validation(format!("invalid {} id: {}", what, raw))),
    }
}

/// Run blocking work (bcrypt, SQLite) off the async executor.
pub(crate) async fn blocking<T, F>(f: F) -> AppResult<T>
where
    F: FnOnce() -> AppResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| AppError::Internal(e.into()))?
}

// ===== Route Handlers =====

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

/// Health check endpoint
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
