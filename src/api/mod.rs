//! HTTP handlers, request guards and the application router

pub mod auth;
pub mod authors;
pub mod books;
pub mod health;
pub mod home;
pub mod loans;
pub mod openapi;


use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    middleware::{self, Next},
    response::Response,
    routing::get,
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{error::AppError, error::AppResult, models::user::UserClaims, AppState};

/// Path of the all-borrowed listing, target of successful renewals
pub const ALL_BORROWED_PATH: &str = "/api/v1/borrowed";
/// Path of the caller's own loans
pub const MY_BORROWED_PATH: &str = "/api/v1/mybooks";

/// Decode the bearer token, if any. A present but unusable token is an error.
fn bearer_claims(headers: &HeaderMap, secret: &str) -> AppResult<Option<UserClaims>> {
    let Some(value) = headers.get(AUTHORIZATION) else {
        return Ok(None);
    };

    let auth_header = value
        .to_str()
        .map_err(|_| AppError::Authentication("Invalid authorization header".to_string()))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::Authentication("Invalid authorization header format".to_string()))?;

    let claims = UserClaims::from_token(token, secret)
        .map_err(|e| AppError::Authentication(e.to_string()))?;

    Ok(Some(claims))
}

/// Extractor for authenticated user from JWT token
pub struct AuthenticatedUser(pub UserClaims);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        bearer_claims(&parts.headers, &state.config.auth.jwt_secret)?
            .map(AuthenticatedUser)
            .ok_or_else(|| AppError::Authentication("Missing authorization header".to_string()))
    }
}

/// Extractor for an optional caller; anonymous requests yield `None`
pub struct MaybeUser(pub Option<UserClaims>);

#[async_trait]
impl FromRequestParts<AppState> for MaybeUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        Ok(MaybeUser(bearer_claims(
            &parts.headers,
            &state.config.auth.jwt_secret,
        )?))
    }
}

/// Reject the request unless the caller holds `permission`.
/// Anonymous callers are treated as holding nothing.
fn authorize(state: &AppState, request: &Request, permission: &str) -> AppResult<()> {
    match bearer_claims(request.headers(), &state.config.auth.jwt_secret)? {
        Some(claims) => claims.require_perm(permission).map_err(|e| {
            tracing::warn!(user_id = claims.user_id, permission, "Permission denied");
            e
        }),
        None => Err(AppError::Authorization(format!(
            "Permission '{}' required",
            permission
        ))),
    }
}

/// Guard for the librarian listing
pub async fn require_librarian(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    authorize(&state, &request, &state.config.permissions.librarian)?;
    Ok(next.run(request).await)
}

/// Guard for loan renewal
pub async fn require_can_mark_returned(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    authorize(&state, &request, &state.config.permissions.can_mark_returned)?;
    Ok(next.run(request).await)
}

/// Create the application router with all routes
pub fn router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let librarian = Router::new()
        .route("/borrowed", get(loans::all_borrowed))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_librarian));

    let renewals = Router::new()
        .route(
            "/book/:id/renew",
            get(loans::renew_book_form).post(loans::renew_book),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_can_mark_returned,
        ));

    // API v1 routes
    let api_v1 = Router::new()
        // Health check
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Authentication
        .route("/auth/login", get(auth::login_form).post(auth::login))
        .route("/auth/me", get(auth::me))
        // Catalog
        .route("/books", get(books::list_books))
        .route("/books/:id", get(books::get_book))
        .route("/authors", get(authors::list_authors))
        .route("/authors/:id", get(authors::get_author))
        // Loans
        .route("/mybooks", get(loans::my_borrowed))
        .merge(librarian)
        .merge(renewals);

    Router::new()
        .route("/", get(home::index))
        .nest("/api/v1", api_v1)
        .with_state(state)
        .merge(openapi::create_openapi_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
