//! OpenAPI documentation

use axum::Router;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{auth, authors, books, health, home, loans};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Catalog API",
        version = "1.0.0",
        description = "Library catalog: books, authors, copies and loan renewal"
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Auth
        auth::login_form,
        auth::login,
        auth::me,
        // Catalog
        books::list_books,
        books::get_book,
        authors::list_authors,
        authors::get_author,
        // Loans
        loans::all_borrowed,
        loans::my_borrowed,
        loans::renew_book_form,
        loans::renew_book,
    ),
    components(
        schemas(
            // Home
            home::HomeResponse,
            // Auth
            auth::LoginResponse,
            auth::LoginPage,
            crate::models::user::LoginRequest,
            crate::models::user::UserClaims,
            // Catalog
            crate::models::author::Author,
            crate::models::author::AuthorRef,
            crate::models::author::AuthorDetail,
            crate::models::book::Genre,
            crate::models::book::BookSummary,
            crate::models::book::BookDetail,
            crate::models::pagination::BookPage,
            crate::models::pagination::AuthorPage,
            // Loans
            crate::models::book_instance::LoanStatus,
            crate::models::book_instance::BookInstance,
            crate::models::pagination::BookInstancePage,
            crate::forms::RenewBookInput,
            crate::forms::RenewBookForm,
            loans::RenewBookPage,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Authentication endpoints"),
        (name = "catalog", description = "Books and authors"),
        (name = "loans", description = "Borrowed copies and renewals")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
