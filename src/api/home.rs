//! Home page: catalog counts and the session visit counter

use axum::{extract::State, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{config::SessionsConfig, error::AppResult, AppState};

/// Home page context
#[derive(Serialize, ToSchema)]
pub struct HomeResponse {
    pub num_books: i64,
    pub num_instances: i64,
    pub num_instances_available: i64,
    pub num_authors: i64,
    /// Earlier visits to this page in the caller's session
    pub num_visits: i64,
}

/// Reuse the caller's session id, or start a new session
fn ensure_session(jar: CookieJar, config: &SessionsConfig) -> (CookieJar, String) {
    let existing = jar
        .get(&config.cookie_name)
        .and_then(|cookie| Uuid::parse_str(cookie.value()).ok());

    match existing {
        Some(id) => (jar, id.to_string()),
        None => {
            let id = Uuid::new_v4().to_string();
            let cookie = Cookie::build((config.cookie_name.clone(), id.clone()))
                .path("/")
                .http_only(true)
                .same_site(SameSite::Lax)
                .build();
            (jar.add(cookie), id)
        }
    }
}

/// Home page
#[utoipa::path(
    get,
    path = "/",
    tag = "catalog",
    responses(
        (status = 200, description = "Catalog summary", body = HomeResponse)
    )
)]
pub async fn index(
    State(state): State<AppState>,
    jar: CookieJar,
) -> AppResult<(CookieJar, Json<HomeResponse>)> {
    let counts = state.services.catalog.counts().await?;

    let (jar, session_id) = ensure_session(jar, &state.config.sessions);
    let num_visits = state.services.sessions.record_visit(&session_id).await?;

    Ok((
        jar,
        Json(HomeResponse {
            num_books: counts.num_books,
            num_instances: counts.num_instances,
            num_instances_available: counts.num_instances_available,
            num_authors: counts.num_authors,
            num_visits,
        }),
    ))
}
