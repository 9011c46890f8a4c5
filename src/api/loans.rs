//! Loan endpoints: borrowed listings and librarian renewal

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Form, Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    forms::{self, RenewBookForm, RenewBookInput, RenewalWindow},
    models::{
        book_instance::BookInstance,
        pagination::{BookInstancePage, PageQuery},
    },
    AppState,
};

use super::{MaybeUser, ALL_BORROWED_PATH, MY_BORROWED_PATH};

/// Renewal page context: the form and the copy it applies to
#[derive(Serialize, ToSchema)]
pub struct RenewBookPage {
    pub form: RenewBookForm,
    pub bookinst: BookInstance,
}

/// All copies, for librarians
#[utoipa::path(
    get,
    path = "/borrowed",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(PageQuery),
    responses(
        (status = 200, description = "One page of copies", body = BookInstancePage),
        (status = 403, description = "Librarian permission required")
    )
)]
pub async fn all_borrowed(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<BookInstancePage>> {
    let page = state.services.loans.list_all(query.page.as_deref()).await?;
    Ok(Json(page))
}

/// Copies on loan to the caller, soonest due first
#[utoipa::path(
    get,
    path = "/mybooks",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(PageQuery),
    responses(
        (status = 200, description = "One page of the caller's loans", body = BookInstancePage),
        (status = 303, description = "Not logged in; redirect to the login page")
    )
)]
pub async fn my_borrowed(
    State(state): State<AppState>,
    MaybeUser(claims): MaybeUser,
    Query(query): Query<PageQuery>,
) -> AppResult<Response> {
    let Some(claims) = claims else {
        let login = format!("{}?next={}", state.config.auth.login_url, MY_BORROWED_PATH);
        return Ok(Redirect::to(&login).into_response());
    };

    let page = state
        .services
        .loans
        .list_borrowed_by(claims.user_id, query.page.as_deref())
        .await?;
    Ok(Json(page).into_response())
}

/// Renewal form for a copy, pre-filled three weeks out
#[utoipa::path(
    get,
    path = "/book/{id}/renew",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(
        ("id" = String, Path, description = "Book instance UUID")
    ),
    responses(
        (status = 200, description = "Renewal form", body = RenewBookPage),
        (status = 403, description = "Renewal permission required"),
        (status = 404, description = "Book instance not found")
    )
)]
pub async fn renew_book_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<RenewBookPage>> {
    let bookinst = state.services.loans.get_instance(&id).await?;
    let window = RenewalWindow::starting(forms::today());

    Ok(Json(RenewBookPage {
        form: RenewBookForm::initial(&window),
        bookinst,
    }))
}

/// Submit a renewal date for a copy
#[utoipa::path(
    post,
    path = "/book/{id}/renew",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(
        ("id" = String, Path, description = "Book instance UUID")
    ),
    request_body(content = RenewBookInput, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Renewed; redirect to the all-borrowed listing"),
        (status = 403, description = "Renewal permission required"),
        (status = 404, description = "Book instance not found"),
        (status = 422, description = "Rejected date; form with errors", body = RenewBookPage)
    )
)]
pub async fn renew_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(input): Form<RenewBookInput>,
) -> AppResult<Response> {
    let bookinst = state.services.loans.get_instance(&id).await?;
    let window = RenewalWindow::starting(forms::today());

    match RenewBookForm::validate(input, &window) {
        Ok(renewal_date) => {
            state.services.loans.renew(bookinst.id, renewal_date).await?;
            Ok(Redirect::to(ALL_BORROWED_PATH).into_response())
        }
        Err(form) => {
            tracing::debug!(instance_id = %bookinst.id, "Renewal rejected");
            Ok((
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(RenewBookPage { form, bookinst }),
            )
                .into_response())
        }
    }
}
