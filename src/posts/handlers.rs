use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::{info, warn};

use crate::{
    app_state::AppState,
    forum::FailurePolicy,
    posts::dtos::{ErrorResponse, PostsQuery, PostsResponse},
};

fn error_response(status: StatusCode, error: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: error.into(),
        }),
    )
        .into_response()
}

/// Scrape the requested communities. A community whose listing cannot be fetched is
/// reported under `failed` while the others still return results.
#[utoipa::path(
    get,
    path = "/v1/posts",
    tag = "posts",
    params(PostsQuery),
    responses(
        (status = 200, description = "Posts per community", body = PostsResponse),
        (status = 400, description = "Invalid query", body = ErrorResponse),
        (status = 502, description = "No community could be fetched", body = ErrorResponse)
    )
)]
pub async fn list_posts(
    State(state): State<AppState>,
    query: Result<Query<PostsQuery>, QueryRejection>,
) -> Response {
    let Query(query) = match query {
        Ok(query) => query,
        Err(rejection) => return error_response(StatusCode::BAD_REQUEST, rejection.body_text()),
    };

    let request = match query.validate(&state.communities) {
        Ok(request) => request,
        Err(error) => return error_response(StatusCode::BAD_REQUEST, error),
    };

    let outcome = match state
        .scraper
        .scrape_batch(
            &request.communities,
            request.sort,
            request.mode,
            FailurePolicy::Skip,
        )
        .await
    {
        Ok(outcome) => outcome,
        Err(error) => return error_response(StatusCode::BAD_GATEWAY, error.to_string()),
    };

    if outcome.communities.is_empty() {
        warn!(
            failures = outcome.failures.len(),
            "every requested community failed"
        );
        let names: Vec<String> = outcome
            .failures
            .iter()
            .map(|f| f.community.to_string())
            .collect();
        return error_response(
            StatusCode::BAD_GATEWAY,
            format!("failed to fetch listings for {}", names.join(", ")),
        );
    }

    info!(
        posts = outcome.total_posts(),
        failed = outcome.failures.len(),
        "posts request served"
    );
    (StatusCode::OK, Json(PostsResponse::from(outcome))).into_response()
}
