use axum::{Router, routing::get};
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    app_state::AppState,
    health::{self, StatusResponse},
    posts::{
        dtos::{ErrorResponse, FailedCommunity, PostResult, PostsResponse},
        handlers as posts,
    },
};

#[derive(OpenApi)]
#[openapi(
    paths(health::status, posts::list_posts),
    components(schemas(
        StatusResponse,
        PostsResponse,
        PostResult,
        FailedCommunity,
        ErrorResponse
    )),
    tags(
        (name = "health", description = "Liveness"),
        (name = "posts", description = "Forum post scraping")
    )
)]
pub struct ApiDoc;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health::status))
        .route("/healthz", get(health::status))
        .route("/v1/posts", get(posts::list_posts))
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}
