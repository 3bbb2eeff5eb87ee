use axum::http::{HeaderValue, Method, header};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(info(
    title = "Notes API Server",
    description = "Endpoints for creating, listing, and updating notes"
))]
struct ApiDoc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize the server state and extract the connection pool.
    let (config, pool) = notes_api::init().await?;

    let openapi_router = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .nest("/notes", notes_api::routes::notes::router(pool));
    let (router, api) = openapi_router.split_for_parts();

    // Cross-origin requests are only accepted from the configured origin.
    let cors = CorsLayer::new()
        .allow_origin(config.allowed_origin.parse::<HeaderValue>()?)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::ORIGIN, header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true)
        .expose_headers([header::CONTENT_LENGTH]);

    let router = router
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new())
                .on_response(DefaultOnResponse::new()),
        );

    let listener = TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, router).await?;
    Ok(())
}
