use anyhow::{Context, Result};
use axum::Router;
use axum::http::HeaderValue;
use geopost::domain::config::CorsConfig;
use geopost::kernel::prelude::ApiState;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;
use utoipa_scalar::{Scalar, Servable};

#[derive(OpenApi)]
#[openapi(info(title = "GeoPost", description = "Postal addresses with coordinates"))]
struct ApiDoc;

pub(crate) fn init(state: ApiState) -> Result<Router> {
    let cors = cors_layer(&state.config().cors)?;
    let api = ApiDoc::openapi();

    // Separate the OpenAPI routes and the API documentation object
    let (openapi_routes, api_doc) = OpenApiRouter::with_openapi(api)
        .merge(geopost::server::router())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
        .split_for_parts();

    let scalar_routes = Scalar::with_url("/api", api_doc);

    Ok(Router::new().merge(openapi_routes).merge(scalar_routes).layer(cors))
}

/// Browsers reject a literal `*` alongside credentials, so the wildcard mirrors the request.
fn cors_layer(cfg: &CorsConfig) -> Result<CorsLayer> {
    let origins = if cfg.allows_any_origin() {
        AllowOrigin::mirror_request()
    } else {
        let list = cfg
            .allowed_origins
            .iter()
            .map(|origin| {
                HeaderValue::from_str(origin)
                    .with_context(|| format!("Invalid CORS origin: {origin}"))
            })
            .collect::<Result<Vec<_>>>()?;
        AllowOrigin::list(list)
    };

    Ok(CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(cfg.allow_credentials))
}
