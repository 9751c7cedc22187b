use crate::handlers;
use geopost_kernel::server::ApiState;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

/// Address routes. `/addresses/within_distance/` is static and wins over `/addresses/{id}`.
pub fn router() -> OpenApiRouter<ApiState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::create_address, handlers::list_addresses))
        .routes(routes!(handlers::addresses_within_distance))
        .routes(routes!(
            handlers::get_address,
            handlers::update_address,
            handlers::delete_address
        ))
}
