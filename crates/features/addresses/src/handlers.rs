use crate::error::AddressError;
use crate::model::{Address, AddressInput, ListParams, ProximityParams};
use crate::validation::validate;
use crate::{Addresses, proximity};
use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use geopost_derive::api_handler;
use geopost_kernel::domain::constants::ADDRESSES_TAG;
use geopost_kernel::problem::{ErrorBody, ValidationBody};
use geopost_kernel::server::ApiState;

type ApiResult<T> = Result<Json<T>, AddressError>;

fn slice(state: &ApiState) -> Result<&Addresses, AddressError> {
    state
        .slice::<Addresses>()
        .map_err(|e| AddressError::Internal { message: e.to_string().into(), context: None })
}

#[api_handler(
    post,
    path = "/addresses/",
    request_body = AddressInput,
    responses(
        (status = OK, description = "Created address", body = Address),
        (status = UNPROCESSABLE_ENTITY, description = "Invalid body or coordinates", body = ValidationBody),
    ),
    tag = ADDRESSES_TAG,
)]
pub(crate) async fn create_address(
    State(state): State<ApiState>,
    payload: Result<Json<AddressInput>, JsonRejection>,
) -> ApiResult<Address> {
    let Json(input) = payload.map_err(|e| AddressError::invalid("body", e.body_text()))?;
    let fields = validate(input)?;
    let address = slice(&state)?.repository.create(fields).await?;
    Ok(Json(address))
}

#[api_handler(
    get,
    path = "/addresses/",
    params(ListParams),
    responses(
        (status = OK, description = "One page of addresses", body = Vec<Address>),
        (status = UNPROCESSABLE_ENTITY, description = "Negative or malformed skip/limit", body = ValidationBody),
    ),
    tag = ADDRESSES_TAG,
)]
pub(crate) async fn list_addresses(
    State(state): State<ApiState>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> ApiResult<Vec<Address>> {
    let Query(ListParams { skip, limit }) =
        params.map_err(|e| AddressError::invalid("query", e.body_text()))?;
    let addresses = slice(&state)?.repository.list(skip, limit).await?;
    Ok(Json(addresses))
}

#[api_handler(
    get,
    path = "/addresses/{id}",
    params(("id" = i64, Path, description = "Address identifier")),
    responses(
        (status = OK, description = "The address", body = Address),
        (status = NOT_FOUND, description = "No such address", body = ErrorBody),
        (status = UNPROCESSABLE_ENTITY, description = "Malformed identifier", body = ValidationBody),
    ),
    tag = ADDRESSES_TAG,
)]
pub(crate) async fn get_address(
    State(state): State<ApiState>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Address> {
    let Path(id) = id.map_err(|e| AddressError::invalid("id", e.body_text()))?;
    let address = slice(&state)?.repository.get(id).await?;
    Ok(Json(address))
}

#[api_handler(
    put,
    path = "/addresses/{id}",
    params(("id" = i64, Path, description = "Address identifier")),
    request_body = AddressInput,
    responses(
        (status = OK, description = "Updated address", body = Address),
        (status = NOT_FOUND, description = "No such address", body = ErrorBody),
        (status = UNPROCESSABLE_ENTITY, description = "Invalid body or coordinates", body = ValidationBody),
    ),
    tag = ADDRESSES_TAG,
)]
pub(crate) async fn update_address(
    State(state): State<ApiState>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<AddressInput>, JsonRejection>,
) -> ApiResult<Address> {
    let Path(id) = id.map_err(|e| AddressError::invalid("id", e.body_text()))?;
    let Json(input) = payload.map_err(|e| AddressError::invalid("body", e.body_text()))?;
    let fields = validate(input)?;
    let address = slice(&state)?.repository.update(id, fields).await?;
    Ok(Json(address))
}

#[api_handler(
    delete,
    path = "/addresses/{id}",
    params(("id" = i64, Path, description = "Address identifier")),
    responses(
        (status = OK, description = "Deleted address", body = Address),
        (status = NOT_FOUND, description = "No such address", body = ErrorBody),
        (status = UNPROCESSABLE_ENTITY, description = "Malformed identifier", body = ValidationBody),
    ),
    tag = ADDRESSES_TAG,
)]
pub(crate) async fn delete_address(
    State(state): State<ApiState>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Address> {
    let Path(id) = id.map_err(|e| AddressError::invalid("id", e.body_text()))?;
    let address = slice(&state)?.repository.delete(id).await?;
    Ok(Json(address))
}

#[api_handler(
    get,
    path = "/addresses/within_distance/",
    params(ProximityParams),
    responses(
        (status = OK, description = "Addresses within the radius, in identifier order", body = Vec<Address>),
        (status = UNPROCESSABLE_ENTITY, description = "Missing or malformed parameters", body = ValidationBody),
    ),
    tag = ADDRESSES_TAG,
)]
pub(crate) async fn addresses_within_distance(
    State(state): State<ApiState>,
    params: Result<Query<ProximityParams>, QueryRejection>,
) -> ApiResult<Vec<Address>> {
    let Query(ProximityParams { lat, lon, distance }) =
        params.map_err(|e| AddressError::invalid("query", e.body_text()))?;
    let repository = &slice(&state)?.repository;
    let addresses = proximity::find_within_distance(repository, lat, lon, distance).await?;
    Ok(Json(addresses))
}
