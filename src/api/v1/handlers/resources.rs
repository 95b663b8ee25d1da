/*
 * Responsibility
 * - CRUD handlers shared by every resource in the index (top-level and nested)
 * - HTTP <-> resource engine translation: query params, If-Match, ETag, x-total
 * - authorization is NOT decided here; the resource hooks own it
 */
use std::collections::HashMap;

use axum::{
    Json,
    extract::{Query, State},
    http::{HeaderMap, HeaderName, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::Value;

use crate::api::v1::dto::items::{
    ClearResponse, CreateItemsRequest, CreatedItems, ItemResponse, RESERVED_PREFIX,
    validate_payload,
};
use crate::api::v1::extractors::Target;
use crate::error::AppError;
use crate::resource::{Call, Change, Item, Page, Payload, Predicate};
use crate::state::AppState;

pub const TOTAL_HEADER: &str = "x-total";

const DEFAULT_PER_PAGE: usize = 25;
const MAX_PER_PAGE: usize = 100;

// query params that are not field filters
const PAGE_PARAM: &str = "page";
const PER_PAGE_PARAM: &str = "per_page";
const TOKEN_PARAM: &str = "access_token";

pub async fn list(
    State(state): State<AppState>,
    call: Call,
    target: Target,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Response, AppError> {
    let (resource, mut lookup) = state.index.resolve(&call, target.path()).await?;
    let page = page_from(&params)?;
    lookup.add_query(filters_from(params));

    let list = resource.find(&call, lookup, page).await?;

    let mut headers = HeaderMap::new();
    headers.insert(
        HeaderName::from_static(TOTAL_HEADER),
        HeaderValue::from(list.total),
    );
    let body: Vec<ItemResponse> = list.items.into_iter().map(ItemResponse::from).collect();
    Ok((headers, Json(body)).into_response())
}

pub async fn create(
    State(state): State<AppState>,
    call: Call,
    target: Target,
    Json(req): Json<CreateItemsRequest>,
) -> Result<(StatusCode, Json<CreatedItems>), AppError> {
    req.validate()
        .map_err(|message| AppError::bad_request("VALIDATION", message))?;

    let (resource, scope) = state.index.resolve(&call, target.path()).await?;
    let batch = req.is_batch();
    let mut items = resource
        .insert(&call, &scope, req.into_payloads())
        .await?
        .into_iter()
        .map(ItemResponse::from);

    let body = match (batch, items.next()) {
        (false, Some(item)) => CreatedItems::One(item),
        (_, first) => CreatedItems::Many(first.into_iter().chain(items).collect()),
    };
    Ok((StatusCode::CREATED, Json(body)))
}

pub async fn clear(
    State(state): State<AppState>,
    call: Call,
    target: Target,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<ClearResponse>, AppError> {
    let (resource, mut lookup) = state.index.resolve(&call, target.path()).await?;
    lookup.add_query(filters_from(params));

    let deleted = resource.clear(&call, lookup).await?;
    Ok(Json(ClearResponse { deleted }))
}

pub async fn read(
    State(state): State<AppState>,
    call: Call,
    target: Target,
) -> Result<Response, AppError> {
    let (resource, scope) = state.index.resolve(&call, target.path()).await?;
    let item = resource
        .get(&call, &scope, target.item_id()?)
        .await
        .into_result()?;
    Ok(item_response(item))
}

pub async fn replace(
    state: State<AppState>,
    call: Call,
    target: Target,
    Json(payload): Json<Payload>,
) -> Result<Response, AppError> {
    update(state, call, target, Change::Replace(payload)).await
}

pub async fn merge(
    state: State<AppState>,
    call: Call,
    target: Target,
    Json(payload): Json<Payload>,
) -> Result<Response, AppError> {
    update(state, call, target, Change::Merge(payload)).await
}

pub async fn remove(
    State(state): State<AppState>,
    call: Call,
    target: Target,
) -> Result<StatusCode, AppError> {
    let (resource, scope) = state.index.resolve(&call, target.path()).await?;
    let if_match = if_match(&call);
    resource
        .delete(&call, &scope, target.item_id()?, if_match.as_deref())
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn update(
    State(state): State<AppState>,
    call: Call,
    target: Target,
    change: Change,
) -> Result<Response, AppError> {
    let payload = match &change {
        Change::Replace(payload) | Change::Merge(payload) => payload,
    };
    validate_payload(payload).map_err(|message| AppError::bad_request("VALIDATION", message))?;

    let (resource, scope) = state.index.resolve(&call, target.path()).await?;
    let if_match = if_match(&call);
    let item = resource
        .update(&call, &scope, target.item_id()?, change, if_match.as_deref())
        .await?;
    Ok(item_response(item))
}

fn item_response(item: Item) -> Response {
    let mut headers = HeaderMap::new();
    if let Ok(etag) = HeaderValue::from_str(&format!("\"{}\"", item.etag)) {
        headers.insert(header::ETAG, etag);
    }
    (headers, Json(ItemResponse::from(item))).into_response()
}

fn if_match(call: &Call) -> Option<String> {
    call.headers()
        .get(header::IF_MATCH)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty() && v != "*")
}

fn page_from(params: &HashMap<String, String>) -> Result<Option<Page>, AppError> {
    let number = parse_param(params, PAGE_PARAM)?;
    let per_page = parse_param(params, PER_PAGE_PARAM)?;
    if number.is_none() && per_page.is_none() {
        return Ok(None);
    }
    Ok(Some(Page::new(
        number.unwrap_or(1),
        per_page.unwrap_or(DEFAULT_PER_PAGE).clamp(1, MAX_PER_PAGE),
    )))
}

fn parse_param(params: &HashMap<String, String>, name: &'static str) -> Result<Option<usize>, AppError> {
    params
        .get(name)
        .map(|v| {
            v.parse::<usize>()
                .map_err(|_| AppError::bad_request("INVALID_QUERY", format!("`{name}` must be a positive integer")))
        })
        .transpose()
}

// Remaining params are equality filters on string fields.
fn filters_from(params: HashMap<String, String>) -> Vec<Predicate> {
    params
        .into_iter()
        .filter(|(field, _)| {
            !matches!(field.as_str(), PAGE_PARAM | PER_PAGE_PARAM | TOKEN_PARAM)
                && !field.starts_with(RESERVED_PREFIX)
        })
        .map(|(field, value)| Predicate::equal(field, Value::String(value)))
        .collect()
}
