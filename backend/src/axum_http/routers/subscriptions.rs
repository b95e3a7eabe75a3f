use crate::{axum_http::error_responses::AppError, usecases::subscriptions::SubscriptionUseCase};
use axum::{
    Json, Router,
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use domain::{
    repositories::subscriptions::SubscriptionRepository,
    value_objects::{
        month_year::MonthYear,
        subscriptions::{
            DEFAULT_LIST_LIMIT, DEFAULT_LIST_OFFSET, InsertSubscriptionModel,
            ListSubscriptionsFilter, SubscriptionInput, SubscriptionModel,
            SubscriptionSummaryFilter, SummaryResponse,
        },
    },
};
use infra::postgres::{
    postgres_connection::PgPoolSquad, repositories::subscriptions::SubscriptionPostgres,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

#[derive(Debug, Default, Deserialize)]
pub struct ListSubscriptionsQuery {
    user_id: Option<String>,
    service_name: Option<String>,
    limit: Option<String>,
    offset: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SummaryQuery {
    user_id: Option<String>,
    service_name: Option<String>,
    from: Option<String>,
    to: Option<String>,
}

pub fn routes(db_pool: Arc<PgPoolSquad>) -> Router {
    let subscription_repository = SubscriptionPostgres::new(Arc::clone(&db_pool));
    let subscription_usecase = SubscriptionUseCase::new(Arc::new(subscription_repository));

    router(Arc::new(subscription_usecase))
}

pub fn router<T>(subscription_usecase: Arc<SubscriptionUseCase<T>>) -> Router
where
    T: SubscriptionRepository + Send + Sync + 'static,
{
    Router::new()
        .route("/subscriptions", get(list::<T>).post(create::<T>))
        .route("/subscriptions/summary", get(summary::<T>))
        .route(
            "/subscriptions/:id",
            get(get_by_id::<T>).put(update::<T>).delete(delete::<T>),
        )
        .with_state(subscription_usecase)
}

pub async fn create<T>(
    State(subscription_usecase): State<Arc<SubscriptionUseCase<T>>>,
    body: Bytes,
) -> Result<impl IntoResponse, AppError>
where
    T: SubscriptionRepository + Send + Sync + 'static,
{
    let insert_model = validate_input(decode_input(&body)?)?;

    let created = subscription_usecase.create(insert_model).await?;
    info!(id = created.id, "subscriptions: create request completed");

    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn get_by_id<T>(
    State(subscription_usecase): State<Arc<SubscriptionUseCase<T>>>,
    Path(raw_id): Path<String>,
) -> Result<Json<SubscriptionModel>, AppError>
where
    T: SubscriptionRepository + Send + Sync + 'static,
{
    let id = parse_id(&raw_id)?;
    let subscription = subscription_usecase.get(id).await?;

    Ok(Json(subscription))
}

pub async fn list<T>(
    State(subscription_usecase): State<Arc<SubscriptionUseCase<T>>>,
    Query(query): Query<ListSubscriptionsQuery>,
) -> Result<Json<Vec<SubscriptionModel>>, AppError>
where
    T: SubscriptionRepository + Send + Sync + 'static,
{
    let user_id = match non_blank(query.user_id) {
        Some(raw) => Some(parse_user_id(&raw)?),
        None => None,
    };

    let filter = ListSubscriptionsFilter {
        user_id,
        service_name: non_blank(query.service_name),
        limit: page_param(query.limit.as_deref(), DEFAULT_LIST_LIMIT),
        offset: page_param(query.offset.as_deref(), DEFAULT_LIST_OFFSET),
    };

    let subscriptions = subscription_usecase.list(&filter).await?;
    Ok(Json(subscriptions))
}

pub async fn update<T>(
    State(subscription_usecase): State<Arc<SubscriptionUseCase<T>>>,
    Path(raw_id): Path<String>,
    body: Bytes,
) -> Result<Json<SubscriptionModel>, AppError>
where
    T: SubscriptionRepository + Send + Sync + 'static,
{
    let id = parse_id(&raw_id)?;
    let update_model = validate_input(decode_input(&body)?)?;

    let updated = subscription_usecase.update(id, update_model).await?;
    Ok(Json(updated))
}

pub async fn delete<T>(
    State(subscription_usecase): State<Arc<SubscriptionUseCase<T>>>,
    Path(raw_id): Path<String>,
) -> Result<StatusCode, AppError>
where
    T: SubscriptionRepository + Send + Sync + 'static,
{
    let id = parse_id(&raw_id)?;
    subscription_usecase.delete(id).await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn summary<T>(
    State(subscription_usecase): State<Arc<SubscriptionUseCase<T>>>,
    Query(query): Query<SummaryQuery>,
) -> Result<Json<SummaryResponse>, AppError>
where
    T: SubscriptionRepository + Send + Sync + 'static,
{
    let (Some(raw_user_id), Some(raw_from), Some(raw_to)) = (
        non_blank(query.user_id),
        non_blank(query.from),
        non_blank(query.to),
    ) else {
        return Err(bad_request("missing required params"));
    };

    let filter = SubscriptionSummaryFilter {
        user_id: parse_user_id(&raw_user_id)?,
        service_name: non_blank(query.service_name),
        from: MonthYear::parse(&raw_from).map_err(|_| bad_request("invalid from date"))?,
        to: MonthYear::parse(&raw_to).map_err(|_| bad_request("invalid to date"))?,
    };

    let total = subscription_usecase.sum_by_period(&filter).await?;
    Ok(Json(SummaryResponse { total }))
}

fn decode_input(body: &[u8]) -> Result<SubscriptionInput, AppError> {
    serde_json::from_slice(body).map_err(|err| {
        warn!(error = %err, "subscriptions: invalid json body");
        bad_request("invalid JSON")
    })
}

/// Structural validation of a create/update payload. The non-negative price rule is checked
/// here and again by the use case.
fn validate_input(input: SubscriptionInput) -> Result<InsertSubscriptionModel, AppError> {
    if input.service_name.trim().is_empty() {
        return Err(bad_request("service_name is required"));
    }

    let price = match input.price {
        None => return Err(bad_request("price is required")),
        Some(price) if price < 0 => return Err(bad_request("price must be non-negative")),
        Some(price) => i32::try_from(price).map_err(|_| bad_request("price is too large"))?,
    };

    if input.user_id.trim().is_empty() {
        return Err(bad_request("user_id is required"));
    }
    let user_id = parse_user_id(input.user_id.trim())?;

    if input.start_date.is_empty() {
        return Err(bad_request("start_date is required"));
    }
    let start_date =
        MonthYear::parse(&input.start_date).map_err(|_| bad_request("invalid start_date format"))?;

    let end_date = input
        .end_date
        .as_deref()
        .map(MonthYear::parse)
        .transpose()
        .map_err(|_| bad_request("invalid end_date format"))?;

    Ok(InsertSubscriptionModel {
        service_name: input.service_name,
        price,
        user_id,
        start_date,
        end_date,
    })
}

fn parse_id(raw: &str) -> Result<i32, AppError> {
    raw.parse().map_err(|_| bad_request("invalid id"))
}

fn parse_user_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| bad_request("invalid user_id"))
}

/// Pagination parameters never fail the request: anything unparseable or negative falls back
/// to the default.
fn page_param(raw: Option<&str>, default: i64) -> i64 {
    raw.and_then(|value| value.trim().parse::<i64>().ok())
        .filter(|value| *value >= 0)
        .unwrap_or(default)
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}

fn bad_request(message: &str) -> AppError {
    AppError::BadRequest(message.to_string())
}
