use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::subscriptions::{InsertSubscriptionEntity, SubscriptionEntity};
use crate::value_objects::month_year::MonthYear;

pub const DEFAULT_LIST_LIMIT: i64 = 10;
pub const DEFAULT_LIST_OFFSET: i64 = 0;

/// Request payload for create and update. Every field decodes as absent when missing so the
/// handler can report which one is wrong instead of failing the whole body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubscriptionInput {
    pub service_name: String,
    pub price: Option<i64>,
    pub user_id: String,
    pub start_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
}

/// A validated subscription ready to be persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct InsertSubscriptionModel {
    pub service_name: String,
    pub price: i32,
    pub user_id: Uuid,
    pub start_date: MonthYear,
    pub end_date: Option<MonthYear>,
}

impl InsertSubscriptionModel {
    pub fn to_entity(&self) -> InsertSubscriptionEntity {
        InsertSubscriptionEntity {
            service_name: self.service_name.clone(),
            price: self.price,
            user_id: self.user_id,
            start_date: self.start_date.first_day(),
            end_date: self.end_date.map(|end_date| end_date.first_day()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionModel {
    pub id: i32,
    pub service_name: String,
    pub price: i32,
    pub user_id: Uuid,
    pub start_date: MonthYear,
    pub end_date: Option<MonthYear>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SubscriptionModel {
    pub fn to_input(&self) -> SubscriptionInput {
        SubscriptionInput {
            service_name: self.service_name.clone(),
            price: Some(i64::from(self.price)),
            user_id: self.user_id.to_string(),
            start_date: self.start_date.to_string(),
            end_date: self.end_date.map(|end_date| end_date.to_string()),
        }
    }
}

impl From<SubscriptionEntity> for SubscriptionModel {
    fn from(value: SubscriptionEntity) -> Self {
        Self {
            id: value.id,
            service_name: value.service_name,
            price: value.price,
            user_id: value.user_id,
            start_date: MonthYear::from(value.start_date),
            end_date: value.end_date.map(MonthYear::from),
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListSubscriptionsFilter {
    pub user_id: Option<Uuid>,
    /// Case-insensitive substring of the service name.
    pub service_name: Option<String>,
    pub limit: i64,
    pub offset: i64,
}

impl Default for ListSubscriptionsFilter {
    fn default() -> Self {
        Self {
            user_id: None,
            service_name: None,
            limit: DEFAULT_LIST_LIMIT,
            offset: DEFAULT_LIST_OFFSET,
        }
    }
}

/// Selects the subscriptions of `user_id` that start on or after `from` and either never
/// end or end on or before `to`.
#[derive(Debug, Clone, PartialEq)]
pub struct SubscriptionSummaryFilter {
    pub user_id: Uuid,
    pub service_name: Option<String>,
    pub from: MonthYear,
    pub to: MonthYear,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SummaryResponse {
    pub total: i64,
}
