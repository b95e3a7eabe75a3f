use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

use crate::entities::subscriptions::{InsertSubscriptionEntity, SubscriptionEntity};
use crate::value_objects::subscriptions::{ListSubscriptionsFilter, SubscriptionSummaryFilter};

#[async_trait]
#[automock]
pub trait SubscriptionRepository {
    /// Inserts the row and reads back the server-assigned id and timestamps in one round trip.
    async fn create(&self, insert_entity: InsertSubscriptionEntity) -> Result<SubscriptionEntity>;
    async fn find_by_id(&self, id: i32) -> Result<Option<SubscriptionEntity>>;
    async fn list(&self, filter: &ListSubscriptionsFilter) -> Result<Vec<SubscriptionEntity>>;
    /// Replaces the mutable columns of `id`. `None` when no row has that id.
    async fn update(
        &self,
        id: i32,
        update_entity: InsertSubscriptionEntity,
    ) -> Result<Option<SubscriptionEntity>>;
    /// Returns the number of deleted rows.
    async fn delete(&self, id: i32) -> Result<usize>;
    async fn sum_by_period(&self, filter: &SubscriptionSummaryFilter) -> Result<i64>;
}
