use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use diesel::{RunQueryDsl, delete, dsl::sum, insert_into, prelude::*, update};
use std::sync::Arc;
use tracing::debug;

use crate::postgres::{
    blocking::{commit_unless_cancelled, run_blocking},
    postgres_connection::PgPoolSquad,
    queries::subscriptions::{list_subscriptions_query, summary_scope_query},
};
use domain::{
    entities::subscriptions::{InsertSubscriptionEntity, SubscriptionEntity},
    repositories::subscriptions::SubscriptionRepository,
    schema::subscriptions,
    value_objects::subscriptions::{ListSubscriptionsFilter, SubscriptionSummaryFilter},
};

pub struct SubscriptionPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl SubscriptionPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl SubscriptionRepository for SubscriptionPostgres {
    async fn create(&self, insert_entity: InsertSubscriptionEntity) -> Result<SubscriptionEntity> {
        run_blocking(&self.db_pool, move |conn, token| {
            commit_unless_cancelled(conn, token, |tx| {
                insert_into(subscriptions::table)
                    .values(&insert_entity)
                    .returning(SubscriptionEntity::as_returning())
                    .get_result::<SubscriptionEntity>(tx)
            })
        })
        .await
        .context("insert subscription")
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<SubscriptionEntity>> {
        run_blocking(&self.db_pool, move |conn, _| {
            let result = subscriptions::table
                .find(id)
                .select(SubscriptionEntity::as_select())
                .first::<SubscriptionEntity>(conn)
                .optional()?;
            Ok(result)
        })
        .await
        .with_context(|| format!("get subscription {id}"))
    }

    async fn list(&self, filter: &ListSubscriptionsFilter) -> Result<Vec<SubscriptionEntity>> {
        let query = list_subscriptions_query(filter);

        run_blocking(&self.db_pool, move |conn, _| {
            let results = query.load::<SubscriptionEntity>(conn)?;
            Ok(results)
        })
        .await
        .context("list subscriptions")
    }

    async fn update(
        &self,
        id: i32,
        update_entity: InsertSubscriptionEntity,
    ) -> Result<Option<SubscriptionEntity>> {
        let now = Utc::now();

        run_blocking(&self.db_pool, move |conn, token| {
            commit_unless_cancelled(conn, token, |tx| {
                update(subscriptions::table.find(id))
                    .set((&update_entity, subscriptions::updated_at.eq(now)))
                    .returning(SubscriptionEntity::as_returning())
                    .get_result::<SubscriptionEntity>(tx)
                    .optional()
            })
        })
        .await
        .with_context(|| format!("update subscription {id}"))
    }

    async fn delete(&self, id: i32) -> Result<usize> {
        let affected = run_blocking(&self.db_pool, move |conn, token| {
            commit_unless_cancelled(conn, token, |tx| {
                delete(subscriptions::table.find(id)).execute(tx)
            })
        })
        .await
        .with_context(|| format!("delete subscription {id}"))?;

        debug!(id, affected, "subscriptions: delete executed");
        Ok(affected)
    }

    async fn sum_by_period(&self, filter: &SubscriptionSummaryFilter) -> Result<i64> {
        let query = summary_scope_query(filter).select(sum(subscriptions::price));

        let total = run_blocking(&self.db_pool, move |conn, _| {
            let total = query.get_result::<Option<i64>>(conn)?;
            Ok(total)
        })
        .await
        .context("sum subscriptions by period")?;

        Ok(total.unwrap_or(0))
    }
}
