use std::sync::Arc;

use axum::http::StatusCode;
use domain::{
    repositories::subscriptions::SubscriptionRepository,
    value_objects::subscriptions::{
        InsertSubscriptionModel, ListSubscriptionsFilter, SubscriptionModel,
        SubscriptionSummaryFilter,
    },
};
use thiserror::Error;
use tracing::{debug, error, info, warn};

#[derive(Debug, Error)]
pub enum SubscriptionError {
    #[error("{0}")]
    InvalidInput(String),
    #[error("subscription {0} not found")]
    NotFound(i32),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl SubscriptionError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            SubscriptionError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            SubscriptionError::NotFound(_) => StatusCode::NOT_FOUND,
            SubscriptionError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type UseCaseResult<T> = std::result::Result<T, SubscriptionError>;

pub struct SubscriptionUseCase<T>
where
    T: SubscriptionRepository + Send + Sync,
{
    subscription_repository: Arc<T>,
}

impl<T> SubscriptionUseCase<T>
where
    T: SubscriptionRepository + Send + Sync,
{
    pub fn new(subscription_repository: Arc<T>) -> Self {
        Self {
            subscription_repository,
        }
    }

    pub async fn create(
        &self,
        insert_model: InsertSubscriptionModel,
    ) -> UseCaseResult<SubscriptionModel> {
        ensure_non_negative_price(insert_model.price)?;

        let created = self
            .subscription_repository
            .create(insert_model.to_entity())
            .await
            .map_err(|err| {
                error!(
                    user_id = %insert_model.user_id,
                    db_error = ?err,
                    "subscriptions: storage create failed"
                );
                SubscriptionError::Internal(err.context("service create"))
            })?;

        info!(
            id = created.id,
            user_id = %created.user_id,
            "subscriptions: subscription created"
        );
        Ok(SubscriptionModel::from(created))
    }

    pub async fn get(&self, id: i32) -> UseCaseResult<SubscriptionModel> {
        let found = self
            .subscription_repository
            .find_by_id(id)
            .await
            .map_err(|err| {
                error!(id, db_error = ?err, "subscriptions: get by id failed");
                SubscriptionError::Internal(err.context("service get"))
            })?;

        match found {
            Some(entity) => Ok(SubscriptionModel::from(entity)),
            None => {
                debug!(id, "subscriptions: subscription not found");
                Err(SubscriptionError::NotFound(id))
            }
        }
    }

    pub async fn list(
        &self,
        filter: &ListSubscriptionsFilter,
    ) -> UseCaseResult<Vec<SubscriptionModel>> {
        let entities = self
            .subscription_repository
            .list(filter)
            .await
            .map_err(|err| {
                error!(?filter, db_error = ?err, "subscriptions: list failed");
                SubscriptionError::Internal(err.context("service list"))
            })?;

        Ok(entities.into_iter().map(SubscriptionModel::from).collect())
    }

    pub async fn update(
        &self,
        id: i32,
        update_model: InsertSubscriptionModel,
    ) -> UseCaseResult<SubscriptionModel> {
        ensure_non_negative_price(update_model.price)?;

        let updated = self
            .subscription_repository
            .update(id, update_model.to_entity())
            .await
            .map_err(|err| {
                error!(id, db_error = ?err, "subscriptions: update failed");
                SubscriptionError::Internal(err.context("service update"))
            })?;

        match updated {
            Some(entity) => {
                info!(id, "subscriptions: subscription updated");
                Ok(SubscriptionModel::from(entity))
            }
            None => {
                warn!(id, "subscriptions: update targeted a missing subscription");
                Err(SubscriptionError::NotFound(id))
            }
        }
    }

    /// Deleting an id that does not exist succeeds, so repeated deletes are harmless.
    pub async fn delete(&self, id: i32) -> UseCaseResult<()> {
        let affected = self
            .subscription_repository
            .delete(id)
            .await
            .map_err(|err| {
                error!(id, db_error = ?err, "subscriptions: delete failed");
                SubscriptionError::Internal(err.context("service delete"))
            })?;

        if affected == 0 {
            debug!(id, "subscriptions: delete matched no rows");
        } else {
            info!(id, "subscriptions: subscription deleted");
        }
        Ok(())
    }

    pub async fn sum_by_period(&self, filter: &SubscriptionSummaryFilter) -> UseCaseResult<i64> {
        self.subscription_repository
            .sum_by_period(filter)
            .await
            .map_err(|err| {
                error!(
                    user_id = %filter.user_id,
                    db_error = ?err,
                    "subscriptions: sum by period failed"
                );
                SubscriptionError::Internal(err.context("service sum by period"))
            })
    }
}

fn ensure_non_negative_price(price: i32) -> UseCaseResult<()> {
    if price < 0 {
        warn!(price, "subscriptions: rejected negative price");
        return Err(SubscriptionError::InvalidInput(
            "price must be non-negative".to_string(),
        ));
    }
    Ok(())
}
