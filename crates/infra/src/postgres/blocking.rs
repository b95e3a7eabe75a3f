use anyhow::{Context, Result};
use diesel::{Connection, PgConnection, result::QueryResult};
use std::sync::Arc;
use thiserror::Error;
use tokio::task;
use tokio_util::sync::CancellationToken;

use crate::postgres::postgres_connection::PgPoolSquad;

#[derive(Debug, Error)]
#[error("caller went away before the postgres call completed")]
pub struct StoreCancelled;

/// Runs `work` on the blocking threadpool with a pooled connection.
///
/// Diesel is synchronous, so awaiting this is the only suspension point of a store call. The
/// token handed to `work` is cancelled as soon as the awaiting future is dropped (client
/// disconnect, request timeout, shutdown). The blocking task itself keeps running, so writes
/// must go through [`commit_unless_cancelled`] to honour it.
pub async fn run_blocking<T, F>(db_pool: &Arc<PgPoolSquad>, work: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce(&mut PgConnection, &CancellationToken) -> Result<T> + Send + 'static,
{
    let db_pool = Arc::clone(db_pool);
    let token = CancellationToken::new();
    let _cancel_on_drop = token.clone().drop_guard();

    task::spawn_blocking(move || -> Result<T> {
        if token.is_cancelled() {
            return Err(StoreCancelled.into());
        }
        let mut conn = db_pool
            .get()
            .context("failed to check out a postgres connection")?;
        work(&mut *conn, &token)
    })
    .await
    .context("postgres task did not run to completion")?
}

/// Runs `work` in a transaction that is rolled back instead of committed once `token` is
/// cancelled.
pub fn commit_unless_cancelled<T, F>(
    conn: &mut PgConnection,
    token: &CancellationToken,
    work: F,
) -> Result<T>
where
    F: FnOnce(&mut PgConnection) -> QueryResult<T>,
{
    conn.transaction::<T, anyhow::Error, _>(|tx| {
        let value = work(tx)?;
        if token.is_cancelled() {
            return Err(StoreCancelled.into());
        }
        Ok(value)
    })
}
