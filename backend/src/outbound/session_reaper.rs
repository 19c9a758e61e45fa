//! Periodic removal of expired session records.
//!
//! Loads already ignore lapsed records; the reaper keeps the table from
//! growing with sessions whose cookies were simply abandoned.

use std::sync::Arc;
use std::time::Duration;

use mockable::Clock;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::domain::ports::{SessionRepository, SessionRepositoryError};

/// Purge every session that expired at the clock's current instant.
pub async fn purge_once<R>(
    repository: &R,
    clock: &dyn Clock,
) -> Result<u64, SessionRepositoryError>
where
    R: SessionRepository + ?Sized,
{
    let removed = repository.purge_expired(clock.utc()).await?;
    if removed > 0 {
        info!(removed, "purged expired sessions");
    } else {
        debug!("no expired sessions to purge");
    }
    Ok(removed)
}

/// Spawn a Tokio task running [`purge_once`] every `period`.
///
/// The first purge runs immediately. Failures are logged and retried on the
/// next tick; the task ends only when its handle is aborted.
pub fn spawn_session_reaper<R>(
    repository: Arc<R>,
    clock: Arc<dyn Clock>,
    period: Duration,
) -> JoinHandle<()>
where
    R: SessionRepository + 'static,
{
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            if let Err(error) = purge_once(repository.as_ref(), clock.as_ref()).await {
                warn!(%error, "session purge failed");
            }
        }
    })
}
