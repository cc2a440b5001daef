use crate::date::Retention;
use crate::es;
use crate::sink::Sink;
use elasticsearch::Elasticsearch;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// What a purge run did.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub deleted: usize,
    pub failed: usize,
    /// Failed catalog requests and index names with an unreadable date
    pub listing_errors: usize,
}

/// Delete every index of `family` that is older than `policy` allows.
///
/// A deletion starts as soon as its index comes out of the catalog scan and
/// runs concurrently with the others. With `max_concurrency` set, at most
/// that many delete requests are in flight at once, otherwise there is no
/// limit. Every outcome is reported to `sink`; a failure only affects its own
/// index. Returns once all deletions have finished, whatever their outcome.
pub async fn purge(
    client: &Elasticsearch, family: &str, policy: Retention, sink: Arc<Sink>,
    max_concurrency: Option<usize>,
) -> Summary {
    let limiter = max_concurrency.map(|n| Arc::new(Semaphore::new(n.max(1))));
    let mut candidates = es::list_expired_indices(client, family, policy);
    let mut deletions = JoinSet::new();
    let mut summary = Summary::default();

    while let Some(candidate) = candidates.recv().await {
        let index = match candidate {
            Ok(index) => index,
            Err(e) => {
                sink.error(format_args!("Error: {}", e));
                summary.listing_errors += 1;
                continue;
            }
        };
        sink.debug(format_args!("dispatching delete of {}", index));

        let client = client.clone();
        let sink = sink.clone();
        let limiter = limiter.clone();
        deletions.spawn(async move {
            // held until the request is done
            let _permit = match limiter {
                Some(limiter) => limiter.acquire_owned().await.ok(),
                None => None,
            };
            match es::delete_index(&client, &index).await {
                Ok(deleted) => {
                    sink.info(format_args!("Deleted Index: {}", deleted));
                    true
                }
                Err(e) => {
                    sink.error(format_args!(
                        "Error: failed to delete index {}: {}",
                        index, e
                    ));
                    false
                }
            }
        });
    }

    // the JoinSet only runs dry once every task has exited, on any path
    while let Some(joined) = deletions.join_next().await {
        match joined {
            Ok(true) => summary.deleted += 1,
            Ok(false) => summary.failed += 1,
            Err(e) => {
                sink.error(format_args!("Error: deletion task aborted: {}", e));
                summary.failed += 1;
            }
        }
    }

    summary
}
