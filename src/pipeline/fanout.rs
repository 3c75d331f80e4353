use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::pipeline::compute::compute_object;
use crate::pipeline::sampler::SampleWindow;
use crate::pipeline::types::{ElementSet, ObjectSnapshot, OrbitalObject};
use crate::propagation::Propagator;

/// Run the per-object computor for the whole fleet, at most
/// `max_concurrency` objects in flight at once.
///
/// Nothing a worker does can fail the batch: per-object failures become
/// omissions, and a panicking worker only loses its own object. Results are
/// assembled by object id, so the output order is deterministic regardless
/// of completion order. If `deadline` is set and expires, workers still in
/// flight are abandoned and the cycle proceeds with what finished.
pub async fn compute_fleet(
    propagator: Arc<dyn Propagator>,
    fleet: Vec<(OrbitalObject, ElementSet)>,
    now: DateTime<Utc>,
    window: SampleWindow,
    max_concurrency: usize,
    deadline: Option<Duration>,
) -> Vec<ObjectSnapshot> {
    let gate = Arc::new(Semaphore::new(max_concurrency.max(1)));
    let mut workers = JoinSet::new();

    for (object, elements) in fleet {
        let propagator = Arc::clone(&propagator);
        let gate = Arc::clone(&gate);
        workers.spawn(async move {
            let _permit = gate.acquire_owned().await.ok()?;
            compute_object(propagator.as_ref(), object, &elements, now, window)
        });
    }

    let mut by_id: BTreeMap<i64, ObjectSnapshot> = BTreeMap::new();
    let collect = async {
        while let Some(joined) = workers.join_next().await {
            match joined {
                Ok(Some(snapshot)) => {
                    by_id.insert(snapshot.object.id, snapshot);
                }
                Ok(None) => {}
                Err(e) => log::warn!("object worker panicked: {e}"),
            }
        }
    };

    match deadline {
        Some(limit) => {
            if tokio::time::timeout(limit, collect).await.is_err() {
                log::warn!(
                    "cycle deadline reached, abandoning {} unfinished workers",
                    workers.len()
                );
                workers.abort_all();
            }
        }
        None => collect.await,
    }

    by_id.into_values().collect()
}
