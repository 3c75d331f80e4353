use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::cache::{FleetPayload, SnapshotCache};
use crate::config::PipelineConfig;
use crate::pipeline::error::CycleError;
use crate::pipeline::fanout::compute_fleet;
use crate::pipeline::sampler::SampleWindow;
use crate::pipeline::types::CycleSnapshot;
use crate::propagation::Propagator;
use crate::store::{ElementRepository, GeoUpdate, GeospatialSink};

/// Scheduler states. One cycle at a time: `Running` transitions back to
/// `Idle` only once persist and publish are done (or the cycle failed), and
/// `Idle` waits the full cycle period before re-arming. The wait is measured
/// from cycle completion, so cycles drift later under load instead of
/// overlapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleState {
    Idle,
    Running,
}

/// What a completed cycle did. `persisted`/`published` are false both when
/// the corresponding write failed and when an empty cycle skipped it.
#[derive(Debug, Clone, Copy)]
pub struct CycleOutcome {
    pub objects: usize,
    pub persisted: bool,
    pub published: bool,
}

/// Drives the repeating fetch → compute → persist → publish cycle.
///
/// All collaborators are injected at construction; the scheduler holds no
/// cross-cycle state beyond its own timer.
pub struct CycleScheduler {
    repository: Arc<dyn ElementRepository>,
    sink: Arc<dyn GeospatialSink>,
    cache: Arc<dyn SnapshotCache>,
    propagator: Arc<dyn Propagator>,
    settings: PipelineConfig,
}

impl CycleScheduler {
    pub fn new(
        repository: Arc<dyn ElementRepository>,
        sink: Arc<dyn GeospatialSink>,
        cache: Arc<dyn SnapshotCache>,
        propagator: Arc<dyn Propagator>,
        settings: PipelineConfig,
    ) -> Self {
        Self {
            repository,
            sink,
            cache,
            propagator,
            settings,
        }
    }

    fn window(&self) -> SampleWindow {
        SampleWindow::from_seconds(
            self.settings.lookback_seconds,
            self.settings.predict_seconds,
            self.settings.sample_interval_seconds,
        )
    }

    /// One full cycle. Only a repository failure aborts it; sink and cache
    /// failures are logged and reflected in the outcome.
    pub async fn run_once(&self, now: DateTime<Utc>) -> Result<CycleOutcome, CycleError> {
        let fleet = self.repository.current_elements().await?;
        log::info!("cycle start: {} objects with current elements", fleet.len());

        let objects = compute_fleet(
            Arc::clone(&self.propagator),
            fleet,
            now,
            self.window(),
            self.settings.max_concurrency,
            self.settings.cycle_deadline_seconds.map(Duration::from_secs),
        )
        .await;
        let snapshot = CycleSnapshot {
            started_at: now,
            objects,
        };

        let mut persisted = false;
        let mut published = false;

        if snapshot.is_empty() {
            // A transient failure must not blank the fleet for consumers:
            // leave the previous snapshot in the cache until it expires.
            log::warn!("cycle produced no snapshots, keeping previous cache entry");
        } else {
            let updates: Vec<GeoUpdate> = snapshot
                .objects
                .iter()
                .map(|s| GeoUpdate {
                    object_id: s.object.id,
                    longitude_deg: s.fix.longitude_deg,
                    latitude_deg: s.fix.latitude_deg,
                })
                .collect();
            match self.sink.persist(&updates).await {
                Ok(()) => {
                    persisted = true;
                    log::info!("geospatial store updated for {} objects", updates.len());
                }
                // The cache is the consumer-facing guarantee; a failed
                // mirror write never blocks the publish.
                Err(e) => log::error!("geospatial persist failed: {e}"),
            }

            let payload = FleetPayload::from(&snapshot);
            let ttl = Duration::from_secs(self.settings.cycle_seconds);
            match self.cache.publish(&payload, ttl).await {
                Ok(()) => {
                    published = true;
                    log::info!("snapshot published, ttl {}s", ttl.as_secs());
                }
                Err(e) => log::error!("snapshot publish failed, cycle incomplete: {e}"),
            }
        }

        Ok(CycleOutcome {
            objects: snapshot.objects.len(),
            persisted,
            published,
        })
    }

    /// The control loop. Starts with an immediate cycle, then alternates
    /// Running and Idle forever; a failed cycle is logged and the loop
    /// proceeds to the wait like any other.
    pub async fn run(&self) {
        let wait = Duration::from_secs(self.settings.cycle_seconds);
        let mut state = CycleState::Running;

        loop {
            state = match state {
                CycleState::Running => {
                    let started = Utc::now();
                    match self.run_once(started).await {
                        Ok(outcome) => log::info!(
                            "cycle complete: {} objects, persisted={}, published={}, took {}ms",
                            outcome.objects,
                            outcome.persisted,
                            outcome.published,
                            (Utc::now() - started).num_milliseconds()
                        ),
                        Err(e) => log::error!("cycle failed: {e}"),
                    }
                    CycleState::Idle
                }
                CycleState::Idle => {
                    tokio::time::sleep(wait).await;
                    CycleState::Running
                }
            };
        }
    }
}
