use chrono::{DateTime, Duration, Utc};

use crate::pipeline::types::{ElementSet, PredictionSample};
use crate::propagation::Propagator;

/// The prediction window for one cycle. Sampling starts `lookback` before
/// "now" and runs `horizon` past it, so consumers polling the cache always
/// find samples bracketing the current time even when the cycle itself took
/// a while to finish.
#[derive(Debug, Clone, Copy)]
pub struct SampleWindow {
    pub lookback: Duration,
    pub horizon: Duration,
    pub interval: Duration,
}

impl SampleWindow {
    /// `interval` must be positive; configuration loading rejects a zero
    /// interval before any window is built.
    pub fn from_seconds(lookback: u64, horizon: u64, interval: u64) -> Self {
        Self {
            lookback: Duration::seconds(lookback as i64),
            horizon: Duration::seconds(horizon as i64),
            interval: Duration::seconds(interval as i64),
        }
    }

    pub fn start(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now - self.lookback
    }

    /// floor((lookback + horizon) / interval) + 1
    pub fn sample_count(&self) -> usize {
        let total = (self.lookback + self.horizon).num_seconds();
        (total / self.interval.num_seconds()) as usize + 1
    }
}

/// Sample one object's ground track across the window. Samples whose
/// propagation fails are dropped; the survivors keep their original
/// timestamps and order. Drops are reported in a single warn per call to
/// keep a fleet-wide bad cycle from flooding the log.
pub fn sample_track(
    propagator: &dyn Propagator,
    elements: &ElementSet,
    label: &str,
    now: DateTime<Utc>,
    window: SampleWindow,
) -> Vec<PredictionSample> {
    let start = window.start(now);
    let count = window.sample_count();
    let mut samples = Vec::with_capacity(count);
    let mut dropped = 0usize;
    let mut first_error = None;

    for i in 0..count {
        let at = start + window.interval * (i as i32);
        match propagator.propagate(elements, at) {
            Ok(fix) => samples.push(PredictionSample {
                timestamp: at,
                latitude_deg: fix.latitude_deg,
                longitude_deg: fix.longitude_deg,
                altitude_km: fix.altitude_km,
            }),
            Err(e) => {
                dropped += 1;
                if first_error.is_none() {
                    first_error = Some(e);
                }
            }
        }
    }

    if let Some(e) = first_error {
        log::warn!(
            "{}: dropped {} of {} prediction samples (first error: {})",
            label,
            dropped,
            count,
            e
        );
    }

    samples
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::testutil::{elements, ScriptedPropagator};
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2020, 7, 13, 12, 0, 0).unwrap()
    }

    #[test]
    fn default_window_yields_191_samples() {
        let window = SampleWindow::from_seconds(300, 5400, 30);
        assert_eq!(window.sample_count(), 191);

        let track = sample_track(
            &ScriptedPropagator::flawless(),
            &elements("A"),
            "SAT-A",
            now(),
            window,
        );
        assert_eq!(track.len(), 191);
    }

    #[test]
    fn window_brackets_now() {
        let window = SampleWindow::from_seconds(300, 5400, 30);
        let track = sample_track(
            &ScriptedPropagator::flawless(),
            &elements("A"),
            "SAT-A",
            now(),
            window,
        );
        assert!(track.first().unwrap().timestamp <= now());
        assert!(track.last().unwrap().timestamp >= now());
    }

    #[test]
    fn timestamps_strictly_increase_by_interval() {
        let window = SampleWindow::from_seconds(60, 240, 30);
        let track = sample_track(
            &ScriptedPropagator::flawless(),
            &elements("A"),
            "SAT-A",
            now(),
            window,
        );
        for pair in track.windows(2) {
            assert_eq!((pair[1].timestamp - pair[0].timestamp).num_seconds(), 30);
        }
    }

    #[test]
    fn failed_samples_are_dropped_but_order_survives() {
        let window = SampleWindow::from_seconds(60, 240, 30);
        // fail the two samples right after "now"
        let mut propagator = ScriptedPropagator::flawless();
        propagator.fail_at.insert((now() + Duration::seconds(30)).timestamp());
        propagator.fail_at.insert((now() + Duration::seconds(60)).timestamp());

        let track = sample_track(&propagator, &elements("A"), "SAT-A", now(), window);
        assert_eq!(track.len(), window.sample_count() - 2);

        let mut max_gap = 0;
        for pair in track.windows(2) {
            let gap = (pair[1].timestamp - pair[0].timestamp).num_seconds();
            assert_eq!(gap % 30, 0);
            assert!(gap > 0);
            max_gap = max_gap.max(gap);
        }
        // the two consecutive drops leave a triple-interval hole
        assert_eq!(max_gap, 90);
    }

    #[test]
    fn total_failure_yields_empty_track() {
        let window = SampleWindow::from_seconds(0, 60, 30);
        let propagator = ScriptedPropagator {
            reject_line1: Some("A".to_string()),
            fail_at: Default::default(),
        };
        let track = sample_track(&propagator, &elements("A"), "SAT-A", now(), window);
        assert!(track.is_empty());
    }
}
