use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};
use tracing::debug;

/// Hands out generation ids for fetch cycles. Starting a cycle supersedes
/// every ticket issued before it.
#[derive(Debug, Clone, Default)]
pub struct CycleTracker {
    latest: Arc<AtomicU64>,
}

#[derive(Debug, Clone)]
pub struct CycleTicket {
    generation: u64,
    latest: Arc<AtomicU64>,
}

impl CycleTracker {
    pub fn new() -> Self {
        CycleTracker::default()
    }

    pub fn begin(&self) -> CycleTicket {
        let generation = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(generation, "fetch cycle started");
        CycleTicket {
            generation,
            latest: Arc::clone(&self.latest),
        }
    }
}

impl CycleTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_current(&self) -> bool {
        self.latest.load(Ordering::SeqCst) == self.generation
    }
}

/// The most recently published view-model of one kind.
#[derive(Debug)]
pub struct Latest<T> {
    slot: Mutex<Option<(u64, T)>>,
}

impl<T> Default for Latest<T> {
    fn default() -> Self {
        Latest {
            slot: Mutex::new(None),
        }
    }
}

impl<T: Clone> Latest<T> {
    pub fn new() -> Self {
        Latest::default()
    }

    /// Store `value` if `ticket` is still the newest cycle. Returns whether
    /// the value was accepted; a superseded result is dropped.
    pub fn publish(&self, ticket: &CycleTicket, value: T) -> bool {
        let mut slot = match self.slot.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        let newer_than_stored = slot
            .as_ref()
            .map_or(true, |(generation, _)| ticket.generation > *generation);

        if ticket.is_current() && newer_than_stored {
            *slot = Some((ticket.generation, value));
            true
        } else {
            debug!(generation = ticket.generation, "discarding stale cycle result");
            false
        }
    }

    pub fn get(&self) -> Option<T> {
        let slot = match self.slot.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        slot.as_ref().map(|(_, value)| value.clone())
    }

    pub fn generation(&self) -> Option<u64> {
        let slot = match self.slot.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        slot.as_ref().map(|(generation, _)| *generation)
    }
}

/// Back-to-back fetch cycles with at most one in flight. The next cycle
/// begins only after the previous one has published, and then only once
/// `interval` has passed since the previous one began.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshSchedule {
    interval: Duration,
    max_cycles: Option<u64>,
}

impl RefreshSchedule {
    pub fn once() -> Self {
        RefreshSchedule {
            interval: Duration::ZERO,
            max_cycles: Some(1),
        }
    }

    pub fn every(interval: Duration) -> Self {
        RefreshSchedule {
            interval,
            max_cycles: None,
        }
    }

    pub fn limit(mut self, cycles: u64) -> Self {
        self.max_cycles = Some(cycles);
        self
    }

    /// Run `load` once per cycle and hand each accepted result to
    /// `on_publish` with its generation. Stops after the cycle limit or at
    /// the first error from `on_publish`.
    pub fn run<T, L, F, E>(
        &self,
        tracker: &CycleTracker,
        latest: &Latest<T>,
        mut load: L,
        mut on_publish: F,
    ) -> Result<(), E>
    where
        T: Clone,
        L: FnMut() -> T,
        F: FnMut(u64, &T) -> Result<(), E>,
    {
        let mut completed = 0u64;
        loop {
            let started = Instant::now();
            let ticket = tracker.begin();
            let value = load();

            if latest.publish(&ticket, value) {
                if let Some(value) = latest.get() {
                    on_publish(ticket.generation(), &value)?;
                }
            }

            completed += 1;
            if self.max_cycles.is_some_and(|max| completed >= max) {
                return Ok(());
            }

            let elapsed = started.elapsed();
            if elapsed < self.interval {
                thread::sleep(self.interval - elapsed);
            } else {
                debug!(generation = ticket.generation(), ?elapsed, "cycle outran the refresh interval");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::matches::{load_matches_view, MatchFilter};
    use crate::pipeline::test_support::FakeGateway;
    use serde_json::json;

    fn match_gateway() -> FakeGateway {
        FakeGateway::new().respond(
            "/matches?limit=100",
            json!([{"champion": "Ahri", "win": true, "gold_14": 5100}]),
        )
    }

    #[test]
    fn slow_cycles_still_publish_every_time() {
        let gateway = match_gateway();
        let tracker = CycleTracker::new();
        let latest = Latest::new();
        let mut published = Vec::new();

        // Each load takes three times the interval.
        RefreshSchedule::every(Duration::from_millis(10))
            .limit(3)
            .run(
                &tracker,
                &latest,
                || {
                    thread::sleep(Duration::from_millis(30));
                    load_matches_view(&gateway, &MatchFilter::default())
                },
                |generation, view| -> Result<(), ()> {
                    published.push((generation, view.summary.total));
                    Ok(())
                },
            )
            .unwrap();

        assert_eq!(published, vec![(1, 1), (2, 1), (3, 1)]);
        assert_eq!(latest.generation(), Some(3));
        assert_eq!(gateway.calls().len(), 3);
    }

    #[test]
    fn fast_cycles_wait_out_the_interval() {
        let tracker = CycleTracker::new();
        let latest = Latest::new();
        let started = Instant::now();

        RefreshSchedule::every(Duration::from_millis(40))
            .limit(3)
            .run(&tracker, &latest, || 7, |_, _| -> Result<(), ()> { Ok(()) })
            .unwrap();

        // Two waits; none after the last cycle.
        assert!(started.elapsed() >= Duration::from_millis(80));
        assert_eq!(latest.get(), Some(7));
    }

    #[test]
    fn render_error_stops_the_schedule() {
        let tracker = CycleTracker::new();
        let latest = Latest::new();
        let mut loads = 0;

        let result = RefreshSchedule::every(Duration::ZERO).run(
            &tracker,
            &latest,
            || {
                loads += 1;
                loads
            },
            |generation, _| if generation == 2 { Err("closed") } else { Ok(()) },
        );

        assert_eq!(result, Err("closed"));
        assert_eq!(loads, 2);
    }

    #[test]
    fn once_runs_a_single_cycle() {
        let tracker = CycleTracker::new();
        let latest = Latest::new();
        let mut seen = Vec::new();
        RefreshSchedule::once()
            .run(&tracker, &latest, || "view", |generation, view| -> Result<(), ()> {
                seen.push((generation, *view));
                Ok(())
            })
            .unwrap();
        assert_eq!(seen, vec![(1, "view")]);
    }

    #[test]
    fn generations_increase() {
        let tracker = CycleTracker::new();
        let first = tracker.begin();
        let second = tracker.begin();
        assert!(second.generation() > first.generation());
        assert!(!first.is_current());
        assert!(second.is_current());
    }

    #[test]
    fn stale_result_is_discarded() {
        let tracker = CycleTracker::new();
        let latest = Latest::new();

        let slow = tracker.begin();
        let fast = tracker.begin();

        assert!(latest.publish(&fast, "fresh"));
        assert!(!latest.publish(&slow, "stale"));
        assert_eq!(latest.get(), Some("fresh"));
        assert_eq!(latest.generation(), Some(fast.generation()));
    }

    #[test]
    fn superseded_cycle_cannot_publish_even_first() {
        let tracker = CycleTracker::new();
        let latest = Latest::new();

        let old = tracker.begin();
        let _new = tracker.begin();

        assert!(!latest.publish(&old, 1));
        assert_eq!(latest.get(), None);
    }

    #[test]
    fn a_cycle_publishes_once() {
        let tracker = CycleTracker::new();
        let latest = Latest::new();
        let ticket = tracker.begin();
        assert!(latest.publish(&ticket, 1));
        assert!(!latest.publish(&ticket, 2));
        assert_eq!(latest.get(), Some(1));
    }
}
