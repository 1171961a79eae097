//! Result aggregator: the single consumer of worker outcomes
//!
//! The tallies live here and nowhere else, so they need no locking.
//! Collection ends when the outcome channel is closed (every sender
//! dropped) or when the expected number of outcomes has been seen,
//! whichever comes first.

use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::Receiver;
use hdrhistogram::Histogram;
use tracing::debug;

use super::counters::ProgressCounters;
use super::worker::Outcome;
use crate::metrics::stats::{latency_histogram, RunStats};
use crate::utils::Result;

/// Mutable accumulator owned by the aggregator during a run
#[derive(Debug, Clone)]
pub struct Tally {
    pub succeeded: u64,
    pub failed: u64,
    histogram: Histogram<u64>,
}

impl Tally {
    /// Create an empty tally
    pub fn new() -> Result<Self> {
        Ok(Self {
            succeeded: 0,
            failed: 0,
            histogram: latency_histogram()?,
        })
    }

    /// Record one outcome
    pub fn record(&mut self, outcome: &Outcome) {
        if outcome.succeeded {
            self.succeeded += 1;
        } else {
            self.failed += 1;
        }
        let us = u64::try_from(outcome.latency.as_micros()).unwrap_or(u64::MAX);
        self.histogram.saturating_record(us);
    }

    /// Outcomes recorded so far
    pub fn total(&self) -> u64 {
        self.succeeded + self.failed
    }

    /// Freeze into the final statistics snapshot
    pub fn into_stats(self, elapsed: Duration) -> RunStats {
        RunStats {
            total: self.total(),
            succeeded: self.succeeded,
            failed: self.failed,
            elapsed,
            histogram: self.histogram,
        }
    }
}

/// Single-consumer outcome collector
pub struct Aggregator {
    receiver: Receiver<Outcome>,
    expected: u64,
    counters: Arc<ProgressCounters>,
}

impl Aggregator {
    /// Create an aggregator expecting `counters.total()` outcomes
    pub fn new(receiver: Receiver<Outcome>, counters: Arc<ProgressCounters>) -> Self {
        Self {
            receiver,
            expected: counters.total(),
            counters,
        }
    }

    /// Collect outcomes until the channel closes or all are in
    ///
    /// Returns immediately for an expected count of zero.
    pub fn run(self) -> Result<Tally> {
        let mut tally = Tally::new()?;

        while tally.total() < self.expected {
            match self.receiver.recv() {
                Ok(outcome) => {
                    tally.record(&outcome);
                    self.counters.record(outcome.succeeded);
                }
                Err(_) => break,
            }
        }

        debug!(
            "Aggregator finished: {} succeeded, {} failed (expected {})",
            tally.succeeded, tally.failed, self.expected
        );
        Ok(tally)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::{bounded, unbounded};
    use std::thread;

    fn ok() -> Outcome {
        Outcome {
            succeeded: true,
            latency: Duration::from_millis(1),
        }
    }

    fn failed() -> Outcome {
        Outcome {
            succeeded: false,
            latency: Duration::from_millis(2),
        }
    }

    #[test]
    fn test_zero_expected_completes_immediately() {
        // Sender kept alive: a blocking recv here would hang the test
        let (_tx, rx) = unbounded::<Outcome>();
        let counters = Arc::new(ProgressCounters::new(0));

        let tally = Aggregator::new(rx, counters).run().unwrap();
        assert_eq!(tally.total(), 0);
    }

    #[test]
    fn test_stops_at_expected() {
        let (tx, rx) = unbounded();
        let counters = Arc::new(ProgressCounters::new(3));
        tx.send(ok()).unwrap();
        tx.send(failed()).unwrap();
        tx.send(ok()).unwrap();

        let tally = Aggregator::new(rx, Arc::clone(&counters)).run().unwrap();
        assert_eq!(tally.succeeded, 2);
        assert_eq!(tally.failed, 1);
        assert_eq!(counters.progress(), (3, 1));
    }

    #[test]
    fn test_stops_when_closed() {
        let (tx, rx) = unbounded();
        let counters = Arc::new(ProgressCounters::new(10));
        tx.send(failed()).unwrap();
        drop(tx);

        let tally = Aggregator::new(rx, counters).run().unwrap();
        assert_eq!(tally.total(), 1);
        assert_eq!(tally.failed, 1);
    }

    #[test]
    fn test_many_producers() {
        let (tx, rx) = bounded(4);
        let counters = Arc::new(ProgressCounters::new(4000));
        let aggregator = Aggregator::new(rx, counters);
        let collector = thread::spawn(move || aggregator.run());

        let producers: Vec<_> = (0..4)
            .map(|p| {
                let tx = tx.clone();
                thread::spawn(move || {
                    for i in 0..1000 {
                        let o = if (i + p) % 4 == 0 { failed() } else { ok() };
                        tx.send(o).unwrap();
                    }
                })
            })
            .collect();
        for p in producers {
            p.join().unwrap();
        }
        drop(tx);

        let tally = collector.join().unwrap().unwrap();
        assert_eq!(tally.total(), 4000);
        assert_eq!(tally.failed, 1000);
    }

    #[test]
    fn test_into_stats() {
        let mut tally = Tally::new().unwrap();
        tally.record(&ok());
        tally.record(&failed());

        let stats = tally.into_stats(Duration::from_secs(1));
        assert_eq!(stats.total, 2);
        assert_eq!(stats.succeeded, 1);
        assert_eq!(stats.failed, 1);
        assert_eq!(stats.histogram.len(), 2);
        assert_eq!(stats.succeeded + stats.failed, stats.total);
    }
}
