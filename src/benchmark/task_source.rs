//! Task source: hands out task ordinals 0..N to the worker pool
//!
//! A feeder thread pushes every ordinal into a bounded MPMC queue and
//! then drops the only sender. Workers share the receiving end, so each
//! ordinal reaches exactly one worker, and `next_task()` returns `None` once
//! the queue is both closed and empty.

use std::fmt;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{bounded, Receiver};
use tracing::debug;

use crate::utils::{BenchError, Result};

/// Ordinal of a unit of work
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaskId(pub u64);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "task-{}", self.0)
    }
}

/// Consumer handle of the task queue
///
/// Cloning yields another consumer of the same queue, not a copy of
/// the remaining tasks.
#[derive(Clone)]
pub struct TaskSource {
    receiver: Receiver<TaskId>,
}

/// Feeder thread that fills a [`TaskSource`]
pub struct TaskFeeder {
    handle: JoinHandle<u64>,
}

impl TaskSource {
    /// Start feeding `count` tasks through a queue of `capacity` slots
    pub fn spawn(count: u64, capacity: usize) -> Result<(Self, TaskFeeder)> {
        let (sender, receiver) = bounded(capacity.max(1));

        let handle = thread::Builder::new()
            .name("task-feeder".to_string())
            .spawn(move || {
                let mut sent = 0u64;
                for i in 0..count {
                    // Every consumer is gone; nobody is left to run the rest
                    if sender.send(TaskId(i)).is_err() {
                        break;
                    }
                    sent += 1;
                }
                debug!("Task feeder exhausted after {} tasks", sent);
                sent
            })?;

        Ok((Self { receiver }, TaskFeeder { handle }))
    }

    /// Block until the next task is available; `None` once exhausted
    pub fn next_task(&self) -> Option<TaskId> {
        self.receiver.recv().ok()
    }
}

impl Iterator for TaskSource {
    type Item = TaskId;

    fn next(&mut self) -> Option<TaskId> {
        self.next_task()
    }
}

impl TaskFeeder {
    /// Wait for the feeder and return how many tasks it handed out
    pub fn join(self) -> Result<u64> {
        self.handle
            .join()
            .map_err(|_| BenchError::Worker("task feeder thread panicked".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_yields_every_task_once() {
        let (source, feeder) = TaskSource::spawn(100, 8).unwrap();

        let ids: Vec<u64> = source.map(|t| t.0).collect();
        assert_eq!(ids, (0..100).collect::<Vec<_>>());
        assert_eq!(feeder.join().unwrap(), 100);
    }

    #[test]
    fn test_zero_tasks_exhausts_immediately() {
        let (source, feeder) = TaskSource::spawn(0, 4).unwrap();

        assert_eq!(source.next_task(), None);
        assert_eq!(feeder.join().unwrap(), 0);
    }

    #[test]
    fn test_zero_capacity_is_clamped() {
        let (source, feeder) = TaskSource::spawn(5, 0).unwrap();

        assert_eq!(source.count(), 5);
        assert_eq!(feeder.join().unwrap(), 5);
    }

    #[test]
    fn test_concurrent_consumers_partition() {
        let total = 10_000u64;
        let (source, feeder) = TaskSource::spawn(total, 16).unwrap();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let source = source.clone();
                let seen = Arc::clone(&seen);
                thread::spawn(move || {
                    let mine: Vec<TaskId> = source.collect();
                    seen.lock().unwrap().extend(mine);
                })
            })
            .collect();
        drop(source);

        for h in handles {
            h.join().unwrap();
        }
        feeder.join().unwrap();

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len() as u64, total);
        let unique: HashSet<_> = seen.iter().copied().collect();
        assert_eq!(unique.len() as u64, total);
    }

    #[test]
    fn test_feeder_stops_when_consumers_drop() {
        let (source, feeder) = TaskSource::spawn(1_000, 2).unwrap();

        assert_eq!(source.next_task(), Some(TaskId(0)));
        drop(source);

        assert!(feeder.join().unwrap() < 1_000);
    }

    #[test]
    fn test_task_id_display() {
        assert_eq!(TaskId(7).to_string(), "task-7");
    }
}
