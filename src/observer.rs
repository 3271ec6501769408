//! # Status Observers
//!
//! Jobs push a [`JobUpdate`] after every state transition. Observers receive them on the worker
//! thread that produced them, so [`StatusObserver::publish`] must return promptly: queue, log or
//! drop, never wait.

use std::sync::Arc;

use log::{info, warn};
use tokio::sync::mpsc::UnboundedSender;

use crate::job::{JobStatus, JobUpdate};

/// Abstract progress sink.
/// Implement this trait to route job status to a UI, a log, or a channel.
pub trait StatusObserver: Send + Sync {
    /// Receive one status snapshot. Must not block.
    fn publish(&self, update: JobUpdate);
}

/// Forward updates into an unbounded channel. A closed receiver drops updates silently.
impl StatusObserver for UnboundedSender<JobUpdate> {
    fn publish(&self, update: JobUpdate) {
        let _ = self.send(update);
    }
}

impl<T: StatusObserver + ?Sized> StatusObserver for Arc<T> {
    fn publish(&self, update: JobUpdate) {
        (**self).publish(update)
    }
}

/// Writes every transition to the `log` facade; failures at `warn`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl StatusObserver for LogObserver {
    fn publish(&self, update: JobUpdate) {
        let source = update.source.display();
        match &update.status {
            JobStatus::Error(reason) => warn!("{} {}: {}", update.id, source, reason),
            status => info!("{} {}: {}", update.id, source, status),
        }
    }
}

/// Broadcasts every update to several observers.
#[derive(Default)]
pub struct ObserverMultiplexer {
    pub observers: Vec<Arc<dyn StatusObserver>>,
}

impl ObserverMultiplexer {
    /// Create an empty multiplexer.
    pub fn new() -> Self {
        Self {
            observers: Vec::new(),
        }
    }

    /// Add an observer.
    pub fn with(mut self, observer: impl StatusObserver + 'static) -> Self {
        self.observers.push(Arc::new(observer));
        self
    }

    /// Get the number of observers in the multiplexer.
    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }
}

impl StatusObserver for ObserverMultiplexer {
    fn publish(&self, update: JobUpdate) {
        if let Some((last, rest)) = self.observers.split_last() {
            for observer in rest {
                observer.publish(update.clone());
            }
            last.publish(update);
        }
    }
}
