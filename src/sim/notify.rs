//! Re-render notifications.
//!
//! After every command the simulator hands the drained [`GraphEvent`]s to a
//! sink. A front end implements [`NotificationSink`] to redraw what changed.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::graph::GraphEvent;

/// Receives the change events of one command.
pub trait NotificationSink: Send + Sync {
    /// Called once per command that changed the graph. `events` is never
    /// empty.
    fn graph_changed(&self, events: &[GraphEvent]);
}

impl<T: NotificationSink + ?Sized> NotificationSink for Arc<T> {
    fn graph_changed(&self, events: &[GraphEvent]) {
        (**self).graph_changed(events)
    }
}

/// Drops every notification.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl NotificationSink for NullSink {
    fn graph_changed(&self, _events: &[GraphEvent]) {}
}

/// Reports events through the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl NotificationSink for LogSink {
    fn graph_changed(&self, events: &[GraphEvent]) {
        let touched: std::collections::BTreeSet<_> = events.iter().flat_map(|e| e.touched_commits()).collect();
        log::debug!("{} graph event(s), {} commit(s) to redraw", events.len(), touched.len());
        for event in events {
            match serde_json::to_string(event) {
                Ok(json) => log::debug!("graph event: {}", json),
                Err(_) => log::debug!("graph event: {:?}", event),
            }
        }
    }
}

/// Keeps every batch of events. Useful for tests and for front ends that
/// poll instead of being called back.
#[derive(Debug, Default)]
pub struct RecordingSink {
    batches: Mutex<Vec<Vec<GraphEvent>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// number of notifications received
    pub fn notification_count(&self) -> usize {
        self.batches.lock().len()
    }

    pub fn batches(&self) -> Vec<Vec<GraphEvent>> {
        self.batches.lock().clone()
    }

    /// every recorded event, flattened in arrival order
    pub fn events(&self) -> Vec<GraphEvent> {
        self.batches.lock().iter().flatten().cloned().collect()
    }

    /// Remove and return what was recorded so far.
    pub fn drain(&self) -> Vec<Vec<GraphEvent>> {
        std::mem::take(&mut *self.batches.lock())
    }
}

impl NotificationSink for RecordingSink {
    fn graph_changed(&self, events: &[GraphEvent]) {
        self.batches.lock().push(events.to_vec());
    }
}
