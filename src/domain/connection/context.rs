//! Per-connection scratch space for lifecycle hooks and handlers.

use std::collections::HashMap;
use std::time::Duration;

use serde_json::{Map, Value};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

/// A cancellable background timer.
///
/// Dropping the handle aborts the task, so a timer never outlives the
/// context that owns it.
#[derive(Debug)]
pub struct TimerHandle {
    task: JoinHandle<()>,
}

impl TimerHandle {
    /// Calls `tick` every `period`, first after one full period.
    ///
    /// The timer stops on its own once `tick` returns `false`.
    pub fn spawn_interval<F>(period: Duration, mut tick: F) -> Self
    where
        F: FnMut() -> bool + Send + 'static,
    {
        let start = Instant::now() + period;
        let task = tokio::spawn(async move {
            let mut ticker = interval_at(start, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if !tick() {
                    break;
                }
            }
        });
        Self { task }
    }

    pub fn cancel(&self) {
        self.task.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for TimerHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Mutable state attached to one connection.
///
/// Named timers and arbitrary JSON values live here for the lifetime of the
/// connection. Each connection gets its own context; nothing is shared
/// between connections.
#[derive(Debug, Default)]
pub struct ConnectionContext {
    timers: HashMap<String, TimerHandle>,
    data: Map<String, Value>,
}

impl ConnectionContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a timer under `name`, cancelling any timer it replaces.
    pub fn insert_timer(&mut self, name: impl Into<String>, timer: TimerHandle) {
        if let Some(previous) = self.timers.insert(name.into(), timer) {
            previous.cancel();
        }
    }

    /// Cancels and removes the named timer. Returns whether one existed.
    pub fn cancel_timer(&mut self, name: &str) -> bool {
        match self.timers.remove(name) {
            Some(timer) => {
                timer.cancel();
                true
            }
            None => false,
        }
    }

    pub fn has_timer(&self, name: &str) -> bool {
        self.timers.contains_key(name)
    }

    pub fn active_timers(&self) -> usize {
        self.timers.len()
    }

    /// Cancels every timer still held. Returns how many were cancelled.
    pub fn cancel_all(&mut self) -> usize {
        let count = self.timers.len();
        for (_, timer) in self.timers.drain() {
            timer.cancel();
        }
        count
    }

    pub fn set(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.data.insert(key.into(), value)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.data.remove(key)
    }
}
