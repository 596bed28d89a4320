//! Async validation: rule declarations, debounce timers and result delivery.
//!
//! The scheduler never touches form state. Timer expiry and finished checks
//! are reported as [`SchedulerEvent`]s on a channel owned by the controller,
//! which feeds them back through the update pipeline.
//!
//! ```text
//! schedule ──→ timer (quiet period) ──→ Expired ──→ fire ──→ rule future ──→ Resolved
//! run_now  ─────────────────────────────────────────────────↗
//! ```

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use futures_core::future::BoxFuture;
use serde_json::Value;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::error::FormError;
use crate::form::FormState;
use crate::tree::{FieldPath, Message};

/// Failure of an async check itself, as opposed to a validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct AsyncRuleError {
    pub message: String,
}

impl AsyncRuleError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Deferred check produced by an async rule.
pub type AsyncEffect = BoxFuture<'static, Result<Vec<Message>, AsyncRuleError>>;

/// Async rule: receives the field value and the form state at invocation.
pub type AsyncRule = Arc<dyn Fn(Value, FormState) -> AsyncEffect + Send + Sync>;

/// Async rules per field path.
#[derive(Clone, Default)]
pub struct AsyncRuleSet {
    rules: BTreeMap<FieldPath, AsyncRule>,
}

impl AsyncRuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare the async rule for a field, replacing any previous one.
    pub fn field<F, Fut>(mut self, path: impl Into<FieldPath>, rule: F) -> Self
    where
        F: Fn(Value, FormState) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Vec<Message>, AsyncRuleError>> + Send + 'static,
    {
        let rule: AsyncRule = Arc::new(move |value, state| -> AsyncEffect { Box::pin(rule(value, state)) });
        self.rules.insert(path.into(), rule);
        self
    }

    pub fn get(&self, path: &FieldPath) -> Option<&AsyncRule> {
        self.rules.get(path)
    }

    pub fn contains(&self, path: &FieldPath) -> bool {
        self.rules.contains_key(path)
    }

    pub fn paths(&self) -> impl Iterator<Item = &FieldPath> {
        self.rules.keys()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }
}

impl fmt::Debug for AsyncRuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.rules.keys()).finish()
    }
}

/// Notifications sent from timer and check tasks to the controller.
#[derive(Debug)]
pub enum SchedulerEvent {
    /// A debounce timer ran out. Hand back to [`AsyncScheduler::fire`].
    Expired {
        path: FieldPath,
        value: Value,
        generation: u64,
    },
    /// A check finished.
    Resolved {
        path: FieldPath,
        ticket: u64,
        result: Result<Vec<Message>, AsyncRuleError>,
    },
}

struct PendingTimer {
    generation: u64,
    task: JoinHandle<()>,
}

/// Per-field debounce timers plus async rule invocation.
///
/// Must be used from within a tokio runtime.
pub struct AsyncScheduler {
    rules: AsyncRuleSet,
    quiet_period: Duration,
    timers: HashMap<FieldPath, PendingTimer>,
    next_id: u64,
    events: mpsc::UnboundedSender<SchedulerEvent>,
}

impl AsyncScheduler {
    pub fn new(
        rules: AsyncRuleSet,
        quiet_period: Duration,
        events: mpsc::UnboundedSender<SchedulerEvent>,
    ) -> Self {
        Self {
            rules,
            quiet_period,
            timers: HashMap::new(),
            next_id: 0,
            events,
        }
    }

    /// Start or restart the debounce timer for `path`.
    ///
    /// Only the value from the last call before the quiet period ends is
    /// checked.
    pub fn schedule(&mut self, path: FieldPath, value: Value) -> Result<(), FormError> {
        if !self.rules.contains(&path) {
            return Err(FormError::UndeclaredAsyncField { path });
        }

        if let Some(previous) = self.timers.remove(&path) {
            previous.task.abort();
            tracing::trace!(path = %path, "Debounce timer restarted");
        }

        let generation = self.next_id();
        let events = self.events.clone();
        let quiet_period = self.quiet_period;
        let timer_path = path.clone();
        let task = tokio::spawn(async move {
            tokio::time::sleep(quiet_period).await;
            let _ = events.send(SchedulerEvent::Expired {
                path: timer_path,
                value,
                generation,
            });
        });

        self.timers.insert(path, PendingTimer { generation, task });
        Ok(())
    }

    /// Handle an expired timer. Returns the check ticket, or `None` when the
    /// timer was superseded or cancelled after it fired.
    pub fn fire(
        &mut self,
        path: FieldPath,
        value: Value,
        generation: u64,
        state: &FormState,
    ) -> Result<Option<u64>, FormError> {
        let current = self.timers.get(&path).map(|timer| timer.generation);
        if current != Some(generation) {
            tracing::trace!(path = %path, generation, "Ignoring stale timer");
            return Ok(None);
        }
        self.timers.remove(&path);
        self.invoke(path, value, state).map(Some)
    }

    /// Skip the quiet period: cancel any pending timer and check now.
    pub fn run_now(&mut self, path: FieldPath, value: Value, state: &FormState) -> Result<u64, FormError> {
        if let Some(timer) = self.timers.remove(&path) {
            timer.task.abort();
        }
        self.invoke(path, value, state)
    }

    /// Abort every pending timer. Checks already running are left alone.
    pub fn cancel_all(&mut self) {
        for (_, timer) in self.timers.drain() {
            timer.task.abort();
        }
    }

    /// Number of timers waiting to expire.
    pub fn pending(&self) -> usize {
        self.timers.len()
    }

    fn invoke(&mut self, path: FieldPath, value: Value, state: &FormState) -> Result<u64, FormError> {
        let rule = self
            .rules
            .get(&path)
            .cloned()
            .ok_or_else(|| FormError::UndeclaredAsyncField { path: path.clone() })?;

        let ticket = self.next_id();
        let effect = rule(value, state.clone());
        let events = self.events.clone();

        tracing::debug!(path = %path, ticket, "Running async check");
        tokio::spawn(async move {
            // Run the check in its own task so a panic surfaces as a JoinError.
            let result = match tokio::spawn(effect).await {
                Ok(result) => result,
                Err(err) => Err(AsyncRuleError::new(err.to_string())),
            };
            if events
                .send(SchedulerEvent::Resolved { path, ticket, result })
                .is_err()
            {
                tracing::trace!(ticket, "Async result dropped: controller gone");
            }
        });

        Ok(ticket)
    }

    fn next_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

impl Drop for AsyncScheduler {
    fn drop(&mut self) {
        self.cancel_all();
    }
}

impl fmt::Debug for AsyncScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AsyncScheduler")
            .field("rules", &self.rules)
            .field("quiet_period", &self.quiet_period)
            .field("pending", &self.timers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    async fn accept(_: Value, _: FormState) -> Result<Vec<Message>, AsyncRuleError> {
        Ok(Vec::new())
    }

    async fn explode(_: Value, _: FormState) -> Result<Vec<Message>, AsyncRuleError> {
        panic!("lookup exploded");
    }

    #[test]
    fn rule_set_tracks_declared_paths() {
        let rules = AsyncRuleSet::new().field("name", accept).field("email", accept);
        let paths: Vec<String> = rules.paths().map(ToString::to_string).collect();
        assert_eq!(paths, ["email", "name"]);
        assert!(rules.contains(&FieldPath::parse("name")));
        assert!(!rules.contains(&FieldPath::parse("password")));
    }

    #[test]
    fn undeclared_field_is_rejected_before_spawning() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut scheduler = AsyncScheduler::new(AsyncRuleSet::new(), Duration::from_millis(10), tx);
        let err = scheduler
            .schedule(FieldPath::parse("name"), json!("x"))
            .unwrap_err();
        assert!(matches!(err, FormError::UndeclaredAsyncField { .. }));
        assert_eq!(scheduler.pending(), 0);
    }

    #[tokio::test]
    async fn panicking_rule_reports_error() {
        let rules = AsyncRuleSet::new().field("name", explode);
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut scheduler = AsyncScheduler::new(rules, Duration::from_millis(10), tx);
        scheduler
            .run_now(FieldPath::parse("name"), json!("x"), &FormState::default())
            .unwrap();

        match rx.recv().await {
            Some(SchedulerEvent::Resolved { result: Err(err), .. }) => {
                assert!(err.message.contains("panicked"));
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }
}
