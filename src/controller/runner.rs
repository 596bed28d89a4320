use std::collections::HashSet;
use std::sync::Arc;

use parking_lot::RwLock;
use serde_json::Value;
use tokio::sync::mpsc;
use tracing::Instrument;
use uuid::Uuid;

use crate::error::FormError;
use crate::form::{CheckTiming, Effect, FormAction, FormReducer, FormSnapshot, FormState};
use crate::mvi::Reducer;
use crate::scheduler::{AsyncScheduler, SchedulerEvent};

use super::types::{ControllerMessage, SubmitCallback};

/// A validate-all request waiting for its async checks.
struct PendingSubmission {
    waiting_on: HashSet<u64>,
    data: Option<Value>,
    on_settled: SubmitCallback,
}

/// Single owner of a form's state.
///
/// Drives the update pipeline from handle messages and scheduler events
/// until every [`FormHandle`](super::FormHandle) is dropped.
pub struct FormController {
    id: Uuid,
    reducer: FormReducer,
    state: FormState,
    scheduler: AsyncScheduler,
    inbox: mpsc::UnboundedReceiver<ControllerMessage>,
    events: mpsc::UnboundedReceiver<SchedulerEvent>,
    submissions: Vec<PendingSubmission>,
    published: Arc<RwLock<FormSnapshot>>,
}

impl FormController {
    pub(crate) fn new(
        reducer: FormReducer,
        state: FormState,
        scheduler: AsyncScheduler,
        inbox: mpsc::UnboundedReceiver<ControllerMessage>,
        events: mpsc::UnboundedReceiver<SchedulerEvent>,
        published: Arc<RwLock<FormSnapshot>>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            reducer,
            state,
            scheduler,
            inbox,
            events,
            submissions: Vec::new(),
            published,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    /// Process messages until all handles are gone.
    ///
    /// Returns the final state, or the first structural error.
    pub async fn run(mut self) -> Result<FormState, FormError> {
        let span = tracing::info_span!("form", id = %self.id);
        async move {
            tracing::info!(
                fields = self.state.errors.leaf_paths().len(),
                steps = ?self.reducer.step_names(),
                "Form controller started"
            );

            let result = self.process().await;
            self.scheduler.cancel_all();

            match result {
                Ok(()) => {
                    if !self.submissions.is_empty() {
                        tracing::debug!(
                            pending = self.submissions.len(),
                            "Dropping unfinished submissions"
                        );
                    }
                    tracing::info!("Form controller stopped");
                    Ok(self.state)
                }
                Err(err) => {
                    tracing::error!(error = %err, "Form controller failed");
                    Err(err)
                }
            }
        }
        .instrument(span)
        .await
    }

    async fn process(&mut self) -> Result<(), FormError> {
        loop {
            tokio::select! {
                message = self.inbox.recv() => match message {
                    Some(message) => self.handle_message(message)?,
                    None => return Ok(()),
                },
                Some(event) = self.events.recv() => self.handle_event(event)?,
            }
        }
    }

    fn handle_message(&mut self, message: ControllerMessage) -> Result<(), FormError> {
        tracing::trace!(message = message.kind(), "Handling message");
        match message {
            ControllerMessage::Dispatch(action) => {
                self.dispatch(action)?;
            }
            ControllerMessage::ValidateAll { on_settled, data } => {
                let tickets = self.dispatch(FormAction::ValidateAll)?;
                let submission = PendingSubmission {
                    waiting_on: tickets.into_iter().collect(),
                    data,
                    on_settled,
                };
                if submission.waiting_on.is_empty() {
                    self.settle(submission);
                } else {
                    tracing::debug!(
                        checks = submission.waiting_on.len(),
                        "Submission waiting for async checks"
                    );
                    self.submissions.push(submission);
                }
            }
            ControllerMessage::Snapshot { respond_to } => {
                if respond_to.send(self.reducer.snapshot(&self.state)).is_err() {
                    tracing::trace!("Snapshot response dropped (receiver gone)");
                }
            }
        }
        Ok(())
    }

    fn handle_event(&mut self, event: SchedulerEvent) -> Result<(), FormError> {
        match event {
            SchedulerEvent::Expired {
                path,
                value,
                generation,
            } => {
                self.scheduler.fire(path, value, generation, &self.state)?;
            }
            SchedulerEvent::Resolved { path, ticket, result } => {
                tracing::debug!(path = %path, ticket, ok = result.is_ok(), "Async check resolved");
                self.dispatch(FormAction::AsyncResolved { path, result })?;

                let (ready, waiting): (Vec<_>, Vec<_>) = std::mem::take(&mut self.submissions)
                    .into_iter()
                    .map(|mut submission| {
                        submission.waiting_on.remove(&ticket);
                        submission
                    })
                    .partition(|submission| submission.waiting_on.is_empty());
                self.submissions = waiting;
                for submission in ready {
                    self.settle(submission);
                }
            }
        }
        Ok(())
    }

    /// Run one action through the pipeline, commit the new state and hand
    /// its effects to the scheduler. Returns the tickets of checks started
    /// immediately.
    fn dispatch(&mut self, action: FormAction) -> Result<Vec<u64>, FormError> {
        tracing::debug!(action = action.kind(), "Dispatching action");
        let transition = self.reducer.reduce(self.state.clone(), &action)?;
        self.state = transition.state;

        let mut tickets = Vec::new();
        for effect in transition.effects {
            match effect {
                Effect::CheckAsync {
                    path,
                    value,
                    timing: CheckTiming::Debounced,
                } => self.scheduler.schedule(path, value)?,
                Effect::CheckAsync {
                    path,
                    value,
                    timing: CheckTiming::Immediate,
                } => tickets.push(self.scheduler.run_now(path, value, &self.state)?),
            }
        }

        self.publish();
        Ok(tickets)
    }

    fn settle(&self, submission: PendingSubmission) {
        if self.reducer.is_valid(&self.state) {
            tracing::info!("Form valid, running submit callback");
            let data = submission
                .data
                .unwrap_or_else(|| self.state.values.clone());
            (submission.on_settled)(Some(data));
        } else {
            tracing::info!("Form invalid, submit callback skipped");
            (submission.on_settled)(None);
        }
    }

    fn publish(&self) {
        *self.published.write() = self.reducer.snapshot(&self.state);
    }
}
