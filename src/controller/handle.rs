use std::sync::Arc;

use parking_lot::RwLock;
use serde_json::Value;
use tokio::sync::{mpsc, oneshot};

use crate::error::FormError;
use crate::form::{FormAction, FormSnapshot};
use crate::tree::FieldPath;

use super::types::ControllerMessage;

/// Cheap, cloneable entry point to a running form.
///
/// Every method only enqueues work; the controller applies messages in the
/// order they were sent.
#[derive(Clone)]
pub struct FormHandle {
    sender: mpsc::UnboundedSender<ControllerMessage>,
    latest: Arc<RwLock<FormSnapshot>>,
}

impl FormHandle {
    pub(crate) fn new(
        sender: mpsc::UnboundedSender<ControllerMessage>,
        latest: Arc<RwLock<FormSnapshot>>,
    ) -> Self {
        Self { sender, latest }
    }

    /// A field was edited.
    pub fn on_change(&self, path: impl Into<FieldPath>, value: Value) -> Result<(), FormError> {
        self.dispatch(FormAction::UpdateField {
            path: path.into(),
            value,
        })
    }

    /// Validate one field now, whatever the on-change policy says.
    pub fn validate_field(&self, path: impl Into<FieldPath>) -> Result<(), FormError> {
        self.dispatch(FormAction::ValidateField { path: path.into() })
    }

    /// Deep-merge partial values into the form.
    pub fn update_state(&self, values: Value) -> Result<(), FormError> {
        self.dispatch(FormAction::UpdateAll { values })
    }

    /// Validate everything, then call `on_valid` if the form is valid.
    ///
    /// The callback receives `data`, or the form values when `data` is
    /// `None`. It runs on the controller task after every async check started
    /// by this pass has resolved, and is dropped without being called when
    /// the form is invalid.
    pub fn validate_all<F>(&self, on_valid: F, data: Option<Value>) -> Result<(), FormError>
    where
        F: FnOnce(Value) + Send + 'static,
    {
        self.send(ControllerMessage::ValidateAll {
            on_settled: Box::new(move |submitted: Option<Value>| {
                if let Some(submitted) = submitted {
                    on_valid(submitted);
                }
            }),
            data,
        })
    }

    /// Awaitable [`validate_all`](Self::validate_all): `Some(data)` when the
    /// form was valid, `None` otherwise.
    ///
    /// Fails with [`FormError::Disconnected`] if the controller stops before
    /// the pass settles.
    pub async fn submit(&self, data: Option<Value>) -> Result<Option<Value>, FormError> {
        let (respond_to, receiver) = oneshot::channel();
        self.send(ControllerMessage::ValidateAll {
            on_settled: Box::new(move |outcome: Option<Value>| {
                if respond_to.send(outcome).is_err() {
                    tracing::trace!("Submit result dropped (receiver gone)");
                }
            }),
            data,
        })?;
        receiver.await.map_err(|_| FormError::Disconnected)
    }

    /// Snapshot taken after every previously sent message has been applied.
    pub async fn snapshot(&self) -> Result<FormSnapshot, FormError> {
        let (respond_to, receiver) = oneshot::channel();
        self.send(ControllerMessage::Snapshot { respond_to })?;
        receiver.await.map_err(|_| FormError::Disconnected)
    }

    /// Last published snapshot, without waiting for queued messages.
    pub fn latest(&self) -> FormSnapshot {
        self.latest.read().clone()
    }

    fn dispatch(&self, action: FormAction) -> Result<(), FormError> {
        self.send(ControllerMessage::Dispatch(action))
    }

    fn send(&self, message: ControllerMessage) -> Result<(), FormError> {
        self.sender.send(message).map_err(|_| FormError::Disconnected)
    }
}
