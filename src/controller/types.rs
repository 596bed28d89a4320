use serde_json::Value;
use tokio::sync::oneshot;

use crate::form::{FormAction, FormSnapshot};

/// Outcome of a validate-all pass: the submitted data when the form was
/// valid, `None` when it was not.
pub type SubmitCallback = Box<dyn FnOnce(Option<Value>) + Send>;

pub enum ControllerMessage {
    Dispatch(FormAction),
    ValidateAll {
        on_settled: SubmitCallback,
        data: Option<Value>,
    },
    Snapshot {
        respond_to: oneshot::Sender<FormSnapshot>,
    },
}

impl ControllerMessage {
    pub fn kind(&self) -> &'static str {
        match self {
            ControllerMessage::Dispatch(action) => action.kind(),
            ControllerMessage::ValidateAll { .. } => "validate_all",
            ControllerMessage::Snapshot { .. } => "snapshot",
        }
    }
}
