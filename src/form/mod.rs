//! Form state and the update pipeline that evolves it.

mod intent;
mod reducer;
mod state;
mod update;

pub use intent::{CheckTiming, Effect, FormAction};
pub use reducer::{update_fn, FnStep, FormContext, FormReducer, UpdateFn};
pub use state::{FormSnapshot, FormState};
pub use update::{standard_steps, UpdateAsyncErrors, UpdateFormValues, UpdateSyncErrors};
