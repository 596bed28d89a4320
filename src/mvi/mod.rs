//! Model-View-Intent primitives for form state.
//!
//! # Architecture
//!
//! ```text
//! Intent ──→ Reducer ──→ (Model, Effects) ──→ Snapshot
//!    ↑                        │
//!    └──── effect results ────┘
//! ```
//!
//! - **Model**: immutable state value, replaced wholesale on each transition
//! - **Intent**: user actions or system events (async results)
//! - **Reducer**: pure function producing the next model plus effect
//!   descriptors for the owner to execute

mod intent;
mod model;
mod reducer;

pub use intent::Intent;
pub use model::Model;
pub use reducer::{Reducer, Transition};
