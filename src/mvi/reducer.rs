//! Reducer trait for MVI architecture.

use super::intent::Intent;
use super::model::Model;

/// Result of one reduction: the next model plus effects to run out-of-band.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition<S, E> {
    pub state: S,
    pub effects: Vec<E>,
}

impl<S, E> Transition<S, E> {
    /// Transition that only carries state.
    pub fn new(state: S) -> Self {
        Self {
            state,
            effects: Vec::new(),
        }
    }

    pub fn with_effects(state: S, effects: Vec<E>) -> Self {
        Self { state, effects }
    }
}

/// Reducer transforms state based on intents.
///
/// The reducer is the only place where state transitions happen. It must be
/// pure: `(State, Intent) -> (State, Effects)`. Effects are descriptions;
/// executing them is the caller's job.
pub trait Reducer {
    /// The state type this reducer operates on.
    type State: Model;

    /// The intent type this reducer handles.
    type Intent: Intent;

    /// Effect descriptors produced alongside the new state.
    type Effect;

    /// Structural failure that aborts the transition.
    type Error;

    /// Process an intent and return the new state with its effects.
    fn reduce(
        &self,
        state: Self::State,
        intent: &Self::Intent,
    ) -> Result<Transition<Self::State, Self::Effect>, Self::Error>;
}
