//! Generic run-to-completion state machine engine with deferred transitions.
//!
//! The engine owns only the current state; behavior lives in an
//! [`EventHandler`] that is dispatched through a single seam. A handler
//! requests a state change by returning [`Transition::To`] — the engine then
//! performs the exit/enter sequence *after* the handler has returned, so a
//! handler body is never re-entered mid-transition and every state observes
//! its own exit and entry.

use crate::event::{Event, EventKind};

/// Outcome of one handler dispatch.
///
/// Returning `To(target)` requests a deferred transition. A handler computes
/// exactly one outcome per event, so a later decision inside the handler
/// naturally supersedes an earlier one.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Transition<S> {
    /// Remain in the current state.
    Stay,
    /// Exit the current state and enter `target` once the handler returns.
    To(S),
}

impl<S> Transition<S> {
    /// Returns the requested target state, if any.
    pub fn target(self) -> Option<S> {
        match self {
            Transition::Stay => None,
            Transition::To(target) => Some(target),
        }
    }
}

/// Behavior dispatched by an [`Engine`].
pub trait EventHandler {
    /// Closed set of states the handler implements.
    type State: Copy + PartialEq;

    /// Processes one event on behalf of `state`.
    ///
    /// Called exactly once per event plus once for each synthesized
    /// exit-state/enter-state notification. Unrecognized events must be
    /// silent no-ops.
    fn on_event(&mut self, state: Self::State, event: &Event) -> Transition<Self::State>;
}

/// Run-to-completion dispatcher owning the current state.
#[derive(Copy, Clone, Debug)]
pub struct Engine<S> {
    current: S,
}

impl<S: Copy + PartialEq> Engine<S> {
    /// Creates an engine resting in `initial` without dispatching an entry.
    pub const fn new(initial: S) -> Self {
        Self { current: initial }
    }

    /// Reports the active state.
    pub fn current(&self) -> S {
        self.current
    }

    /// Dispatches `event` to the current state, then performs any requested
    /// transition as an explicit exit/enter sequence.
    ///
    /// Must be called once per dequeued event, never re-entrantly. A
    /// transition requested by the exit or enter notification itself is
    /// ignored — only the triggering event's outcome is honored.
    pub fn process<H>(&mut self, handler: &mut H, event: &Event)
    where
        H: EventHandler<State = S>,
    {
        if let Some(target) = handler.on_event(self.current, event).target() {
            let _ = handler.on_event(self.current, &Event::internal(EventKind::ExitState));
            self.current = target;
            let _ = handler.on_event(self.current, &Event::internal(EventKind::EnterState));
        }
    }
}
