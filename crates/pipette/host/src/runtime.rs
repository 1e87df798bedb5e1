//! Host-side wiring around the cycling engine.
//!
//! Oracles are registered once at startup, superseded action kinds are
//! declared, and one [`SelectorRuntime::pump`] call per input pass drives the
//! engine ahead of the host's own click handling.

use std::sync::Arc;

use crossterm::event::KeyEvent;
use pipette_core::{
    ActionId, ActionOracle, CyclingSelector, Env, PointerOracle, SelectionSink, SelectorEnv,
    SessionOracle, TickOutcome,
};
use thiserror::Error;
use tracing::trace;

use crate::keybinding::KeyBindingDef;

/// Errors surfaced while building the selector runtime.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("selector runtime requires all oracles to be configured before building")]
    MissingOracles,
}

/// Bundles the engine with the host oracle implementations and the hotkey
/// binding, and drives one engine tick per host input pass.
pub struct SelectorRuntime {
    selector: CyclingSelector,
    binding: KeyBindingDef,
    session: Arc<dyn SessionOracle>,
    pointer: Arc<dyn PointerOracle>,
    actions: Arc<dyn ActionOracle>,
    sink: Arc<dyn SelectionSink>,
}

impl SelectorRuntime {
    pub fn builder() -> SelectorRuntimeBuilder {
        SelectorRuntimeBuilder::default()
    }

    /// Processes one input tick. Must run before the host's own default click
    /// handling, exactly once per pass.
    pub fn pump(&mut self) -> TickOutcome {
        let env: SelectorEnv<'_> = Env::with_all(
            self.session.as_ref(),
            self.pointer.as_ref(),
            self.actions.as_ref(),
            self.sink.as_ref(),
        );
        let outcome = self.selector.process_tick(env);
        trace!(?outcome, "input tick processed");
        outcome
    }

    /// Whether `event` presses the cycling hotkey.
    pub fn handle_key(&self, event: &KeyEvent) -> bool {
        self.binding.matches(event)
    }

    pub fn binding(&self) -> &KeyBindingDef {
        &self.binding
    }

    pub fn binding_mut(&mut self) -> &mut KeyBindingDef {
        &mut self.binding
    }
}

/// Builder for [`SelectorRuntime`].
#[derive(Default)]
pub struct SelectorRuntimeBuilder {
    binding: Option<KeyBindingDef>,
    session: Option<Arc<dyn SessionOracle>>,
    pointer: Option<Arc<dyn PointerOracle>>,
    actions: Option<Arc<dyn ActionOracle>>,
    sink: Option<Arc<dyn SelectionSink>>,
    suppressed: Vec<ActionId>,
}

impl SelectorRuntimeBuilder {
    pub fn binding(mut self, binding: KeyBindingDef) -> Self {
        self.binding = Some(binding);
        self
    }

    pub fn session(mut self, session: Arc<dyn SessionOracle>) -> Self {
        self.session = Some(session);
        self
    }

    pub fn pointer(mut self, pointer: Arc<dyn PointerOracle>) -> Self {
        self.pointer = Some(pointer);
        self
    }

    pub fn actions(mut self, actions: Arc<dyn ActionOracle>) -> Self {
        self.actions = Some(actions);
        self
    }

    pub fn sink(mut self, sink: Arc<dyn SelectionSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Declares an action kind as superseded or incompatible; it never
    /// enters the candidate registry.
    pub fn suppress(mut self, id: ActionId) -> Self {
        self.suppressed.push(id);
        self
    }

    pub fn build(self) -> Result<SelectorRuntime, BuildError> {
        let (Some(session), Some(pointer), Some(actions), Some(sink)) =
            (self.session, self.pointer, self.actions, self.sink)
        else {
            return Err(BuildError::MissingOracles);
        };

        let mut selector = CyclingSelector::new();
        for id in self.suppressed {
            selector.suppress(id);
        }

        Ok(SelectorRuntime {
            selector,
            binding: self.binding.unwrap_or_default(),
            session,
            pointer,
            actions,
            sink,
        })
    }
}
