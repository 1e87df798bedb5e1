//! Traits describing the host boundary.
//!
//! Oracles expose the ambient queries the engine pulls each tick (UI state,
//! pointer resolution, the candidate action set) and the selection commands
//! it pushes back. The [`Env`] aggregate bundles them so the engine can reach
//! everything it needs without hard coupling to concrete implementations.
mod actions;
mod pointer;
mod session;
mod sink;

pub use actions::ActionOracle;
pub use pointer::PointerOracle;
pub use session::{ActiveSelection, PlacementInfo, SessionOracle};
pub use sink::SelectionSink;

/// Aggregates the host oracles required by one tick of the engine.
///
/// Any missing oracle degrades the tick to a no-op; the engine never treats
/// an absent collaborator as an error.
#[derive(Clone, Copy)]
pub struct Env<'a, S, P, A, K>
where
    S: SessionOracle + ?Sized,
    P: PointerOracle + ?Sized,
    A: ActionOracle + ?Sized,
    K: SelectionSink + ?Sized,
{
    session: Option<&'a S>,
    pointer: Option<&'a P>,
    actions: Option<&'a A>,
    sink: Option<&'a K>,
}

pub type SelectorEnv<'a> = Env<
    'a,
    dyn SessionOracle + 'a,
    dyn PointerOracle + 'a,
    dyn ActionOracle + 'a,
    dyn SelectionSink + 'a,
>;

impl<'a, S, P, A, K> Env<'a, S, P, A, K>
where
    S: SessionOracle + ?Sized,
    P: PointerOracle + ?Sized,
    A: ActionOracle + ?Sized,
    K: SelectionSink + ?Sized,
{
    pub fn new(
        session: Option<&'a S>,
        pointer: Option<&'a P>,
        actions: Option<&'a A>,
        sink: Option<&'a K>,
    ) -> Self {
        Self {
            session,
            pointer,
            actions,
            sink,
        }
    }

    pub fn with_all(session: &'a S, pointer: &'a P, actions: &'a A, sink: &'a K) -> Self {
        Self::new(Some(session), Some(pointer), Some(actions), Some(sink))
    }

    pub fn empty() -> Self {
        Self {
            session: None,
            pointer: None,
            actions: None,
            sink: None,
        }
    }

    pub fn session(&self) -> Option<&'a S> {
        self.session
    }

    pub fn pointer(&self) -> Option<&'a P> {
        self.pointer
    }

    pub fn actions(&self) -> Option<&'a A> {
        self.actions
    }

    pub fn sink(&self) -> Option<&'a K> {
        self.sink
    }
}

impl<'a, S, P, A, K> Env<'a, S, P, A, K>
where
    S: SessionOracle + 'a,
    P: PointerOracle + 'a,
    A: ActionOracle + 'a,
    K: SelectionSink + 'a,
{
    pub fn into_selector_env(self) -> SelectorEnv<'a> {
        let session: Option<&'a dyn SessionOracle> = self.session.map(|session| session as _);
        let pointer: Option<&'a dyn PointerOracle> = self.pointer.map(|pointer| pointer as _);
        let actions: Option<&'a dyn ActionOracle> = self.actions.map(|actions| actions as _);
        let sink: Option<&'a dyn SelectionSink> = self.sink.map(|sink| sink as _);
        Env::new(session, pointer, actions, sink)
    }
}
