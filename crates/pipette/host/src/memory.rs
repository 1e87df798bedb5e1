//! In-memory host world for tests and local experiments.
//!
//! Implements every oracle the engine needs on top of plain maps behind an
//! `RwLock`, mirroring how a real host answers the ambient queries: cells
//! hold object stacks and terrain, the session tracks UI state and the
//! active selection, and replicate actions are synthesized on demand from
//! the captured configuration of the source object.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};

use pipette_core::{
    Acceptance, ActionCategory, ActionId, ActionOracle, ActiveSelection, CandidateAction, CellPos,
    KindId, PlacementInfo, PointerOracle, SelectionSink, SessionOracle, Target, TargetId, Terrain,
};

/// Identity range reserved for synthesized replicate actions, offset by the
/// replicated kind so repeated synthesis for one kind stays stable.
pub const REPLICATE_ID_BASE: u32 = 10_000;

/// How a [`HostAction`] answers its applicability check.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ApplyRule {
    /// Applies to every target.
    #[default]
    Always,
    /// Applies to nothing.
    Never,
    /// Applies to targets of the listed kinds.
    Kinds(Vec<KindId>),
    /// Applies only to targets carrying the exclusion marker.
    MarkedOnly,
    /// Applies only to targets without the exclusion marker.
    UnmarkedOnly,
}

/// Configuration captured from an existing object for a replicate action.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReplicateConfig {
    /// Material the object is made of.
    pub material: Option<KindId>,
    /// Packed color override, when the object carries one.
    pub color_override: Option<u32>,
    /// Style variant identifier.
    pub style: Option<u32>,
}

/// Candidate action backed by a scripted applicability rule.
pub struct HostAction {
    id: ActionId,
    label: String,
    order: i32,
    category: ActionCategory,
    rule: ApplyRule,
    config: Option<ReplicateConfig>,
}

impl HostAction {
    pub fn new(id: u32, label: impl Into<String>, order: i32, rule: ApplyRule) -> Arc<Self> {
        Arc::new(Self {
            id: ActionId(id),
            label: label.into(),
            order,
            category: ActionCategory::Ordinary,
            rule,
            config: None,
        })
    }

    fn synthetic(
        id: u32,
        label: &str,
        order: i32,
        category: ActionCategory,
        rule: ApplyRule,
    ) -> Arc<Self> {
        Arc::new(Self {
            id: ActionId(id),
            label: label.to_owned(),
            order,
            category,
            rule,
            config: None,
        })
    }

    /// Captured source configuration; present on replicate actions only.
    pub fn config(&self) -> Option<ReplicateConfig> {
        self.config
    }
}

impl CandidateAction for HostAction {
    fn id(&self) -> ActionId {
        self.id
    }

    fn label(&self) -> &str {
        &self.label
    }

    fn order(&self) -> i32 {
        self.order
    }

    fn category(&self) -> ActionCategory {
        self.category
    }

    fn can_apply(&self, target: &Target) -> Acceptance {
        match &self.rule {
            ApplyRule::Always => Acceptance::Accepted,
            ApplyRule::Never => Acceptance::rejected("not applicable"),
            ApplyRule::Kinds(kinds) if kinds.contains(&target.kind) => Acceptance::Accepted,
            ApplyRule::Kinds(_) => Acceptance::rejected("kind not covered"),
            ApplyRule::MarkedOnly if target.is_marked() => Acceptance::Accepted,
            ApplyRule::MarkedOnly => Acceptance::rejected("target not marked"),
            ApplyRule::UnmarkedOnly if !target.is_marked() => Acceptance::Accepted,
            ApplyRule::UnmarkedOnly => Acceptance::rejected("target already marked"),
        }
    }
}

/// Selection commands observed by the in-memory sink, oldest first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SelectionEvent {
    Selected(ActionId),
    Cleared,
}

struct HostObject {
    target: Target,
    eligible: bool,
}

#[derive(Default)]
struct WorldState {
    pointer: Option<CellPos>,
    objects: HashMap<CellPos, Vec<HostObject>>,
    terrain: HashMap<CellPos, Terrain>,
    configs: HashMap<TargetId, ReplicateConfig>,
    buildable: HashSet<KindId>,
    registered: Vec<Arc<dyn CandidateAction>>,
    selected_count: usize,
    modal_open: bool,
    world_view: bool,
    hotkey: bool,
    active: Option<ActiveSelection>,
    placements: HashMap<ActionId, PlacementInfo>,
    events: Vec<SelectionEvent>,
}

/// In-memory implementation of every host oracle.
pub struct MemoryHost {
    mark: Arc<dyn CandidateAction>,
    unmark: Arc<dyn CandidateAction>,
    world: RwLock<WorldState>,
}

/// Identity of the synthetic "mark excluded" action.
pub const MARK_ACTION_ID: ActionId = ActionId(9000);

/// Identity of the synthetic "unmark excluded" action.
pub const UNMARK_ACTION_ID: ActionId = ActionId(9001);

impl MemoryHost {
    pub fn new() -> Self {
        Self::with_exclusion_rules(ApplyRule::UnmarkedOnly, ApplyRule::MarkedOnly)
    }

    /// Builds a host whose synthetic exclusion actions answer applicability
    /// with the given rules instead of the marker-based defaults.
    pub fn with_exclusion_rules(mark_rule: ApplyRule, unmark_rule: ApplyRule) -> Self {
        Self {
            mark: HostAction::synthetic(
                MARK_ACTION_ID.0,
                "mark excluded",
                900,
                ActionCategory::Mark,
                mark_rule,
            ),
            unmark: HostAction::synthetic(
                UNMARK_ACTION_ID.0,
                "unmark excluded",
                901,
                ActionCategory::Unmark,
                unmark_rule,
            ),
            world: RwLock::new(WorldState::default()),
        }
    }

    fn read<T: Default>(&self, f: impl FnOnce(&WorldState) -> T) -> T {
        self.world.read().map(|world| f(&world)).unwrap_or_default()
    }

    fn write(&self, f: impl FnOnce(&mut WorldState)) {
        if let Ok(mut world) = self.world.write() {
            f(&mut world);
        }
    }

    // ----- world setup -----

    pub fn register_action(&self, action: Arc<dyn CandidateAction>) {
        self.write(|world| world.registered.push(action));
    }

    /// Declares `kind` buildable: replicate actions can be synthesized for
    /// structures and terrain of this kind.
    pub fn allow_build(&self, kind: KindId) {
        self.write(|world| {
            world.buildable.insert(kind);
        });
    }

    pub fn set_pointer(&self, cell: CellPos) {
        self.write(|world| world.pointer = Some(cell));
    }

    pub fn place_object(&self, cell: CellPos, target: Target) {
        self.write(|world| {
            world.objects.entry(cell).or_default().push(HostObject {
                target,
                eligible: true,
            });
        });
    }

    /// Places an object that pointer interaction cannot reach (hidden or
    /// fully obscured); the pointer oracle filters it out.
    pub fn place_obscured(&self, cell: CellPos, target: Target) {
        self.write(|world| {
            world.objects.entry(cell).or_default().push(HostObject {
                target,
                eligible: false,
            });
        });
    }

    /// Captures the configuration a replicate action for this object copies.
    pub fn set_object_config(&self, id: TargetId, config: ReplicateConfig) {
        self.write(|world| {
            world.configs.insert(id, config);
        });
    }

    pub fn set_terrain(&self, cell: CellPos, terrain: Terrain) {
        self.write(|world| {
            world.terrain.insert(cell, terrain);
        });
    }

    /// Sets or clears the exclusion marker on the object with identity `id`.
    pub fn set_marked(&self, id: &TargetId, marked: bool) {
        self.write(|world| {
            for stack in world.objects.values_mut() {
                for object in stack.iter_mut() {
                    if &object.target.id == id {
                        object
                            .target
                            .flags
                            .set(pipette_core::TargetFlags::MARKED, marked);
                    }
                }
            }
        });
    }

    // ----- session control -----

    pub fn press_hotkey(&self) {
        self.write(|world| world.hotkey = true);
    }

    pub fn set_selected_count(&self, count: usize) {
        self.write(|world| world.selected_count = count);
    }

    pub fn set_modal_open(&self, open: bool) {
        self.write(|world| world.modal_open = open);
    }

    pub fn set_world_view(&self, active: bool) {
        self.write(|world| world.world_view = active);
    }

    /// Forces the active selection, as if the user picked something from the
    /// host's own menus.
    pub fn set_active(&self, active: Option<ActiveSelection>) {
        self.write(|world| world.active = active);
    }

    // ----- observation -----

    pub fn active(&self) -> Option<ActiveSelection> {
        self.read(|world| world.active)
    }

    pub fn events(&self) -> Vec<SelectionEvent> {
        self.read(|world| world.events.clone())
    }

    pub fn clear_events(&self) {
        self.write(|world| world.events.clear());
    }

    /// Synthesizes the replicate action for `target`, exposed for asserting
    /// the captured configuration.
    pub fn synthesize_replicate(&self, target: &Target) -> Option<Arc<HostAction>> {
        if !self.read(|world| world.buildable.contains(&target.kind)) {
            return None;
        }

        let config = self.read(|world| world.configs.get(&target.id).copied());
        let id = ActionId(REPLICATE_ID_BASE + target.kind.0);
        self.write(|world| {
            world.placements.insert(
                id,
                PlacementInfo {
                    kind: target.kind,
                    floor_like: false,
                },
            );
        });

        Some(Arc::new(HostAction {
            id,
            label: format!("replicate {}", target.kind),
            order: 0,
            category: ActionCategory::Replicate,
            rule: ApplyRule::Never,
            config,
        }))
    }
}

impl Default for MemoryHost {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionOracle for MemoryHost {
    fn selected_count(&self) -> usize {
        self.read(|world| world.selected_count)
    }

    fn modal_panel_open(&self) -> bool {
        self.read(|world| world.modal_open)
    }

    fn world_view_active(&self) -> bool {
        self.read(|world| world.world_view)
    }

    /// Pressed-edge semantics: reading consumes the event, like a per-frame
    /// key-down query.
    fn hotkey_pressed(&self) -> bool {
        let mut pressed = false;
        self.write(|world| pressed = std::mem::take(&mut world.hotkey));
        pressed
    }

    fn active_selection(&self) -> Option<ActiveSelection> {
        self.read(|world| world.active)
    }
}

impl PointerOracle for MemoryHost {
    fn pointer_cell(&self) -> Option<CellPos> {
        self.read(|world| world.pointer)
    }

    fn objects_at(&self, cell: CellPos) -> Vec<Target> {
        self.read(|world| {
            world
                .objects
                .get(&cell)
                .map(|stack| {
                    stack
                        .iter()
                        .filter(|object| object.eligible)
                        .map(|object| object.target.clone())
                        .collect()
                })
                .unwrap_or_default()
        })
    }

    fn terrain_at(&self, cell: CellPos) -> Option<Terrain> {
        self.read(|world| world.terrain.get(&cell).copied())
    }
}

impl ActionOracle for MemoryHost {
    fn registered(&self) -> Vec<Arc<dyn CandidateAction>> {
        self.read(|world| world.registered.clone())
    }

    fn exclusion_actions(&self) -> (Arc<dyn CandidateAction>, Arc<dyn CandidateAction>) {
        (self.mark.clone(), self.unmark.clone())
    }

    fn replicate_for_structure(&self, target: &Target) -> Option<Arc<dyn CandidateAction>> {
        self.synthesize_replicate(target)
            .map(|action| action as Arc<dyn CandidateAction>)
    }

    fn replicate_for_terrain(&self, terrain: &Terrain) -> Option<Arc<dyn CandidateAction>> {
        if !self.read(|world| world.buildable.contains(&terrain.kind)) {
            return None;
        }

        let id = ActionId(REPLICATE_ID_BASE + terrain.kind.0);
        self.write(|world| {
            world.placements.insert(
                id,
                PlacementInfo {
                    kind: terrain.kind,
                    floor_like: true,
                },
            );
        });

        Some(HostAction::synthetic(
            id.0,
            "copy floor material",
            0,
            ActionCategory::Replicate,
            ApplyRule::Never,
        ))
    }
}

impl SelectionSink for MemoryHost {
    fn select(&self, action: Arc<dyn CandidateAction>) {
        self.write(|world| {
            let placement = world.placements.get(&action.id()).copied();
            world.active = Some(ActiveSelection::new(action.id(), placement));
            world.events.push(SelectionEvent::Selected(action.id()));
        });
    }

    fn deselect(&self) {
        self.write(|world| {
            world.active = None;
            world.events.push(SelectionEvent::Cleared);
        });
    }
}
