//! Loop states: the numbered states an entity cycles through.
//!
//! Each call to [`LoopStateBuilder::add`] emits one state `state_<n>` and
//! wires it into three graphs at once:
//!
//! - the component-group/event graph: a group `state_<n>` (carrying
//!   `skin_id = n` and an optional timer) and an event `state_<n>` that adds
//!   the group and removes the predecessor's;
//! - optionally the behavior controller, for entry/exit commands;
//! - optionally the render controller, for an animation.
//!
//! Controllers use hub-and-spoke wiring: the state only transitions to and
//! from the shared `init` hub, guarded by `query.skin_id`, so any timer or
//! command can return control to the hub for dispatch to any other state.
//!
//! Non-linear connections are declared by name and recorded in the
//! [`BranchRegistry`]; they are resolved once all states exist.

use std::fmt;

use tracing::{debug, trace};

use super::anco::{AncoState, AnimationController};
use super::behaviors::Behaviors;
use super::branch::{self, BranchRegistry};
use super::event::Event;
use super::group::ComponentGroup;
use super::property::PropertyAssignments;
use crate::AddonConfig;
use crate::component::{Component, factory};
use crate::error::{BuildError, ControllerKind, Result};

/// Index of a loop state, rendered as `state_<n>`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StateId(pub usize);

impl StateId {
    pub const FIRST: StateId = StateId(0);

    pub fn next(self) -> StateId {
        StateId(self.0 + 1)
    }

    /// The previous state, or `None` for the first state.
    pub fn prev(self) -> Option<StateId> {
        self.0.checked_sub(1).map(StateId)
    }

    pub fn is_first(self) -> bool {
        self.0 == 0
    }

    /// Molang condition true while the entity is in this state.
    pub fn active_condition(self) -> String {
        format!("query.skin_id=={}", self.0)
    }

    /// Molang condition true once the entity has left this state.
    pub fn inactive_condition(self) -> String {
        format!("query.skin_id!={}", self.0)
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", AddonConfig::STATE_PREFIX, self.0)
    }
}

/// Condition that ends a render-controller spoke once its animation is done.
pub const ANIMATIONS_FINISHED: &str = "query.all_animations_finished";

/// Everything one loop state can carry.
///
/// Unset fields contribute nothing; [`LoopState::default`] is a bare state
/// that only toggles its own group.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LoopState {
    /// Behavior controller receiving entry/exit commands.
    pub banco: usize,
    /// Render controller receiving the animation.
    pub ranco: usize,
    pub components: Vec<Component>,
    pub entry_commands: Option<Vec<String>>,
    pub exit_commands: Option<Vec<String>>,
    /// Seconds before the state advances.
    pub timer: Option<f64>,
    /// Closes the loop: the timer returns to `state_0` and `state_0` removes
    /// this state's group.
    pub last_state: bool,
    /// Branch name other states can connect to.
    pub name: Option<String>,
    /// Branch names this state transitions into.
    pub connections: Vec<String>,
    /// Branch the timer fires instead of the next state.
    pub timer_state: Option<String>,
    pub hp: Option<u32>,
    pub attack: Option<factory::Damage>,
    pub move_speed: Option<f64>,
    pub no_damage: bool,
    pub animation: Option<String>,
    /// Leave the animation when the state ends rather than when it finishes.
    pub end_anim_with_state: bool,
    pub anim_blend_time: f64,
    pub set_properties: Option<PropertyAssignments>,
}

impl Default for LoopState {
    fn default() -> Self {
        Self {
            banco: 0,
            ranco: 0,
            components: Vec::new(),
            entry_commands: None,
            exit_commands: None,
            timer: None,
            last_state: false,
            name: None,
            connections: Vec::new(),
            timer_state: None,
            hp: None,
            attack: None,
            move_speed: None,
            no_damage: false,
            animation: None,
            end_anim_with_state: true,
            anim_blend_time: LoopState::DEFAULT_BLEND_TIME,
            set_properties: None,
        }
    }
}

impl LoopState {
    pub const DEFAULT_BLEND_TIME: f64 = 0.2;

    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn timer(mut self, seconds: f64) -> Self {
        self.timer = Some(seconds);
        self
    }

    #[must_use]
    pub fn last(mut self) -> Self {
        self.last_state = true;
        self
    }

    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn connects_to(mut self, name: impl Into<String>) -> Self {
        self.connections.push(name.into());
        self
    }

    #[must_use]
    pub fn timer_to(mut self, name: impl Into<String>) -> Self {
        self.timer_state = Some(name.into());
        self
    }

    #[must_use]
    pub fn on_entry<S: Into<String>>(mut self, cmds: impl IntoIterator<Item = S>) -> Self {
        self.entry_commands = Some(cmds.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn on_exit<S: Into<String>>(mut self, cmds: impl IntoIterator<Item = S>) -> Self {
        self.exit_commands = Some(cmds.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn with_banco(mut self, index: usize) -> Self {
        self.banco = index;
        self
    }

    #[must_use]
    pub fn with_ranco(mut self, index: usize) -> Self {
        self.ranco = index;
        self
    }

    #[must_use]
    pub fn animation(mut self, anim: impl Into<String>) -> Self {
        self.animation = Some(anim.into());
        self
    }

    #[must_use]
    pub fn blend(mut self, seconds: f64) -> Self {
        self.anim_blend_time = seconds;
        self
    }

    /// Leave the animation once it finishes instead of when the state ends.
    #[must_use]
    pub fn anim_runs_out(mut self) -> Self {
        self.end_anim_with_state = false;
        self
    }

    #[must_use]
    pub fn component(mut self, component: Component) -> Self {
        self.components.push(component);
        self
    }

    #[must_use]
    pub fn hp(mut self, hp: u32) -> Self {
        self.hp = Some(hp);
        self
    }

    #[must_use]
    pub fn attack(mut self, damage: impl Into<factory::Damage>) -> Self {
        self.attack = Some(damage.into());
        self
    }

    #[must_use]
    pub fn move_speed(mut self, speed: f64) -> Self {
        self.move_speed = Some(speed);
        self
    }

    #[must_use]
    pub fn no_damage(mut self) -> Self {
        self.no_damage = true;
        self
    }

    #[must_use]
    pub fn properties(mut self, props: PropertyAssignments) -> Self {
        self.set_properties = Some(props);
        self
    }

    fn uses_banco(&self) -> bool {
        self.entry_commands.is_some() || self.exit_commands.is_some()
    }

    /// Every branch name this state mentions.
    fn branch_names(&self) -> impl Iterator<Item = &str> {
        self.name
            .iter()
            .chain(self.timer_state.iter())
            .chain(self.connections.iter())
            .map(String::as_str)
    }
}

/// The entity state a loop state is wired into.
pub(crate) struct LoopTargets<'a> {
    pub behaviors: &'a mut Behaviors,
    pub bancos: &'a mut [AnimationController],
    pub rancos: &'a mut [AnimationController],
}

/// Owns the state counter and the branch registry of one entity.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LoopStateBuilder {
    current: usize,
    branches: BranchRegistry,
}

impl LoopStateBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Id the next added state will get.
    pub fn current(&self) -> StateId {
        StateId(self.current)
    }

    /// Number of states added so far.
    pub fn len(&self) -> usize {
        self.current
    }

    pub fn is_empty(&self) -> bool {
        self.current == 0
    }

    pub fn branches(&self) -> &BranchRegistry {
        &self.branches
    }

    /// Adds one loop state. Nothing is mutated if validation fails.
    pub(crate) fn add(&mut self, spec: LoopState, targets: LoopTargets<'_>) -> Result<StateId> {
        let id = self.current();
        self.validate(&spec, id, &targets)?;
        let LoopTargets {
            behaviors,
            bancos,
            rancos,
        } = targets;
        let state = id.to_string();

        let mut connections = spec.connections.clone();
        let mut group = ComponentGroup::new(&state).with_component(factory::skin_id(id.0));
        if let Some(length) = spec.timer {
            let expiry = match &spec.timer_state {
                Some(branch) => {
                    connections.push(branch.clone());
                    branch.clone()
                }
                None if spec.last_state => StateId::FIRST.to_string(),
                None => id.next().to_string(),
            };
            group.add_component(factory::timer(length, expiry));
        }
        if let Some(hp) = spec.hp {
            group.add_component(factory::health(hp));
        }
        if let Some(damage) = spec.attack {
            group.add_component(factory::attack(damage, None, None)?);
        }
        if let Some(speed) = spec.move_speed {
            group.add_component(factory::movement(speed));
        }
        if spec.no_damage {
            group.add_component(factory::no_damage());
        }
        group.add_component_list(spec.components.iter().cloned());
        behaviors.add_component_group(group);

        if spec.uses_banco() {
            let mut spoke = AncoState::new(&state)
                .with_transition(AddonConfig::HUB_STATE, id.inactive_condition());
            spoke.add_entry_commands(spec.entry_commands.iter().flatten().cloned());
            spoke.add_exit_commands(spec.exit_commands.iter().flatten().cloned());
            wire_spoke(&mut bancos[spec.banco], spoke, id)?;
        }

        if let Some(anim) = &spec.animation {
            let exit = if spec.end_anim_with_state {
                id.inactive_condition()
            } else {
                ANIMATIONS_FINISHED.to_owned()
            };
            let mut spoke = AncoState::new(&state)
                .with_transition(AddonConfig::HUB_STATE, exit)
                .with_blend(spec.anim_blend_time);
            spoke.add_animation(anim.clone());
            wire_spoke(&mut rancos[spec.ranco], spoke, id)?;
        }

        if let Some(props) = &spec.set_properties {
            if id.is_first() {
                behaviors.spawn_properties.extend(props);
            }
        }

        let mut event = Event::new(&state);
        event.add_add_group(&state);
        if let Some(prev) = id.prev() {
            event.add_remove_group(prev.to_string());
        }
        if let Some(props) = &spec.set_properties {
            event.set_properties(props);
        }
        behaviors.add_event(event);

        if spec.last_state && !id.is_first() {
            if let Some(first) = behaviors.get_event_mut(&StateId::FIRST.to_string()) {
                first.ensure_removes(&state);
            }
        }

        if let Some(name) = &spec.name {
            self.branches.set_target(name, id)?;
        }
        for branch_name in &connections {
            self.branches.add_source(branch_name, id);
        }

        self.current += 1;
        debug!(
            state = %id,
            timer = ?spec.timer,
            last = spec.last_state,
            branch = ?spec.name,
            "added loop state"
        );
        Ok(id)
    }

    fn validate(&self, spec: &LoopState, id: StateId, targets: &LoopTargets<'_>) -> Result<()> {
        if spec.uses_banco() && spec.banco >= targets.bancos.len() {
            return Err(BuildError::ControllerIndex {
                kind: ControllerKind::Behavior,
                index: spec.banco,
                len: targets.bancos.len(),
            });
        }
        if spec.animation.is_some() && spec.ranco >= targets.rancos.len() {
            return Err(BuildError::ControllerIndex {
                kind: ControllerKind::Render,
                index: spec.ranco,
                len: targets.rancos.len(),
            });
        }
        let state = id.to_string();
        if spec.uses_banco() {
            check_free(&targets.bancos[spec.banco], &state)?;
        }
        if spec.animation.is_some() {
            check_free(&targets.rancos[spec.ranco], &state)?;
        }
        if let Some(name) = spec.branch_names().find(|n| branch::is_reserved_name(n)) {
            return Err(BuildError::ReservedBranchName {
                name: name.to_owned(),
            });
        }
        if let Some(name) = &spec.name {
            self.branches.check_target(name, id)?;
        }
        Ok(())
    }

    /// Resolves every registered branch against the entity's documents.
    pub(crate) fn resolve<'a>(
        &self,
        behaviors: &mut Behaviors,
        controllers: impl IntoIterator<Item = &'a mut AnimationController>,
    ) -> Result<()> {
        branch::resolve(&self.branches, behaviors, controllers)
    }
}

/// Adds `spoke` to `controller` and links it both ways with the `init` hub.
fn wire_spoke(controller: &mut AnimationController, spoke: AncoState, id: StateId) -> Result<()> {
    if !controller.has_state(AddonConfig::HUB_STATE) {
        trace!(controller = %controller.identifier, "created hub state");
    }
    controller.set_initial_state(AddonConfig::HUB_STATE);
    controller
        .state_entry(AddonConfig::HUB_STATE)
        .add_transition(id.to_string(), id.active_condition());
    controller.add_state(spoke)
}

fn check_free(controller: &AnimationController, state: &str) -> Result<()> {
    if controller.has_state(state) {
        return Err(BuildError::DuplicateState {
            controller: controller.identifier.clone(),
            state: state.to_owned(),
        });
    }
    Ok(())
}
