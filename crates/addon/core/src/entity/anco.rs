//! Animation controllers ("ancos"): small finite-state machines of named
//! states with guarded transitions.
//!
//! The same model serves behavior-pack controllers, which run commands on
//! entry and exit, and resource-pack controllers, which play animations.
//!
//! Transitions are not validated: a transition may name a state that does
//! not exist in the controller. Keeping targets consistent is up to the
//! author.

use serde_json::{Map, Value, json};

use crate::error::{BuildError, Result};

/// One state of an animation controller.
#[derive(Clone, Debug, PartialEq)]
pub struct AncoState {
    pub identifier: String,
    /// `(target state, Molang condition)` pairs, checked in order.
    transitions: Vec<(String, String)>,
    on_entry: Vec<String>,
    on_exit: Vec<String>,
    animations: Vec<String>,
    /// Seconds this state's animations blend into the next state's.
    pub blend_transition: Option<f64>,
}

impl AncoState {
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            transitions: Vec::new(),
            on_entry: Vec::new(),
            on_exit: Vec::new(),
            animations: Vec::new(),
            blend_transition: None,
        }
    }

    #[must_use]
    pub fn with_transition(mut self, state: impl Into<String>, condition: impl Into<String>) -> Self {
        self.add_transition(state, condition);
        self
    }

    #[must_use]
    pub fn with_blend(mut self, seconds: f64) -> Self {
        self.blend_transition = Some(seconds);
        self
    }

    pub fn add_transition(&mut self, state: impl Into<String>, condition: impl Into<String>) {
        self.transitions.push((state.into(), condition.into()));
    }

    pub fn add_transitions<S, C>(&mut self, transitions: impl IntoIterator<Item = (S, C)>)
    where
        S: Into<String>,
        C: Into<String>,
    {
        for (state, condition) in transitions {
            self.add_transition(state, condition);
        }
    }

    /// Adds a command run when the state is entered. Commands carry their
    /// leading `/`.
    pub fn add_entry_command(&mut self, cmd: impl Into<String>) {
        self.on_entry.push(cmd.into());
    }

    pub fn add_entry_commands<S: Into<String>>(&mut self, cmds: impl IntoIterator<Item = S>) {
        self.on_entry.extend(cmds.into_iter().map(Into::into));
    }

    pub fn add_exit_command(&mut self, cmd: impl Into<String>) {
        self.on_exit.push(cmd.into());
    }

    pub fn add_exit_commands<S: Into<String>>(&mut self, cmds: impl IntoIterator<Item = S>) {
        self.on_exit.extend(cmds.into_iter().map(Into::into));
    }

    pub fn add_animation(&mut self, anim: impl Into<String>) {
        self.animations.push(anim.into());
    }

    pub fn add_animations<S: Into<String>>(&mut self, anims: impl IntoIterator<Item = S>) {
        self.animations.extend(anims.into_iter().map(Into::into));
    }

    pub fn transitions(&self) -> &[(String, String)] {
        &self.transitions
    }

    pub fn on_entry(&self) -> &[String] {
        &self.on_entry
    }

    pub fn on_exit(&self) -> &[String] {
        &self.on_exit
    }

    pub fn animations(&self) -> &[String] {
        &self.animations
    }

    pub(crate) fn transitions_mut(&mut self) -> &mut [(String, String)] {
        &mut self.transitions
    }

    pub(crate) fn commands_mut(&mut self) -> impl Iterator<Item = &mut String> {
        self.on_entry.iter_mut().chain(self.on_exit.iter_mut())
    }

    /// Empty lists and an unset blend time are omitted.
    pub fn to_json(&self) -> Value {
        let mut obj = Map::new();
        if !self.transitions.is_empty() {
            let transitions: Vec<Value> = self
                .transitions
                .iter()
                .map(|(state, condition)| {
                    let mut t = Map::new();
                    t.insert(state.clone(), json!(condition));
                    Value::Object(t)
                })
                .collect();
            obj.insert("transitions".into(), Value::Array(transitions));
        }
        if !self.on_entry.is_empty() {
            obj.insert("on_entry".into(), json!(self.on_entry));
        }
        if !self.on_exit.is_empty() {
            obj.insert("on_exit".into(), json!(self.on_exit));
        }
        if !self.animations.is_empty() {
            obj.insert("animations".into(), json!(self.animations));
        }
        if let Some(blend) = self.blend_transition {
            obj.insert("blend_transition".into(), json!(blend));
        }
        Value::Object(obj)
    }
}

/// A named animation controller.
#[derive(Clone, Debug, PartialEq)]
pub struct AnimationController {
    pub identifier: String,
    pub initial_state: String,
    states: Vec<AncoState>,
}

impl AnimationController {
    pub fn new(identifier: impl Into<String>, initial_state: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            initial_state: initial_state.into(),
            states: Vec::new(),
        }
    }

    pub fn set_initial_state(&mut self, state: impl Into<String>) {
        self.initial_state = state.into();
    }

    /// Adds a state. State ids are unique within a controller.
    pub fn add_state(&mut self, state: AncoState) -> Result<()> {
        if self.has_state(&state.identifier) {
            return Err(BuildError::DuplicateState {
                controller: self.identifier.clone(),
                state: state.identifier,
            });
        }
        self.states.push(state);
        Ok(())
    }

    pub fn add_states(&mut self, states: impl IntoIterator<Item = AncoState>) -> Result<()> {
        for state in states {
            self.add_state(state)?;
        }
        Ok(())
    }

    pub fn has_state(&self, id: &str) -> bool {
        self.get_state(id).is_some()
    }

    pub fn get_state(&self, id: &str) -> Option<&AncoState> {
        self.states.iter().find(|s| s.identifier == id)
    }

    pub fn get_state_mut(&mut self, id: &str) -> Option<&mut AncoState> {
        self.states.iter_mut().find(|s| s.identifier == id)
    }

    /// Returns the state `id`, appending an empty one first if missing.
    pub fn state_entry(&mut self, id: &str) -> &mut AncoState {
        let pos = match self.states.iter().position(|s| s.identifier == id) {
            Some(pos) => pos,
            None => {
                self.states.push(AncoState::new(id));
                self.states.len() - 1
            }
        };
        &mut self.states[pos]
    }

    pub fn states(&self) -> &[AncoState] {
        &self.states
    }

    pub(crate) fn states_mut(&mut self) -> &mut [AncoState] {
        &mut self.states
    }

    /// Controller body: `{initial_state, states: {id: {...}}}`.
    pub fn to_json(&self) -> Value {
        let mut states = Map::new();
        for state in &self.states {
            states.insert(state.identifier.clone(), state.to_json());
        }
        json!({
            "initial_state": self.initial_state,
            "states": states,
        })
    }

    /// Complete controller file.
    pub fn to_document(&self, format_version: &str) -> Value {
        let mut controllers = Map::new();
        controllers.insert(self.identifier.clone(), self.to_json());
        json!({
            "format_version": format_version,
            "animation_controllers": controllers,
        })
    }
}
