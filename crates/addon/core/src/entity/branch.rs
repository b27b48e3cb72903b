//! Deferred wiring of non-linear loop-state connections.
//!
//! While loop states are declared, a state may connect to a branch by name
//! before the state carrying that name exists. [`BranchRegistry`] is the
//! symbol table for those forward references. Once every state is declared,
//! [`resolve`] validates the table, stitches the remove-lists of the events
//! on both ends of every connection and rewrites the symbolic names to the
//! real state ids by walking the typed document model.

use std::collections::HashMap;

use regex::Regex;
use serde_json::Value;
use tracing::{debug, warn};

use super::anco::AnimationController;
use super::behaviors::Behaviors;
use super::loop_state::StateId;
use crate::error::{BuildError, Result};

/// One named branch: its target state once known, and the states that
/// transition into it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BranchEntry {
    pub target: Option<StateId>,
    pub sources: Vec<StateId>,
}

/// Branch name -> [`BranchEntry`], in first-mention order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BranchRegistry {
    entries: Vec<(String, BranchEntry)>,
}

impl BranchRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&BranchEntry> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, e)| e)
    }

    fn entry(&mut self, name: &str) -> &mut BranchEntry {
        let pos = match self.entries.iter().position(|(n, _)| n == name) {
            Some(pos) => pos,
            None => {
                self.entries.push((name.to_owned(), BranchEntry::default()));
                self.entries.len() - 1
            }
        };
        &mut self.entries[pos].1
    }

    /// Fails if `name` already targets a different state.
    pub(crate) fn check_target(&self, name: &str, state: StateId) -> Result<()> {
        match self.get(name).and_then(|e| e.target) {
            Some(existing) if existing != state => Err(BuildError::DuplicateBranchTarget {
                name: name.to_owned(),
                existing: existing.to_string(),
                requested: state.to_string(),
            }),
            _ => Ok(()),
        }
    }

    /// Binds `name` to its target state.
    pub fn set_target(&mut self, name: &str, state: StateId) -> Result<()> {
        self.check_target(name, state)?;
        self.entry(name).target = Some(state);
        Ok(())
    }

    /// Records that `state` transitions into the branch `name`. The target
    /// may still be unknown.
    pub fn add_source(&mut self, name: &str, state: StateId) {
        let entry = self.entry(name);
        if !entry.sources.contains(&state) {
            entry.sources.push(state);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &BranchEntry)> {
        self.entries.iter().map(|(n, e)| (n.as_str(), e))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Every branch paired with its target, or the first branch that never
    /// got one.
    pub fn resolved(&self) -> Result<Vec<(&str, StateId, &[StateId])>> {
        self.entries
            .iter()
            .map(|(name, entry)| match entry.target {
                Some(target) => Ok((name.as_str(), target, entry.sources.as_slice())),
                None => Err(BuildError::UnresolvedBranch {
                    name: name.clone(),
                    sources: entry.sources.iter().map(ToString::to_string).collect(),
                }),
            })
            .collect()
    }
}

/// Word tokens of the generated conditions `query.skin_id==n`,
/// `query.skin_id!=n` and `query.all_animations_finished`.
const CONDITION_TOKENS: [&str; 3] = ["query", "skin_id", "all_animations_finished"];

/// Whether `name` would collide with generated ids or with a token of the
/// generated transition conditions.
pub(crate) fn is_reserved_name(name: &str) -> bool {
    if name == crate::AddonConfig::HUB_STATE || CONDITION_TOKENS.contains(&name) {
        return true;
    }
    match name.strip_prefix(crate::AddonConfig::STATE_PREFIX) {
        Some(digits) => !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()),
        None => false,
    }
}

/// Rewrites branch names to state ids.
struct Substitution {
    exact: HashMap<String, String>,
    tokens: Vec<(Regex, String)>,
}

impl Substitution {
    fn new(pairs: &[(&str, StateId)]) -> Self {
        let exact = pairs
            .iter()
            .map(|(name, target)| ((*name).to_owned(), target.to_string()))
            .collect();
        let tokens = pairs
            .iter()
            .map(|(name, target)| (token_pattern(name), target.to_string()))
            .collect();
        Self { exact, tokens }
    }

    fn id(&self, id: &mut String) {
        if let Some(target) = self.exact.get(id.as_str()) {
            *id = target.clone();
        }
    }

    fn text(&self, text: &mut String) {
        for (pattern, target) in &self.tokens {
            if pattern.is_match(text) {
                *text = pattern.replace_all(text, regex::NoExpand(target)).into_owned();
            }
        }
    }

    /// Replaces every string in `value`, at any depth, that is exactly a
    /// branch name. Object keys are left alone.
    fn value(&self, value: &mut Value) {
        match value {
            Value::String(s) => self.id(s),
            Value::Array(items) => items.iter_mut().for_each(|v| self.value(v)),
            Value::Object(map) => map.values_mut().for_each(|v| self.value(v)),
            _ => {}
        }
    }
}

/// Matches `name` as a bare token, not as part of a longer identifier.
fn token_pattern(name: &str) -> Regex {
    let is_word = |c: Option<char>| c.is_some_and(|c| c.is_alphanumeric() || c == '_');
    let lead = if is_word(name.chars().next()) { r"\b" } else { "" };
    let trail = if is_word(name.chars().last()) { r"\b" } else { "" };
    // Escaped input always yields a valid pattern
    Regex::new(&format!("{lead}{}{trail}", regex::escape(name)))
        .unwrap_or_else(|_| unreachable!("escaped branch name is a valid regex"))
}

/// Validates the registry and rewires every branch connection.
///
/// Running this twice leaves the document unchanged the second time:
/// remove-lists only gain ids they lack, and no branch name survives the
/// first substitution.
pub(crate) fn resolve<'a>(
    registry: &BranchRegistry,
    behaviors: &mut Behaviors,
    controllers: impl IntoIterator<Item = &'a mut AnimationController>,
) -> Result<()> {
    let resolved = registry.resolved()?;
    if resolved.is_empty() {
        return Ok(());
    }

    for (name, target, sources) in &resolved {
        let target_id = target.to_string();
        for source in *sources {
            if source == target {
                continue;
            }
            let source_id = source.to_string();
            match behaviors.get_event_mut(&target_id) {
                Some(event) => {
                    event.ensure_removes(&source_id);
                }
                None => warn!(branch = *name, event = %target_id, "branch target has no event"),
            }
            match behaviors.get_event_mut(&source_id) {
                Some(event) => {
                    event.ensure_removes(&target_id);
                }
                None => warn!(branch = *name, event = %source_id, "branch source has no event"),
            }
        }
        debug!(branch = *name, target = %target_id, sources = sources.len(), "stitched branch");
    }

    let pairs: Vec<(&str, StateId)> = resolved.iter().map(|(n, t, _)| (*n, *t)).collect();
    let subst = Substitution::new(&pairs);

    for event in behaviors.events.iter_mut() {
        event.for_each_reference_mut(&mut |id| subst.id(id));
    }
    for event in behaviors.spawn_sequential_events.iter_mut() {
        event.for_each_reference_mut(&mut |id| subst.id(id));
    }
    behaviors.spawn_groups.iter_mut().for_each(|g| subst.id(g));
    for randomizer in behaviors.spawn_randomizers.iter_mut() {
        for list in randomizer.group_lists_mut() {
            list.iter_mut().for_each(|g| subst.id(g));
        }
    }
    let group_components = behaviors
        .component_groups
        .iter_mut()
        .flat_map(|group| group.components_mut().iter_mut());
    for comp in behaviors.components.iter_mut().chain(group_components) {
        comp.body_mut().values_mut().for_each(|v| subst.value(v));
    }
    for anim in behaviors.animations.iter_mut() {
        anim.commands_mut().for_each(|cmd| subst.text(cmd));
    }

    for controller in controllers {
        for state in controller.states_mut() {
            for (target, condition) in state.transitions_mut() {
                subst.id(target);
                subst.text(condition);
            }
            state.commands_mut().for_each(|cmd| subst.text(cmd));
        }
    }
    Ok(())
}
