//! Behavior-pack animations: timelines of commands.

use serde_json::{Map, Value, json};

/// Commands fired at one point of an animation timeline.
#[derive(Clone, Debug, PartialEq)]
pub struct AnimTimelineItem {
    /// Seconds from animation start.
    pub trigger_time: f64,
    commands: Vec<String>,
}

impl AnimTimelineItem {
    pub fn new(trigger_time: f64) -> Self {
        Self {
            trigger_time,
            commands: Vec::new(),
        }
    }

    pub fn add_command(&mut self, cmd: impl Into<String>) {
        self.commands.push(cmd.into());
    }

    pub fn add_commands<S: Into<String>>(&mut self, cmds: impl IntoIterator<Item = S>) {
        self.commands.extend(cmds.into_iter().map(Into::into));
    }

    /// Timeline key, formatted the way the game reads it (`"0.0"`, `"1.5"`).
    pub fn key(&self) -> String {
        format!("{:?}", self.trigger_time)
    }

    /// A single command serializes as a bare string.
    pub fn to_json(&self) -> Value {
        match self.commands.as_slice() {
            [single] => json!(single),
            cmds => json!(cmds),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Animation {
    pub identifier: String,
    pub looping: bool,
    /// Length in seconds.
    pub length: Option<f64>,
    timeline: Vec<AnimTimelineItem>,
}

impl Animation {
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            looping: false,
            length: None,
            timeline: Vec::new(),
        }
    }

    #[must_use]
    pub fn looping(mut self, looping: bool) -> Self {
        self.looping = looping;
        self
    }

    #[must_use]
    pub fn with_length(mut self, seconds: f64) -> Self {
        self.length = Some(seconds);
        self
    }

    pub fn add_timeline_item(&mut self, item: AnimTimelineItem) {
        self.timeline.push(item);
    }

    pub fn add_timeline_items(&mut self, items: impl IntoIterator<Item = AnimTimelineItem>) {
        self.timeline.extend(items);
    }

    /// Every timeline command, in timeline order.
    pub(crate) fn commands_mut(&mut self) -> impl Iterator<Item = &mut String> {
        self.timeline.iter_mut().flat_map(|item| item.commands.iter_mut())
    }

    pub fn to_json(&self) -> Value {
        let mut obj = Map::new();
        if self.looping {
            obj.insert("loop".into(), json!(true));
        }
        if let Some(length) = self.length {
            obj.insert("animation_length".into(), json!(length));
        }
        if !self.timeline.is_empty() {
            let mut timeline = Map::new();
            for item in &self.timeline {
                timeline.insert(item.key(), item.to_json());
            }
            obj.insert("timeline".into(), Value::Object(timeline));
        }
        Value::Object(obj)
    }
}

/// A set of animations written to one file.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AnimationFile {
    animations: Vec<Animation>,
}

impl AnimationFile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_anim(&mut self, anim: Animation) {
        self.animations.push(anim);
    }

    pub fn add_anims(&mut self, anims: impl IntoIterator<Item = Animation>) {
        self.animations.extend(anims);
    }

    pub fn to_document(&self, format_version: &str) -> Value {
        let mut animations = Map::new();
        for anim in &self.animations {
            animations.insert(anim.identifier.clone(), anim.to_json());
        }
        json!({
            "format_version": format_version,
            "animations": animations,
        })
    }
}
