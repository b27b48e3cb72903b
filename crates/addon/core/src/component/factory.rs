//! Constructor functions for the component kinds emitted by the builders.
//!
//! Each function is a pure mapping from a few parameters to one
//! [`Component`]; none of them keep state.

use serde_json::{Value, json};

use super::Component;
use crate::error::{BuildError, Result};

/// Kind of the timer component.
pub const TIMER_KIND: &str = "timer";

/// Melee damage, either fixed or rolled uniformly from `[min, max]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum Damage {
    Fixed(u32),
    Range(u32, u32),
}

impl From<u32> for Damage {
    fn from(value: u32) -> Self {
        Damage::Fixed(value)
    }
}

impl From<Damage> for Value {
    fn from(damage: Damage) -> Self {
        match damage {
            Damage::Fixed(dmg) => json!(dmg),
            Damage::Range(min, max) => json!([min, max]),
        }
    }
}

/// Max and current health. 1 point is half a heart.
pub fn health(max_hp: u32) -> Component {
    Component::new("health")
        .with("max", max_hp)
        .with("value", max_hp)
}

/// Melee attack stats.
///
/// `effect_id` and `effect_duration` must be given together or not at all.
pub fn attack(
    damage: impl Into<Damage>,
    effect_id: Option<&str>,
    effect_duration: Option<f64>,
) -> Result<Component> {
    let comp = Component::new("attack").with("damage", damage.into());
    match (effect_id, effect_duration) {
        (None, None) => Ok(comp),
        (Some(id), Some(duration)) => Ok(comp
            .with("effect_name", id)
            .with("effect_duration", duration)),
        _ => Err(BuildError::MissingParameter {
            context: "attack component",
            message: "effect_id and effect_duration must both be given or both be omitted",
        }),
    }
}

/// Base walk speed.
pub fn movement(speed: f64) -> Component {
    Component::new("movement").with("value", speed)
}

/// Fires `event` on the entity after `length` seconds.
///
/// Only one timer can be active on an entity at a time.
pub fn timer(length: f64, event: impl Into<String>) -> Component {
    Component::new(TIMER_KIND)
        .with("randomInterval", false)
        .with("time", length)
        .with("time_down_event", json!({ "event": event.into() }))
}

/// Expiry event of a timer component, if `comp` is one.
pub fn timer_event(comp: &Component) -> Option<&str> {
    if comp.kind() != TIMER_KIND {
        return None;
    }
    comp.body()
        .get("time_down_event")?
        .get("event")?
        .as_str()
}

/// Replaces the expiry event of a timer component. Returns `false` if `comp`
/// is not a timer.
pub fn set_timer_event(comp: &mut Component, event: &str) -> bool {
    if comp.kind() != TIMER_KIND {
        return false;
    }
    comp.set("time_down_event", json!({ "event": event }));
    true
}

/// Environment sensor firing `event` while the entity has `tag`.
pub fn tag_sensor(tag: impl Into<String>, event: impl Into<String>) -> Component {
    Component::new("environment_sensor").with("triggers", json!([tag_trigger(tag, event)]))
}

/// Environment sensor with one trigger per `(tags[i], events[i])` pair.
///
/// Both lists must have the same length.
pub fn tag_sensor_list<T, E>(tags: &[T], events: &[E]) -> Result<Component>
where
    T: AsRef<str>,
    E: AsRef<str>,
{
    if tags.len() != events.len() {
        return Err(BuildError::TagEventMismatch {
            tags: tags.len(),
            events: events.len(),
        });
    }
    let triggers: Vec<Value> = tags
        .iter()
        .zip(events)
        .map(|(tag, event)| tag_trigger(tag.as_ref(), event.as_ref()))
        .collect();
    Ok(Component::new("environment_sensor").with("triggers", triggers))
}

fn tag_trigger(tag: impl Into<String>, event: impl Into<String>) -> Value {
    json!({
        "filters": { "test": "has_tag", "value": tag.into() },
        "event": event.into()
    })
}

/// Integer usable by filters and controllers as `query.skin_id`.
pub fn skin_id(id: usize) -> Component {
    Component::new("skin_id").with("value", id)
}

pub fn variant(value: i32) -> Component {
    Component::new("variant").with("value", value)
}

pub fn mark_variant(value: i32) -> Component {
    Component::new("mark_variant").with("value", value)
}

/// Damage sensor that blocks all damage. `/kill` still works.
pub fn no_damage() -> Component {
    Component::new("damage_sensor").with(
        "triggers",
        json!({
            "on_damage": { "filters": {} },
            "deals_damage": false
        }),
    )
}

pub fn scale(value: f64) -> Component {
    Component::new("scale").with("value", value)
}

pub fn collision_box(width: f64, height: f64) -> Component {
    Component::new("collision_box")
        .with("width", width)
        .with("height", height)
}

pub fn physics() -> Component {
    Component::new("physics")
}

pub fn instant_despawn() -> Component {
    Component::new("instant_despawn")
}

/// Families for filters to match against.
pub fn type_family<S: AsRef<str>>(families: &[S]) -> Component {
    let families: Vec<Value> = families
        .iter()
        .map(|f| Value::from(f.as_ref()))
        .collect();
    Component::new("type_family").with("family", families)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::NamedPayload;
    use crate::error::AddonError;

    #[test]
    fn tag_sensor_fires_event_on_tag() {
        let comp = tag_sensor("enraged", "state_4");
        assert_eq!(comp.id(), "minecraft:environment_sensor");
        assert_eq!(
            comp.payload(),
            json!({
                "triggers": [{
                    "filters": { "test": "has_tag", "value": "enraged" },
                    "event": "state_4"
                }]
            })
        );
    }

    #[test]
    fn tag_sensor_list_pairs_tags_with_events() {
        let comp = tag_sensor_list(&["low_hp", "alone"], &["flee", "roam"]).expect("same length");
        let triggers = comp.payload()["triggers"].clone();
        assert_eq!(triggers.as_array().map(Vec::len), Some(2));
        assert_eq!(triggers[1]["filters"]["value"], "alone");
        assert_eq!(triggers[1]["event"], "roam");

        let empty = tag_sensor_list::<&str, &str>(&[], &[]).expect("empty lists");
        assert_eq!(empty.payload(), json!({ "triggers": [] }));
    }

    #[test]
    fn tag_sensor_list_rejects_mismatched_lengths() {
        let err = tag_sensor_list(&["low_hp", "alone"], &["flee"]).unwrap_err();
        assert_eq!(err, BuildError::TagEventMismatch { tags: 2, events: 1 });
        assert_eq!(err.error_code(), "tag_event_mismatch");
        assert!(!err.severity().is_fatal());
    }

    #[test]
    fn timer_body_matches_schema() {
        let comp = timer(2.5, "state_1");
        assert_eq!(comp.id(), "minecraft:timer");
        assert_eq!(
            comp.payload(),
            json!({
                "randomInterval": false,
                "time": 2.5,
                "time_down_event": { "event": "state_1" }
            })
        );
        assert_eq!(timer_event(&comp), Some("state_1"));
    }

    #[test]
    fn timer_event_can_be_rewritten() {
        let mut comp = timer(1.0, "hurt");
        assert!(set_timer_event(&mut comp, "state_3"));
        assert_eq!(timer_event(&comp), Some("state_3"));

        let mut other = health(10);
        assert!(!set_timer_event(&mut other, "state_3"));
        assert_eq!(timer_event(&other), None);
    }

    #[test]
    fn health_sets_max_and_value() {
        assert_eq!(health(20).payload(), json!({ "max": 20, "value": 20 }));
    }

    #[test]
    fn attack_range_damage() {
        let comp = attack(Damage::Range(2, 5), None, None).expect("valid attack");
        assert_eq!(comp.payload(), json!({ "damage": [2, 5] }));
    }

    #[test]
    fn attack_effect_requires_both_parts() {
        let err = attack(3u32, Some("poison"), None).unwrap_err();
        assert_eq!(err.error_code(), "missing_parameter");

        let comp = attack(3u32, Some("poison"), Some(4.0)).expect("valid attack");
        assert_eq!(comp.body()["effect_name"], json!("poison"));
    }

    #[test]
    fn no_damage_blocks_everything() {
        assert_eq!(
            no_damage().payload()["triggers"]["deals_damage"],
            json!(false)
        );
    }

    #[test]
    fn type_family_lists_families() {
        let comp = type_family(&["mob", "boss"]);
        assert_eq!(comp.payload(), json!({ "family": ["mob", "boss"] }));
    }
}
