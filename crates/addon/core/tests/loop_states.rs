use addon_core::{
    AddonError, BuildError, ControllerKind, Entity, EntityOptions, LoopState, StateId, factory,
};
use serde_json::{Value, json};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

fn boss() -> Entity {
    let mut entity = Entity::new("dev", "Boss", EntityOptions::default()).expect("entity");
    entity.create_banco("timing", None);
    entity
}

fn remove_list(entity: &Entity, state: &str) -> Vec<String> {
    entity
        .behaviors
        .get_event(state)
        .unwrap_or_else(|| panic!("missing event {state}"))
        .remove_groups()
        .to_vec()
}

fn events_json(entity: &mut Entity) -> Value {
    entity.build().expect("build").behavior["minecraft:entity"]["events"].clone()
}

#[test]
fn linear_states_remove_only_their_predecessor() {
    let mut entity = boss();
    for _ in 0..5 {
        entity.add_loop_state(LoopState::new().timer(1.0)).expect("add");
    }
    entity.resolve_branches().expect("nothing to resolve");

    assert!(remove_list(&entity, "state_0").is_empty());
    for k in 1..5 {
        assert_eq!(remove_list(&entity, &format!("state_{k}")), [format!("state_{}", k - 1)]);
    }
}

#[test]
fn closed_loop_links_first_state_to_last() {
    let mut entity = boss();
    entity.add_loop_state(LoopState::new().timer(1.0)).expect("state 0");
    entity.add_loop_state(LoopState::new().timer(1.0)).expect("state 1");
    entity
        .add_loop_state(LoopState::new().timer(1.0).last())
        .expect("state 2");

    assert_eq!(remove_list(&entity, "state_0"), ["state_2"]);
    assert_eq!(remove_list(&entity, "state_1"), ["state_0"]);
    assert_eq!(remove_list(&entity, "state_2"), ["state_1"]);

    let events = events_json(&mut entity);
    assert_eq!(
        events["state_0"],
        json!({
            "add": { "component_groups": ["state_0"] },
            "remove": { "component_groups": ["state_2"] }
        })
    );
}

#[test]
fn single_closed_state_does_not_remove_itself() {
    let mut entity = boss();
    entity
        .add_loop_state(LoopState::new().timer(3.0).last())
        .expect("state 0");
    assert!(remove_list(&entity, "state_0").is_empty());
    let group = entity
        .behaviors
        .get_component_group("state_0")
        .expect("group");
    let timer = group.get_component("timer").expect("timer");
    assert_eq!(factory::timer_event(timer), Some("state_0"));
}

#[test]
fn forward_branch_is_stitched_both_ways() {
    init_tracing();
    let mut entity = boss();
    entity.add_loop_state(LoopState::new().timer(2.0)).expect("state 0");
    entity
        .add_loop_state(LoopState::new().timer(2.0).timer_to("hurt"))
        .expect("state 1");
    entity.add_loop_state(LoopState::new().timer(2.0)).expect("state 2");
    entity
        .add_loop_state(LoopState::new().named("hurt").timer(1.0).last())
        .expect("state 3");

    entity.resolve_branches().expect("resolve");

    assert!(remove_list(&entity, "state_1").contains(&"state_3".to_string()));
    assert!(remove_list(&entity, "state_3").contains(&"state_1".to_string()));

    let group = entity
        .behaviors
        .get_component_group("state_1")
        .expect("group");
    let timer = group.get_component("timer").expect("timer");
    assert_eq!(factory::timer_event(timer), Some("state_3"));
}

#[test]
fn branch_names_are_substituted_in_controllers() {
    let mut entity = boss();
    entity.add_loop_state(LoopState::new()).expect("state 0");
    entity
        .add_loop_state(
            LoopState::new()
                .connects_to("flee")
                .on_entry(["/event entity @s flee"]),
        )
        .expect("state 1");
    entity
        .add_loop_state(LoopState::new().named("flee"))
        .expect("state 2");

    entity.resolve_branches().expect("resolve");
    let state = entity.bancos()[0].get_state("state_1").expect("spoke");
    assert_eq!(state.on_entry(), ["/event entity @s state_2"]);
}

#[test]
fn resolution_is_idempotent() {
    let mut entity = boss();
    entity
        .add_loop_state(LoopState::new().timer(1.0).timer_to("rage"))
        .expect("state 0");
    entity
        .add_loop_state(LoopState::new().named("rage").on_entry(["/say rage"]).last())
        .expect("state 1");

    let first = entity.build().expect("first build");
    let second = entity.build().expect("second build");
    assert_eq!(first, second);
    assert_eq!(remove_list(&entity, "state_1"), ["state_0"]);
}

#[test]
fn unresolved_branch_fails_the_build() {
    let mut entity = boss();
    entity
        .add_loop_state(LoopState::new().timer(1.0).timer_to("enrage"))
        .expect("state 0");

    let err = entity.build().unwrap_err();
    assert_eq!(
        err,
        BuildError::UnresolvedBranch {
            name: "enrage".into(),
            sources: vec!["state_0".into()],
        }
    );
    assert_eq!(err.error_code(), "unresolved_branch");
}

#[test]
fn duplicate_branch_target_is_rejected() {
    let mut entity = boss();
    entity
        .add_loop_state(LoopState::new().named("hurt"))
        .expect("state 0");
    let err = entity
        .add_loop_state(LoopState::new().named("hurt"))
        .unwrap_err();
    assert_eq!(err.error_code(), "duplicate_branch_target");
    assert_eq!(entity.current_state(), StateId(1));
}

#[test]
fn out_of_range_controller_fails_before_mutation() {
    let mut entity = boss();
    entity.add_loop_state(LoopState::new()).expect("state 0");
    let before = entity.clone().build().expect("snapshot");

    let err = entity
        .add_loop_state(LoopState::new().on_entry(["/say hi"]).with_banco(3))
        .unwrap_err();
    assert_eq!(
        err,
        BuildError::ControllerIndex {
            kind: ControllerKind::Behavior,
            index: 3,
            len: 1
        }
    );
    assert!(err.severity().is_fatal());
    assert_eq!(entity.current_state(), StateId(1));
    assert_eq!(entity.build().expect("rebuild"), before);
}

#[test]
fn hub_and_spoke_wiring_for_state_two() {
    let mut entity = boss();
    entity.add_loop_state(LoopState::new().timer(1.0)).expect("state 0");
    entity.add_loop_state(LoopState::new().timer(1.0)).expect("state 1");
    entity
        .add_loop_state(LoopState::new().timer(1.0).on_entry(["/say two"]))
        .expect("state 2");

    let docs = entity.build().expect("build");
    let states = &docs.behavior_controllers[0]["animation_controllers"]
        ["controller.animation.boss_timing"]["states"];
    assert_eq!(
        states["init"]["transitions"],
        json!([{ "state_2": "query.skin_id==2" }])
    );
    assert_eq!(
        states["state_2"]["transitions"],
        json!([{ "init": "query.skin_id!=2" }])
    );
}

#[test]
fn first_state_properties_seed_spawn_event() {
    let mut entity = boss();
    entity.behaviors.add_property(addon_core::EntityProperty::range("phase", 0, 2, 0));
    entity.add_spawn_group("state_0");
    entity
        .add_loop_state(
            LoopState::new()
                .timer(1.0)
                .properties([("phase", 0i64)].into_iter().collect()),
        )
        .expect("state 0");

    let events = events_json(&mut entity);
    assert_eq!(
        events["minecraft:entity_spawned"],
        json!({
            "add": { "component_groups": ["state_0"] },
            "set_property": { "property:phase": 0 }
        })
    );
    assert_eq!(events["state_0"]["set_property"], json!({ "property:phase": 0 }));
}

#[test]
fn branch_names_are_replaced_in_every_component_body() {
    let mut entity = boss();
    entity.add_component(factory::timer(5.0, "hurt"));
    entity.add_loop_state(LoopState::new()).expect("state 0");
    entity
        .add_loop_state(
            LoopState::new()
                .connects_to("hurt")
                .component(addon_core::Component::new("tag_sensor").with("event", "hurt")),
        )
        .expect("state 1");
    entity
        .add_loop_state(LoopState::new().named("hurt").last())
        .expect("state 2");

    let docs = entity.build().expect("build");
    let behavior = &docs.behavior["minecraft:entity"];
    assert_eq!(
        behavior["components"]["minecraft:timer"]["time_down_event"],
        json!({ "event": "state_2" })
    );
    assert_eq!(
        behavior["component_groups"]["state_1"]["minecraft:tag_sensor"]["event"],
        json!("state_2")
    );
    assert!(!docs.behavior.to_string().contains("\"hurt\""));
}

#[test]
fn tag_sensor_drives_a_named_branch() {
    init_tracing();
    let mut entity = boss();
    entity.add_loop_state(LoopState::new().timer(4.0)).expect("state 0");
    entity
        .add_loop_state(
            LoopState::new()
                .timer(4.0)
                .connects_to("flee")
                .component(factory::tag_sensor("wounded", "flee")),
        )
        .expect("state 1");
    entity
        .add_loop_state(LoopState::new().timer(4.0).last())
        .expect("state 2");
    entity
        .add_loop_state(LoopState::new().named("flee").timer(2.0))
        .expect("state 3");

    let events = events_json(&mut entity);
    assert!(remove_list(&entity, "state_1").contains(&"state_3".to_string()));
    assert!(remove_list(&entity, "state_3").contains(&"state_1".to_string()));
    assert_eq!(events["state_3"]["add"], json!({ "component_groups": ["state_3"] }));

    let group = entity
        .behaviors
        .get_component_group("state_1")
        .expect("group");
    let sensor = group.get_component("environment_sensor").expect("sensor");
    assert_eq!(
        sensor.body()["triggers"],
        json!([{
            "filters": { "test": "has_tag", "value": "wounded" },
            "event": "state_3"
        }])
    );
}

#[test]
fn mismatched_tag_sensor_lists_are_rejected() {
    let err = factory::tag_sensor_list(&["wounded", "alone"], &["flee"]).unwrap_err();
    assert_eq!(err.error_code(), "tag_event_mismatch");
}

#[test]
fn branch_named_after_condition_token_is_rejected() {
    let mut entity = boss();
    entity.add_loop_state(LoopState::new()).expect("state 0");
    for name in ["query", "skin_id"] {
        let err = entity
            .add_loop_state(LoopState::new().on_entry(["/say hi"]).connects_to(name))
            .unwrap_err();
        assert_eq!(err, BuildError::ReservedBranchName { name: name.into() });
    }
    assert_eq!(entity.current_state(), StateId(1));

    entity
        .add_loop_state(LoopState::new().on_entry(["/say two"]))
        .expect("state 1");
    let docs = entity.build().expect("build");
    let states = &docs.behavior_controllers[0]["animation_controllers"]
        ["controller.animation.boss_timing"]["states"];
    assert_eq!(
        states["state_1"]["transitions"],
        json!([{ "init": "query.skin_id!=1" }])
    );
}
