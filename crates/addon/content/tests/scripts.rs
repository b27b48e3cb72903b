use addon_content::{ConfigLoader, ScriptLoader};
use serde_json::json;

const BOSS: &str = r#"
EntityScript(
    namespace: "dev",
    name: "Boss",
    options: (
        hp: Some(200),
        has_graphics: true,
        collision: (1.5, 3.0),
        spawn_groups: ["state_0"],
    ),
    bancos: [(name: "timing")],
    rancos: [(name: "anim")],
    properties: [(
        identifier: "phase",
        kind: Range(min: 0, max: 2),
        default: 0,
        client_sync: true,
    )],
    states: [
        (timer: Some(3.0), animation: Some("animation.boss.idle")),
        (
            timer: Some(1.0),
            timer_state: Some("hurt"),
            entry_commands: Some(["/say Stomp"]),
        ),
        (
            name: Some("hurt"),
            timer: Some(2.0),
            animation: Some("animation.boss.hurt"),
            end_anim_with_state: false,
            set_properties: Some([("phase", Int(1))]),
            last_state: true,
        ),
    ],
)
"#;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter("addon_core=debug,addon_content=debug")
        .try_init();
}

#[test]
fn boss_script_builds_complete_documents() {
    init_tracing();
    let mut entity = ScriptLoader::parse(BOSS).expect("valid script");
    let docs = entity.build().expect("build");

    let entity_json = &docs.behavior["minecraft:entity"];
    assert_eq!(entity_json["description"]["identifier"], json!("dev:boss"));
    assert_eq!(
        entity_json["description"]["properties"]["property:phase"],
        json!({ "range": [0, 2], "default": 0, "type": "int", "client_sync": true })
    );
    assert_eq!(
        entity_json["components"]["minecraft:collision_box"],
        json!({ "width": 1.5, "height": 3.0 })
    );

    let events = &entity_json["events"];
    assert_eq!(
        events["state_2"],
        json!({
            "add": { "component_groups": ["state_2"] },
            "remove": { "component_groups": ["state_1"] },
            "set_property": { "property:phase": 1 }
        })
    );
    assert_eq!(
        events["state_0"]["remove"],
        json!({ "component_groups": ["state_2"] })
    );
    assert_eq!(
        entity_json["component_groups"]["state_1"]["minecraft:timer"]["time_down_event"],
        json!({ "event": "state_2" })
    );
    assert_eq!(
        events["minecraft:entity_spawned"],
        json!({ "add": { "component_groups": ["state_0"] } })
    );

    let ranco = &docs.render_controllers[0]["animation_controllers"]
        ["controller.animation.boss_anim"];
    assert_eq!(ranco["initial_state"], json!("init"));
    assert_eq!(
        ranco["states"]["init"]["transitions"],
        json!([
            { "state_0": "query.skin_id==0" },
            { "state_2": "query.skin_id==2" }
        ])
    );
    assert_eq!(
        ranco["states"]["state_2"]["transitions"],
        json!([{ "init": "query.all_animations_finished" }])
    );

    let resource = docs.resource.expect("graphics");
    assert_eq!(
        resource["minecraft:client_entity"]["description"]["scripts"]["animate"],
        json!(["controller.animation.boss_anim"])
    );
}

#[test]
fn config_overrides_format_versions() {
    let config = ConfigLoader::parse(
        r#"
        behavior_format_version = "1.20.0"
        controller_format_version = "1.12.0"
        "#,
    )
    .expect("valid TOML");

    let mut entity = ScriptLoader::parse(r#"EntityScript(namespace: "dev", name: "Dummy")"#)
        .expect("valid script");
    entity.config = config;
    entity.create_banco("timing", None);

    let docs = entity.build().expect("build");
    assert_eq!(docs.behavior["format_version"], json!("1.20.0"));
    assert_eq!(docs.behavior_controllers[0]["format_version"], json!("1.12.0"));
}

#[test]
fn unresolved_script_branch_fails_at_build() {
    let mut entity = ScriptLoader::parse(
        r#"EntityScript(
            namespace: "dev",
            name: "Dummy",
            states: [(timer: Some(1.0), timer_state: Some("nowhere"))],
        )"#,
    )
    .expect("parses without resolving");
    let err = entity.build().unwrap_err();
    assert_eq!(err.to_string(), r#"branch `nowhere` was connected from ["state_0"] but never given a target state"#);
}
