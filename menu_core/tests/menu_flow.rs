use std::fs;
use std::time::Duration;

use anyhow::Result;
use glam::Vec2;
use menu_core::{
    ActionPress, ControlState, Device, Direction, MenuDocument, MenuSystem, MenuUnit,
    NativeScriptHost, RecordingRenderer, ScreenSettings, ScriptPool, TreeState, UiError, UiEvent,
};
use tempfile::tempdir;

const DOCUMENT: &str = r#"{
    "root_menu": "R",
    "default_menu": "D",
    "menus": [
        {
            "name": "R",
            "controls": [
                {
                    "name": "open",
                    "action": { "action_type": "close" },
                    "sprites": [{ "object": "frame", "size": [120, 40], "scripts": { "trans_out": "slide", "trans_in": "slide" } }]
                }
            ]
        },
        {
            "name": "D",
            "controls": [
                {
                    "name": "row",
                    "navigate": { "down": "close" },
                    "sprites": [{ "object": "panel", "size": [400, 60] }],
                    "sub_controls": {
                        "controls": [
                            { "name": "a", "navigate": { "right": "b" }, "sprites": [{ "object": "cell", "size": [50, 50] }] },
                            { "name": "b", "default_state": "disabled", "navigate": { "right": "c" } },
                            { "name": "c", "navigate": { "left": "a" }, "transform": { "position": [120, 0, 0] }, "sprites": [{ "object": "cell", "size": [50, 50] }] }
                        ]
                    }
                },
                {
                    "name": "close",
                    "action": { "action_type": "close" },
                    "navigate": { "up": "row" },
                    "transform": { "position": [0, -100, 0] },
                    "state_script": { "on_select": "click" },
                    "sprites": [{ "object": "frame", "size": [120, 40], "scripts": { "trans_in": "slide", "trans_out": "slide" } }]
                }
            ]
        }
    ]
}"#;

fn host() -> NativeScriptHost {
    let mut host = NativeScriptHost::new();
    host.register_steps("slide", 3);
    host.register_steps("click", 1);
    host
}

fn system(document: &str) -> Result<MenuSystem> {
    let document = MenuDocument::from_json(document)?;
    let mut system =
        MenuSystem::from_document(&document, ScriptPool::new(host()), ScreenSettings::default())?;
    system.init()?;
    Ok(system)
}

fn run(system: &mut MenuSystem, frames: usize) -> Result<RecordingRenderer> {
    let mut renderer = RecordingRenderer::new();
    for _ in 0..frames {
        renderer.set_frame(system.frame());
        system.frame_step(Duration::from_millis(16), &mut renderer)?;
    }
    Ok(renderer)
}

fn path(system: &MenuSystem) -> Vec<&str> {
    system.tree().path().iter().map(String::as_str).collect()
}

fn state(system: &MenuSystem, menu: &str, control: &str) -> ControlState {
    system
        .menus()
        .get(menu)
        .ok()
        .and_then(|menu| menu.find_control(control))
        .map(|control| control.state())
        .unwrap_or_default()
}

#[test]
fn toggle_from_root_settles_on_root_and_default() -> Result<()> {
    let mut system = system(DOCUMENT)?;
    assert_eq!(path(&system), ["R"]);

    system.post(UiEvent::Toggle);
    run(&mut system, 1)?;
    assert_eq!(system.tree().state(), TreeState::Active);

    run(&mut system, 20)?;
    assert_eq!(path(&system), ["R", "D"]);
    assert_eq!(system.tree().state(), TreeState::Idle);
    assert_eq!(state(&system, "D", "a"), ControlState::Active);
    assert_eq!(state(&system, "D", "row"), ControlState::Active);
    Ok(())
}

#[test]
fn input_is_gated_until_the_transition_finishes() -> Result<()> {
    let mut system = system(DOCUMENT)?;
    system.post(UiEvent::Toggle);
    run(&mut system, 1)?;

    system.post(UiEvent::Toggle);
    system.post(UiEvent::Back);
    run(&mut system, 20)?;
    assert_eq!(path(&system), ["R", "D"]);
    Ok(())
}

#[test]
fn composite_focus_skips_disabled_then_leaves_the_row() -> Result<()> {
    let mut system = system(DOCUMENT)?;
    system.post(UiEvent::Toggle);
    run(&mut system, 20)?;

    system.post(UiEvent::Navigate {
        direction: Direction::Right,
    });
    run(&mut system, 1)?;
    assert_eq!(state(&system, "D", "a"), ControlState::Inactive);
    assert_eq!(state(&system, "D", "b"), ControlState::Disabled);
    assert_eq!(state(&system, "D", "c"), ControlState::Active);

    system.post(UiEvent::Navigate {
        direction: Direction::Down,
    });
    run(&mut system, 1)?;
    assert_eq!(state(&system, "D", "row"), ControlState::Inactive);
    assert_eq!(state(&system, "D", "c"), ControlState::Inactive);
    assert_eq!(state(&system, "D", "close"), ControlState::Active);
    let active = system.active_menu()?.active_control()?.name().to_string();
    assert_eq!(active, "close");
    Ok(())
}

#[test]
fn close_button_returns_to_the_root() -> Result<()> {
    let mut system = system(DOCUMENT)?;
    system.post(UiEvent::Toggle);
    run(&mut system, 20)?;
    system.post(UiEvent::Navigate {
        direction: Direction::Down,
    });
    run(&mut system, 1)?;
    system.post(UiEvent::Select {
        device: Device::Keyboard,
        press: ActionPress::Down,
        position: None,
    });
    run(&mut system, 30)?;

    assert_eq!(path(&system), ["R"]);
    assert_eq!(system.tree().state(), TreeState::Idle);
    assert!(system.context().events.history().contains(&UiEvent::Toggle));
    Ok(())
}

#[test]
fn pointer_focus_does_not_restore_keyboard_focus() -> Result<()> {
    let mut system = system(DOCUMENT)?;
    system.post(UiEvent::PointerMove { x: 0.0, y: 0.0 });
    system.post(UiEvent::Toggle);
    run(&mut system, 20)?;

    assert_eq!(path(&system), ["R", "D"]);
    assert!(!system
        .context()
        .events
        .history()
        .iter()
        .any(|event| matches!(event, UiEvent::SetActiveControl { .. })));
    assert_eq!(state(&system, "D", "row"), ControlState::Inactive);

    let centre = system.context().screen.half() + Vec2::new(0.0, 100.0);
    system.post(UiEvent::PointerMove {
        x: centre.x,
        y: centre.y,
    });
    run(&mut system, 1)?;
    assert_eq!(state(&system, "D", "close"), ControlState::Active);
    Ok(())
}

#[test]
fn script_slots_all_return_once_menus_settle() -> Result<()> {
    let mut system = system(DOCUMENT)?;
    system.post(UiEvent::Toggle);
    run(&mut system, 20)?;
    system.post(UiEvent::Toggle);
    run(&mut system, 20)?;

    let scripts = &system.context().scripts;
    assert!(scripts.context_count() > 0);
    assert_eq!(scripts.free_count(), scripts.context_count());
    assert!(scripts.stats().recycled >= scripts.stats().contexts_created as u64);
    Ok(())
}

#[test]
fn interface_menus_are_drawn_under_the_tree() -> Result<()> {
    let document = r#"{
        "menus": [{ "name": "pause", "controls": [{ "name": "resume", "sprites": [{ "object": "frame", "size": [10, 10] }] }] }],
        "default_menu": "pause",
        "interface": {
            "root_menu": "hud",
            "menus": [{ "name": "hud", "controls": [{ "name": "health", "sprites": [{ "object": "bar", "size": [100, 8] }] }] }]
        }
    }"#;
    let mut system = system(document)?;
    let renderer = run(&mut system, 1)?;
    let frame: Vec<String> = renderer.frame_records(0).into_iter().map(|draw| draw.control).collect();
    assert_eq!(frame, ["health"]);

    system.post(UiEvent::Escape);
    let renderer = run(&mut system, 3)?;
    let last = renderer.frame_records(system.frame() - 1);
    let controls: Vec<&str> = last.iter().map(|draw| draw.control.as_str()).collect();
    assert_eq!(controls, ["health", "resume"]);
    let hud = system.interface_menus().and_then(|menus| menus.get("hud").ok());
    assert_eq!(hud.map(MenuUnit::name), Some("hud"));
    Ok(())
}

#[test]
fn documents_load_from_disk() -> Result<()> {
    let temp = tempdir()?;
    let file = temp.path().join("menus.json");
    fs::write(&file, DOCUMENT)?;
    let document = MenuDocument::load(&file)?;
    assert_eq!(document.tree.menus.len(), 2);

    let missing = MenuDocument::load(&temp.path().join("missing.json"));
    assert!(matches!(missing, Err(UiError::Io(_))));
    Ok(())
}

#[test]
fn dangling_navigation_targets_fail_at_load() -> Result<()> {
    let document = MenuDocument::from_json(
        r#"{ "menus": [{ "name": "m", "controls": [{ "name": "a", "navigate": { "down": "ghost" } }] }] }"#,
    )?;
    let err = MenuSystem::from_document(&document, ScriptPool::new(host()), ScreenSettings::default())
        .expect_err("dangling target");
    match err {
        UiError::UnknownNavTarget { owner, target } => {
            assert_eq!(owner, "m");
            assert_eq!(target, "ghost");
        }
        other => panic!("unexpected error: {other}"),
    }
    Ok(())
}

#[test]
fn missing_menu_targets_fail_at_load() -> Result<()> {
    let document = MenuDocument::from_json(
        r#"{ "menus": [{ "name": "m", "controls": [{ "name": "go", "action": { "action_type": "to_menu", "execution_action": "levelz" } }] }] }"#,
    )?;
    let err = MenuSystem::from_document(&document, ScriptPool::new(host()), ScreenSettings::default())
        .expect_err("missing menu");
    assert!(matches!(err, UiError::UnknownMenu(ref name) if name == "levelz"), "{err}");
    Ok(())
}

#[test]
fn focus_changes_to_unknown_controls_fail_at_load() -> Result<()> {
    let document = MenuDocument::from_json(
        r#"{
            "menus": [{
                "name": "m",
                "controls": [{
                    "name": "row",
                    "sub_controls": {
                        "controls": [{ "name": "a", "action": { "action_type": "change_focus", "execution_action": "ghost" } }]
                    }
                }]
            }]
        }"#,
    )?;
    let err = MenuSystem::from_document(&document, ScriptPool::new(host()), ScreenSettings::default())
        .expect_err("missing control");
    match err {
        UiError::UnknownNavTarget { owner, target } => {
            assert_eq!(owner, "m");
            assert_eq!(target, "ghost");
        }
        other => panic!("unexpected error: {other}"),
    }
    Ok(())
}

#[test]
fn disabled_rows_ignore_a_hovering_pointer() -> Result<()> {
    let document = MenuDocument::from_json(
        r#"{
            "root_menu": "m",
            "menus": [{
                "name": "m",
                "controls": [{
                    "name": "row",
                    "default_state": "disabled",
                    "sprites": [{ "object": "panel", "size": [400, 60] }],
                    "sub_controls": {
                        "controls": [{ "name": "a", "sprites": [{ "object": "cell", "size": [50, 50] }] }]
                    }
                }]
            }]
        }"#,
    )?;
    let mut system =
        MenuSystem::from_document(&document, ScriptPool::new(host()), ScreenSettings::default())?;
    system.init()?;

    let centre = system.context().screen.half();
    system.post(UiEvent::PointerMove {
        x: centre.x,
        y: centre.y,
    });
    system.pump()?;

    let menu = system.active_menu()?;
    let row = menu.find_control("row").expect("row");
    assert_eq!(row.state(), ControlState::Disabled);
    assert_eq!(menu.find_control("a").expect("a").state(), ControlState::Inactive);
    Ok(())
}
