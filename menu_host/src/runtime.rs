use std::{collections::VecDeque, fs, path::Path, time::Duration};

use anyhow::{Context, Result};
use menu_core::script::PoolStats;
use menu_core::{
    DrawRecord, LuaScriptHost, MenuDocument, MenuSystem, RecordingRenderer, ScreenSettings,
    ScriptPool, TreeState, UiEvent,
};
use serde::Serialize;

use crate::cli::RunArgs;
use crate::input_script::InputScript;

#[derive(Serialize)]
struct EventLog<'a> {
    frames: u64,
    events: &'a VecDeque<UiEvent>,
}

#[derive(Serialize)]
struct DrawLog {
    frames: u64,
    draws: Vec<DrawRecord>,
}

#[derive(Debug, Serialize)]
pub struct RunSummary {
    pub frames: u64,
    pub path: Vec<String>,
    pub settled: bool,
    pub quit: bool,
    pub scripts: PoolStats,
}

pub fn execute(args: RunArgs) -> Result<()> {
    let document = MenuDocument::load(&args.document)
        .with_context(|| format!("loading menu document {}", args.document.display()))?;

    let host = LuaScriptHost::new().context("starting Lua script host")?;
    if let Some(path) = args.scripts.as_ref() {
        host.load_file(path)
            .with_context(|| format!("loading menu scripts {}", path.display()))?;
    }

    let input = match args.input.as_ref() {
        Some(path) => InputScript::load(path)?,
        None => InputScript::default(),
    };
    if let Some(last) = input.last_frame() {
        if last >= args.frames {
            log::warn!(
                "input script runs to frame {last} but only {} frames will run",
                args.frames
            );
        }
    }

    let screen = ScreenSettings::new(args.width as f32, args.height as f32);
    let mut system = MenuSystem::from_document(&document, ScriptPool::new(host), screen)
        .context("building menus from document")?;
    // The event log needs every delivery; otherwise history is not kept.
    let history_limit = if args.event_log_json.is_some() { usize::MAX } else { 0 };
    system.context_mut().events.set_history_limit(history_limit);
    system.init().context("initialising menu trees")?;

    let mut renderer = RecordingRenderer::new();
    let summary = run_frames(&mut system, &input, &mut renderer, &args)?;

    println!("menu path: [{}]", summary.path.join(", "));
    if !summary.settled {
        println!("transition still in flight after {} frames", summary.frames);
    }
    if summary.quit {
        println!("quit requested after {} frames", summary.frames);
    }
    if args.verbose {
        let json =
            serde_json::to_string_pretty(&summary).context("serializing run summary to JSON")?;
        println!("{json}");
    }

    if let Some(path) = args.event_log_json.as_ref() {
        let log = EventLog {
            frames: summary.frames,
            events: system.context().events.history(),
        };
        write_json(path, &log, "event log")?;
    }
    if let Some(path) = args.draw_log_json.as_ref() {
        let log = DrawLog {
            frames: summary.frames,
            draws: renderer.records(),
        };
        write_json(path, &log, "draw log")?;
    }
    Ok(())
}

fn run_frames(
    system: &mut MenuSystem,
    input: &InputScript,
    renderer: &mut RecordingRenderer,
    args: &RunArgs,
) -> Result<RunSummary> {
    let dt = Duration::from_millis(args.frame_ms);
    let mut last_path = system.tree().path().to_vec();
    let mut frames = 0;
    let mut quit = false;

    while frames < args.frames && !quit {
        for action in input.at(frames) {
            action.apply(system);
        }
        renderer.set_frame(frames);
        system
            .frame_step(dt, renderer)
            .with_context(|| format!("running frame {frames}"))?;
        frames += 1;

        if args.verbose && system.tree().path() != last_path.as_slice() {
            last_path = system.tree().path().to_vec();
            println!("frame {frames}: [{}]", last_path.join(", "));
        }
        quit = system.quit_requested();
    }

    Ok(RunSummary {
        frames,
        path: system.tree().path().to_vec(),
        settled: system.tree().state() == TreeState::Idle,
        quit,
        scripts: system.context().scripts.stats(),
    })
}

fn write_json<T: Serialize>(path: &Path, value: &T, what: &str) -> Result<()> {
    let json = serde_json::to_string_pretty(value)
        .with_context(|| format!("serializing {what} to JSON"))?;
    fs::write(path, &json).with_context(|| format!("writing {what} to {}", path.display()))?;
    println!("Saved {what} to {}", path.display());
    Ok(())
}
