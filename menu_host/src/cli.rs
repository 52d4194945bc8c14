use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(about = "Headless host that drives a menu document frame by frame", version)]
pub struct Args {
    /// Path to the JSON menu document
    #[arg(long)]
    pub document: PathBuf,

    /// Lua file defining the functions the document's scripts refer to
    #[arg(long)]
    pub scripts: Option<PathBuf>,

    /// JSON input script listing the events to post on each frame
    #[arg(long)]
    pub input: Option<PathBuf>,

    /// Number of frames to run (stops early on a quit request)
    #[arg(long, default_value_t = 120)]
    pub frames: u64,

    /// Simulated frame length in milliseconds
    #[arg(long, default_value_t = 16)]
    pub frame_ms: u64,

    /// Screen width used for pointer hit-testing
    #[arg(long, default_value_t = 1280)]
    pub width: u32,

    /// Screen height used for pointer hit-testing
    #[arg(long, default_value_t = 720)]
    pub height: u32,

    /// Path to write every delivered bus event as JSON
    #[arg(long)]
    pub event_log_json: Option<PathBuf>,

    /// Path to write the per-frame draw log as JSON
    #[arg(long)]
    pub draw_log_json: Option<PathBuf>,

    /// Print the menu path whenever it changes and the script pool counters
    #[arg(long)]
    pub verbose: bool,
}

#[derive(Debug)]
pub struct RunArgs {
    pub document: PathBuf,
    pub scripts: Option<PathBuf>,
    pub input: Option<PathBuf>,
    pub frames: u64,
    pub frame_ms: u64,
    pub width: u32,
    pub height: u32,
    pub event_log_json: Option<PathBuf>,
    pub draw_log_json: Option<PathBuf>,
    pub verbose: bool,
}

pub fn parse() -> Result<RunArgs> {
    Args::parse().into_run_args()
}

impl Args {
    fn into_run_args(self) -> Result<RunArgs> {
        if self.width == 0 || self.height == 0 {
            bail!("--width and --height must be non-zero");
        }
        if self.frame_ms == 0 {
            bail!("--frame-ms must be non-zero");
        }

        Ok(RunArgs {
            document: self.document,
            scripts: self.scripts,
            input: self.input,
            frames: self.frames,
            frame_ms: self.frame_ms,
            width: self.width,
            height: self.height,
            event_log_json: self.event_log_json,
            draw_log_json: self.draw_log_json,
            verbose: self.verbose,
        })
    }
}
