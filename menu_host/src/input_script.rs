use std::{fs, path::Path};

use anyhow::{Context, Result};
use menu_core::{Direction, MenuSystem, UiEvent};
use serde::Deserialize;

/// Scripted input for a headless run, ordered by frame.
#[derive(Debug, Default, Deserialize)]
pub struct InputScript {
    #[serde(default)]
    pub steps: Vec<InputStep>,
}

#[derive(Debug, Deserialize)]
pub struct InputStep {
    pub frame: u64,
    #[serde(flatten)]
    pub action: InputAction,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "input", rename_all = "snake_case")]
pub enum InputAction {
    Event { event: UiEvent },
    Hold { direction: Direction },
    Release { direction: Direction },
}

impl InputScript {
    pub fn from_json(text: &str) -> Result<Self> {
        let mut script: Self = serde_json::from_str(text).context("parsing input script")?;
        script.steps.sort_by_key(|step| step.frame);
        Ok(script)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading input script {}", path.display()))?;
        Self::from_json(&text)
    }

    pub fn at(&self, frame: u64) -> impl Iterator<Item = &InputAction> {
        self.steps
            .iter()
            .filter(move |step| step.frame == frame)
            .map(|step| &step.action)
    }

    pub fn last_frame(&self) -> Option<u64> {
        self.steps.last().map(|step| step.frame)
    }
}

impl InputAction {
    pub fn apply(&self, system: &mut MenuSystem) {
        match self {
            InputAction::Event { event } => system.post(event.clone()),
            InputAction::Hold { direction } => system.hold(*direction),
            InputAction::Release { direction } => system.release(*direction),
        }
    }
}
