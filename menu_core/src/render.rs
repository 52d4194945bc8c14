use std::{cell::RefCell, rc::Rc};

use glam::Mat4;
use serde::Serialize;

/// One sprite draw as issued by a control.
#[derive(Debug, Clone, Copy)]
pub struct DrawCommand<'a> {
    pub control: &'a str,
    pub object: &'a str,
    pub text: Option<&'a str>,
    pub matrix: &'a Mat4,
}

/// Rendering collaborator. Receives draws in back-to-front order.
pub trait RenderTarget {
    fn draw(&mut self, command: DrawCommand<'_>);
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DrawRecord {
    pub frame: u64,
    pub control: String,
    pub object: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    pub position: [f32; 3],
}

/// Render target that keeps every draw for later inspection.
#[derive(Clone, Default)]
pub struct RecordingRenderer {
    frame: u64,
    records: Rc<RefCell<Vec<DrawRecord>>>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_frame(&mut self, frame: u64) {
        self.frame = frame;
    }

    pub fn records(&self) -> Vec<DrawRecord> {
        self.records.borrow().clone()
    }

    pub fn frame_records(&self, frame: u64) -> Vec<DrawRecord> {
        self.records
            .borrow()
            .iter()
            .filter(|record| record.frame == frame)
            .cloned()
            .collect()
    }
}

impl RenderTarget for RecordingRenderer {
    fn draw(&mut self, command: DrawCommand<'_>) {
        let translation = command.matrix.w_axis.truncate();
        self.records.borrow_mut().push(DrawRecord {
            frame: self.frame,
            control: command.control.to_string(),
            object: command.object.to_string(),
            text: command.text.map(|value| value.to_string()),
            position: translation.to_array(),
        });
    }
}
