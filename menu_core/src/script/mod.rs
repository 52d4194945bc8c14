//! Cooperative script execution.
//!
//! A [`ScriptHost`] resolves function names into resumable [`ScriptTask`]s.
//! The [`ScriptPool`] owns the execution slots those tasks run in and lends
//! them out by [`SlotHandle`]; a [`ScriptComponent`] is the per-owner list of
//! slots that are still running. Tasks only make progress when the owner's
//! component is updated, once per frame.

mod lua;
mod native;
mod pool;

use std::cell::RefCell;
use std::rc::Rc;

use thiserror::Error;

pub use lua::LuaScriptHost;
pub use native::{CallLog, NativeScriptHost, StepTask};
pub use pool::{PoolStats, ScriptComponent, ScriptPool, SlotHandle, SlotStatus};

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("script function does not exist ({0})")]
    UnknownFunction(String),
    #[error("error preparing script {function}: {message}")]
    Bind { function: String, message: String },
    #[error("error executing script {label}: {message}")]
    Runtime { label: String, message: String },
    #[error("error loading script chunk {name}: {message}")]
    Load { name: String, message: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum ScriptArg {
    Nil,
    Bool(bool),
    Int(i64),
    Number(f64),
    Str(String),
}

impl From<&str> for ScriptArg {
    fn from(value: &str) -> Self {
        ScriptArg::Str(value.to_string())
    }
}

impl From<i64> for ScriptArg {
    fn from(value: i64) -> Self {
        ScriptArg::Int(value)
    }
}

/// Message raised from script code through `DispatchEvent`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptMessage {
    pub kind: String,
    pub code: i32,
}

/// Shared sink scripts dispatch into; drained by the pool after each resume.
#[derive(Debug, Clone, Default)]
pub struct ScriptOutbox {
    messages: Rc<RefCell<Vec<ScriptMessage>>>,
}

impl ScriptOutbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dispatch(&self, kind: impl Into<String>, code: i32) {
        self.messages.borrow_mut().push(ScriptMessage {
            kind: kind.into(),
            code,
        });
    }

    pub fn drain(&self) -> Vec<ScriptMessage> {
        std::mem::take(&mut *self.messages.borrow_mut())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskPoll {
    /// The task yielded and wants to be resumed on a later frame.
    Suspended,
    Done,
}

pub trait ScriptTask {
    fn resume(&mut self) -> Result<TaskPoll, ScriptError>;
    fn abort(&mut self);
}

pub trait ScriptHost {
    fn has_function(&self, name: &str) -> bool;
    fn bind(&mut self, function: &str, args: &[ScriptArg])
        -> Result<Box<dyn ScriptTask>, ScriptError>;
    fn take_dispatched(&mut self) -> Vec<ScriptMessage>;
}
