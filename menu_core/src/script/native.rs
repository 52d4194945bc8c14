use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use super::{ScriptArg, ScriptError, ScriptHost, ScriptMessage, ScriptOutbox, ScriptTask, TaskPoll};

type TaskFactory = Box<dyn Fn(&[ScriptArg], &ScriptOutbox) -> Box<dyn ScriptTask>>;

/// Record of every function bound through a [`NativeScriptHost`], shared so
/// callers can inspect it after the host moves into a pool.
#[derive(Debug, Clone, Default)]
pub struct CallLog {
    calls: Rc<RefCell<Vec<(String, Vec<ScriptArg>)>>>,
}

impl CallLog {
    pub fn calls(&self) -> Vec<(String, Vec<ScriptArg>)> {
        self.calls.borrow().clone()
    }

    pub fn functions(&self) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .map(|(name, _)| name.clone())
            .collect()
    }

    fn record(&self, function: &str, args: &[ScriptArg]) {
        self.calls
            .borrow_mut()
            .push((function.to_string(), args.to_vec()));
    }
}

/// Script host backed by Rust closures.
#[derive(Default)]
pub struct NativeScriptHost {
    factories: BTreeMap<String, TaskFactory>,
    outbox: ScriptOutbox,
    log: CallLog,
}

impl NativeScriptHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<F>(&mut self, name: &str, factory: F)
    where
        F: Fn(&[ScriptArg], &ScriptOutbox) -> Box<dyn ScriptTask> + 'static,
    {
        self.factories.insert(name.to_string(), Box::new(factory));
    }

    /// A function that yields `steps` times before finishing.
    pub fn register_steps(&mut self, name: &str, steps: usize) {
        let label = name.to_string();
        self.register(name, move |_, outbox| {
            Box::new(StepTask::new(&label, steps, outbox.clone()))
        });
    }

    /// Like [`register_steps`](Self::register_steps) but raises
    /// `DispatchEvent(kind, code)` as it finishes.
    pub fn register_dispatch(&mut self, name: &str, steps: usize, kind: &str, code: i32) {
        let label = name.to_string();
        let message = ScriptMessage {
            kind: kind.to_string(),
            code,
        };
        self.register(name, move |_, outbox| {
            Box::new(StepTask::new(&label, steps, outbox.clone()).finishing_with(message.clone()))
        });
    }

    pub fn register_failing(&mut self, name: &str, message: &str) {
        let label = name.to_string();
        let message = message.to_string();
        self.register(name, move |_, _| {
            Box::new(FailingTask {
                label: label.clone(),
                message: message.clone(),
            })
        });
    }

    pub fn call_log(&self) -> CallLog {
        self.log.clone()
    }

    pub fn outbox(&self) -> ScriptOutbox {
        self.outbox.clone()
    }
}

impl ScriptHost for NativeScriptHost {
    fn has_function(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    fn bind(
        &mut self,
        function: &str,
        args: &[ScriptArg],
    ) -> Result<Box<dyn ScriptTask>, ScriptError> {
        let factory = self
            .factories
            .get(function)
            .ok_or_else(|| ScriptError::UnknownFunction(function.to_string()))?;
        self.log.record(function, args);
        Ok(factory(args, &self.outbox))
    }

    fn take_dispatched(&mut self) -> Vec<ScriptMessage> {
        self.outbox.drain()
    }
}

/// Task that suspends a fixed number of times.
pub struct StepTask {
    label: String,
    remaining: usize,
    outbox: ScriptOutbox,
    on_finish: Option<ScriptMessage>,
}

impl StepTask {
    pub fn new(label: &str, steps: usize, outbox: ScriptOutbox) -> Self {
        Self {
            label: label.to_string(),
            remaining: steps,
            outbox,
            on_finish: None,
        }
    }

    pub fn finishing_with(mut self, message: ScriptMessage) -> Self {
        self.on_finish = Some(message);
        self
    }
}

impl ScriptTask for StepTask {
    fn resume(&mut self) -> Result<TaskPoll, ScriptError> {
        if self.remaining > 0 {
            self.remaining -= 1;
            return Ok(TaskPoll::Suspended);
        }
        if let Some(message) = self.on_finish.take() {
            self.outbox.dispatch(message.kind, message.code);
        }
        Ok(TaskPoll::Done)
    }

    fn abort(&mut self) {
        log::debug!("aborting {} with {} steps left", self.label, self.remaining);
        self.remaining = 0;
        self.on_finish = None;
    }
}

struct FailingTask {
    label: String,
    message: String,
}

impl ScriptTask for FailingTask {
    fn resume(&mut self) -> Result<TaskPoll, ScriptError> {
        Err(ScriptError::Runtime {
            label: self.label.clone(),
            message: self.message.clone(),
        })
    }

    fn abort(&mut self) {}
}
