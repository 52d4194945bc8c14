use std::path::Path;
use std::rc::Rc;

use mlua::{
    Error as LuaError, Function, IntoLua, Lua, LuaOptions, MultiValue, RegistryKey,
    Result as LuaResult, StdLib, Thread, ThreadStatus, Value, Variadic,
};

use super::{ScriptArg, ScriptError, ScriptHost, ScriptMessage, ScriptOutbox, ScriptTask, TaskPoll};

/// Lua 5.1 script host. Every bound function runs in its own coroutine so
/// scripts can call `Suspend()` to wait for the next frame.
pub struct LuaScriptHost {
    lua: Rc<Lua>,
    outbox: ScriptOutbox,
}

impl LuaScriptHost {
    pub fn new() -> Result<Self, ScriptError> {
        let lua = Lua::new_with(StdLib::ALL_SAFE, LuaOptions::default())
            .map_err(|err| load_error("<init>", err))?;
        let outbox = ScriptOutbox::new();
        install_globals(&lua, &outbox).map_err(|err| load_error("<globals>", err))?;
        Ok(Self {
            lua: Rc::new(lua),
            outbox,
        })
    }

    pub fn load_chunk(&self, name: &str, source: &str) -> Result<(), ScriptError> {
        self.lua
            .load(source)
            .set_name(name)
            .exec()
            .map_err(|err| load_error(name, err))
    }

    pub fn load_file(&self, path: &Path) -> Result<(), ScriptError> {
        let name = path.display().to_string();
        let source = std::fs::read_to_string(path).map_err(|err| ScriptError::Load {
            name: name.clone(),
            message: err.to_string(),
        })?;
        self.load_chunk(&name, &source)
    }

    pub fn lua(&self) -> &Lua {
        &self.lua
    }
}

impl ScriptHost for LuaScriptHost {
    fn has_function(&self, name: &str) -> bool {
        matches!(
            self.lua.globals().get::<_, Value>(name),
            Ok(Value::Function(_))
        )
    }

    fn bind(
        &mut self,
        function: &str,
        args: &[ScriptArg],
    ) -> Result<Box<dyn ScriptTask>, ScriptError> {
        let callable = match self.lua.globals().get::<_, Value>(function) {
            Ok(Value::Function(callable)) => callable,
            _ => return Err(ScriptError::UnknownFunction(function.to_string())),
        };
        let bind_error = |err: LuaError| ScriptError::Bind {
            function: function.to_string(),
            message: err.to_string(),
        };
        let thread = self.lua.create_thread(callable).map_err(bind_error)?;
        let key = self.lua.create_registry_value(thread).map_err(bind_error)?;
        Ok(Box::new(LuaTask {
            lua: Rc::clone(&self.lua),
            label: function.to_string(),
            thread: Some(key),
            args: Some(args.to_vec()),
        }))
    }

    fn take_dispatched(&mut self) -> Vec<ScriptMessage> {
        self.outbox.drain()
    }
}

struct LuaTask {
    lua: Rc<Lua>,
    label: String,
    thread: Option<RegistryKey>,
    /// Arguments for the first resume only.
    args: Option<Vec<ScriptArg>>,
}

impl LuaTask {
    fn release(&mut self) {
        if let Some(key) = self.thread.take() {
            if let Err(err) = self.lua.remove_registry_value(key) {
                log::warn!("failed to release coroutine for {}: {err}", self.label);
            }
        }
    }

    fn runtime_error(&self, err: LuaError) -> ScriptError {
        ScriptError::Runtime {
            label: self.label.clone(),
            message: err.to_string(),
        }
    }
}

impl ScriptTask for LuaTask {
    fn resume(&mut self) -> Result<TaskPoll, ScriptError> {
        let lua = Rc::clone(&self.lua);
        let thread = match self.thread.as_ref() {
            Some(key) => lua
                .registry_value::<Thread>(key)
                .map_err(|err| self.runtime_error(err))?,
            None => return Ok(TaskPoll::Done),
        };

        if !matches!(thread.status(), ThreadStatus::Resumable) {
            self.release();
            return Ok(TaskPoll::Done);
        }

        let args = match self.args.take() {
            Some(args) => args
                .iter()
                .map(|arg| to_value(&lua, arg))
                .collect::<LuaResult<Vec<_>>>()
                .map_err(|err| self.runtime_error(err))?,
            None => Vec::new(),
        };

        let outcome = thread
            .resume::<_, MultiValue>(MultiValue::from_vec(args))
            .map(|_| thread.status());
        drop(thread);

        match outcome {
            Ok(ThreadStatus::Resumable) => Ok(TaskPoll::Suspended),
            Ok(ThreadStatus::Unresumable | ThreadStatus::Error)
            | Err(LuaError::CoroutineInactive) => {
                self.release();
                Ok(TaskPoll::Done)
            }
            Err(err) => {
                self.release();
                Err(self.runtime_error(err))
            }
        }
    }

    fn abort(&mut self) {
        log::debug!("aborting suspended script {}", self.label);
        self.args = None;
        self.release();
    }
}

impl Drop for LuaTask {
    fn drop(&mut self) {
        self.release();
    }
}

fn install_globals(lua: &Lua, outbox: &ScriptOutbox) -> LuaResult<()> {
    let globals = lua.globals();

    let suspend = lua
        .load("return function(...) return coroutine.yield(...) end")
        .eval::<Function>()?;
    globals.set("Suspend", suspend)?;

    let dispatch_outbox = outbox.clone();
    globals.set(
        "DispatchEvent",
        lua.create_function(move |_, (kind, code): (String, Option<i32>)| {
            dispatch_outbox.dispatch(kind, code.unwrap_or(0));
            Ok(())
        })?,
    )?;

    globals.set(
        "Print",
        lua.create_function(|_, args: Variadic<Value>| {
            let line = args
                .iter()
                .map(describe_value)
                .collect::<Vec<_>>()
                .join(" ");
            log::info!(target: "menu_core::script", "{line}");
            Ok(())
        })?,
    )?;
    Ok(())
}

fn to_value<'lua>(lua: &'lua Lua, arg: &ScriptArg) -> LuaResult<Value<'lua>> {
    match arg {
        ScriptArg::Nil => Ok(Value::Nil),
        ScriptArg::Bool(value) => Ok(Value::Boolean(*value)),
        ScriptArg::Int(value) => (*value).into_lua(lua),
        ScriptArg::Number(value) => Ok(Value::Number(*value)),
        ScriptArg::Str(value) => Ok(Value::String(lua.create_string(value)?)),
    }
}

fn describe_value(value: &Value) -> String {
    match value {
        Value::Nil => "nil".to_string(),
        Value::Boolean(flag) => flag.to_string(),
        Value::Integer(number) => number.to_string(),
        Value::Number(number) => number.to_string(),
        Value::String(text) => text.to_string_lossy().into_owned(),
        other => format!("<{}>", other.type_name()),
    }
}

fn load_error(name: &str, err: LuaError) -> ScriptError {
    ScriptError::Load {
        name: name.to_string(),
        message: err.to_string(),
    }
}
