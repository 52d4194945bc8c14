use thiserror::Error;

use crate::script::ScriptError;

#[derive(Debug, Error)]
pub enum UiError {
    #[error("menu does not exist ({0})")]
    UnknownMenu(String),
    #[error("duplicate menu name ({0})")]
    DuplicateMenu(String),
    #[error("control node doesn't exist ({target}) referenced by {owner}")]
    UnknownNavTarget { owner: String, target: String },
    #[error("script function does not exist ({function}) referenced by {owner}")]
    UnknownScriptFunction { owner: String, function: String },
    #[error("there is no active menu")]
    NoActiveMenu,
    #[error("there is no active control in menu {0}")]
    NoActiveControl(String),
    #[error("event queue exceeded {0} deliveries in a single pump")]
    EventOverflow(usize),
    #[error("script error: {0}")]
    Script(#[from] ScriptError),
    #[error("menu document error: {0}")]
    Document(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
