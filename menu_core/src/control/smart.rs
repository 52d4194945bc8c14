use super::ControlInfo;
use crate::events::{EventQueue, UiEvent};

/// Behaviour attached to a single control at runtime (a settings slider, a
/// save-slot list). Every hook is optional.
pub trait SmartGui {
    /// Called once when the behaviour is attached.
    fn create(&mut self, _control: &ControlInfo) {}

    /// Called when the owning menu starts transitioning in.
    fn display(&mut self, _control: &ControlInfo, _events: &mut EventQueue) {}

    /// Called after the control's action message has been dispatched.
    fn execute(&mut self, _control: &ControlInfo, _events: &mut EventQueue) {}

    fn handle_event(&mut self, _event: &UiEvent, _control: &ControlInfo, _events: &mut EventQueue) {}
}

/// Callback attached with `Control::connect_execution_action`.
pub type ExecutionCallback = Box<dyn FnMut(&ControlInfo)>;
