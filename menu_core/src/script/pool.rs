use serde::Serialize;

use super::{ScriptArg, ScriptError, ScriptHost, ScriptTask, TaskPoll};
use crate::events::{EventQueue, UiEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotHandle(usize);

impl SlotHandle {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotStatus {
    /// Parked on the pool free-list.
    Idle,
    Prepared,
    Suspended,
    Finished,
}

struct ScriptSlot {
    status: SlotStatus,
    label: String,
    task: Option<Box<dyn ScriptTask>>,
}

impl ScriptSlot {
    fn idle() -> Self {
        Self {
            status: SlotStatus::Idle,
            label: String::new(),
            task: None,
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PoolStats {
    pub contexts_created: usize,
    pub resumes: u64,
    pub recycled: u64,
    pub aborted: u64,
}

/// Owns every execution slot. Slots are either on the free-list or on exactly
/// one [`ScriptComponent`]'s pending list.
pub struct ScriptPool {
    host: Box<dyn ScriptHost>,
    slots: Vec<ScriptSlot>,
    free: Vec<SlotHandle>,
    stats: PoolStats,
}

impl std::fmt::Debug for ScriptPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScriptPool")
            .field("contexts", &self.slots.len())
            .field("free", &self.free.len())
            .field("stats", &self.stats)
            .finish()
    }
}

impl ScriptPool {
    pub fn new<H: ScriptHost + 'static>(host: H) -> Self {
        Self::with_host(Box::new(host))
    }

    pub fn with_host(host: Box<dyn ScriptHost>) -> Self {
        Self {
            host,
            slots: Vec::new(),
            free: Vec::new(),
            stats: PoolStats::default(),
        }
    }

    pub fn has_function(&self, name: &str) -> bool {
        self.host.has_function(name)
    }

    pub fn host_mut(&mut self) -> &mut dyn ScriptHost {
        self.host.as_mut()
    }

    /// Binds `function` before taking a slot so a failed bind never strands
    /// a context outside the free-list.
    pub fn prepare(
        &mut self,
        function: &str,
        args: &[ScriptArg],
    ) -> Result<SlotHandle, ScriptError> {
        let task = self.host.bind(function, args)?;
        let handle = match self.free.pop() {
            Some(handle) => handle,
            None => {
                self.slots.push(ScriptSlot::idle());
                self.stats.contexts_created += 1;
                log::debug!(
                    "script pool grew to {} contexts for {function}",
                    self.slots.len()
                );
                SlotHandle(self.slots.len() - 1)
            }
        };
        let slot = &mut self.slots[handle.0];
        slot.status = SlotStatus::Prepared;
        slot.label = function.to_string();
        slot.task = Some(task);
        Ok(handle)
    }

    pub fn resume(
        &mut self,
        handle: SlotHandle,
        events: &mut EventQueue,
    ) -> Result<SlotStatus, ScriptError> {
        let slot = &mut self.slots[handle.0];
        if !matches!(slot.status, SlotStatus::Prepared | SlotStatus::Suspended) {
            return Ok(slot.status);
        }
        let result = match slot.task.as_mut() {
            Some(task) => task.resume(),
            None => Ok(TaskPoll::Done),
        };
        self.stats.resumes += 1;

        for message in self.host.take_dispatched() {
            events.dispatch(UiEvent::from_script(&message.kind, message.code));
        }

        let slot = &mut self.slots[handle.0];
        match result {
            Ok(TaskPoll::Suspended) => {
                slot.status = SlotStatus::Suspended;
                Ok(SlotStatus::Suspended)
            }
            Ok(TaskPoll::Done) => {
                slot.status = SlotStatus::Finished;
                slot.task = None;
                Ok(SlotStatus::Finished)
            }
            Err(err) => {
                log::error!("script {} failed: {err}", slot.label);
                slot.status = SlotStatus::Finished;
                slot.task = None;
                Err(err)
            }
        }
    }

    /// Returns a slot to the free-list, aborting it first if it is parked
    /// mid-execution.
    pub fn recycle(&mut self, handle: SlotHandle) {
        let slot = &mut self.slots[handle.0];
        if slot.status == SlotStatus::Idle {
            log::warn!("script slot #{} recycled twice", handle.0);
            return;
        }
        if slot.status == SlotStatus::Suspended {
            if let Some(task) = slot.task.as_mut() {
                task.abort();
            }
            self.stats.aborted += 1;
        }
        slot.task = None;
        slot.status = SlotStatus::Idle;
        slot.label.clear();
        self.free.push(handle);
        self.stats.recycled += 1;
    }

    pub fn status(&self, handle: SlotHandle) -> SlotStatus {
        self.slots[handle.0].status
    }

    pub fn label(&self, handle: SlotHandle) -> Option<&str> {
        let slot = self.slots.get(handle.0)?;
        (slot.status != SlotStatus::Idle).then_some(slot.label.as_str())
    }

    pub fn free_count(&self) -> usize {
        self.free.len()
    }

    pub fn context_count(&self) -> usize {
        self.slots.len()
    }

    pub fn stats(&self) -> PoolStats {
        self.stats
    }
}

/// Slots borrowed from the pool by one owner (a control or a sprite).
#[derive(Debug, Default)]
pub struct ScriptComponent {
    pending: Vec<SlotHandle>,
}

impl ScriptComponent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn prepare(
        &mut self,
        pool: &mut ScriptPool,
        function: &str,
        args: &[ScriptArg],
    ) -> Result<(), ScriptError> {
        let handle = pool.prepare(function, args)?;
        self.pending.push(handle);
        Ok(())
    }

    /// Resumes every prepared or suspended slot once. Finished slots go back
    /// to the pool; a failing script is recycled and its error returned.
    pub fn update(
        &mut self,
        pool: &mut ScriptPool,
        events: &mut EventQueue,
    ) -> Result<(), ScriptError> {
        let mut index = 0;
        while index < self.pending.len() {
            let handle = self.pending[index];
            match pool.resume(handle, events) {
                Ok(SlotStatus::Suspended) => index += 1,
                Ok(_) => {
                    pool.recycle(handle);
                    self.pending.remove(index);
                }
                Err(err) => {
                    pool.recycle(handle);
                    self.pending.remove(index);
                    return Err(err);
                }
            }
        }
        Ok(())
    }

    pub fn reset_and_recycle(&mut self, pool: &mut ScriptPool) {
        for handle in self.pending.drain(..) {
            pool.recycle(handle);
        }
    }

    pub fn is_active(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn pending(&self) -> &[SlotHandle] {
        &self.pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::NativeScriptHost;

    fn pool() -> ScriptPool {
        let mut host = NativeScriptHost::new();
        host.register_steps("fade", 2);
        host.register_steps("blink", 0);
        host.register_failing("broken", "boom");
        ScriptPool::new(host)
    }

    #[test]
    fn finished_slots_return_to_the_pool() {
        let mut pool = pool();
        let mut events = EventQueue::new();
        let mut component = ScriptComponent::new();

        component.prepare(&mut pool, "blink", &[]).expect("prepare");
        assert_eq!(pool.context_count(), 1);
        assert_eq!(pool.status(component.pending()[0]), SlotStatus::Prepared);

        component.update(&mut pool, &mut events).expect("update");
        assert!(!component.is_active());
        assert_eq!(pool.free_count(), 1);

        component.prepare(&mut pool, "blink", &[]).expect("reuse");
        assert_eq!(pool.context_count(), 1, "idle context should be reused");
    }

    #[test]
    fn suspended_slots_resume_on_later_updates() {
        let mut pool = pool();
        let mut events = EventQueue::new();
        let mut component = ScriptComponent::new();

        component.prepare(&mut pool, "fade", &[]).expect("prepare");
        component.update(&mut pool, &mut events).expect("frame 1");
        assert_eq!(pool.status(component.pending()[0]), SlotStatus::Suspended);
        component.update(&mut pool, &mut events).expect("frame 2");
        assert!(component.is_active());
        component.update(&mut pool, &mut events).expect("frame 3");
        assert!(!component.is_active());
        assert_eq!(pool.stats().resumes, 3);
    }

    #[test]
    fn pending_plus_free_is_conserved() {
        let mut pool = pool();
        let mut events = EventQueue::new();
        let mut first = ScriptComponent::new();
        let mut second = ScriptComponent::new();

        first.prepare(&mut pool, "fade", &[]).expect("prepare");
        first.prepare(&mut pool, "fade", &[]).expect("prepare");
        second.prepare(&mut pool, "blink", &[]).expect("prepare");
        let total = pool.context_count();

        let count = |pool: &ScriptPool, a: &ScriptComponent, b: &ScriptComponent| {
            a.pending().len() + b.pending().len() + pool.free_count()
        };
        assert_eq!(count(&pool, &first, &second), total);

        second.update(&mut pool, &mut events).expect("update");
        assert_eq!(count(&pool, &first, &second), total);
        first.update(&mut pool, &mut events).expect("update");
        assert_eq!(count(&pool, &first, &second), total);
        second.prepare(&mut pool, "fade", &[]).expect("prepare");
        assert_eq!(count(&pool, &first, &second), total);
        first.reset_and_recycle(&mut pool);
        assert_eq!(count(&pool, &first, &second), total);
        second.reset_and_recycle(&mut pool);
        assert_eq!(pool.free_count(), total);
        assert_eq!(pool.context_count(), total);
    }

    #[test]
    fn recycling_aborts_suspended_slots() {
        let mut pool = pool();
        let mut events = EventQueue::new();
        let mut component = ScriptComponent::new();

        component.prepare(&mut pool, "fade", &[]).expect("prepare");
        component.update(&mut pool, &mut events).expect("update");
        component.reset_and_recycle(&mut pool);

        assert_eq!(pool.stats().aborted, 1);
        assert_eq!(pool.free_count(), 1);
    }

    #[test]
    fn unknown_function_does_not_take_a_slot() {
        let mut pool = pool();
        let mut component = ScriptComponent::new();
        let err = component
            .prepare(&mut pool, "missing", &[])
            .expect_err("unknown function");
        assert!(matches!(err, ScriptError::UnknownFunction(name) if name == "missing"));
        assert_eq!(pool.context_count(), 0);
        assert!(!component.is_active());
    }

    #[test]
    fn runtime_failures_propagate_and_recycle() {
        let mut pool = pool();
        let mut events = EventQueue::new();
        let mut component = ScriptComponent::new();

        component.prepare(&mut pool, "broken", &[]).expect("prepare");
        let err = component
            .update(&mut pool, &mut events)
            .expect_err("script failure");
        assert!(matches!(err, ScriptError::Runtime { .. }));
        assert!(!component.is_active());
        assert_eq!(pool.free_count(), 1);
    }
}
