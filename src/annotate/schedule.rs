use std::collections::VecDeque;

/// Continuations deferred to the next tick of the host's event loop.
///
/// Nothing here can be cancelled: by the time a task runs, the state it was
/// scheduled for may be gone, so every consumer re-checks before acting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskQueue<T> {
    tasks: VecDeque<T>,
}

impl<T> Default for TaskQueue<T> {
    fn default() -> Self {
        Self {
            tasks: VecDeque::new(),
        }
    }
}

impl<T> TaskQueue<T> {
    pub fn defer(&mut self, task: T) {
        self.tasks.push_back(task);
    }

    /// Takes every task scheduled so far; tasks deferred while handling them wait for the next tick.
    pub fn take_due(&mut self) -> Vec<T> {
        self.tasks.drain(..).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

/// A single-fire subscription: `fire` reports `true` at most once per `arm`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OneShot {
    armed: bool,
}

impl OneShot {
    pub fn arm(&mut self) {
        self.armed = true;
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    pub fn fire(&mut self) -> bool {
        std::mem::take(&mut self.armed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tasks_run_in_schedule_order_once() {
        let mut queue = TaskQueue::default();
        queue.defer(1);
        queue.defer(2);
        assert_eq!(queue.take_due(), vec![1, 2]);
        assert!(queue.is_empty());
        assert!(queue.take_due().is_empty());
    }

    #[test]
    fn one_shot_fires_once_per_arm() {
        let mut blur = OneShot::default();
        assert!(!blur.fire());
        blur.arm();
        blur.arm();
        assert!(blur.is_armed());
        assert!(blur.fire());
        assert!(!blur.is_armed());
        assert!(!blur.fire());
        blur.arm();
        assert!(blur.fire());
    }
}
