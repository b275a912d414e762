//! Background task slot and periodic timer
//!
//! Time is a wrapping millisecond counter supplied by the host.

/// Whether `now_ms` reached `deadline_ms`, tolerating counter wrap
///
/// Deadlines are never more than half the counter range ahead.
pub fn reached(now_ms: u32, deadline_ms: u32) -> bool {
    (now_ms.wrapping_sub(deadline_ms) as i32) >= 0
}

/// A single deferred operation run every `delay_ms`
///
/// Scheduling replaces whatever was scheduled before. A scheduled task keeps
/// firing until it is cleared or replaced.
#[derive(Debug, Clone, Copy)]
pub struct TaskSlot<T: Copy> {
    task: Option<T>,
    delay_ms: u32,
    next_ms: u32,
}

impl<T: Copy> Default for TaskSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Copy> TaskSlot<T> {
    pub const fn new() -> Self {
        Self {
            task: None,
            delay_ms: 0,
            next_ms: 0,
        }
    }

    /// Run `task` every `delay_ms`, first at `now_ms + delay_ms`
    pub fn schedule(&mut self, task: T, delay_ms: u32, now_ms: u32) {
        self.task = Some(task);
        self.delay_ms = delay_ms;
        self.next_ms = now_ms.wrapping_add(delay_ms);
    }

    pub fn clear(&mut self) {
        self.task = None;
    }

    pub fn is_scheduled(&self) -> bool {
        self.task.is_some()
    }

    /// Return the task if it is due and schedule its next run
    ///
    /// The next run is set before the caller executes the task, so a task
    /// that schedules a successor or clears itself wins over the rearm.
    pub fn tick(&mut self, now_ms: u32) -> Option<T> {
        let task = self.task?;
        if !reached(now_ms, self.next_ms) {
            return None;
        }
        self.next_ms = now_ms.wrapping_add(self.delay_ms);
        Some(task)
    }
}

/// Fires at most once per period
#[derive(Debug, Clone, Copy)]
pub struct Periodic {
    period_ms: u32,
    /// `None` until the first firing
    next_ms: Option<u32>,
}

impl Periodic {
    /// Timer due immediately, then every `period_ms`
    pub const fn new(period_ms: u32) -> Self {
        Self {
            period_ms,
            next_ms: None,
        }
    }

    /// Check the timer, rearming it when due
    pub fn is_due(&mut self, now_ms: u32) -> bool {
        if let Some(next_ms) = self.next_ms {
            if !reached(now_ms, next_ms) {
                return false;
            }
        }
        self.rearm(now_ms);
        true
    }

    /// Push the next firing to `now_ms + period`
    pub fn rearm(&mut self, now_ms: u32) {
        self.next_ms = Some(now_ms.wrapping_add(self.period_ms));
    }
}
