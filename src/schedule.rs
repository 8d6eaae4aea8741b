//! Cooperative timer queue on a virtual clock.
//!
//! Nothing here runs on its own: the owner advances the clock and receives
//! due tasks one at a time, in due order, so a task may schedule follow-ups
//! that still fire inside the same advance window.

use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

#[derive(Debug, Clone)]
struct Timer<T> {
    handle: TimerHandle,
    due: Duration,
    task: T,
}

#[derive(Debug, Clone)]
pub struct Timers<T> {
    now: Duration,
    next_id: u64,
    pending: Vec<Timer<T>>,
}

impl<T> Default for Timers<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Timers<T> {
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            next_id: 0,
            pending: Vec::new(),
        }
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn schedule(&mut self, delay: Duration, task: T) -> TimerHandle {
        let handle = TimerHandle(self.next_id);
        self.next_id += 1;
        self.pending.push(Timer {
            handle,
            due: self.now + delay,
            task,
        });
        handle
    }

    /// Cancels the handle held in `slot` (if any) and stores a fresh one.
    pub fn replace(&mut self, slot: &mut Option<TimerHandle>, delay: Duration, task: T) {
        if let Some(previous) = slot.take() {
            self.cancel(previous);
        }
        *slot = Some(self.schedule(delay, task));
    }

    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        let before = self.pending.len();
        self.pending.retain(|timer| timer.handle != handle);
        before != self.pending.len()
    }

    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.pending.iter().any(|timer| timer.handle == handle)
    }

    /// Removes the earliest task due at or before `until`, moving the clock
    /// to its due time. Ties fire in scheduling order.
    pub fn pop_due(&mut self, until: Duration) -> Option<(TimerHandle, T)> {
        let index = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, timer)| timer.due <= until)
            .min_by_key(|(_, timer)| (timer.due, timer.handle.0))
            .map(|(index, _)| index)?;
        let timer = self.pending.remove(index);
        self.now = self.now.max(timer.due);
        Some((timer.handle, timer.task))
    }

    pub fn advance_to(&mut self, until: Duration) {
        self.now = self.now.max(until);
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    #[test]
    fn due_tasks_come_out_in_order() {
        let mut timers = Timers::new();
        timers.schedule(ms(20), "late");
        timers.schedule(ms(5), "early");
        timers.schedule(ms(5), "early-second");

        assert_eq!(timers.pop_due(ms(10)).map(|(_, t)| t), Some("early"));
        assert_eq!(timers.pop_due(ms(10)).map(|(_, t)| t), Some("early-second"));
        assert_eq!(timers.pop_due(ms(10)), None);
        assert_eq!(timers.now(), ms(5));
        timers.advance_to(ms(10));
        assert_eq!(timers.pop_due(ms(20)).map(|(_, t)| t), Some("late"));
        assert!(timers.is_empty());
    }

    #[test]
    fn replace_cancels_previous_handle() {
        let mut timers = Timers::new();
        let mut slot = None;
        timers.replace(&mut slot, ms(300), 1);
        let first = slot.unwrap();
        timers.replace(&mut slot, ms(300), 2);
        assert!(!timers.is_pending(first));
        assert_eq!(timers.len(), 1);
        assert_eq!(timers.pop_due(ms(300)).map(|(_, t)| t), Some(2));
    }

    #[test]
    fn delays_are_relative_to_the_current_clock() {
        let mut timers = Timers::new();
        timers.advance_to(ms(100));
        let handle = timers.schedule(ms(50), ());
        assert_eq!(timers.pop_due(ms(149)), None);
        assert_eq!(timers.pop_due(ms(150)).map(|(h, _)| h), Some(handle));
    }
}
