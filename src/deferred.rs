//! A value with a pending replacement, optionally gated by a delay.
//!
//! Headings, ghost states and the round sequence all change the same way: a
//! request sets the pending value, and the owner commits it at a well defined
//! point of its own frame. The sequence additionally waits for a countdown
//! before committing, during which the current value keeps running.

use crate::timer::CountdownTimer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deferred<T> {
    current: T,
    next: T,
    delay: CountdownTimer,
}

impl<T: Copy + PartialEq> Deferred<T> {
    pub const fn new(value: T) -> Self {
        Self {
            current: value,
            next: value,
            delay: CountdownTimer::new(0),
        }
    }

    /// Replaces both values and cancels any pending delay.
    pub fn reset(&mut self, value: T) {
        self.current = value;
        self.next = value;
        self.delay.set(0);
    }

    pub fn get(&self) -> T {
        self.current
    }

    pub fn next(&self) -> T {
        self.next
    }

    /// Requests a new value, committed on the next [`Deferred::commit`].
    pub fn set(&mut self, value: T) {
        self.next = value;
    }

    /// Makes the pending value current. Returns true if the value changed.
    pub fn commit(&mut self) -> bool {
        let changed = self.is_changing();
        self.current = self.next;
        changed
    }

    pub fn is_changing(&self) -> bool {
        self.current != self.next
    }

    /// Requests a new value and commits it after `after_ms`, or right away when zero.
    pub fn schedule(&mut self, value: T, after_ms: u32) {
        self.next = value;
        if after_ms > 0 {
            self.delay.set(after_ms);
            self.delay.start();
        } else {
            self.delay.stop();
            self.current = value;
        }
    }

    /// Returns true while a scheduled commit is still counting down.
    pub fn is_waiting(&self) -> bool {
        self.delay.is_enabled()
    }

    /// Advances a scheduled commit by one frame.
    ///
    /// Returns true when the owner should run the current value's action this frame:
    /// either nothing is scheduled, or the delay has just elapsed and the pending value
    /// was committed.
    pub fn poll(&mut self, interval: u32) -> bool {
        if !self.delay.is_enabled() {
            return true;
        }

        if self.delay.is_fired() {
            self.delay.reset();
            self.current = self.next;
            true
        } else {
            self.delay.update(interval);
            false
        }
    }
}

impl<T: Copy + PartialEq + Default> Default for Deferred<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}
