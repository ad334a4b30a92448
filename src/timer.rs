//! Countdown timer measured in simulated milliseconds.

/// A countdown that fires once and stays fired until it is reset.
///
/// A freshly set timer is paused; call [`CountdownTimer::start`] to let
/// [`CountdownTimer::update`] count it down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CountdownTimer {
    current: u32,
    setting: u32,
    fired: bool,
    enabled: bool,
}

impl CountdownTimer {
    pub const fn new(interval: u32) -> Self {
        Self {
            current: interval,
            setting: interval,
            fired: false,
            enabled: false,
        }
    }

    /// Changes the interval and resets the timer.
    pub fn set(&mut self, interval: u32) {
        self.setting = interval;
        self.reset();
    }

    /// Rewinds to the configured interval, clears the fired flag and pauses.
    pub fn reset(&mut self) {
        self.current = self.setting;
        self.fired = false;
        self.enabled = false;
    }

    pub fn start(&mut self) {
        self.enabled = true;
    }

    pub fn restart(&mut self) {
        self.reset();
        self.start();
    }

    pub fn pause(&mut self) {
        self.enabled = false;
    }

    /// Pauses and drains the remaining time without firing.
    pub fn stop(&mut self) {
        self.enabled = false;
        self.current = 0;
    }

    /// Remaining time in milliseconds.
    pub fn remaining(&self) -> u32 {
        self.current
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_counting(&self) -> bool {
        self.enabled && !self.fired
    }

    pub fn is_fired(&self) -> bool {
        self.fired
    }

    /// Counts down by `interval` milliseconds while the timer is counting.
    pub fn update(&mut self, interval: u32) {
        if !self.is_counting() {
            return;
        }

        self.current = self.current.saturating_sub(interval);
        if self.current == 0 {
            self.fired = true;
        }
    }
}
