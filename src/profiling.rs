//! Per-phase frame timing.

use std::time::Duration;

use circular_buffer::CircularBuffer;
use micromap::Map;
use parking_lot::Mutex;
use smallvec::SmallVec;
use strum::{EnumCount, IntoEnumIterator};
use strum_macros::{Display, EnumCount as EnumCountMacro, EnumIter, IntoStaticStr};
use thousands::Separable;

/// The number of durations to keep per phase.
const TIMING_WINDOW_SIZE: usize = 30;

/// Parts of a frame that are timed separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumCountMacro, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum Phase {
    /// The whole frame.
    Total,
    Sequencer,
    Player,
    Ghosts,
    /// Special target and score popups.
    Items,
    Render,
}

/// Rolling window of recent durations for one phase.
#[derive(Debug, Default)]
pub struct TimingBuffer {
    buffer: CircularBuffer<TIMING_WINDOW_SIZE, Duration>,
}

impl TimingBuffer {
    pub fn add_timing(&mut self, duration: Duration) {
        self.buffer.push_back(duration);
    }

    pub fn most_recent(&self) -> Duration {
        self.buffer.back().copied().unwrap_or(Duration::ZERO)
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Mean and sample standard deviation of the window, computed with Welford's algorithm.
    pub fn stats(&self) -> (Duration, Duration) {
        let mut count = 0u32;
        let mut mean = 0.0f64;
        let mut sum_squared_diff = 0.0f64;

        for duration in self.buffer.iter() {
            let secs = duration.as_secs_f64();
            count += 1;
            let diff = secs - mean;
            mean += diff / f64::from(count);
            sum_squared_diff += diff * (secs - mean);
        }

        match count {
            0 => (Duration::ZERO, Duration::ZERO),
            1 => (Duration::from_secs_f64(mean), Duration::ZERO),
            _ => (
                Duration::from_secs_f64(mean),
                Duration::from_secs_f64((sum_squared_diff / f64::from(count - 1)).sqrt()),
            ),
        }
    }
}

/// Timing windows for every [`Phase`], shareable across threads.
#[derive(Debug)]
pub struct FrameTimings {
    timings: Map<Phase, Mutex<TimingBuffer>, { Phase::COUNT }>,
}

impl Default for FrameTimings {
    fn default() -> Self {
        let mut timings = Map::new();
        for phase in Phase::iter() {
            timings.insert(phase, Mutex::new(TimingBuffer::default()));
        }
        Self { timings }
    }
}

impl FrameTimings {
    pub fn add_timing(&self, phase: Phase, duration: Duration) {
        if let Some(buffer) = self.timings.get(&phase) {
            buffer.lock().add_timing(duration);
        }
    }

    pub fn most_recent(&self, phase: Phase) -> Duration {
        self.timings
            .get(&phase)
            .map_or(Duration::ZERO, |buffer| buffer.lock().most_recent())
    }

    pub fn get_stats(&self) -> Map<Phase, (Duration, Duration), { Phase::COUNT }> {
        let mut stats = Map::new();
        for (phase, buffer) in self.timings.iter() {
            stats.insert(*phase, buffer.lock().stats());
        }
        stats
    }

    /// One aligned line per phase, the frame rate implied by the total first and the
    /// remaining phases by descending average.
    pub fn format_timing_display(&self) -> SmallVec<[String; Phase::COUNT]> {
        let stats = self.get_stats();
        let (total_avg, total_std) = stats.get(&Phase::Total).copied().unwrap_or_default();

        let effective_fps = match total_avg.as_secs_f64() {
            secs if secs <= 0.0 => "- FPS".to_string(),
            secs => match 1.0 / secs {
                f if f > 100.0 => format!("{} FPS", (f as u32).separate_with_commas()),
                f if f < 10.0 => format!("{f:.1} FPS"),
                f => format!("{f:.0} FPS"),
            },
        };

        let mut sorted: Vec<_> = stats.iter().filter(|(phase, _)| **phase != Phase::Total).collect();
        sorted.sort_by(|a, b| b.1 .0.cmp(&a.1 .0));

        let mut timing_data = vec![(effective_fps, total_avg, total_std)];
        timing_data.extend(sorted.into_iter().map(|(phase, (avg, std))| (phase.to_string(), *avg, *std)));

        format_timing_display(timing_data)
    }
}

/// Splits a duration into integer part, three decimal digits and unit.
fn split_duration(duration: &Duration) -> (u64, u32, &'static str) {
    match duration {
        n if *n >= Duration::from_secs(1) => (n.as_secs(), n.subsec_millis(), "s"),
        n if *n >= Duration::from_millis(1) => (n.as_millis() as u64, (n.as_micros() % 1000) as u32, "ms"),
        n if *n >= Duration::from_micros(1) => (n.as_micros() as u64, (n.as_nanos() % 1000) as u32, "µs"),
        n => (n.as_nanos() as u64, 0, "ns"),
    }
}

/// Formats `(name, average, standard deviation)` rows into aligned lines.
pub fn format_timing_display(
    timing_data: impl IntoIterator<Item = (String, Duration, Duration)>,
) -> SmallVec<[String; Phase::COUNT]> {
    struct Entry {
        name: String,
        avg: (u64, u32, &'static str),
        std: (u64, u32, &'static str),
    }

    let entries: Vec<Entry> = timing_data
        .into_iter()
        .map(|(name, avg, std)| Entry {
            name,
            avg: split_duration(&avg),
            std: split_duration(&std),
        })
        .collect();

    let name_width = entries.iter().map(|e| e.name.chars().count()).max().unwrap_or(0);
    let avg_width = entries.iter().map(|e| e.avg.0.to_string().len()).max().unwrap_or(0);
    let std_width = entries.iter().map(|e| e.std.0.to_string().len()).max().unwrap_or(0);

    entries
        .iter()
        .map(|e| {
            format!(
                "{name:<name_width$} : {avg_int:>avg_width$}.{avg_dec:03}{avg_unit:<2} ± {std_int:>std_width$}.{std_dec:03}{std_unit}",
                name = e.name,
                avg_int = e.avg.0,
                avg_dec = e.avg.1,
                avg_unit = e.avg.2,
                std_int = e.std.0,
                std_dec = e.std.1,
                std_unit = e.std.2,
            )
        })
        .collect()
}
