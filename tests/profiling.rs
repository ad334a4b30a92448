use pacman_sim::profiling::{FrameTimings, Phase, TimingBuffer};
use std::time::Duration;
use strum::IntoEnumIterator;

macro_rules! assert_close {
    ($actual:expr, $expected:expr, $concern:expr) => {
        let tolerance = Duration::from_micros(500);
        let diff = $actual.abs_diff($expected);
        assert!(
            diff < tolerance,
            "Expected {expected:?} ± {tolerance:.0?}, got {actual:?}, off by {diff:?} ({concern})",
            concern = $concern,
            expected = $expected,
            actual = $actual,
            tolerance = tolerance,
            diff = diff
        );
    };
}

#[test]
fn test_timing_statistics() {
    let timings = FrameTimings::default();

    // 10ms average, 2ms std dev
    timings.add_timing(Phase::Player, Duration::from_millis(10));
    timings.add_timing(Phase::Player, Duration::from_millis(12));
    timings.add_timing(Phase::Player, Duration::from_millis(8));

    // 2ms average, 1ms std dev
    timings.add_timing(Phase::Ghosts, Duration::from_millis(3));
    timings.add_timing(Phase::Ghosts, Duration::from_millis(2));
    timings.add_timing(Phase::Ghosts, Duration::from_millis(1));

    let stats = timings.get_stats();
    let (avg, std_dev) = stats.get(&Phase::Player).unwrap();
    assert_close!(*avg, Duration::from_millis(10), "player average");
    assert_close!(*std_dev, Duration::from_millis(2), "player standard deviation");

    let (avg, std_dev) = stats.get(&Phase::Ghosts).unwrap();
    assert_close!(*avg, Duration::from_millis(2), "ghosts average");
    assert_close!(*std_dev, Duration::from_millis(1), "ghosts standard deviation");

    assert_eq!(timings.most_recent(Phase::Ghosts), Duration::from_millis(1));
}

#[test]
fn test_unused_phases_report_zero() {
    let timings = FrameTimings::default();
    timings.add_timing(Phase::Render, Duration::from_millis(5));

    let stats = timings.get_stats();
    assert_eq!(stats.len(), Phase::iter().count(), "every phase should be in stats");

    let (avg, std_dev) = stats.get(&Phase::Render).unwrap();
    assert_close!(*avg, Duration::from_millis(5), "phase with data");
    assert_eq!(*std_dev, Duration::ZERO, "single sample has no spread");

    for phase in Phase::iter().filter(|phase| *phase != Phase::Render) {
        assert_eq!(stats.get(&phase).copied(), Some((Duration::ZERO, Duration::ZERO)), "{phase}");
    }
}

#[test]
fn test_window_keeps_recent_samples_only() {
    let mut buffer = TimingBuffer::default();
    assert!(buffer.is_empty());
    assert_eq!(buffer.most_recent(), Duration::ZERO);

    for _ in 0..100 {
        buffer.add_timing(Duration::from_millis(50));
    }
    for _ in 0..30 {
        buffer.add_timing(Duration::from_millis(1));
    }

    assert_eq!(buffer.len(), 30);
    let (avg, std_dev) = buffer.stats();
    assert_close!(avg, Duration::from_millis(1), "old samples should have rolled out");
    assert_close!(std_dev, Duration::ZERO, "identical samples");
}

#[test]
fn test_frame_rate_line_comes_first() {
    let timings = FrameTimings::default();
    assert!(timings.format_timing_display()[0].starts_with("- FPS"));

    for phase in Phase::iter() {
        timings.add_timing(phase, Duration::from_millis(4));
    }
    timings.add_timing(Phase::Total, Duration::from_millis(4));
    timings.add_timing(Phase::Ghosts, Duration::from_millis(8));

    let lines = timings.format_timing_display();
    assert_eq!(lines.len(), Phase::iter().count());
    assert!(lines[0].starts_with('2') && lines[0].contains(" FPS"), "{}", lines[0]);
    // Slowest phase right after the frame rate.
    assert!(lines[1].starts_with("ghosts"), "{}", lines[1]);
}
