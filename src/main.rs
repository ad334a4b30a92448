use std::time::{Duration, Instant};

use anyhow::{bail, Context as _};
use pacman_sim::collaborator::{NullRenderer, SilentAudio};
use pacman_sim::constants::LOOP_TIME;
use pacman_sim::formatter::{self, FrameFormatter};
use pacman_sim::game::settings::{MemoryStorage, Settings};
use pacman_sim::game::{Game, GameOptions};
use tracing::{debug, info, warn};
use tracing_error::ErrorLayer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Frames between timing summaries.
const TIMING_PERIOD: u64 = 60 * 10;

struct Args {
    seed: Option<u64>,
    frames: Option<u64>,
    /// Pace frames to wall-clock time instead of running flat out.
    realtime: bool,
    demo: bool,
}

fn parse_args() -> anyhow::Result<Args> {
    let mut args = Args {
        seed: None,
        frames: None,
        realtime: false,
        demo: true,
    };

    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--seed" => {
                let value = iter.next().context("--seed needs a value")?;
                args.seed = Some(value.parse().with_context(|| format!("Invalid seed: {value}"))?);
            }
            "--frames" => {
                let value = iter.next().context("--frames needs a value")?;
                args.frames = Some(value.parse().with_context(|| format!("Invalid frame count: {value}"))?);
            }
            "--realtime" => args.realtime = true,
            "--play" => args.demo = false,
            other => bail!("Unknown argument: {other}"),
        }
    }

    Ok(args)
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().event_format(FrameFormatter))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(ErrorLayer::default())
        .init();

    let args = parse_args()?;
    let storage = MemoryStorage::default();
    let settings = Settings::load(&storage)?;

    let options = GameOptions {
        seed: args.seed,
        layout: None,
        demo: args.demo,
    };
    let mut game = Game::new(settings, options, Box::new(NullRenderer), Box::new(SilentAudio))?;

    info!(
        loop_time_ms = LOOP_TIME.as_secs_f32() * 1000.0,
        demo = args.demo,
        realtime = args.realtime,
        "Starting simulation"
    );

    loop {
        let start = Instant::now();
        let running = game.tick();
        let frame = formatter::advance_frame();

        if frame % TIMING_PERIOD == 0 {
            for line in game.timings().format_timing_display() {
                debug!("{line}");
            }
        }

        if !running || args.frames.is_some_and(|limit| frame >= limit) {
            break;
        }

        if args.realtime {
            let elapsed = start.elapsed();
            match LOOP_TIME.checked_sub(elapsed) {
                Some(remaining) if remaining > Duration::ZERO => spin_sleep::sleep(remaining),
                _ => warn!(behind = ?elapsed.saturating_sub(LOOP_TIME), "Frame behind schedule"),
            }
        }
    }

    let context = game.context();
    info!(
        frames = formatter::frame_count(),
        sequence = %game.sequence(),
        score = context.score,
        round = context.round,
        high_score = context.settings.high_score,
        "Simulation finished"
    );

    Ok(())
}
