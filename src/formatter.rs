//! Log line formatter stamped with wall-clock time and the simulated frame number.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use time::format_description::FormatItem;
use time::macros::format_description;
use time::OffsetDateTime;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields, FormattedFields};
use tracing_subscriber::registry::LookupSpan;

static FRAME_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Only the low 16 bits of the frame number are printed.
const FRAME_DISPLAY_MASK: u64 = 0xFFFF;

const TIMESTAMP_FORMAT: &[FormatItem<'static>] = format_description!("[hour]:[minute]:[second].[subsecond digits:5]");

/// Formats events as `time frame level spans target: fields`.
///
/// The frame number lets log lines from the same simulated frame be grouped
/// even when the host loop falls behind wall-clock time.
pub struct FrameFormatter;

impl<S, N> FormatEvent<S, N> for FrameFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(&self, ctx: &FmtContext<'_, S, N>, mut writer: Writer<'_>, event: &Event<'_>) -> fmt::Result {
        let meta = event.metadata();

        let timestamp = OffsetDateTime::now_utc()
            .format(&TIMESTAMP_FORMAT)
            .map_err(|_| fmt::Error)?;
        write_dimmed(&mut writer, timestamp)?;
        writer.write_char(' ')?;

        write_dimmed(&mut writer, format_args!("#{:04X}", frame_count() & FRAME_DISPLAY_MASK))?;
        writer.write_char(' ')?;

        write_level(&mut writer, meta.level())?;
        writer.write_char(' ')?;

        if let Some(scope) = ctx.event_scope() {
            let mut any = false;
            for span in scope.from_root() {
                write_bold(&mut writer, span.metadata().name())?;
                any = true;
                let extensions = span.extensions();
                if let Some(fields) = extensions.get::<FormattedFields<N>>() {
                    if !fields.is_empty() {
                        write!(writer, "{{{fields}}}")?;
                    }
                }
                writer.write_char(':')?;
            }
            if any {
                writer.write_char(' ')?;
            }
        }

        write_dimmed(&mut writer, format_args!("{}:", meta.target()))?;
        writer.write_char(' ')?;

        ctx.format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

fn write_level(writer: &mut Writer<'_>, level: &Level) -> fmt::Result {
    let (color, text) = match *level {
        Level::TRACE => ("\x1b[35m", "TRACE"),
        Level::DEBUG => ("\x1b[34m", "DEBUG"),
        Level::INFO => ("\x1b[32m", " INFO"),
        Level::WARN => ("\x1b[33m", " WARN"),
        Level::ERROR => ("\x1b[31m", "ERROR"),
    };

    if writer.has_ansi_escapes() {
        write!(writer, "{color}{text}\x1b[0m")
    } else {
        writer.write_str(text)
    }
}

fn write_dimmed(writer: &mut Writer<'_>, value: impl fmt::Display) -> fmt::Result {
    if writer.has_ansi_escapes() {
        write!(writer, "\x1b[2m{value}\x1b[0m")
    } else {
        write!(writer, "{value}")
    }
}

fn write_bold(writer: &mut Writer<'_>, value: impl fmt::Display) -> fmt::Result {
    if writer.has_ansi_escapes() {
        write!(writer, "\x1b[1m{value}\x1b[0m")
    } else {
        write!(writer, "{value}")
    }
}

/// Called once per simulated frame by the host loop.
pub fn advance_frame() -> u64 {
    FRAME_COUNTER.fetch_add(1, Ordering::Relaxed) + 1
}

pub fn frame_count() -> u64 {
    FRAME_COUNTER.load(Ordering::Relaxed)
}
