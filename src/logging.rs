//! Tracing setup shared by the binaries and by tests that inspect log output.

use std::io::IsTerminal;

use tracing::{Level, Subscriber};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::MakeWriter;

/// Binary and library targets that receive log output by default.
const CRATE_TARGETS: &[&str] = &["liturgical_calendar", "cli", "http"];

/// `-v` count to level: none is warn, then info, debug and trace.
pub fn level_for(verbosity: u8) -> Level {
    match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Filter directives scoped to this crate's targets, e.g.
/// `liturgical_calendar=info,cli=info,http=info`.
pub fn default_directives(level: Level) -> String {
    let level = level.to_string().to_ascii_lowercase();
    CRATE_TARGETS
        .iter()
        .map(|target| format!("{target}={level}"))
        .collect::<Vec<_>>()
        .join(",")
}

/// Formatting subscriber writing to `writer`. `RUST_LOG` replaces the
/// default directives when set.
pub fn subscriber<W>(
    level: Level,
    ansi: bool,
    writer: W,
) -> impl Subscriber + Send + Sync + 'static
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(level)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(ansi)
        .with_writer(writer)
        .finish()
}

/// Installs the process-wide subscriber on stderr. A second call is a no-op.
pub fn init(verbosity: u8) {
    let ansi = std::io::stderr().is_terminal();
    let _ = tracing::subscriber::set_global_default(subscriber(
        level_for(verbosity),
        ansi,
        std::io::stderr,
    ));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_steps_through_levels() {
        assert_eq!(level_for(0), Level::WARN);
        assert_eq!(level_for(1), Level::INFO);
        assert_eq!(level_for(2), Level::DEBUG);
        assert_eq!(level_for(7), Level::TRACE);
    }

    #[test]
    fn directives_cover_every_target() {
        assert_eq!(
            default_directives(Level::DEBUG),
            "liturgical_calendar=debug,cli=debug,http=debug"
        );
    }
}
