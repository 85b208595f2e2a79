//! A set of utilities to enable logging configuration using tracing_subscriber.

use std::{
    error::Error,
    fmt::{self, Display},
    io::IsTerminal,
    sync::Once,
};

use tracing::field::DisplayValue;
use tracing_subscriber::{EnvFilter, filter::LevelFilter};

static ODP_LOG_ENV_VAR: &str = "ODP_LOG";

/// Initializes a tracing subscriber for logging.
///
/// Events are written to standard output, which is where per-partition progress lines
/// are expected to show up.
pub fn init() {
    // Since we also use this function to enable logging in tests, wrap it in `Once` to prevent
    // multiple initializations.
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let (env_filter, odp_log_level) = env_filter_and_log_level();

        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_ansi(std::io::stdout().is_terminal())
            .init();

        tracing::debug!("log level: {}", odp_log_level);
    });
}

/// List of crates in the workspace.
const ODP_CRATES: &[&str] = &[
    "carto_client",
    "dump",
    "monitoring",
    "odpdump",
    "table_catalog",
];

fn env_filter_and_log_level() -> (EnvFilter, String) {
    // Parse directives from RUST_LOG
    let log_filter = EnvFilter::builder().with_default_directive(LevelFilter::ERROR.into());
    let directive_string = std::env::var(EnvFilter::DEFAULT_ENV).unwrap_or_default();
    let mut env_filter = log_filter.parse_lossy(&directive_string);

    let log_level = std::env::var(ODP_LOG_ENV_VAR).unwrap_or_else(|_| "info".to_string());

    for crate_name in ODP_CRATES {
        // Add directives for each crate in ODP_CRATES, if not overriden by RUST_LOG
        if directive_string.contains(&format!("{crate_name}=")) {
            continue;
        }
        match format!("{crate_name}={log_level}").parse() {
            Ok(directive) => env_filter = env_filter.add_directive(directive),
            Err(err) => {
                eprintln!("ignoring invalid {ODP_LOG_ENV_VAR} value {log_level:?}: {err}");
                break;
            }
        }
    }

    (env_filter, log_level)
}

/// Render the `source()` chain of an error, excluding the error itself, as a log field.
///
/// Pair it with `error = %err` so the top-level message and its causes land in separate
/// fields. Causes are joined with ` -> `; an error without a source renders as an empty string.
pub fn error_source<'a>(err: &'a (dyn Error + 'a)) -> DisplayValue<ErrorSource<'a>> {
    tracing::field::display(ErrorSource(err))
}

/// The cause chain of an error. See [`error_source`].
pub struct ErrorSource<'a>(&'a (dyn Error + 'a));

impl Display for ErrorSource<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut source = self.0.source();
        let mut first = true;
        while let Some(cause) = source {
            if !first {
                f.write_str(" -> ")?;
            }
            write!(f, "{cause}")?;
            first = false;
            source = cause.source();
        }
        Ok(())
    }
}

#[test]
fn error_source_joins_the_cause_chain() {
    #[derive(Debug, thiserror::Error)]
    #[error("outer")]
    struct Outer(#[source] Middle);

    #[derive(Debug, thiserror::Error)]
    #[error("middle")]
    struct Middle(#[source] std::io::Error);

    let err = Outer(Middle(std::io::Error::other("inner")));

    assert_eq!(ErrorSource(&err).to_string(), "middle -> inner");
    assert_eq!(ErrorSource(&std::io::Error::other("alone")).to_string(), "");
}

/// If this fails, just update the above `ODP_CRATES` to match reality.
#[test]
fn assert_odp_crates() {
    use cargo_metadata::MetadataCommand;

    let cmd = MetadataCommand::new().no_deps().exec().unwrap();
    let mut names: Vec<String> = cmd
        .workspace_packages()
        .into_iter()
        .map(|pkg| pkg.name.replace("-", "_").clone())
        .collect();
    names.sort();
    assert_eq!(names, ODP_CRATES);
}
