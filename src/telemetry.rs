use std::env;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install the global subscriber. `JIRA_ASSIGN_LOG` overrides the filter and
/// `JIRA_ASSIGN_LOG_FORMAT=json` switches to structured output.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_env("JIRA_ASSIGN_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if env::var("DEBUG").is_ok() {
            "jira_assign=debug,info"
        } else {
            "jira_assign=info,warn"
        })
    });

    let format = env::var("JIRA_ASSIGN_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry.with(fmt::layer().json().with_ansi(false)).init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_target(false).with_writer(std::io::stderr))
                .init();
        }
    }
}
