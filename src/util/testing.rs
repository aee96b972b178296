//! Shared test setup: logging and chart fixtures.

use std::env;
use std::sync::Once;
use tracing::{debug, info};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

use crate::domain::Employee;

static TEST_SETUP: Once = Once::new();

pub fn init_test_setup() {
    TEST_SETUP.call_once(|| {
        if env::var("RUST_LOG").is_err() {
            env::set_var("RUST_LOG", "orgchart=trace");
        }
        // global logging subscriber, used by all tracing log macros
        setup_test_logging();
        info!("Test Setup complete");
    });
}

fn setup_test_logging() {
    debug!("INIT: Attempting logger init from testing.rs");

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

    let subscriber = tracing_subscriber::registry().with(
        fmt::layer()
            .with_test_writer()
            .with_target(true)
            .with_thread_names(false)
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(env_filter),
    );

    // Only set if we haven't already set a global subscriber
    if tracing::dispatcher::has_been_set() {
        debug!("Tracing subscriber already set");
    } else {
        subscriber.try_init().unwrap_or_else(|e| {
            eprintln!("Error: Failed to set up logging: {}", e);
        });
    }
}

/// CEO(1) with two direct reports A(2) and B(3), no one below them.
pub fn two_reports() -> Employee {
    Employee::new(1, "CEO").with_subordinates(vec![Employee::new(2, "A"), Employee::new(3, "B")])
}

/// Three-level chart used across tests.
///
/// ```text
/// Ada (1)
/// ├── Grace (2)
/// │   ├── Alan (4)
/// │   └── Edsger (5)
/// │       └── Barbara (8)
/// └── Linus (3)
///     ├── Ken (6)
///     └── Dennis (7)
/// ```
pub fn sample_org() -> Employee {
    Employee::new(1, "Ada").with_subordinates(vec![
        Employee::new(2, "Grace").with_subordinates(vec![
            Employee::new(4, "Alan"),
            Employee::new(5, "Edsger").with_subordinates(vec![Employee::new(8, "Barbara")]),
        ]),
        Employee::new(3, "Linus").with_subordinates(vec![
            Employee::new(6, "Ken"),
            Employee::new(7, "Dennis"),
        ]),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_test_setup() {
        init_test_setup();
        init_test_setup();
    }

    #[test]
    fn sample_org_has_unique_ids() {
        let mut ids = sample_org().ids();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), sample_org().headcount());
    }
}
