//! Test utilities for the resolver
//!
//! Available to unit tests and, through the `test-utils` feature, to the
//! integration tests.
//!
//! # Example
//!
//! ```rust,no_run
//! use prs_resolver::test_utils::{ProgramBuilder, TestWorkspace};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let mut workspace = TestWorkspace::new();
//! workspace.add("base", &ProgramBuilder::new().text_block("identity", "Base").build())?;
//! workspace.add("app", &ProgramBuilder::new().inherit("./base").build())?;
//!
//! let resolved = workspace.resolver().resolve("app").await?;
//! assert!(resolved.is_clean());
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod environment;
pub mod fixtures;

pub use builder::{ProgramBuilder, props};
pub use environment::{CountingParser, TestWorkspace};
pub use fixtures::layered_workspace;

use std::sync::Once;
use tracing::Level;
use tracing_subscriber::EnvFilter;

static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests, once per process.
///
/// With `level` set, that level is used. Otherwise `RUST_LOG` is honored when
/// present and logging stays off when it is not.
///
/// ```bash
/// RUST_LOG=prs_resolver=debug cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(false)
            .try_init();
    });
}
