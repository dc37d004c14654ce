//! Tracing initialization for tests
//!
//! Call [`init_tracing`] at the top of a test to get span output when
//! `RUST_LOG` is set. Initialization happens once per process regardless
//! of how many tests call it.

use once_cell::sync::OnceCell;
use tracing_subscriber::EnvFilter;

static INIT: OnceCell<()> = OnceCell::new();

pub fn init_tracing() {
    INIT.get_or_init(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}
