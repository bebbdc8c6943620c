//! Test helpers module
//!
//! Mock Telegram API server and shared fixtures for integration tests.

#![allow(dead_code)]

pub mod telegram_mock;
pub mod test_data;

pub use telegram_mock::*;
pub use test_data::*;

use std::sync::Once;

static INIT: Once = Once::new();

/// Initialize test environment
pub fn init_test_env() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    });
}
