#![doc(test(attr(deny(warnings))))]

//! Site Inventory tracks construction-site material stock: receipts,
//! consumption, transfers and an append-only movement log persisted as JSON.

pub mod cli;
pub mod config;
pub mod core;
pub mod errors;
pub mod inventory;
pub mod storage;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Site inventory tracing initialized.");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init();
    }
}
