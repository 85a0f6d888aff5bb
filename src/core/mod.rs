pub mod clock;
pub mod engine;
pub mod services;

pub use clock::{Clock, FixedClock, SystemClock};
pub use engine::LedgerEngine;
