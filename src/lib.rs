#![doc(test(attr(deny(warnings))))]

//! Bill Core offers the ledger, installment scheduling, and time-bucket
//! aggregation primitives that power a personal bill tracker's views.

pub mod calendar;
pub mod errors;
pub mod ledger;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Bill Core tracing initialized.");
    });
}
