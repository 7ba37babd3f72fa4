#![doc(test(attr(deny(warnings))))]

//! Pharmawatch collects structured adverse drug-effect reports through a
//! multi-step intake wizard and hands completed cases to a filterable review
//! dashboard for pharmacovigilance triage.

pub mod cli;
pub mod config;
pub mod errors;
pub mod registry;
pub mod report;
pub mod utils;
pub mod wizard;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Pharmawatch tracing initialized.");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init();
    }
}
