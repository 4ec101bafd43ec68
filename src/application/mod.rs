//! Application layer: orchestration of the reconciliation loop.

pub mod run_loop;

pub use run_loop::{LoopReport, LoopSettings, Phase, ReconciliationLoop, WaitStrategy};
