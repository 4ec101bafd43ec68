//! Domain layer: pure models and the port traits the engine is written
//! against.

pub mod models;
pub mod ports;
