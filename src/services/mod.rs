//! Service layer: the engine's logic between the ports.

pub mod classifier;
pub mod eligibility;
pub mod extraction;
pub mod fixer;
pub mod prompts;
pub mod resolution;

pub use classifier::ValidityClassifier;
pub use eligibility::eligible;
pub use fixer::FixExecutor;
pub use resolution::{ResolutionChecker, ResolutionReport};
