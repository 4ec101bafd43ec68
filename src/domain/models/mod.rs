//! Domain models: pure data types with no I/O.

pub mod comment;
pub mod config;
pub mod ledger;
pub mod verdict;

pub use comment::{Comment, PrRef, PrRefParseError};
pub use config::{
    ActorConfig, Config, DatabaseConfig, GithubConfig, LoggingConfig, RunConfig,
};
pub use ledger::{Ledger, RunRecord};
pub use verdict::{ResolveResult, Verdict};
