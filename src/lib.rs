//! prmend - automated PR review comment resolution
//!
//! prmend watches the review threads of a pull request, delegates the valid
//! ones to an external AI coding agent, commits and pushes the resulting
//! fixes, and keeps an append-only ledger of which comments have already
//! been handled so repeated runs never re-litigate settled feedback.
//!
//! # Architecture
//!
//! This crate follows Clean Architecture / Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): Pure data types and port traits
//! - **Service Layer** (`services`): Eligibility, prompts, extraction,
//!   classification and resolution logic
//! - **Application Layer** (`application`): The reconciliation loop
//! - **Infrastructure Layer** (`infrastructure`): GitHub, git, actor,
//!   database and configuration adapters
//! - **CLI Layer** (`cli`): Command-line interface

pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use application::{LoopReport, LoopSettings, ReconciliationLoop, WaitStrategy};
pub use domain::models::{Comment, Config, Ledger, PrRef, ResolveResult, RunRecord, Verdict};
pub use domain::ports::{Actor, CommentStore, EngineError, LedgerRepository, Workspace};
