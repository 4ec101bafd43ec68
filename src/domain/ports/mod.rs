//! Ports: trait seams between the engine and its external collaborators.

pub mod actor;
pub mod comment_store;
pub mod errors;
pub mod ledger_repository;
pub mod workspace;

pub use actor::Actor;
pub use comment_store::CommentStore;
pub use errors::{DatabaseError, EngineError};
pub use ledger_repository::LedgerRepository;
pub use workspace::Workspace;
