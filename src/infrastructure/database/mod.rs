pub mod connection;
pub mod ledger_repo;

pub use connection::DatabaseConnection;
pub use ledger_repo::SqliteLedgerRepository;
