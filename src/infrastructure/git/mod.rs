//! Version-control plumbing.

pub mod workspace;

pub use workspace::GitWorkspace;
