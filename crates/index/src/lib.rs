//! Root Index Manager
//!
//! The heart of AnchorFS: merges freshly uploaded file descriptors into
//! an owner's existing root index, uploads the new index to the content
//! store, commits its identifier to the pointer ledger, and retires the
//! superseded root blob.
//!
//! The commit is a two-phase step across two independent services with no
//! rollback: content upload first, pointer transaction second. A failed
//! pointer transaction leaves the freshly uploaded blob orphaned in the
//! store — cheap, and always logged rather than silently dropped. A
//! failed cleanup of the superseded blob is likewise logged and ignored,
//! since the ledger has already moved past it.

pub mod errors;
pub mod manager;

pub use errors::IndexError;
pub use manager::{RootIndexManager, RootLookup};
