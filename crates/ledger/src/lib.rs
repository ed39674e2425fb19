//! Pointer Ledger Adapter
//!
//! The ledger keeps a single mutable string-valued slot per owner: the
//! content identifier of that owner's most recently committed root index.
//! Updates go through a transaction that either reaches finality or
//! reverts; the slot never reflects an unconfirmed update.

pub mod errors;
pub mod http;
pub mod memory;

pub use errors::LedgerError;
pub use http::{HttpPointerLedger, LedgerConfig};
pub use memory::MemoryPointerLedger;

use anchorfs_types::{ContentId, OwnerId};
use async_trait::async_trait;

/// Handle to a submitted pointer-update transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PointerTx {
    pub id: String,
}

impl PointerTx {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

/// Outcome of waiting for a transaction to finalize.
///
/// `Confirmed` means the update is durable and visible to subsequent
/// reads; `Reverted` means the slot is unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Finality {
    Confirmed,
    Reverted,
}

impl Finality {
    pub fn is_confirmed(self) -> bool {
        matches!(self, Finality::Confirmed)
    }
}

/// Read and transactionally update per-owner root pointers.
///
/// There is no compare-and-swap: two concurrent writers for the same
/// owner can lose an update (last confirmed transaction wins). Callers
/// that need stronger guarantees must serialize writes per owner.
#[async_trait]
pub trait PointerLedger: Send + Sync {
    /// Current pointer value for `owner`; `None` means the slot was never
    /// written, which is the normal state for a new owner.
    async fn read(&self, owner: &OwnerId) -> Result<Option<ContentId>, LedgerError>;

    /// Submit a pointer update. The slot is not changed until the
    /// returned transaction reaches finality.
    async fn submit_update(
        &self,
        owner: &OwnerId,
        value: &ContentId,
    ) -> Result<PointerTx, LedgerError>;

    /// Block until the ledger reports the transaction durable or reverted.
    async fn wait_finality(&self, tx: &PointerTx) -> Result<Finality, LedgerError>;
}
