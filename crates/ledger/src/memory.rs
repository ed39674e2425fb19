//! In-memory pointer ledger for tests and local mode.

use crate::errors::LedgerError;
use crate::{Finality, PointerLedger, PointerTx};
use anchorfs_types::{ContentId, OwnerId};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

/// In-memory [`PointerLedger`] with scripted finality outcomes.
///
/// A submitted update is held pending and applied to the owner's slot
/// only when `wait_finality` returns `Confirmed` — the slot never shows
/// an unconfirmed value, mirroring the atomicity of a real ledger
/// transaction. Tests script outcomes with [`enqueue_finality`]; the
/// default outcome is `Confirmed`.
///
/// [`enqueue_finality`]: MemoryPointerLedger::enqueue_finality
#[derive(Clone, Default)]
pub struct MemoryPointerLedger {
    inner: Arc<RwLock<Inner>>,
}

#[derive(Default)]
struct Inner {
    slots: HashMap<OwnerId, ContentId>,
    pending: HashMap<String, (OwnerId, ContentId)>,
    scripted: VecDeque<Finality>,
    next_tx: u64,
    fail_reads: bool,
}

impl MemoryPointerLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the outcome of the next `wait_finality` call.
    pub fn enqueue_finality(&self, outcome: Finality) {
        self.inner.write().scripted.push_back(outcome);
    }

    /// Toggle failure of every `read`.
    pub fn fail_reads(&self, fail: bool) {
        self.inner.write().fail_reads = fail;
    }

    /// Current slot value, bypassing the adapter interface. Test helper.
    pub fn pointer_of(&self, owner: &OwnerId) -> Option<ContentId> {
        self.inner.read().slots.get(owner).cloned()
    }

    /// Seed a slot directly. Test helper.
    pub fn set_pointer(&self, owner: OwnerId, value: ContentId) {
        self.inner.write().slots.insert(owner, value);
    }
}

#[async_trait]
impl PointerLedger for MemoryPointerLedger {
    async fn read(&self, owner: &OwnerId) -> Result<Option<ContentId>, LedgerError> {
        let inner = self.inner.read();
        if inner.fail_reads {
            return Err(LedgerError::Unavailable("injected read failure".into()));
        }
        Ok(inner.slots.get(owner).cloned())
    }

    async fn submit_update(
        &self,
        owner: &OwnerId,
        value: &ContentId,
    ) -> Result<PointerTx, LedgerError> {
        let mut inner = self.inner.write();
        inner.next_tx += 1;
        let tx = PointerTx::new(format!("tx-{}", inner.next_tx));
        inner
            .pending
            .insert(tx.id.clone(), (owner.clone(), value.clone()));
        Ok(tx)
    }

    async fn wait_finality(&self, tx: &PointerTx) -> Result<Finality, LedgerError> {
        let mut inner = self.inner.write();
        let (owner, value) = inner
            .pending
            .remove(&tx.id)
            .ok_or_else(|| LedgerError::UnknownTx(tx.id.clone()))?;

        let outcome = inner
            .scripted
            .pop_front()
            .unwrap_or(Finality::Confirmed);
        if outcome.is_confirmed() {
            inner.slots.insert(owner, value);
        }
        Ok(outcome)
    }
}
