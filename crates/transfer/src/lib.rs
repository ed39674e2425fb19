//! File Transfer Orchestrator
//!
//! Moves batches of files between the caller and the content store,
//! sealing and opening each file with the owner's key on the way
//! through. Uploads are strictly ordered and all-or-nothing; downloads
//! skip unfetchable items to recover as much history as possible.

pub mod errors;
pub mod orchestrator;
pub mod progress;

pub use errors::{TransferError, UploadCause};
pub use orchestrator::TransferOrchestrator;
pub use progress::{NoopProgress, TransferProgress};
