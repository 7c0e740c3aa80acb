//! Remote ledger client for kotori.
//!
//! The ledger is a single `posts.json` document stored per branch in a
//! Git-hosting content API. Every read returns a
//! [`Versioned`](kotori_types::Versioned) timeline; every write must present
//! a [`WriteToken`](kotori_types::WriteToken) obtained from
//! [`LedgerStore::refresh_token`] immediately beforehand.
//!
//! # Token discipline
//!
//! Writes are whole-document replaces, so two sessions racing on the same
//! branch can overwrite each other. The discipline enforced here — refresh
//! the token as the last step before constructing the write — narrows the
//! window to the refresh→write gap but does not close it. That residual
//! lost-update race is an accepted limitation of the document model, not
//! something this client resolves.
//!
//! # Implementations
//!
//! - [`ContentLedger`] — the production content-API client
//! - [`InMemoryLedger`] — revision-counted store for tests, with an
//!   out-of-band writer to simulate a second session
//! - [`StaticReader`] — unauthenticated plain `posts.json` fallback for
//!   read-only consumers

pub mod content;
pub mod error;
pub mod memory;
pub mod reader;
pub mod traits;

pub use content::ContentLedger;
pub use error::{LedgerError, LedgerResult};
pub use memory::InMemoryLedger;
pub use reader::StaticReader;
pub use traits::LedgerStore;
