// Copyright 2021 Volta Foundation. All rights reserved.
// Volta is free software and distributed under GNU General Public License.
// See http://www.gnu.org/licenses/

//! Layered account repository: the copy-on-write state store underneath the
//! execution engine. A root store owns the committed world; any number of
//! tracking layers can be stacked on top of it, each isolating the writes of
//! one execution scope until they are flushed into the parent or rolled
//! back.

#[macro_use]
extern crate log;

/// Account State: The balance/nonce record handed out by the repository,
/// plus the overlay entry type used inside tracking layers.
mod account;

/// Repository errors.
mod error;

/// In-memory root store addressed by committed state roots.
mod memory;

/// The repository contract shared by the root store, tracking layers and
/// historical snapshots.
mod repository;

/// Tracking layer: a mutable overlay over a parent repository.
mod tracked;

pub use account::{AccountEntry, AccountState};
pub use error::{Error, Result};
pub use memory::{MemoryRepository, Snapshot};
pub use repository::{AccountPolicy, Repository, RepositoryOptions};
pub use tracked::Tracked;
