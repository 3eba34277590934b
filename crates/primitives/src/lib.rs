// Copyright 2021 Volta Foundation. All rights reserved.
// Volta is free software and distributed under GNU General Public License.
// See http://www.gnu.org/licenses/

extern crate keccak_hash as hash;

pub mod account;
pub mod log_entry;
pub mod receipt;
pub mod transaction;

pub use crate::{
    account::Account,
    log_entry::LogEntry,
    receipt::{Receipt, TransactionOutcome},
    transaction::{Action, Transaction},
};

/// The number of a block in the chain.
pub type BlockNumber = u64;
