// Copyright 2021 Volta Foundation. All rights reserved.
// Volta is free software and distributed under GNU General Public License.
// See http://www.gnu.org/licenses/

use super::{account::AccountState, error::Result};
use volta_types::{Address, Bytes, H256, U256};

/// Mode of dealing with reads of accounts that do not exist yet.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccountPolicy {
    /// `account_state` materializes missing accounts with zero balance and
    /// nonce (the reference behavior, convenient for execution).
    AutoCreate,
    /// Accounts must be created explicitly; reads of missing accounts fail
    /// with `Error::MissingAccount`.
    Strict,
}

/// Backend options. These tune repository behavior per deployment; none of
/// them is a protocol constant.
#[derive(Clone, Debug)]
pub struct RepositoryOptions {
    pub account_policy: AccountPolicy,
    /// The word returned by `storage_at` for a key that was never written.
    pub storage_miss_word: H256,
}

impl Default for RepositoryOptions {
    fn default() -> Self {
        RepositoryOptions {
            account_policy: AccountPolicy::AutoCreate,
            storage_miss_word: H256::zero(),
        }
    }
}

/// The account repository contract, shared by the root store, tracking
/// layers and historical snapshots.
///
/// Reads fall through to the parent layer when a value is absent locally;
/// writes stay local until the layer is flushed. Operations that only make
/// sense on the root store (`commit`, `sync_to_root`, `compact`) fail fast
/// with an explicit error everywhere else instead of silently degrading.
pub trait Repository {
    fn options(&self) -> &RepositoryOptions;

    /// Inserts a zero-balance, zero-nonce account. Re-creating an existing
    /// account replaces its basic state.
    fn create_account(&mut self, address: &Address) -> Result<()>;

    fn has_account(&self, address: &Address) -> bool;

    /// Returns a mutable handle to the account's basic state. Under the
    /// `AutoCreate` policy a missing account is materialized; under
    /// `Strict` the read fails.
    fn account_state(&mut self, address: &Address)
        -> Result<&mut AccountState>;

    /// Replaces the account's basic state wholesale. This is the merge
    /// primitive used when a tracking layer flushes; it bypasses the
    /// account policy.
    fn update_account(
        &mut self, address: &Address, state: AccountState,
    ) -> Result<()>;

    /// Marks the account (and its code and storage) for removal.
    fn delete_account(&mut self, address: &Address) -> Result<()>;

    /// The account nonce, or zero if the account does not exist.
    fn nonce(&self, address: &Address) -> U256;

    fn increment_nonce(&mut self, address: &Address) -> Result<U256>;

    /// Root store only; tracking layers refuse with
    /// `UnsupportedOnTrackingLayer`.
    fn set_nonce(&mut self, address: &Address, nonce: U256) -> Result<()>;

    /// The account balance, or zero if the account does not exist.
    fn balance(&self, address: &Address) -> U256;

    fn add_balance(&mut self, address: &Address, by: &U256) -> Result<U256>;

    /// Fails with `NegativeBalance` and has no effect when the balance
    /// cannot cover the subtraction.
    fn sub_balance(&mut self, address: &Address, by: &U256) -> Result<U256>;

    fn save_code(&mut self, address: &Address, code: Bytes) -> Result<()>;

    /// The account code; empty (never null) when absent.
    fn code(&self, address: &Address) -> Bytes;

    fn set_storage(
        &mut self, address: &Address, key: H256, value: H256,
    ) -> Result<()>;

    /// The stored word for `key`, or the backend's configured miss word
    /// when the key was never written.
    fn storage_at(&self, address: &Address, key: &H256) -> H256;

    /// Commits the current world and returns its state root. Root store
    /// only.
    fn commit(&mut self) -> Result<H256>;

    /// The state root of the current world. Root store only.
    fn root(&self) -> Result<H256>;

    /// Rewinds the current world to a previously committed root. Root
    /// store only.
    fn sync_to_root(&mut self, root: &H256) -> Result<()>;

    fn is_valid_root(&self, root: &H256) -> bool;

    /// Compacts the underlying store. Only valid on the root layer.
    fn compact(&mut self) -> Result<()>;
}
