// Copyright 2021 Volta Foundation. All rights reserved.
// Volta is free software and distributed under GNU General Public License.
// See http://www.gnu.org/licenses/

use super::internal_transaction::InternalTransaction;
use volta_primitives::LogEntry;
use volta_types::{Address, Bytes, H256, U256};

/// The state surface handed to contract logic (the bytecode interpreter and
/// the precompiled contracts). An adapter over the account repository
/// implements this; contract logic never sees the repository directly.
///
/// State mutations performed through a kernel land in the executor's
/// tracking layer and share its fate: committed when the transaction
/// succeeds, discarded otherwise.
pub trait KernelInterface {
    fn account_exists(&self, address: &Address) -> bool;

    fn create_account(&mut self, address: &Address);

    fn balance(&self, address: &Address) -> U256;

    fn add_balance(&mut self, address: &Address, by: &U256);

    /// Returns false, leaving the balance untouched, when the funds are
    /// insufficient.
    fn sub_balance(&mut self, address: &Address, by: &U256) -> bool;

    fn nonce(&self, address: &Address) -> U256;

    fn increment_nonce(&mut self, address: &Address);

    fn code(&self, address: &Address) -> Bytes;

    fn save_code(&mut self, address: &Address, code: Bytes);

    fn storage_at(&self, address: &Address, key: &H256) -> H256;

    fn set_storage(&mut self, address: &Address, key: H256, value: H256);

    fn log(&mut self, entry: LogEntry);

    fn record_internal_transaction(&mut self, tx: InternalTransaction);

    fn mark_for_deletion(&mut self, address: Address);

    /// Read-only and estimation calls run with this flag set; it
    /// suppresses nonce-sensitive validation and fee settlement.
    fn is_local_call(&self) -> bool;

    /// Whether nonce checks apply to nested dispatches.
    fn nonce_checks_enabled(&self) -> bool;
}
