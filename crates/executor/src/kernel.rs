// Copyright 2021 Volta Foundation. All rights reserved.
// Volta is free software and distributed under GNU General Public License.
// See http://www.gnu.org/licenses/

use crate::substate::SideEffects;
use volta_primitives::LogEntry;
use volta_state::Repository;
use volta_types::{Address, Bytes, H256, U256};
use volta_vm_types::{InternalTransaction, KernelInterface};

/// The kernel handed to contract logic: an adapter over the executor's
/// tracking layer. Contract logic gets the relaxed surface the kernel
/// contract promises; repository-level invariant violations are absorbed
/// here and reported through return values, never as faults.
pub struct RepoKernel<'a> {
    repo: &'a mut dyn Repository,
    side_effects: &'a mut SideEffects,
    ask_nonce: bool,
    local_call: bool,
}

impl<'a> RepoKernel<'a> {
    pub fn new(
        repo: &'a mut dyn Repository, side_effects: &'a mut SideEffects,
        ask_nonce: bool, local_call: bool,
    ) -> RepoKernel<'a> {
        RepoKernel {
            repo,
            side_effects,
            ask_nonce,
            local_call,
        }
    }
}

impl<'a> KernelInterface for RepoKernel<'a> {
    fn account_exists(&self, address: &Address) -> bool {
        self.repo.has_account(address)
    }

    fn create_account(&mut self, address: &Address) {
        if let Err(e) = self.repo.create_account(address) {
            debug!("kernel create_account refused: {}", e);
        }
    }

    fn balance(&self, address: &Address) -> U256 {
        self.repo.balance(address)
    }

    fn add_balance(&mut self, address: &Address, by: &U256) {
        if let Err(e) = self.repo.add_balance(address, by) {
            debug!("kernel add_balance refused: {}", e);
        }
    }

    fn sub_balance(&mut self, address: &Address, by: &U256) -> bool {
        self.repo.sub_balance(address, by).is_ok()
    }

    fn nonce(&self, address: &Address) -> U256 { self.repo.nonce(address) }

    fn increment_nonce(&mut self, address: &Address) {
        if let Err(e) = self.repo.increment_nonce(address) {
            debug!("kernel increment_nonce refused: {}", e);
        }
    }

    fn code(&self, address: &Address) -> Bytes { self.repo.code(address) }

    fn save_code(&mut self, address: &Address, code: Bytes) {
        if let Err(e) = self.repo.save_code(address, code) {
            debug!("kernel save_code refused: {}", e);
        }
    }

    fn storage_at(&self, address: &Address, key: &H256) -> H256 {
        self.repo.storage_at(address, key)
    }

    fn set_storage(&mut self, address: &Address, key: H256, value: H256) {
        if let Err(e) = self.repo.set_storage(address, key, value) {
            debug!("kernel set_storage refused: {}", e);
        }
    }

    fn log(&mut self, entry: LogEntry) { self.side_effects.add_log(entry); }

    fn record_internal_transaction(&mut self, tx: InternalTransaction) {
        self.side_effects.add_internal_transaction(tx);
    }

    fn mark_for_deletion(&mut self, address: Address) {
        self.side_effects.mark_deletion(address);
    }

    fn is_local_call(&self) -> bool { self.local_call }

    fn nonce_checks_enabled(&self) -> bool { self.ask_nonce }
}
