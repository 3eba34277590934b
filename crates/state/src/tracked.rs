// Copyright 2021 Volta Foundation. All rights reserved.
// Volta is free software and distributed under GNU General Public License.
// See http://www.gnu.org/licenses/

use super::{
    account::{AccountEntry, AccountState},
    error::{Error, Result},
    repository::{AccountPolicy, Repository, RepositoryOptions},
};
use std::collections::HashMap;
use volta_types::{Address, Bytes, H256, U256};

/// A mutable overlay over a parent repository.
///
/// Reads fall through to the parent for anything not written locally;
/// writes stay in the overlay until `flush` merges them down in a single
/// pass. Dropping the layer (or calling `rollback`) discards every local
/// write. Layers nest to unbounded depth: a `Tracked` is itself a
/// `Repository` and can parent another `Tracked`.
///
/// Starting a layer is O(1): the overlay begins empty and account state is
/// copied in lazily, one account at a time, on first touch.
pub struct Tracked<'a> {
    parent: &'a mut dyn Repository,
    accounts: HashMap<Address, AccountEntry>,
    code: HashMap<Address, Bytes>,
    storage: HashMap<Address, HashMap<H256, H256>>,
}

impl<'a> Tracked<'a> {
    pub fn new(parent: &'a mut dyn Repository) -> Tracked<'a> {
        Tracked {
            parent,
            accounts: HashMap::new(),
            code: HashMap::new(),
            storage: HashMap::new(),
        }
    }

    /// Merges this layer's writes into its parent. Entries are applied in
    /// address order so that merging is deterministic.
    pub fn flush(self) -> Result<()> {
        let Tracked {
            parent,
            accounts,
            code,
            storage,
        } = self;

        let mut touched: Vec<(Address, AccountEntry)> = accounts
            .into_iter()
            .filter(|(_, entry)| entry.is_dirty())
            .collect();
        touched.sort_by_key(|(address, _)| *address);
        for (address, entry) in touched {
            match entry {
                AccountEntry::Deleted => parent.delete_account(&address)?,
                AccountEntry::Cached(state, _) => {
                    parent.update_account(&address, state)?
                }
                AccountEntry::Missing => {}
            }
        }

        let mut code: Vec<(Address, Bytes)> = code.into_iter().collect();
        code.sort_by_key(|(address, _)| *address);
        for (address, bytes) in code {
            parent.save_code(&address, bytes)?;
        }

        let mut storage: Vec<(Address, HashMap<H256, H256>)> =
            storage.into_iter().collect();
        storage.sort_by_key(|(address, _)| *address);
        for (address, rows) in storage {
            let mut rows: Vec<(H256, H256)> = rows.into_iter().collect();
            rows.sort_by_key(|(key, _)| *key);
            for (key, value) in rows {
                parent.set_storage(&address, key, value)?;
            }
        }

        Ok(())
    }

    /// Discards all local writes. Safe to call even when nothing was
    /// written.
    pub fn rollback(self) {}

    /// Loads the parent's view of `address` into the overlay, if the
    /// overlay has no entry for it yet.
    fn load_entry(&mut self, address: &Address) {
        if self.accounts.contains_key(address) {
            return;
        }
        let loaded = if self.parent.has_account(address) {
            Some(AccountState {
                balance: self.parent.balance(address),
                nonce: self.parent.nonce(address),
            })
        } else {
            None
        };
        self.accounts
            .insert(*address, AccountEntry::new_loaded(loaded));
    }
}

impl<'a> Repository for Tracked<'a> {
    fn options(&self) -> &RepositoryOptions { self.parent.options() }

    fn create_account(&mut self, address: &Address) -> Result<()> {
        self.accounts.insert(
            *address,
            AccountEntry::new_dirty(AccountState::new_empty()),
        );
        Ok(())
    }

    fn has_account(&self, address: &Address) -> bool {
        match self.accounts.get(address) {
            Some(entry) => entry.exists(),
            None => self.parent.has_account(address),
        }
    }

    fn account_state(
        &mut self, address: &Address,
    ) -> Result<&mut AccountState> {
        let policy = self.parent.options().account_policy;
        self.load_entry(address);
        let entry =
            self.accounts.entry(*address).or_insert(AccountEntry::Missing);
        match entry {
            AccountEntry::Cached(state, dirty) => {
                *dirty = true;
                Ok(state)
            }
            entry => {
                if policy == AccountPolicy::Strict {
                    return Err(Error::MissingAccount(*address));
                }
                *entry = AccountEntry::new_dirty(AccountState::new_empty());
                match entry {
                    AccountEntry::Cached(state, _) => Ok(state),
                    _ => unreachable!("entry was just replaced"),
                }
            }
        }
    }

    fn update_account(
        &mut self, address: &Address, state: AccountState,
    ) -> Result<()> {
        self.accounts
            .insert(*address, AccountEntry::new_dirty(state));
        Ok(())
    }

    fn delete_account(&mut self, address: &Address) -> Result<()> {
        self.accounts.insert(*address, AccountEntry::Deleted);
        self.code.remove(address);
        self.storage.remove(address);
        Ok(())
    }

    fn nonce(&self, address: &Address) -> U256 {
        match self.accounts.get(address) {
            Some(entry) => {
                entry.account().map_or_else(U256::zero, |state| state.nonce)
            }
            None => self.parent.nonce(address),
        }
    }

    fn increment_nonce(&mut self, address: &Address) -> Result<U256> {
        Ok(self.account_state(address)?.increment_nonce())
    }

    fn set_nonce(&mut self, _address: &Address, _nonce: U256) -> Result<()> {
        Err(Error::UnsupportedOnTrackingLayer("set_nonce"))
    }

    fn balance(&self, address: &Address) -> U256 {
        match self.accounts.get(address) {
            Some(entry) => entry
                .account()
                .map_or_else(U256::zero, |state| state.balance),
            None => self.parent.balance(address),
        }
    }

    fn add_balance(&mut self, address: &Address, by: &U256) -> Result<U256> {
        Ok(self.account_state(address)?.add_balance(by))
    }

    fn sub_balance(&mut self, address: &Address, by: &U256) -> Result<U256> {
        let state = self.account_state(address)?;
        let balance = state.balance;
        state.sub_balance(by).ok_or(Error::NegativeBalance {
            address: *address,
            balance,
            required: *by,
        })
    }

    fn save_code(&mut self, address: &Address, code: Bytes) -> Result<()> {
        self.account_state(address)?;
        self.code.insert(*address, code);
        Ok(())
    }

    fn code(&self, address: &Address) -> Bytes {
        if let Some(entry) = self.accounts.get(address) {
            if !entry.exists() {
                return Bytes::new();
            }
        }
        match self.code.get(address) {
            Some(code) => code.clone(),
            None => self.parent.code(address),
        }
    }

    fn set_storage(
        &mut self, address: &Address, key: H256, value: H256,
    ) -> Result<()> {
        self.account_state(address)?;
        self.storage.entry(*address).or_default().insert(key, value);
        Ok(())
    }

    fn storage_at(&self, address: &Address, key: &H256) -> H256 {
        if let Some(entry) = self.accounts.get(address) {
            if !entry.exists() {
                return self.parent.options().storage_miss_word;
            }
        }
        if let Some(value) =
            self.storage.get(address).and_then(|rows| rows.get(key))
        {
            return *value;
        }
        self.parent.storage_at(address, key)
    }

    fn commit(&mut self) -> Result<H256> {
        Err(Error::UnsupportedOnTrackingLayer("commit"))
    }

    fn root(&self) -> Result<H256> {
        Err(Error::UnsupportedOnTrackingLayer("root"))
    }

    fn sync_to_root(&mut self, _root: &H256) -> Result<()> {
        Err(Error::UnsupportedOnTrackingLayer("sync_to_root"))
    }

    fn is_valid_root(&self, root: &H256) -> bool {
        self.parent.is_valid_root(root)
    }

    fn compact(&mut self) -> Result<()> {
        Err(Error::UnsupportedOnTrackingLayer("compact"))
    }
}
