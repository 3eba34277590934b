// Copyright 2021 Volta Foundation. All rights reserved.
// Volta is free software and distributed under GNU General Public License.
// See http://www.gnu.org/licenses/

use super::{
    account::AccountState,
    error::{Error, Result},
    repository::{AccountPolicy, Repository, RepositoryOptions},
};
use keccak_hash::{keccak, KECCAK_EMPTY};
use rlp::RlpStream;
use std::collections::HashMap;
use volta_primitives::Account;
use volta_types::{Address, Bytes, H256, U256};

/// One full account world: basic states, code, and storage rows.
#[derive(Clone, Debug, Default)]
struct World {
    accounts: HashMap<Address, AccountState>,
    code: HashMap<Address, Bytes>,
    storage: HashMap<Address, HashMap<H256, H256>>,
}

fn storage_digest(rows: &HashMap<H256, H256>) -> H256 {
    if rows.is_empty() {
        return KECCAK_EMPTY;
    }
    let mut sorted: Vec<(&H256, &H256)> = rows.iter().collect();
    sorted.sort();
    let mut stream = RlpStream::new_list(sorted.len());
    for (key, value) in sorted {
        stream.begin_list(2);
        stream.append(key);
        stream.append(value);
    }
    keccak(stream.out())
}

impl World {
    /// The state root: the keccak digest of the RLP of all committed
    /// account forms, in address order. This is a stand-in commitment; the
    /// trie node format proper is the storage backend's concern.
    fn digest(&self) -> H256 {
        let mut addresses: Vec<&Address> = self.accounts.keys().collect();
        addresses.sort();
        let mut stream = RlpStream::new_list(addresses.len());
        for address in addresses {
            let state = &self.accounts[address];
            let code_hash = match self.code.get(address) {
                Some(code) if !code.is_empty() => keccak(code),
                _ => KECCAK_EMPTY,
            };
            let storage_root = self
                .storage
                .get(address)
                .map_or(KECCAK_EMPTY, storage_digest);
            stream.append(&Account {
                address: *address,
                balance: state.balance,
                nonce: state.nonce,
                code_hash,
                storage_root,
            });
        }
        keccak(stream.out())
    }
}

/// In-memory root store. Committing snapshots the current world under its
/// state root; `sync_to_root` rewinds to any committed root.
#[derive(Default)]
pub struct MemoryRepository {
    options: RepositoryOptions,
    world: World,
    committed: HashMap<H256, World>,
}

impl MemoryRepository {
    pub fn new(options: RepositoryOptions) -> MemoryRepository {
        MemoryRepository {
            options,
            world: Default::default(),
            committed: Default::default(),
        }
    }

    /// A read-only repository view pinned to a historical committed root.
    /// Used for queries against past state, never for writes.
    pub fn snapshot_to(&self, root: &H256) -> Result<Snapshot> {
        let world = self
            .committed
            .get(root)
            .cloned()
            .ok_or(Error::UnknownRoot(*root))?;
        Ok(Snapshot {
            options: self.options.clone(),
            world,
        })
    }
}

impl Repository for MemoryRepository {
    fn options(&self) -> &RepositoryOptions { &self.options }

    fn create_account(&mut self, address: &Address) -> Result<()> {
        self.world
            .accounts
            .insert(*address, AccountState::new_empty());
        Ok(())
    }

    fn has_account(&self, address: &Address) -> bool {
        self.world.accounts.contains_key(address)
    }

    fn account_state(
        &mut self, address: &Address,
    ) -> Result<&mut AccountState> {
        match self.options.account_policy {
            AccountPolicy::AutoCreate => {
                Ok(self.world.accounts.entry(*address).or_default())
            }
            AccountPolicy::Strict => self
                .world
                .accounts
                .get_mut(address)
                .ok_or(Error::MissingAccount(*address)),
        }
    }

    fn update_account(
        &mut self, address: &Address, state: AccountState,
    ) -> Result<()> {
        self.world.accounts.insert(*address, state);
        Ok(())
    }

    fn delete_account(&mut self, address: &Address) -> Result<()> {
        self.world.accounts.remove(address);
        self.world.code.remove(address);
        self.world.storage.remove(address);
        Ok(())
    }

    fn nonce(&self, address: &Address) -> U256 {
        self.world
            .accounts
            .get(address)
            .map_or_else(U256::zero, |state| state.nonce)
    }

    fn increment_nonce(&mut self, address: &Address) -> Result<U256> {
        Ok(self.account_state(address)?.increment_nonce())
    }

    fn set_nonce(&mut self, address: &Address, nonce: U256) -> Result<()> {
        self.account_state(address)?.nonce = nonce;
        Ok(())
    }

    fn balance(&self, address: &Address) -> U256 {
        self.world
            .accounts
            .get(address)
            .map_or_else(U256::zero, |state| state.balance)
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
        self.world.code.insert(*address, code);
        Ok(())
    }

    fn code(&self, address: &Address) -> Bytes {
        self.world.code.get(address).cloned().unwrap_or_default()
    }

    fn set_storage(
        &mut self, address: &Address, key: H256, value: H256,
    ) -> Result<()> {
        self.account_state(address)?;
        self.world
            .storage
            .entry(*address)
            .or_default()
            .insert(key, value);
        Ok(())
    }

    fn storage_at(&self, address: &Address, key: &H256) -> H256 {
        self.world
            .storage
            .get(address)
            .and_then(|rows| rows.get(key))
            .copied()
            .unwrap_or(self.options.storage_miss_word)
    }

    fn commit(&mut self) -> Result<H256> {
        let root = self.world.digest();
        self.committed.insert(root, self.world.clone());
        debug!("committed state root {:?}", root);
        Ok(root)
    }

    fn root(&self) -> Result<H256> { Ok(self.world.digest()) }

    fn sync_to_root(&mut self, root: &H256) -> Result<()> {
        self.world = self
            .committed
            .get(root)
            .cloned()
            .ok_or(Error::UnknownRoot(*root))?;
        Ok(())
    }

    fn is_valid_root(&self, root: &H256) -> bool {
        self.committed.contains_key(root)
    }

    fn compact(&mut self) -> Result<()> {
        trace!("compact requested on in-memory repository; nothing to do");
        Ok(())
    }
}

/// Read-only view of one committed world.
pub struct Snapshot {
    options: RepositoryOptions,
    world: World,
}

impl Repository for Snapshot {
    fn options(&self) -> &RepositoryOptions { &self.options }

    fn create_account(&mut self, _address: &Address) -> Result<()> {
        Err(Error::UnsupportedOnSnapshot("create_account"))
    }

    fn has_account(&self, address: &Address) -> bool {
        self.world.accounts.contains_key(address)
    }

    fn account_state(
        &mut self, _address: &Address,
    ) -> Result<&mut AccountState> {
        Err(Error::UnsupportedOnSnapshot("account_state"))
    }

    fn update_account(
        &mut self, _address: &Address, _state: AccountState,
    ) -> Result<()> {
        Err(Error::UnsupportedOnSnapshot("update_account"))
    }

    fn delete_account(&mut self, _address: &Address) -> Result<()> {
        Err(Error::UnsupportedOnSnapshot("delete_account"))
    }

    fn nonce(&self, address: &Address) -> U256 {
        self.world
            .accounts
            .get(address)
            .map_or_else(U256::zero, |state| state.nonce)
    }

    fn increment_nonce(&mut self, _address: &Address) -> Result<U256> {
        Err(Error::UnsupportedOnSnapshot("increment_nonce"))
    }

    fn set_nonce(&mut self, _address: &Address, _nonce: U256) -> Result<()> {
        Err(Error::UnsupportedOnSnapshot("set_nonce"))
    }

    fn balance(&self, address: &Address) -> U256 {
        self.world
            .accounts
            .get(address)
            .map_or_else(U256::zero, |state| state.balance)
    }

    fn add_balance(&mut self, _address: &Address, _by: &U256) -> Result<U256> {
        Err(Error::UnsupportedOnSnapshot("add_balance"))
    }

    fn sub_balance(&mut self, _address: &Address, _by: &U256) -> Result<U256> {
        Err(Error::UnsupportedOnSnapshot("sub_balance"))
    }

    fn save_code(&mut self, _address: &Address, _code: Bytes) -> Result<()> {
        Err(Error::UnsupportedOnSnapshot("save_code"))
    }

    fn code(&self, address: &Address) -> Bytes {
        self.world.code.get(address).cloned().unwrap_or_default()
    }

    fn set_storage(
        &mut self, _address: &Address, _key: H256, _value: H256,
    ) -> Result<()> {
        Err(Error::UnsupportedOnSnapshot("set_storage"))
    }

    fn storage_at(&self, address: &Address, key: &H256) -> H256 {
        self.world
            .storage
            .get(address)
            .and_then(|rows| rows.get(key))
            .copied()
            .unwrap_or(self.options.storage_miss_word)
    }

    fn commit(&mut self) -> Result<H256> {
        Err(Error::UnsupportedOnSnapshot("commit"))
    }

    fn root(&self) -> Result<H256> { Ok(self.world.digest()) }

    fn sync_to_root(&mut self, _root: &H256) -> Result<()> {
        Err(Error::UnsupportedOnSnapshot("sync_to_root"))
    }

    fn is_valid_root(&self, root: &H256) -> bool {
        self.world.digest() == *root
    }

    fn compact(&mut self) -> Result<()> {
        Err(Error::UnsupportedOnSnapshot("compact"))
    }
}
