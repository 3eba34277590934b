// Copyright 2021 Volta Foundation. All rights reserved.
// Volta is free software and distributed under GNU General Public License.
// See http://www.gnu.org/licenses/

use crate::hash::KECCAK_EMPTY;
use rlp_derive::{RlpDecodable, RlpEncodable};
use volta_types::{Address, H256, U256};

/// The committed form of an account, as it is fed into the state root
/// digest. In-execution account data (mutable balances, code bytes,
/// storage rows) lives in the repository; this snapshot only carries the
/// hashes the commitment needs.
#[derive(
    Clone, Debug, RlpDecodable, RlpEncodable, Ord, PartialOrd, Eq, PartialEq,
)]
pub struct Account {
    pub address: Address,
    pub balance: U256,
    pub nonce: U256,
    pub code_hash: H256,
    pub storage_root: H256,
}

impl Account {
    pub fn new_empty(address: &Address) -> Account {
        Self {
            address: *address,
            balance: U256::zero(),
            nonce: U256::zero(),
            code_hash: KECCAK_EMPTY,
            storage_root: KECCAK_EMPTY,
        }
    }

    pub fn is_contract(&self) -> bool { self.code_hash != KECCAK_EMPTY }
}
