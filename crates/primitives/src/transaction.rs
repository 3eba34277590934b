// Copyright 2021 Volta Foundation. All rights reserved.
// Volta is free software and distributed under GNU General Public License.
// See http://www.gnu.org/licenses/

use crate::hash::keccak;
use rlp::{Decodable, DecoderError, Encodable, Rlp, RlpStream};
use volta_types::{Address, Bytes, H256, U256};

/// Transaction action: either a message call to an existing account or the
/// creation of a new contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Create creates new contract.
    Create,
    /// Calls contract at given address.
    Call(Address),
}

impl Default for Action {
    fn default() -> Action { Action::Create }
}

impl Encodable for Action {
    fn rlp_append(&self, stream: &mut RlpStream) {
        match *self {
            Action::Create => stream.append_internal(&""),
            Action::Call(ref address) => stream.append_internal(address),
        };
    }
}

impl Decodable for Action {
    fn decode(rlp: &Rlp) -> Result<Self, DecoderError> {
        if rlp.is_empty() {
            Ok(Action::Create)
        } else {
            Ok(Action::Call(rlp.as_val()?))
        }
    }
}

/// A transaction as handed to the execution core. Signature verification
/// happens upstream; the recovered sender rides along with the payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    /// The recovered sender of the transaction.
    pub sender: Address,
    /// The receiver, or `Create` for contract deployment.
    pub action: Action,
    /// Transferred value.
    pub value: U256,
    /// Call data, or deployer bytecode for creations.
    pub data: Bytes,
    /// Nonce, must equal the sender's account nonce at execution time.
    pub nonce: U256,
    /// Price per unit of energy, paid from the sender's balance.
    pub energy_price: U256,
    /// Upper bound of energy this transaction may consume.
    pub energy_limit: u64,
}

impl Transaction {
    pub fn is_create(&self) -> bool { self.action == Action::Create }

    pub fn destination(&self) -> Option<&Address> {
        match self.action {
            Action::Create => None,
            Action::Call(ref address) => Some(address),
        }
    }

    /// The keccak digest of the RLP encoding, identifying the transaction.
    pub fn hash(&self) -> H256 { keccak(rlp::encode(self)) }
}

impl Encodable for Transaction {
    fn rlp_append(&self, s: &mut RlpStream) {
        s.begin_list(7);
        s.append(&self.sender);
        s.append(&self.action);
        s.append(&self.value);
        s.append(&self.data);
        s.append(&self.nonce);
        s.append(&self.energy_price);
        s.append(&self.energy_limit);
    }
}

impl Decodable for Transaction {
    fn decode(rlp: &Rlp) -> Result<Self, DecoderError> {
        if rlp.item_count()? != 7 {
            return Err(DecoderError::RlpIncorrectListLen);
        }
        Ok(Transaction {
            sender: rlp.val_at(0)?,
            action: rlp.val_at(1)?,
            value: rlp.val_at(2)?,
            data: rlp.val_at(3)?,
            nonce: rlp.val_at(4)?,
            energy_price: rlp.val_at(5)?,
            energy_limit: rlp.val_at(6)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_call() -> Transaction {
        Transaction {
            sender: Address::from_low_u64_be(1),
            action: Action::Call(Address::from_low_u64_be(2)),
            value: U256::from(10),
            data: vec![0xca, 0xfe],
            nonce: U256::zero(),
            energy_price: U256::from(1),
            energy_limit: 50_000,
        }
    }

    #[test]
    fn rlp_round_trip() {
        let tx = sample_call();
        let decoded: Transaction = rlp::decode(&rlp::encode(&tx)).unwrap();
        assert_eq!(tx, decoded);

        let create = Transaction {
            action: Action::Create,
            ..tx
        };
        let decoded: Transaction = rlp::decode(&rlp::encode(&create)).unwrap();
        assert!(decoded.is_create());
        assert_eq!(decoded.destination(), None);
    }

    #[test]
    fn hash_is_stable_and_payload_sensitive() {
        let tx = sample_call();
        assert_eq!(tx.hash(), tx.hash());

        let mut other = sample_call();
        other.nonce = U256::one();
        assert_ne!(tx.hash(), other.hash());
    }
}
