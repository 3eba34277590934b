// Copyright 2021 Volta Foundation. All rights reserved.
// Volta is free software and distributed under GNU General Public License.
// See http://www.gnu.org/licenses/

use super::env::Env;
use volta_types::{Address, Bytes, H256, U256};

/// Kind of dispatch a context describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallKind {
    Call,
    Create,
}

/// Immutable snapshot of transaction and block environment handed into
/// contract execution. Created once per top-level transaction and
/// re-derived, with incremented depth, for each nested call.
#[derive(Debug, Clone)]
pub struct ExecutionContext {
    /// Hash of the enclosing transaction.
    pub tx_hash: H256,
    /// The address contract logic acts as: the destination of a call, or
    /// the address a creation will deploy to.
    pub address: Address,
    /// The transaction initiator.
    pub origin: Address,
    /// Sender of the current part of the transaction.
    pub caller: Address,
    /// Price per unit of energy.
    pub energy_price: U256,
    /// Energy available to contract logic, base transaction cost already
    /// deducted.
    pub energy_limit: u64,
    /// Value passed along with the dispatch.
    pub call_value: U256,
    /// Input data; empty for contract creations (the deployer code travels
    /// as the transaction payload, not as call data).
    pub call_data: Bytes,
    /// Nesting depth; zero for the top-level dispatch.
    pub depth: usize,
    pub kind: CallKind,
    pub flags: u32,
    /// The enclosing block, difficulty already truncated to 16 bytes.
    pub env: Env,
}

impl ExecutionContext {
    /// Difficulty is carried in a 16-byte field; wider block difficulties
    /// are truncated to their low 16 bytes.
    pub fn truncate_difficulty(difficulty: U256) -> U256 {
        U256::from(difficulty.low_u128())
    }

    /// Derives the context of a nested dispatch.
    pub fn nested(
        &self, address: Address, caller: Address, call_value: U256,
        call_data: Bytes, kind: CallKind, energy_limit: u64,
    ) -> ExecutionContext {
        ExecutionContext {
            tx_hash: self.tx_hash,
            address,
            origin: self.origin,
            caller,
            energy_price: self.energy_price,
            energy_limit,
            call_value,
            call_data,
            depth: self.depth + 1,
            kind,
            flags: self.flags,
            env: self.env.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn difficulty_truncates_to_sixteen_bytes() {
        let wide = U256::from(1) << 200;
        assert_eq!(ExecutionContext::truncate_difficulty(wide), U256::zero());

        let narrow = U256::from(0xabcdu64);
        assert_eq!(ExecutionContext::truncate_difficulty(narrow), narrow);
    }

    #[test]
    fn nested_context_bumps_depth_and_keeps_origin() {
        let context = ExecutionContext {
            tx_hash: H256::zero(),
            address: Address::from_low_u64_be(1),
            origin: Address::from_low_u64_be(2),
            caller: Address::from_low_u64_be(2),
            energy_price: U256::one(),
            energy_limit: 100_000,
            call_value: U256::zero(),
            call_data: vec![],
            depth: 0,
            kind: CallKind::Call,
            flags: 0,
            env: Env::default(),
        };
        let nested = context.nested(
            Address::from_low_u64_be(3),
            context.address,
            U256::from(5),
            vec![0x01],
            CallKind::Call,
            50_000,
        );
        assert_eq!(nested.depth, 1);
        assert_eq!(nested.origin, context.origin);
        assert_eq!(nested.caller, context.address);
        assert_eq!(nested.energy_limit, 50_000);
    }
}
