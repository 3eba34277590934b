// Copyright 2021 Volta Foundation. All rights reserved.
// Volta is free software and distributed under GNU General Public License.
// See http://www.gnu.org/licenses/

//! Consensus-critical constants. Everything here is part of the protocol:
//! changing a value is a hard fork.

pub mod energy {
    /// Base energy charged for a message-call transaction.
    pub const TX_BASE_ENERGY: u64 = 21_000;
    /// Base energy charged for a contract-creation transaction.
    pub const TX_CREATE_ENERGY: u64 = 200_000;
    /// Energy charged per zero byte of transaction data.
    pub const TX_DATA_ZERO_ENERGY: u64 = 4;
    /// Energy charged per non-zero byte of transaction data.
    pub const TX_DATA_NON_ZERO_ENERGY: u64 = 64;
}

pub mod internal_contract_addresses {
    use hex_literal::hex;
    use volta_types::{Address, H256};

    /// Owner-facing escrow operations: create, lock, start.
    pub const ESCROW_OWNER_CONTRACT_ADDRESS: Address = H256(hex!(
        "a000000000000000000000000000000000000000000000000000000000000100"
    ));
    /// Depositor-facing escrow operations: deposit, withdraw, refund.
    pub const ESCROW_USER_CONTRACT_ADDRESS: Address = H256(hex!(
        "a000000000000000000000000000000000000000000000000000000000000200"
    ));
    /// Read-only escrow queries.
    pub const ESCROW_QUERY_CONTRACT_ADDRESS: Address = H256(hex!(
        "a000000000000000000000000000000000000000000000000000000000000300"
    ));
}

pub mod escrow {
    /// Flat energy cost of every escrow contract operation.
    pub const ESCROW_OP_ENERGY: u64 = 21_000;
    /// Blocks per release period for production escrow instances.
    pub const PERIOD_BLOCKS: u64 = 259_200;
    /// Blocks per release period for test-mode escrow instances.
    pub const TEST_PERIOD_BLOCKS: u64 = 10;
    /// Largest accepted decimal precision of the bonus percentage.
    /// Keeps `10^precision` within u64 range.
    pub const MAX_PERCENT_PRECISION: u8 = 18;
}
