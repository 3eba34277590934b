// Copyright 2021 Volta Foundation. All rights reserved.
// Volta is free software and distributed under GNU General Public License.
// See http://www.gnu.org/licenses/

//! The token release schedule (escrow) contract family.
//!
//! An escrow instance holds deposits that unlock over a configured number
//! of periods once the instance is locked and started. Its lifecycle is a
//! one-way state machine, every transition gated on the instance owner:
//!
//! `Created` -- lock --> `Locked` -- start --> `Live`
//!
//! Deposits are accepted while unlocked, withdrawals while live. The
//! input protocol is byte-oriented: the first byte selects an operation
//! scoped to the contract role (owner / user / query); the remaining bytes
//! are fixed-offset, fixed-width fields with big-endian magnitudes
//! right-aligned into their field. There is no length prefix and no
//! self-describing schema; a malformed length or field refuses the whole
//! operation.

mod ledger;
pub(crate) mod owner;
pub(crate) mod query;
pub(crate) mod user;


pub use ledger::{EscrowLedger, EscrowSpec};

use volta_types::{Address, U256, U512};

/// Input length of the create operation:
/// op, flags, periods (2), percent magnitude (9), precision.
pub const CREATE_INPUT_LEN: usize = 14;
/// Input length of every operation addressing an instance: op, address.
pub const ADDRESSED_INPUT_LEN: usize = 33;
/// Input length of the deposit operation: op, address, amount (128).
pub const DEPOSIT_INPUT_LEN: usize = 161;
/// Input length of the refund operation:
/// op, address, target account, amount (128).
pub const REFUND_INPUT_LEN: usize = 193;
/// Input length of the period-at query: op, address, block number (8).
pub const PERIOD_AT_INPUT_LEN: usize = 41;

/// Single-byte boolean outputs of query operations.
pub const OUTPUT_FALSE: u8 = 0x0;
pub const OUTPUT_TRUE: u8 = 0x1;

pub(crate) fn read_address(input: &[u8], offset: usize) -> Address {
    Address::from_slice(&input[offset..offset + 32])
}

/// Reads a big-endian magnitude right-aligned in `field`. Magnitudes wider
/// than the arithmetic word are refused rather than truncated.
pub(crate) fn read_magnitude(field: &[u8]) -> Option<U256> {
    if field.len() > 32 {
        let (head, tail) = field.split_at(field.len() - 32);
        if head.iter().any(|b| *b != 0) {
            return None;
        }
        Some(U256::from_big_endian(tail))
    } else {
        Some(U256::from_big_endian(field))
    }
}

fn narrow(wide: U512) -> U256 {
    let U512(ref limbs) = wide;
    debug_assert!(limbs[4..].iter().all(|limb| *limb == 0));
    U256([limbs[0], limbs[1], limbs[2], limbs[3]])
}

/// `a * b / den` with a double-width intermediate. Callers guarantee
/// `b <= den`, so the quotient always fits back into a word.
pub(crate) fn mul_div(a: U256, b: U256, den: U256) -> U256 {
    narrow(U512::from(a) * U512::from(b) / U512::from(den))
}
