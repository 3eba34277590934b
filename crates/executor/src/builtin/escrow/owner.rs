// Copyright 2021 Volta Foundation. All rights reserved.
// Volta is free software and distributed under GNU General Public License.
// See http://www.gnu.org/licenses/

//! Owner-side escrow operations: create, lock, start.

use super::{
    ledger::{EscrowLedger, EscrowSpec},
    read_address, ADDRESSED_INPUT_LEN, CREATE_INPUT_LEN,
};
use byteorder::{BigEndian, ByteOrder};
use keccak_hash::keccak;
use volta_parameters::escrow::MAX_PERCENT_PRECISION;
use volta_types::{address_util::AddressUtil, Address, Bytes, U256};
use volta_vm_types::{ExecutionContext, KernelInterface};

const OP_CREATE: u8 = 0x0;
const OP_LOCK: u8 = 0x1;
const OP_START: u8 = 0x2;

const FLAG_DIRECT_DEPOSIT: u8 = 0x1;
const FLAG_IS_TEST: u8 = 0x2;

pub(crate) fn execute(
    context: &ExecutionContext, kernel: &mut dyn KernelInterface,
    input: &[u8],
) -> Option<Bytes> {
    match *input.first()? {
        OP_CREATE => create(context, kernel, input),
        OP_LOCK => lock(context, kernel, input),
        OP_START => start(context, kernel, input),
        _ => None,
    }
}

/// The deterministic address of the instance an owner creates at a given
/// nonce: keccak(owner || nonce) under the escrow class prefix.
pub(crate) fn escrow_contract_address(
    owner: &Address, nonce: &U256,
) -> Address {
    let mut buffer = [0u8; 64];
    buffer[..32].copy_from_slice(owner.as_bytes());
    nonce.to_big_endian(&mut buffer[32..]);
    let mut address = keccak(&buffer[..]);
    address.set_escrow_contract_type_bits();
    address
}

fn create(
    context: &ExecutionContext, kernel: &mut dyn KernelInterface,
    input: &[u8],
) -> Option<Bytes> {
    if input.len() != CREATE_INPUT_LEN {
        return None;
    }
    let flags = input[1];
    if flags & !(FLAG_DIRECT_DEPOSIT | FLAG_IS_TEST) != 0 {
        return None;
    }
    let periods = BigEndian::read_u16(&input[2..4]);
    if periods == 0 {
        return None;
    }
    let percent = U256::from_big_endian(&input[4..13]);
    let precision = input[13];
    if precision > MAX_PERCENT_PRECISION {
        return None;
    }
    // The percentage must not exceed 100% at its own precision.
    let scale =
        U256::from(100u64) * U256::from(10u64.pow(precision as u32));
    if percent > scale {
        return None;
    }

    let owner = context.caller;
    let contract = escrow_contract_address(&owner, &kernel.nonce(&owner));
    let mut ledger = EscrowLedger::open(kernel, contract);
    if ledger.exists() {
        return None;
    }
    ledger.initialize(
        &owner,
        &EscrowSpec {
            is_test: flags & FLAG_IS_TEST != 0,
            direct_deposit: flags & FLAG_DIRECT_DEPOSIT != 0,
            periods,
            percent,
            precision,
        },
    );
    debug!("created escrow instance {:?}, owner {:?}", contract, owner);
    Some(contract.as_bytes().to_vec())
}

/// Requires an existing instance owned by the caller.
fn owned_instance<'k>(
    context: &ExecutionContext, kernel: &'k mut dyn KernelInterface,
    input: &[u8],
) -> Option<EscrowLedger<'k>> {
    if input.len() != ADDRESSED_INPUT_LEN {
        return None;
    }
    let ledger = EscrowLedger::open(kernel, read_address(input, 1));
    if !ledger.exists() || ledger.owner() != context.caller {
        return None;
    }
    Some(ledger)
}

fn lock(
    context: &ExecutionContext, kernel: &mut dyn KernelInterface,
    input: &[u8],
) -> Option<Bytes> {
    let mut ledger = owned_instance(context, kernel, input)?;
    if ledger.is_locked() || ledger.is_live() {
        return None;
    }
    // An instance nobody funded cannot be locked.
    if ledger.total_deposited().is_zero() {
        return None;
    }
    ledger.set_locked();
    Some(Bytes::new())
}

fn start(
    context: &ExecutionContext, kernel: &mut dyn KernelInterface,
    input: &[u8],
) -> Option<Bytes> {
    let block = context.env.number;
    let mut ledger = owned_instance(context, kernel, input)?;
    if !ledger.is_locked() || ledger.is_live() {
        return None;
    }
    ledger.set_live();
    ledger.set_start_block(block);
    // Whatever sits in the instance beyond the deposits becomes the bonus
    // pool, fixed from here on.
    let bonus = ledger
        .contract_balance()
        .saturating_sub(ledger.total_deposited());
    ledger.set_bonus_pool(bonus);
    Some(Bytes::new())
}
