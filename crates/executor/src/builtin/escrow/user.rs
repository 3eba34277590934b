// Copyright 2021 Volta Foundation. All rights reserved.
// Volta is free software and distributed under GNU General Public License.
// See http://www.gnu.org/licenses/

//! Depositor-side escrow operations: deposit, withdraw, refund.

use super::{
    ledger::{EscrowLedger, EscrowSpec},
    mul_div, read_address, read_magnitude, ADDRESSED_INPUT_LEN,
    DEPOSIT_INPUT_LEN, REFUND_INPUT_LEN,
};
use volta_types::{Bytes, U256};
use volta_vm_types::{ExecutionContext, KernelInterface};

const OP_DEPOSIT: u8 = 0x0;
const OP_WITHDRAW: u8 = 0x1;
const OP_REFUND: u8 = 0x5;

pub(crate) fn execute(
    context: &ExecutionContext, kernel: &mut dyn KernelInterface,
    input: &[u8],
) -> Option<Bytes> {
    match *input.first()? {
        OP_DEPOSIT => deposit(context, kernel, input),
        OP_WITHDRAW => withdraw(context, kernel, input),
        OP_REFUND => refund(context, kernel, input),
        _ => None,
    }
}

fn deposit(
    context: &ExecutionContext, kernel: &mut dyn KernelInterface,
    input: &[u8],
) -> Option<Bytes> {
    if input.len() != DEPOSIT_INPUT_LEN {
        return None;
    }
    let contract = read_address(input, 1);
    let amount = read_magnitude(&input[33..DEPOSIT_INPUT_LEN])?;
    let caller = context.caller;

    let mut ledger = EscrowLedger::open(kernel, contract);
    if !ledger.exists() || ledger.is_locked() || ledger.is_live() {
        return None;
    }
    if caller != ledger.owner() && !ledger.spec().direct_deposit {
        return None;
    }
    if amount.is_zero() {
        return Some(Bytes::new());
    }
    if !ledger.transfer_in(&caller, &amount) {
        return None;
    }
    let deposit = ledger.deposit_of(&caller);
    ledger.set_deposit_of(&caller, deposit + amount);
    let total = ledger.total_deposited();
    ledger.set_total_deposited(total + amount);
    Some(Bytes::new())
}

/// The share of `owed` released through `period`: the one-off special
/// fraction unlocks with the first period alongside the linear tranche;
/// the final period releases everything outstanding.
fn unlocked_amount(spec: &EscrowSpec, owed: U256, period: u16) -> U256 {
    if period == 0 {
        return U256::zero();
    }
    if period >= spec.periods {
        return owed;
    }
    let scale =
        U256::from(100u64) * U256::from(10u64.pow(spec.precision as u32));
    let special = mul_div(owed, spec.percent, scale);
    special
        + mul_div(owed - special, U256::from(period), U256::from(spec.periods))
}

fn withdraw(
    context: &ExecutionContext, kernel: &mut dyn KernelInterface,
    input: &[u8],
) -> Option<Bytes> {
    if input.len() != ADDRESSED_INPUT_LEN {
        return None;
    }
    let contract = read_address(input, 1);
    let caller = context.caller;

    let mut ledger = EscrowLedger::open(kernel, contract);
    if !ledger.exists() || !ledger.is_live() {
        return None;
    }
    let deposit = ledger.deposit_of(&caller);
    if deposit.is_zero() {
        return None;
    }
    let total = ledger.total_deposited();
    if total.is_zero() {
        return None;
    }
    let bonus_share = mul_div(ledger.bonus_pool(), deposit, total);
    let owed = deposit + bonus_share;

    let period = ledger.period_at_block(context.env.number);
    let unlocked = unlocked_amount(&ledger.spec(), owed, period);
    let withdrawn = ledger.withdrawn_of(&caller);
    let available = unlocked.saturating_sub(withdrawn);
    if available.is_zero() {
        return None;
    }
    if !ledger.transfer_out(&caller, &available) {
        return None;
    }
    ledger.set_withdrawn_of(&caller, withdrawn + available);
    trace!(
        "escrow withdrawal: instance={:?}, account={:?}, period={}, \
         amount={}",
        contract,
        caller,
        period,
        available
    );
    Some(Bytes::new())
}

/// Owner-only reversal of a depositor's contribution, permitted while the
/// instance is still accepting deposits.
fn refund(
    context: &ExecutionContext, kernel: &mut dyn KernelInterface,
    input: &[u8],
) -> Option<Bytes> {
    if input.len() != REFUND_INPUT_LEN {
        return None;
    }
    let contract = read_address(input, 1);
    let account = read_address(input, 33);
    let amount = read_magnitude(&input[65..REFUND_INPUT_LEN])?;

    let mut ledger = EscrowLedger::open(kernel, contract);
    if !ledger.exists() || ledger.is_locked() || ledger.is_live() {
        return None;
    }
    if context.caller != ledger.owner() {
        return None;
    }
    let deposit = ledger.deposit_of(&account);
    if deposit < amount {
        return None;
    }
    if amount.is_zero() {
        return Some(Bytes::new());
    }
    if !ledger.transfer_out(&account, &amount) {
        return None;
    }
    ledger.set_deposit_of(&account, deposit - amount);
    let total = ledger.total_deposited();
    ledger.set_total_deposited(total - amount);
    Some(Bytes::new())
}
