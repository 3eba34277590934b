// Copyright 2021 Volta Foundation. All rights reserved.
// Volta is free software and distributed under GNU General Public License.
// See http://www.gnu.org/licenses/

//! Read-only escrow queries. Boolean results are a single byte; period
//! ordinals are two big-endian bytes, matching the width of the `periods`
//! creation field.

use super::{
    ledger::EscrowLedger, read_address, ADDRESSED_INPUT_LEN, OUTPUT_FALSE,
    OUTPUT_TRUE, PERIOD_AT_INPUT_LEN,
};
use byteorder::{BigEndian, ByteOrder};
use volta_types::Bytes;
use volta_vm_types::{ExecutionContext, KernelInterface};

const OP_IS_LIVE: u8 = 0x0;
const OP_IS_LOCKED: u8 = 0x1;
const OP_IS_DIRECT_DEPOSIT_ENABLED: u8 = 0x2;
const OP_PERIOD: u8 = 0x3;
const OP_PERIOD_AT: u8 = 0x4;

fn bool_output(value: bool) -> Bytes {
    vec![if value { OUTPUT_TRUE } else { OUTPUT_FALSE }]
}

fn period_output(period: u16) -> Bytes {
    let mut out = [0u8; 2];
    BigEndian::write_u16(&mut out, period);
    out.to_vec()
}

/// Requires an existing instance at the address field.
fn instance<'k>(
    kernel: &'k mut dyn KernelInterface, input: &[u8], expected_len: usize,
) -> Option<EscrowLedger<'k>> {
    if input.len() != expected_len {
        return None;
    }
    let ledger = EscrowLedger::open(kernel, read_address(input, 1));
    if !ledger.exists() {
        return None;
    }
    Some(ledger)
}

pub(crate) fn execute(
    context: &ExecutionContext, kernel: &mut dyn KernelInterface,
    input: &[u8],
) -> Option<Bytes> {
    match *input.first()? {
        OP_IS_LIVE => {
            let ledger = instance(kernel, input, ADDRESSED_INPUT_LEN)?;
            Some(bool_output(ledger.is_live()))
        }
        OP_IS_LOCKED => {
            let ledger = instance(kernel, input, ADDRESSED_INPUT_LEN)?;
            Some(bool_output(ledger.is_locked()))
        }
        OP_IS_DIRECT_DEPOSIT_ENABLED => {
            let ledger = instance(kernel, input, ADDRESSED_INPUT_LEN)?;
            Some(bool_output(ledger.spec().direct_deposit))
        }
        OP_PERIOD => {
            let ledger = instance(kernel, input, ADDRESSED_INPUT_LEN)?;
            Some(period_output(ledger.period_at_block(context.env.number)))
        }
        OP_PERIOD_AT => {
            let ledger = instance(kernel, input, PERIOD_AT_INPUT_LEN)?;
            let block = BigEndian::read_u64(&input[33..PERIOD_AT_INPUT_LEN]);
            Some(period_output(ledger.period_at_block(block)))
        }
        _ => None,
    }
}
