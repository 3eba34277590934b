// Copyright 2021 Volta Foundation. All rights reserved.
// Volta is free software and distributed under GNU General Public License.
// See http://www.gnu.org/licenses/

//! Typed access to the storage rows of one escrow instance.
//!
//! Fixed rows live at marker keys (first byte identifies the row, the rest
//! is zero); per-depositor rows reuse the depositor's address with the
//! first byte replaced by the row marker. Addresses carry a keccak-derived
//! tail, so replacing the class byte cannot collide.

use byteorder::{BigEndian, ByteOrder};
use volta_parameters::escrow::{PERIOD_BLOCKS, TEST_PERIOD_BLOCKS};
use volta_types::{Address, BigEndianHash, H256, U256};
use volta_vm_types::KernelInterface;

/// Contract specification row.
const SPEC_ROW: u8 = 0xe0;
/// Lifecycle row: created marker plus the locked and live bits.
const STATE_ROW: u8 = 0xe1;
/// Instance owner.
const OWNER_ROW: u8 = 0xe2;
/// Block number the release schedule started at.
const TIMING_ROW: u8 = 0xe3;
/// Sum of all outstanding deposits.
const TOTAL_ROW: u8 = 0xe4;
/// Bonus token pool, fixed when the instance starts.
const BONUS_ROW: u8 = 0xe5;
/// Per-depositor outstanding deposit.
const DEPOSIT_ROW: u8 = 0xb0;
/// Per-depositor amount already withdrawn.
const WITHDRAWN_ROW: u8 = 0xb1;

const STATE_CREATED_BIT: u8 = 0x4;
const STATE_LOCKED_BIT: u8 = 0x1;
const STATE_LIVE_BIT: u8 = 0x2;

fn marker_key(marker: u8) -> H256 {
    let mut raw = [0u8; 32];
    raw[0] = marker;
    H256(raw)
}

fn depositor_key(marker: u8, account: &Address) -> H256 {
    let mut raw = *account.as_fixed_bytes();
    raw[0] = marker;
    H256(raw)
}

/// The immutable parameters an instance is created with, packed into the
/// specification row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EscrowSpec {
    /// Test instances use the short period length.
    pub is_test: bool,
    /// Whether accounts other than the owner may deposit directly.
    pub direct_deposit: bool,
    /// Total release periods, at least one.
    pub periods: u16,
    /// Magnitude of the one-off bonus percentage (9 bytes at most).
    pub percent: U256,
    /// Decimal precision of `percent`.
    pub precision: u8,
}

impl EscrowSpec {
    pub fn period_blocks(&self) -> u64 {
        if self.is_test {
            TEST_PERIOD_BLOCKS
        } else {
            PERIOD_BLOCKS
        }
    }

    fn pack(&self) -> H256 {
        let mut raw = [0u8; 32];
        raw[0] = (self.direct_deposit as u8) | ((self.is_test as u8) << 1);
        BigEndian::write_u16(&mut raw[1..3], self.periods);
        let mut percent_word = [0u8; 32];
        self.percent.to_big_endian(&mut percent_word);
        raw[3..12].copy_from_slice(&percent_word[23..32]);
        raw[12] = self.precision;
        H256(raw)
    }

    fn unpack(row: &H256) -> EscrowSpec {
        let raw = row.as_fixed_bytes();
        EscrowSpec {
            direct_deposit: raw[0] & 0x1 != 0,
            is_test: raw[0] & 0x2 != 0,
            periods: BigEndian::read_u16(&raw[1..3]),
            percent: U256::from_big_endian(&raw[3..12]),
            precision: raw[12],
        }
    }
}

/// A view over the storage and balance of one escrow instance, addressed
/// through the kernel so that every mutation shares the fate of the
/// enclosing transaction.
pub struct EscrowLedger<'k> {
    kernel: &'k mut dyn KernelInterface,
    contract: Address,
}

impl<'k> EscrowLedger<'k> {
    pub fn open(
        kernel: &'k mut dyn KernelInterface, contract: Address,
    ) -> EscrowLedger<'k> {
        EscrowLedger { kernel, contract }
    }

    pub fn contract(&self) -> &Address { &self.contract }

    fn read(&self, marker: u8) -> H256 {
        self.kernel.storage_at(&self.contract, &marker_key(marker))
    }

    fn write(&mut self, marker: u8, value: H256) {
        self.kernel.set_storage(&self.contract, marker_key(marker), value);
    }

    fn read_depositor(&self, marker: u8, account: &Address) -> U256 {
        self.kernel
            .storage_at(&self.contract, &depositor_key(marker, account))
            .into_uint()
    }

    fn write_depositor(&mut self, marker: u8, account: &Address, value: U256) {
        self.kernel.set_storage(
            &self.contract,
            depositor_key(marker, account),
            H256::from_uint(&value),
        );
    }

    /// Whether an instance was ever created at this address.
    pub fn exists(&self) -> bool {
        self.read(STATE_ROW).as_fixed_bytes()[31] & STATE_CREATED_BIT != 0
    }

    pub fn initialize(&mut self, owner: &Address, spec: &EscrowSpec) {
        self.kernel.create_account(&self.contract);
        self.write(SPEC_ROW, spec.pack());
        self.write(OWNER_ROW, *owner);
        self.write(
            STATE_ROW,
            H256::from_low_u64_be(STATE_CREATED_BIT as u64),
        );
    }

    pub fn spec(&self) -> EscrowSpec { EscrowSpec::unpack(&self.read(SPEC_ROW)) }

    pub fn owner(&self) -> Address { self.read(OWNER_ROW) }

    fn state_bits(&self) -> u8 { self.read(STATE_ROW).as_fixed_bytes()[31] }

    fn set_state_bit(&mut self, bit: u8) {
        let bits = self.state_bits() | bit;
        self.write(STATE_ROW, H256::from_low_u64_be(bits as u64));
    }

    pub fn is_locked(&self) -> bool {
        self.state_bits() & STATE_LOCKED_BIT != 0
    }

    pub fn set_locked(&mut self) { self.set_state_bit(STATE_LOCKED_BIT); }

    pub fn is_live(&self) -> bool { self.state_bits() & STATE_LIVE_BIT != 0 }

    pub fn set_live(&mut self) { self.set_state_bit(STATE_LIVE_BIT); }

    pub fn start_block(&self) -> u64 {
        self.read(TIMING_ROW).to_low_u64_be()
    }

    pub fn set_start_block(&mut self, block: u64) {
        self.write(TIMING_ROW, H256::from_low_u64_be(block));
    }

    pub fn total_deposited(&self) -> U256 {
        self.read(TOTAL_ROW).into_uint()
    }

    pub fn set_total_deposited(&mut self, total: U256) {
        self.write(TOTAL_ROW, H256::from_uint(&total));
    }

    pub fn bonus_pool(&self) -> U256 { self.read(BONUS_ROW).into_uint() }

    pub fn set_bonus_pool(&mut self, pool: U256) {
        self.write(BONUS_ROW, H256::from_uint(&pool));
    }

    pub fn deposit_of(&self, account: &Address) -> U256 {
        self.read_depositor(DEPOSIT_ROW, account)
    }

    pub fn set_deposit_of(&mut self, account: &Address, amount: U256) {
        self.write_depositor(DEPOSIT_ROW, account, amount);
    }

    pub fn withdrawn_of(&self, account: &Address) -> U256 {
        self.read_depositor(WITHDRAWN_ROW, account)
    }

    pub fn set_withdrawn_of(&mut self, account: &Address, amount: U256) {
        self.write_depositor(WITHDRAWN_ROW, account, amount);
    }

    pub fn contract_balance(&self) -> U256 {
        self.kernel.balance(&self.contract)
    }

    /// Moves tokens from a depositor into the instance. False, with
    /// nothing moved, when the depositor cannot cover the amount.
    pub fn transfer_in(&mut self, from: &Address, amount: &U256) -> bool {
        if !self.kernel.sub_balance(from, amount) {
            return false;
        }
        let contract = self.contract;
        self.kernel.add_balance(&contract, amount);
        true
    }

    /// Moves tokens out of the instance. False, with nothing moved, when
    /// the instance balance cannot cover the amount.
    pub fn transfer_out(&mut self, to: &Address, amount: &U256) -> bool {
        let contract = self.contract;
        if !self.kernel.sub_balance(&contract, amount) {
            return false;
        }
        self.kernel.add_balance(to, amount);
        true
    }

    /// The period the instance is in at `block`: zero until live, then
    /// growing one per period length, capped at the configured total.
    pub fn period_at_block(&self, block: u64) -> u16 {
        if !self.is_live() {
            return 0;
        }
        let start = self.start_block();
        if block < start {
            return 0;
        }
        let spec = self.spec();
        let elapsed = (block - start) / spec.period_blocks() + 1;
        elapsed.min(spec.periods as u64) as u16
    }
}
