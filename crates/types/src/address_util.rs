// Copyright 2021 Volta Foundation. All rights reserved.
// Volta is free software and distributed under GNU General Public License.
// See http://www.gnu.org/licenses/

use super::Address;

/// Leading byte of externally-owned (user) account addresses.
pub const TYPE_BITS_USER_ACCOUNT: u8 = 0xa0;
/// Leading byte of escrow (token release schedule) contract addresses.
pub const TYPE_BITS_ESCROW_CONTRACT: u8 = 0xc0;

/// Address-class helpers. The first byte of an address encodes its class;
/// the remaining 31 bytes come from a keccak digest.
pub trait AddressUtil: Sized {
    fn type_byte(&self) -> u8;

    fn set_type_bits(&mut self, type_bits: u8);

    fn is_user_account_address(&self) -> bool {
        self.type_byte() == TYPE_BITS_USER_ACCOUNT
    }

    fn is_escrow_contract_address(&self) -> bool {
        self.type_byte() == TYPE_BITS_ESCROW_CONTRACT
    }

    fn set_user_account_type_bits(&mut self) {
        self.set_type_bits(TYPE_BITS_USER_ACCOUNT);
    }

    fn set_escrow_contract_type_bits(&mut self) {
        self.set_type_bits(TYPE_BITS_ESCROW_CONTRACT);
    }
}

impl AddressUtil for Address {
    #[inline]
    fn type_byte(&self) -> u8 { self.as_fixed_bytes()[0] }

    #[inline]
    fn set_type_bits(&mut self, type_bits: u8) {
        self.as_fixed_bytes_mut()[0] = type_bits;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_bits_round_trip() {
        let mut address = Address::from_low_u64_be(0xdead);
        address.set_user_account_type_bits();
        assert!(address.is_user_account_address());
        assert!(!address.is_escrow_contract_address());

        address.set_escrow_contract_type_bits();
        assert!(address.is_escrow_contract_address());
        assert_eq!(address.type_byte(), TYPE_BITS_ESCROW_CONTRACT);
    }
}
