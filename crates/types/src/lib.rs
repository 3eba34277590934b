// Copyright 2021 Volta Foundation. All rights reserved.
// Volta is free software and distributed under GNU General Public License.
// See http://www.gnu.org/licenses/

extern crate ethereum_types;

pub use ethereum_types::{
    BigEndianHash, Bloom, BloomInput, H128, H256, H512, U128, U256, U512, U64,
};

/// 32-byte account identifier.
pub type Address = H256;

/// Raw byte sequence, used for account code and call payloads.
pub type Bytes = Vec<u8>;

pub mod address_util;
