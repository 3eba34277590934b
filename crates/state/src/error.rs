// Copyright 2021 Volta Foundation. All rights reserved.
// Volta is free software and distributed under GNU General Public License.
// See http://www.gnu.org/licenses/

use thiserror::Error;
use volta_types::{Address, H256, U256};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("account does not exist: address={0:?}")]
    MissingAccount(Address),

    #[error(
        "balance underflow: address={address:?}, balance={balance}, \
         required={required}"
    )]
    NegativeBalance {
        address: Address,
        balance: U256,
        required: U256,
    },

    #[error("`{0}` is not supported on a tracking layer")]
    UnsupportedOnTrackingLayer(&'static str),

    #[error("`{0}` is not supported on a historical snapshot")]
    UnsupportedOnSnapshot(&'static str),

    #[error("unknown state root: root={0:?}")]
    UnknownRoot(H256),
}

pub type Result<T> = std::result::Result<T, Error>;
