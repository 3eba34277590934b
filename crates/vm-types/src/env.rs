// Copyright 2021 Volta Foundation. All rights reserved.
// Volta is free software and distributed under GNU General Public License.
// See http://www.gnu.org/licenses/

//! Environment information for transaction execution.

use volta_types::{Address, U256};

/// Information concerning the enclosing block of a
/// message-call/contract-creation.
#[derive(Debug, Clone, Default)]
pub struct Env {
    /// The block author, receiving the energy fees.
    pub author: Address,
    /// The block number.
    pub number: u64,
    /// The block timestamp.
    pub timestamp: u64,
    /// The block energy limit.
    pub energy_limit: u64,
    /// The block difficulty.
    pub difficulty: U256,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_can_be_created_as_default() {
        let default_env = Env::default();

        assert_eq!(default_env.author, Address::default());
        assert_eq!(default_env.number, 0);
        assert_eq!(default_env.timestamp, 0);
        assert_eq!(default_env.energy_limit, 0);
        assert_eq!(default_env.difficulty, 0.into());
    }
}
