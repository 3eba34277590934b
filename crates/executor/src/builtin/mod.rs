// Copyright 2021 Volta Foundation. All rights reserved.
// Volta is free software and distributed under GNU General Public License.
// See http://www.gnu.org/licenses/

pub mod escrow;

use std::collections::BTreeMap;
use volta_parameters::{escrow::ESCROW_OP_ENERGY, internal_contract_addresses::*};
use volta_types::Address;
use volta_vm_types::{
    ExecutionContext, ExecutionResult, KernelInterface, ResultCode,
};

/// The closed set of precompiled contracts. Dispatch is a pure lookup by
/// address: at most one contract resolves, and a resolved contract fully
/// handles the call before the interpreter is ever consulted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BuiltinContract {
    /// Escrow owner operations: create, lock, start.
    EscrowOwner,
    /// Escrow depositor operations: deposit, withdraw, refund.
    EscrowUser,
    /// Escrow read-only queries.
    EscrowQuery,
}

lazy_static! {
    static ref BUILTIN_TABLE: BTreeMap<Address, BuiltinContract> = {
        let mut table = BTreeMap::new();
        table.insert(
            ESCROW_OWNER_CONTRACT_ADDRESS,
            BuiltinContract::EscrowOwner,
        );
        table.insert(ESCROW_USER_CONTRACT_ADDRESS, BuiltinContract::EscrowUser);
        table.insert(
            ESCROW_QUERY_CONTRACT_ADDRESS,
            BuiltinContract::EscrowQuery,
        );
        table
    };
}

/// Resolves the precompiled contract reachable at `address`, if any.
pub fn resolve_builtin(address: &Address) -> Option<BuiltinContract> {
    BUILTIN_TABLE.get(address).copied()
}

impl BuiltinContract {
    /// Flat energy cost of one operation.
    pub fn cost(&self) -> u64 { ESCROW_OP_ENERGY }

    /// Runs one operation. Always comes back with a structured result:
    /// malformed input or a refused state transition is a `Failure`, a
    /// call without the energy to even begin is `Rejected`. Never a fault,
    /// since the result has to be committed to the receipt.
    pub fn execute(
        &self, context: &ExecutionContext, kernel: &mut dyn KernelInterface,
        input: &[u8], energy_limit: u64,
    ) -> ExecutionResult {
        let cost = self.cost();
        if energy_limit < cost {
            trace!(
                "builtin {:?} lacks energy to begin: limit={}, cost={}",
                self,
                energy_limit,
                cost
            );
            return ExecutionResult::new(ResultCode::Rejected, 0);
        }

        let outcome = match self {
            BuiltinContract::EscrowOwner => {
                escrow::owner::execute(context, kernel, input)
            }
            BuiltinContract::EscrowUser => {
                escrow::user::execute(context, kernel, input)
            }
            BuiltinContract::EscrowQuery => {
                escrow::query::execute(context, kernel, input)
            }
        };

        match outcome {
            Some(output) => ExecutionResult::with_output(
                ResultCode::Success,
                energy_limit - cost,
                output,
            ),
            None => ExecutionResult::failure(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolution_is_closed_over_known_addresses() {
        assert_eq!(
            resolve_builtin(&ESCROW_OWNER_CONTRACT_ADDRESS),
            Some(BuiltinContract::EscrowOwner)
        );
        assert_eq!(
            resolve_builtin(&ESCROW_USER_CONTRACT_ADDRESS),
            Some(BuiltinContract::EscrowUser)
        );
        assert_eq!(
            resolve_builtin(&ESCROW_QUERY_CONTRACT_ADDRESS),
            Some(BuiltinContract::EscrowQuery)
        );
        assert_eq!(resolve_builtin(&Address::from_low_u64_be(1)), None);
    }
}
