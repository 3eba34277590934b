// Copyright 2021 Volta Foundation. All rights reserved.
// Volta is free software and distributed under GNU General Public License.
// See http://www.gnu.org/licenses/

use std::fmt;
use volta_types::Bytes;

/// The closed set of codes a dispatch can come back with. Every code falls
/// into exactly one of three families: success, rejected (refused before
/// any state mutation) and failed (energy consumed, effects discarded).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultCode {
    /// Executed to completion.
    Success,
    /// Generic contract-level failure, e.g. a malformed precompile input.
    Failure,
    /// Execution has been reverted; remaining energy is returned.
    Revert,
    /// Transaction execution ran out of energy.
    OutOfEnergy,
    /// Unrecognized opcode.
    BadInstruction,
    /// Jump to a position not marked as a destination.
    BadJumpDestination,
    /// Execution would exceed the interpreter stack limit.
    StackOverflow,
    /// Not enough stack elements for the executed instruction.
    StackUnderflow,
    /// The interpreter itself misbehaved.
    InternalError,
    /// Refused before execution began.
    Rejected,
    /// Refused: transaction nonce does not match the account nonce.
    RejectedInvalidNonce,
    /// Refused: energy limit below the base cost or above the block
    /// ceiling.
    RejectedInvalidEnergyLimit,
    /// Refused: sender balance cannot cover value plus energy cost.
    RejectedInsufficientBalance,
}

impl ResultCode {
    /// Every code, for exhaustiveness checks in tests.
    pub const ALL: [ResultCode; 13] = [
        ResultCode::Success,
        ResultCode::Failure,
        ResultCode::Revert,
        ResultCode::OutOfEnergy,
        ResultCode::BadInstruction,
        ResultCode::BadJumpDestination,
        ResultCode::StackOverflow,
        ResultCode::StackUnderflow,
        ResultCode::InternalError,
        ResultCode::Rejected,
        ResultCode::RejectedInvalidNonce,
        ResultCode::RejectedInvalidEnergyLimit,
        ResultCode::RejectedInsufficientBalance,
    ];

    pub fn is_success(self) -> bool { matches!(self, ResultCode::Success) }

    pub fn is_rejected(self) -> bool {
        matches!(
            self,
            ResultCode::Rejected
                | ResultCode::RejectedInvalidNonce
                | ResultCode::RejectedInvalidEnergyLimit
                | ResultCode::RejectedInsufficientBalance
        )
    }

    pub fn is_failed(self) -> bool {
        !self.is_success() && !self.is_rejected()
    }
}

impl fmt::Display for ResultCode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use self::ResultCode::*;
        let message = match *self {
            Success => "Success",
            Failure => "Failure",
            Revert => "Reverted",
            OutOfEnergy => "Out of energy",
            BadInstruction => "Bad instruction",
            BadJumpDestination => "Bad jump destination",
            StackOverflow => "Stack overflow",
            StackUnderflow => "Stack underflow",
            InternalError => "Internal error",
            Rejected => "Rejected",
            RejectedInvalidNonce => "Rejected: invalid nonce",
            RejectedInvalidEnergyLimit => "Rejected: invalid energy limit",
            RejectedInsufficientBalance => "Rejected: insufficient balance",
        };
        write!(f, "{}", message)
    }
}

/// What a dispatch (VM run or precompile call) came back with. Never
/// mutated after return.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionResult {
    pub code: ResultCode,
    pub energy_remaining: u64,
    pub output: Bytes,
}

impl ExecutionResult {
    pub fn new(code: ResultCode, energy_remaining: u64) -> ExecutionResult {
        ExecutionResult {
            code,
            energy_remaining,
            output: Bytes::new(),
        }
    }

    pub fn with_output(
        code: ResultCode, energy_remaining: u64, output: Bytes,
    ) -> ExecutionResult {
        ExecutionResult {
            code,
            energy_remaining,
            output,
        }
    }

    pub fn success(energy_remaining: u64) -> ExecutionResult {
        ExecutionResult::new(ResultCode::Success, energy_remaining)
    }

    /// A plain contract-level failure: all energy consumed, no output.
    pub fn failure() -> ExecutionResult {
        ExecutionResult::new(ResultCode::Failure, 0)
    }

    /// The energy consumed relative to the given limit.
    pub fn energy_used(&self, energy_limit: u64) -> u64 {
        energy_limit.saturating_sub(self.energy_remaining)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_code_has_exactly_one_family() {
        for code in ResultCode::ALL {
            let families = [code.is_success(), code.is_rejected(), code.is_failed()];
            assert_eq!(
                families.iter().filter(|f| **f).count(),
                1,
                "{:?} must fall into exactly one family",
                code
            );
        }
    }

    #[test]
    fn energy_used_saturates() {
        let result = ExecutionResult::success(30_000);
        assert_eq!(result.energy_used(50_000), 20_000);
        assert_eq!(result.energy_used(10_000), 0);
    }
}
