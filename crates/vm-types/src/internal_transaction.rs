// Copyright 2021 Volta Foundation. All rights reserved.
// Volta is free software and distributed under GNU General Public License.
// See http://www.gnu.org/licenses/

use super::{context::CallKind, result::ExecutionResult};
use volta_types::{Address, Bytes, U256};

/// A nested call or create triggered while executing another transaction's
/// contract logic. Recorded for audit regardless of the outer outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InternalTransaction {
    pub kind: CallKind,
    pub sender: Address,
    /// Absent for nested creations until the deployment address is known.
    pub destination: Option<Address>,
    pub value: U256,
    pub data: Bytes,
    /// The outcome of this nested dispatch alone.
    pub result: ExecutionResult,
    /// Set when the enclosing transaction was discarded; the record is
    /// kept, its effects are not.
    pub rejected: bool,
}

impl InternalTransaction {
    pub fn mark_rejected(&mut self) { self.rejected = true; }
}
