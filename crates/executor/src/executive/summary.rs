// Copyright 2021 Volta Foundation. All rights reserved.
// Volta is free software and distributed under GNU General Public License.
// See http://www.gnu.org/licenses/

use crate::substate::SideEffects;
use volta_primitives::{LogEntry, Receipt, Transaction, TransactionOutcome};
use volta_types::{Address, Bytes};
use volta_vm_types::{ExecutionResult, InternalTransaction};

/// How a transaction left the executor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionStatus {
    /// Committed; state changes flushed into the repository.
    Completed,
    /// Executed but failed; energy consumed, state changes discarded.
    Failed,
    /// Refused before execution; nothing touched.
    Rejected,
}

/// Everything one transaction execution produced, bundled for the block
/// processing collaborator.
#[derive(Debug, Clone)]
pub struct ExecutionSummary {
    pub receipt: Receipt,
    pub logs: Vec<LogEntry>,
    pub internal_transactions: Vec<InternalTransaction>,
    pub deleted_accounts: Vec<Address>,
    pub output: Bytes,
    pub status: ExecutionStatus,
}

impl ExecutionSummary {
    pub fn is_failed(&self) -> bool { self.status == ExecutionStatus::Failed }

    pub fn is_rejected(&self) -> bool {
        self.status == ExecutionStatus::Rejected
    }

    pub fn energy_used(&self) -> u64 { self.receipt.energy_used }
}

/// Builds the receipt for `result` against the merged side effects.
pub(super) fn make_receipt(
    tx: &Transaction, result: &ExecutionResult, ledger: &SideEffects,
) -> Receipt {
    let code = result.code;
    let outcome = if code.is_success() {
        TransactionOutcome::Success
    } else if code.is_rejected() {
        TransactionOutcome::Rejected
    } else {
        TransactionOutcome::Failure
    };
    let error_message = if code.is_success() {
        String::new()
    } else {
        code.to_string()
    };
    Receipt::new(
        outcome,
        result.energy_used(tx.energy_limit),
        ledger.execution_logs().to_vec(),
        result.output.clone(),
        error_message,
    )
}

pub(super) fn make_summary(
    tx: &Transaction, result: &ExecutionResult, ledger: SideEffects,
) -> ExecutionSummary {
    let receipt = make_receipt(tx, result, &ledger);
    let status = if result.code.is_success() {
        ExecutionStatus::Completed
    } else if result.code.is_rejected() {
        ExecutionStatus::Rejected
    } else {
        ExecutionStatus::Failed
    };
    let (logs, internal_transactions, deletions) = ledger.into_parts();
    ExecutionSummary {
        receipt,
        logs,
        internal_transactions,
        deleted_accounts: deletions.into_iter().collect(),
        output: result.output.clone(),
        status,
    }
}
