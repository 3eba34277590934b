// Copyright 2021 Volta Foundation. All rights reserved.
// Volta is free software and distributed under GNU General Public License.
// See http://www.gnu.org/licenses/

use std::collections::BTreeSet;
use volta_primitives::LogEntry;
use volta_types::Address;
use volta_vm_types::InternalTransaction;

/// Tracks execution side effects for the post-execution process in the
/// executive: receipt generation, the deleted-account sweep and the audit
/// trail of nested calls. Entries are never removed once added.
#[derive(Debug, Default)]
pub struct SideEffects {
    /// Any logs.
    logs: Vec<LogEntry>,
    /// Nested calls and creates, in the order they occurred.
    internal_transactions: Vec<InternalTransaction>,
    /// Any accounts marked for deletion.
    deletions: BTreeSet<Address>,
}

impl SideEffects {
    pub fn new() -> Self { SideEffects::default() }

    /// Appends `other`'s effects onto `self`, in nested-call order.
    pub fn merge(&mut self, other: SideEffects) {
        self.logs.extend(other.logs);
        self.internal_transactions.extend(other.internal_transactions);
        self.deletions.extend(other.deletions);
    }

    /// Appends only the internal-transaction records, without logs. Used
    /// when the root call failed: effects of nested calls are still
    /// recorded for audit, but their logs are discarded because the whole
    /// transaction is reverted.
    pub fn add_internal_transactions<I>(&mut self, transactions: I)
    where I: IntoIterator<Item = InternalTransaction> {
        self.internal_transactions.extend(transactions);
    }

    pub fn add_internal_transaction(&mut self, tx: InternalTransaction) {
        self.internal_transactions.push(tx);
    }

    pub fn add_log(&mut self, entry: LogEntry) { self.logs.push(entry); }

    pub fn mark_deletion(&mut self, address: Address) {
        self.deletions.insert(address);
    }

    pub fn execution_logs(&self) -> &[LogEntry] { &self.logs }

    pub fn internal_transactions(&self) -> &[InternalTransaction] {
        &self.internal_transactions
    }

    pub fn addresses_to_be_deleted(&self) -> &BTreeSet<Address> {
        &self.deletions
    }

    pub fn into_parts(
        self,
    ) -> (Vec<LogEntry>, Vec<InternalTransaction>, BTreeSet<Address>) {
        (self.logs, self.internal_transactions, self.deletions)
    }
}

#[cfg(test)]
mod tests {
    use super::SideEffects;
    use volta_primitives::LogEntry;
    use volta_types::{Address, U256};
    use volta_vm_types::{
        CallKind, ExecutionResult, InternalTransaction, ResultCode,
    };

    fn sample_internal(low: u64) -> InternalTransaction {
        InternalTransaction {
            kind: CallKind::Call,
            sender: Address::from_low_u64_be(low),
            destination: Some(Address::from_low_u64_be(low + 1)),
            value: U256::one(),
            data: vec![],
            result: ExecutionResult::new(ResultCode::Success, 0),
            rejected: false,
        }
    }

    #[test]
    fn created() {
        let effects = SideEffects::new();
        assert_eq!(effects.addresses_to_be_deleted().len(), 0);
        assert!(effects.execution_logs().is_empty());
    }

    #[test]
    fn merge_keeps_order() {
        let mut effects = SideEffects::new();
        effects.add_log(LogEntry {
            address: Address::from_low_u64_be(1),
            topics: vec![],
            data: vec![1],
        });
        effects.add_internal_transaction(sample_internal(1));
        effects.mark_deletion(Address::from_low_u64_be(10));

        let mut nested = SideEffects::new();
        nested.add_log(LogEntry {
            address: Address::from_low_u64_be(2),
            topics: vec![],
            data: vec![2],
        });
        nested.add_internal_transaction(sample_internal(3));

        effects.merge(nested);
        assert_eq!(effects.execution_logs().len(), 2);
        assert_eq!(effects.execution_logs()[1].data, vec![2]);
        assert_eq!(effects.internal_transactions().len(), 2);
        assert_eq!(effects.addresses_to_be_deleted().len(), 1);
    }

    #[test]
    fn audit_only_append_skips_logs() {
        let mut nested = SideEffects::new();
        nested.add_log(LogEntry {
            address: Address::from_low_u64_be(2),
            topics: vec![],
            data: vec![],
        });
        nested.add_internal_transaction(sample_internal(1));

        let mut root = SideEffects::new();
        let (_, internals, _) = nested.into_parts();
        root.add_internal_transactions(internals);
        assert!(root.execution_logs().is_empty());
        assert_eq!(root.internal_transactions().len(), 1);
    }
}
