// Copyright 2021 Volta Foundation. All rights reserved.
// Volta is free software and distributed under GNU General Public License.
// See http://www.gnu.org/licenses/

use crate::log_entry::{build_bloom, LogEntry};
use rlp::{Decodable, DecoderError, Encodable, Rlp, RlpStream};
use volta_types::{Bloom, Bytes};

/// Consensus-visible outcome of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum TransactionOutcome {
    /// Executed to completion; state changes committed.
    Success = 0,
    /// Execution failed; energy consumed, state changes discarded.
    Failure = 1,
    /// Refused before execution; no state touched, no energy consumed.
    Rejected = 2,
}

impl TransactionOutcome {
    fn from_u8(raw: u8) -> Result<Self, DecoderError> {
        match raw {
            0 => Ok(TransactionOutcome::Success),
            1 => Ok(TransactionOutcome::Failure),
            2 => Ok(TransactionOutcome::Rejected),
            _ => Err(DecoderError::Custom("unknown transaction outcome")),
        }
    }
}

/// Information describing execution of a transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    /// Transaction outcome.
    pub outcome_status: TransactionOutcome,
    /// The energy consumed by this transaction, base cost included.
    pub energy_used: u64,
    /// The OR-wide combination of all logs' blooms for this transaction.
    pub log_bloom: Bloom,
    /// The logs stemming from this transaction.
    pub logs: Vec<LogEntry>,
    /// The output returned by contract logic, empty on plain transfers.
    pub output: Bytes,
    /// Failure description; empty exactly when the outcome is `Success`.
    pub error_message: String,
}

impl Receipt {
    pub fn new(
        outcome: TransactionOutcome, energy_used: u64, logs: Vec<LogEntry>,
        output: Bytes, error_message: String,
    ) -> Self {
        Self {
            outcome_status: outcome,
            energy_used,
            log_bloom: build_bloom(&logs),
            logs,
            output,
            error_message,
        }
    }

    pub fn is_successful(&self) -> bool {
        self.outcome_status == TransactionOutcome::Success
    }
}

impl Encodable for Receipt {
    fn rlp_append(&self, s: &mut RlpStream) {
        s.begin_list(6);
        s.append(&(self.outcome_status as u8));
        s.append(&self.energy_used);
        s.append(&self.log_bloom);
        s.append_list(&self.logs);
        s.append(&self.output);
        s.append(&self.error_message);
    }
}

impl Decodable for Receipt {
    fn decode(rlp: &Rlp) -> Result<Self, DecoderError> {
        if rlp.item_count()? != 6 {
            return Err(DecoderError::RlpIncorrectListLen);
        }

        Ok(Receipt {
            outcome_status: TransactionOutcome::from_u8(rlp.val_at(0)?)?,
            energy_used: rlp.val_at(1)?,
            log_bloom: rlp.val_at(2)?,
            logs: rlp.list_at(3)?,
            output: rlp.val_at(4)?,
            error_message: rlp.val_at(5)?,
        })
    }
}
