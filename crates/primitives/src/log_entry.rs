// Copyright 2021 Volta Foundation. All rights reserved.
// Volta is free software and distributed under GNU General Public License.
// See http://www.gnu.org/licenses/

//! Log entry type definition.

use rlp_derive::{RlpDecodable, RlpEncodable};
use volta_types::{Address, Bloom, BloomInput, Bytes, H256};

/// A record of execution for a `LOG` operation.
#[derive(Default, Debug, Clone, PartialEq, Eq, RlpEncodable, RlpDecodable)]
pub struct LogEntry {
    /// The address of the contract executing at the point of the `LOG`
    /// operation.
    pub address: Address,
    /// The topics associated with the `LOG` operation.
    pub topics: Vec<H256>,
    /// The data associated with the `LOG` operation.
    pub data: Bytes,
}

impl LogEntry {
    /// Calculates the bloom of this log entry.
    pub fn bloom(&self) -> Bloom {
        self.topics.iter().fold(
            Bloom::from(BloomInput::Raw(self.address.as_bytes())),
            |mut b, t| {
                b.accrue(BloomInput::Raw(t.as_bytes()));
                b
            },
        )
    }
}

/// The OR-wide combination of all given logs' blooms.
pub fn build_bloom(logs: &[LogEntry]) -> Bloom {
    logs.iter().fold(Bloom::default(), |mut b, l| {
        b.accrue_bloom(&l.bloom());
        b
    })
}

#[cfg(test)]
mod tests {
    use super::{build_bloom, LogEntry};
    use volta_types::{Address, Bloom};

    #[test]
    fn empty_log_set_has_default_bloom() {
        assert_eq!(build_bloom(&[]), Bloom::default());
    }

    #[test]
    fn log_bloom_accrues_address() {
        let log = LogEntry {
            address: Address::from_low_u64_be(1),
            topics: vec![],
            data: vec![],
        };
        assert_ne!(log.bloom(), Bloom::default());
    }
}
