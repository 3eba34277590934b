// Copyright 2021 Volta Foundation. All rights reserved.
// Volta is free software and distributed under GNU General Public License.
// See http://www.gnu.org/licenses/

use volta_types::U256;

/// The mutable basic fields of an account as handed out by the repository.
/// Code and storage are addressed through their own repository operations.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AccountState {
    pub balance: U256,
    pub nonce: U256,
}

impl AccountState {
    pub fn new_empty() -> AccountState { Default::default() }

    pub fn with_balance(balance: U256) -> AccountState {
        AccountState {
            balance,
            nonce: U256::zero(),
        }
    }

    /// Adds to the balance and returns the new value.
    pub fn add_balance(&mut self, by: &U256) -> U256 {
        self.balance = self.balance + *by;
        self.balance
    }

    /// Subtracts from the balance, refusing to go negative. Returns the new
    /// value, or `None` without any effect when the funds are insufficient.
    pub fn sub_balance(&mut self, by: &U256) -> Option<U256> {
        self.balance = self.balance.checked_sub(*by)?;
        Some(self.balance)
    }

    /// Bumps the nonce and returns the new value.
    pub fn increment_nonce(&mut self) -> U256 {
        self.nonce = self.nonce + U256::one();
        self.nonce
    }
}

/// Entry object in a tracking layer's overlay, adding markers like the
/// dirty bit to the `AccountState` structure.
#[derive(Clone, Debug)]
pub enum AccountEntry {
    /// The account is confirmed absent from the parent. Cached so repeated
    /// misses do not fall through again.
    Missing,
    /// The account was deleted in this layer; merged down as a deletion.
    Deleted,
    /// An in-memory cached account paired with a dirty bit to indicate
    /// modifications.
    Cached(AccountState, bool),
}

use AccountEntry::*;

impl AccountEntry {
    pub fn new_dirty(state: AccountState) -> AccountEntry {
        Cached(state, true)
    }

    /// Construct an entry from a state loaded out of the parent layer.
    pub fn new_loaded(state: Option<AccountState>) -> AccountEntry {
        match state {
            Some(state) => Cached(state, false),
            None => Missing,
        }
    }

    pub fn is_dirty(&self) -> bool {
        matches!(self, Deleted | Cached(_, true))
    }

    pub fn exists(&self) -> bool { matches!(self, Cached(..)) }

    pub fn account(&self) -> Option<&AccountState> {
        match self {
            Missing | Deleted => None,
            Cached(state, _) => Some(state),
        }
    }

    pub fn account_mut(&mut self) -> Option<&mut AccountState> {
        match self {
            Missing | Deleted => None,
            Cached(state, _) => Some(state),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sub_balance_refuses_underflow() {
        let mut state = AccountState::with_balance(U256::from(5));
        assert_eq!(state.sub_balance(&U256::from(6)), None);
        assert_eq!(state.balance, U256::from(5));
        assert_eq!(state.sub_balance(&U256::from(5)), Some(U256::zero()));
    }

    #[test]
    fn dirty_bits() {
        assert!(AccountEntry::new_dirty(AccountState::new_empty()).is_dirty());
        assert!(AccountEntry::Deleted.is_dirty());
        assert!(!AccountEntry::new_loaded(None).is_dirty());
        assert!(!AccountEntry::new_loaded(Some(AccountState::new_empty()))
            .is_dirty());
    }
}
