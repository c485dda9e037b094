//! Host-side balances the bridge debits on deposit and credits on withdrawal.

use op_modules_api::{Address, Prefix, StateMap, Storage, WorkingSet};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::types::Amount;

/// Failures reported by a [`HostLedger`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("{address} holds less than {needed} {denom}")]
    InsufficientFunds {
        address: Address,
        denom: String,
        needed: Amount,
    },
    #[error("denom {denom:?} is not known to the ledger")]
    UnsupportedDenom { denom: String },
    #[error("supply of {denom:?} would overflow")]
    Overflow { denom: String },
}

/// The host chain's account ledger, as seen by the bridge.
///
/// Both operations write through the caller's working set, so they commit or
/// revert together with the bridge state.
pub trait HostLedger {
    /// Genesis state of the ledger.
    type Config;

    /// Writes the genesis state.
    fn init<S: Storage>(
        &self,
        config: &Self::Config,
        working_set: &mut WorkingSet<S>,
    ) -> Result<(), LedgerError>;

    /// Removes `amount` of `denom` from `address`.
    fn debit<S: Storage>(
        &self,
        address: &Address,
        amount: Amount,
        denom: &str,
        working_set: &mut WorkingSet<S>,
    ) -> Result<(), LedgerError>;

    /// Adds `amount` of `denom` to `address`.
    fn credit<S: Storage>(
        &self,
        address: &Address,
        amount: Amount,
        denom: &str,
        working_set: &mut WorkingSet<S>,
    ) -> Result<(), LedgerError>;
}

/// Initial balance of one account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceConfig {
    pub address: Address,
    pub denom: String,
    pub amount: Amount,
}

/// Genesis state of the [`Bank`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankConfig {
    #[serde(default)]
    pub denoms: Vec<String>,
    #[serde(default)]
    pub balances: Vec<BalanceConfig>,
}

/// State-backed reference ledger.
///
/// Debits burn from the sender and credits mint to the receiver; the supply
/// of each denom tracks the outstanding host balance.
#[derive(Debug, Clone, PartialEq)]
pub struct Bank {
    /// Supported denoms and their total supply.
    pub(crate) supply: StateMap<String, Amount>,
    pub(crate) balances: StateMap<(String, Address), Amount>,
}

impl Bank {
    pub fn new(prefix: &Prefix) -> Self {
        Self {
            supply: StateMap::new(prefix.extended(b"supply/")),
            balances: StateMap::new(prefix.extended(b"balances/")),
        }
    }

    /// Balance of `address` in `denom`, zero when the account was never funded.
    pub fn balance<S: Storage>(
        &self,
        address: &Address,
        denom: &str,
        working_set: &mut WorkingSet<S>,
    ) -> Amount {
        self.balances
            .get(&(denom.to_owned(), *address), working_set)
            .unwrap_or_default()
    }

    /// Total supply of `denom`, `None` if the denom is unknown.
    pub fn supply_of<S: Storage>(
        &self,
        denom: &str,
        working_set: &mut WorkingSet<S>,
    ) -> Option<Amount> {
        self.supply.get(&denom.to_owned(), working_set)
    }

    fn supply_or_err<S: Storage>(
        &self,
        denom: &str,
        working_set: &mut WorkingSet<S>,
    ) -> Result<Amount, LedgerError> {
        self.supply_of(denom, working_set)
            .ok_or_else(|| LedgerError::UnsupportedDenom {
                denom: denom.to_owned(),
            })
    }
}

impl HostLedger for Bank {
    type Config = BankConfig;

    fn init<S: Storage>(
        &self,
        config: &BankConfig,
        working_set: &mut WorkingSet<S>,
    ) -> Result<(), LedgerError> {
        for denom in &config.denoms {
            if !self.supply.contains(denom, working_set) {
                self.supply.set(denom, &Amount::ZERO, working_set);
            }
        }
        for balance in &config.balances {
            self.credit(&balance.address, balance.amount, &balance.denom, working_set)?;
        }
        Ok(())
    }

    fn debit<S: Storage>(
        &self,
        address: &Address,
        amount: Amount,
        denom: &str,
        working_set: &mut WorkingSet<S>,
    ) -> Result<(), LedgerError> {
        let supply = self.supply_or_err(denom, working_set)?;
        let balance = self
            .balance(address, denom, working_set)
            .checked_sub(amount)
            .ok_or_else(|| LedgerError::InsufficientFunds {
                address: *address,
                denom: denom.to_owned(),
                needed: amount,
            })?;
        // The supply is the sum of all balances, so it covers any single balance.
        let supply = supply.checked_sub(amount).unwrap_or_default();

        self.balances
            .set(&(denom.to_owned(), *address), &balance, working_set);
        self.supply.set(&denom.to_owned(), &supply, working_set);
        debug!(%address, %amount, denom, "Debited host balance");
        Ok(())
    }

    fn credit<S: Storage>(
        &self,
        address: &Address,
        amount: Amount,
        denom: &str,
        working_set: &mut WorkingSet<S>,
    ) -> Result<(), LedgerError> {
        let overflow = || LedgerError::Overflow {
            denom: denom.to_owned(),
        };
        let supply = self
            .supply_or_err(denom, working_set)?
            .checked_add(amount)
            .ok_or_else(overflow)?;
        let balance = self
            .balance(address, denom, working_set)
            .checked_add(amount)
            .ok_or_else(overflow)?;

        self.balances
            .set(&(denom.to_owned(), *address), &balance, working_set);
        self.supply.set(&denom.to_owned(), &supply, working_set);
        debug!(%address, %amount, denom, "Credited host balance");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use op_state::InMemoryStorage;

    use super::*;

    fn bank_with(balance: u64) -> (Bank, Address, WorkingSet<InMemoryStorage>) {
        let bank = Bank::new(&Prefix::from("bank/"));
        let alice = Address::from([1; 32]);
        let mut working_set = WorkingSet::new(InMemoryStorage::new());
        let config = BankConfig {
            denoms: vec!["uinit".to_owned()],
            balances: vec![BalanceConfig {
                address: alice,
                denom: "uinit".to_owned(),
                amount: Amount::from(balance),
            }],
        };
        bank.init(&config, &mut working_set).unwrap();
        (bank, alice, working_set)
    }

    #[test]
    fn debit_and_credit_move_supply() {
        let (bank, alice, mut working_set) = bank_with(100);
        bank.debit(&alice, Amount::from(40), "uinit", &mut working_set)
            .unwrap();
        assert_eq!(bank.balance(&alice, "uinit", &mut working_set), Amount::from(60));
        assert_eq!(
            bank.supply_of("uinit", &mut working_set),
            Some(Amount::from(60))
        );

        let bob = Address::from([2; 32]);
        bank.credit(&bob, Amount::from(5), "uinit", &mut working_set)
            .unwrap();
        assert_eq!(bank.balance(&bob, "uinit", &mut working_set), Amount::from(5));
        assert_eq!(
            bank.supply_of("uinit", &mut working_set),
            Some(Amount::from(65))
        );
    }

    #[test]
    fn debit_beyond_balance_fails() {
        let (bank, alice, mut working_set) = bank_with(10);
        let err = bank
            .debit(&alice, Amount::from(11), "uinit", &mut working_set)
            .unwrap_err();
        assert_eq!(
            err,
            LedgerError::InsufficientFunds {
                address: alice,
                denom: "uinit".to_owned(),
                needed: Amount::from(11),
            }
        );
        assert_eq!(bank.balance(&alice, "uinit", &mut working_set), Amount::from(10));
    }

    #[test]
    fn unknown_denom_is_rejected() {
        let (bank, alice, mut working_set) = bank_with(10);
        assert!(matches!(
            bank.credit(&alice, Amount::from(1), "uatom", &mut working_set),
            Err(LedgerError::UnsupportedDenom { .. })
        ));
    }
}
