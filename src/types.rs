//! Common datatypes supporting transfers between accounts

use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::{config::ProcessorConfig, errors::Error};

/// Balances, fees and transfer amounts are whole units
pub type Amount = i64;

/// Unique identifier for an account
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AccountId(i64);

impl From<i64> for AccountId {
    fn from(account_id: i64) -> Self {
        Self(account_id)
    }
}

impl Display for AccountId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The capabilities a [`TransferProcessor`] needs from an account.
///
/// The lock is a logical marker, not a mutex: locking an account that is already locked fails
/// immediately instead of waiting. Reading the balance never requires the lock.
pub trait BalanceAccount {
    /// Returns the unique identifier for the account
    fn id(&self) -> AccountId;

    /// Returns the current balance
    fn balance(&self) -> Amount;

    /// Takes the lock.
    /// # Errors
    /// [`Error::AlreadyLocked`] if the lock is already held
    fn lock(&mut self) -> Result<(), Error>;

    /// Releases the lock.
    /// # Errors
    /// [`Error::NotLocked`] if the lock is not held
    fn unlock(&mut self) -> Result<(), Error>;

    /// Adds `diff` (which may be negative) to the balance.
    ///
    /// There is no overdraft check here; sufficiency is the processor's concern.
    /// # Errors
    /// [`Error::NotLocked`] if the lock is not held
    fn change_balance(&mut self, diff: Amount) -> Result<(), Error>;
}

/// An in-memory account holding a balance behind a logical lock
#[derive(Debug)]
pub struct Account {
    /// The unique identifier for the account
    pub(crate) id: AccountId,
    /// Current balance. May go negative through [`BalanceAccount::change_balance`].
    pub(crate) balance: Amount,
    /// Whether a transfer currently holds this account
    pub(crate) locked: bool,
}

impl Account {
    /// Creates a new, unlocked account with the given opening balance
    #[must_use]
    pub fn new(id: AccountId, balance: Amount) -> Self {
        Self {
            id,
            balance,
            locked: false,
        }
    }

    /// Returns whether the account is locked
    #[must_use]
    #[inline]
    pub fn is_locked(&self) -> bool {
        self.locked
    }
}

/// Result of a transfer that passed validation
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TransferOutcome {
    /// The receiver was credited and the sender debited the amount plus the fee
    Completed,
    /// Nothing moved: the fee left no room for the transfer, or the sender could not cover it
    Declined,
}

impl TransferOutcome {
    /// Returns whether funds moved
    #[must_use]
    #[inline]
    pub fn is_completed(self) -> bool {
        self == TransferOutcome::Completed
    }
}

impl From<TransferOutcome> for bool {
    fn from(outcome: TransferOutcome) -> Self {
        outcome.is_completed()
    }
}

/// What the [`TransferLog`] is told after every transfer attempt that ran to completion.
///
/// Balances are read after the mutations of the transfer.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct TransferRecord {
    /// Sending account
    pub from: AccountId,
    /// Receiving account
    pub to: AccountId,
    /// Requested amount, excluding the fee
    pub amount: Amount,
    /// Sender's balance once the transfer finished
    pub from_balance: Amount,
    /// Receiver's balance once the transfer finished
    pub to_balance: Amount,
    /// Whether funds moved
    pub outcome: TransferOutcome,
}

/// An interface to wherever transfers are recorded for audit.
///
/// Failures here never change the outcome of the transfer that was recorded.
pub trait TransferLog {
    /// Records a finished transfer
    fn record(&mut self, record: &TransferRecord) -> Result<(), Error>;
}

/// Holds recorded transfers in memory.
///
/// # Limitations
/// No persistence.
#[derive(Default, Debug)]
pub struct MemoryTransferLog {
    /// Records in the order they were made
    pub(crate) records: Vec<TransferRecord>,
}

impl MemoryTransferLog {
    /// Creates a new, empty [`MemoryTransferLog`]
    #[must_use]
    pub fn new() -> Self {
        MemoryTransferLog::default()
    }

    /// Returns every record made so far, oldest first
    #[must_use]
    pub fn records(&self) -> &[TransferRecord] {
        &self.records
    }
}

/// Moves funds between two [`BalanceAccount`]s, charging a fixed fee to the sender.
///
/// The processor keeps no state between transfers other than its [`ProcessorConfig`] and the
/// [`TransferLog`] it reports to. It schedules nothing itself: callers serialize access to any
/// pair of accounts through their locks.
#[derive(Debug)]
pub struct TransferProcessor<L> {
    /// Fee and minimum amount
    pub(crate) config: ProcessorConfig,
    /// Receives a [`TransferRecord`] after each transfer that ran to completion
    pub(crate) log: L,
}

impl<L: TransferLog> TransferProcessor<L> {
    /// Creates a processor with the default fee and minimum amount
    #[must_use]
    pub fn new(log: L) -> Self {
        Self::with_config(ProcessorConfig::default(), log)
    }

    /// Creates a processor with the given configuration
    #[must_use]
    pub fn with_config(config: ProcessorConfig, log: L) -> Self {
        Self { config, log }
    }

    /// Returns the fee charged on each completed transfer
    #[must_use]
    #[inline]
    pub fn fee(&self) -> u32 {
        self.config.fee
    }

    /// Changes the fee for subsequent transfers
    pub fn set_fee(&mut self, fee: u32) {
        self.config.fee = fee;
    }

    /// Returns the active configuration
    #[must_use]
    pub fn config(&self) -> &ProcessorConfig {
        &self.config
    }

    /// Returns the audit log
    #[must_use]
    pub fn log(&self) -> &L {
        &self.log
    }

    /// Consumes the processor, returning its audit log
    pub fn into_log(self) -> L {
        self.log
    }
}
