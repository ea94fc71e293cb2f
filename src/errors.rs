use crate::types::{AccountId, Amount};

/// Error type that can be returned by fallible operations in this crate
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A transfer named the same account as both sender and receiver
    #[error("Invalid action: account {0} cannot transfer to itself")]
    InvalidOperation(AccountId),
    /// A transfer was requested with a negative amount
    #[error("Transfer amount can't be negative: {0}")]
    InvalidArgument(Amount),
    /// A transfer amount is under the configured business floor
    #[error("Transfer amount {amount} is below the minimum of {minimum}")]
    BelowMinimum {
        /// The requested amount
        amount: Amount,
        /// The smallest amount that may be transferred
        minimum: Amount,
    },
    /// [`lock`](crate::types::BalanceAccount::lock) was called on an account that is already locked.
    /// Locks are not reentrant.
    #[error("Account {0} is already locked")]
    AlreadyLocked(AccountId),
    /// The balance was changed, or the lock released, on an account that is not locked
    #[error("Account {0} is not locked")]
    NotLocked(AccountId),
    /// A balance change would leave the representable range
    #[error("Balance of account {0} would overflow")]
    BalanceOverflow(AccountId),
    /// Error reading or writing CSV audit records; could wrap IO or parsing errors
    #[error("Error processing CSV")]
    Csv(#[from] csv::Error),
    /// Error writing a textual audit record
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// Processor configuration could not be parsed or is out of range
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}
