use tracing::{debug, info, warn};

use crate::{
    errors::Error,
    types::{
        Account, AccountId, Amount, BalanceAccount, MemoryTransferLog, TransferLog,
        TransferOutcome, TransferProcessor, TransferRecord,
    },
};

impl BalanceAccount for Account {
    fn id(&self) -> AccountId {
        self.id
    }

    fn balance(&self) -> Amount {
        self.balance
    }

    fn lock(&mut self) -> Result<(), Error> {
        if self.locked {
            return Err(Error::AlreadyLocked(self.id));
        }
        self.locked = true;
        Ok(())
    }

    fn unlock(&mut self) -> Result<(), Error> {
        if !self.locked {
            return Err(Error::NotLocked(self.id));
        }
        self.locked = false;
        Ok(())
    }

    /// Balances are allowed to go negative; only leaving the `i64` range is refused.
    fn change_balance(&mut self, diff: Amount) -> Result<(), Error> {
        if !self.locked {
            return Err(Error::NotLocked(self.id));
        }
        self.balance = self
            .balance
            .checked_add(diff)
            .ok_or(Error::BalanceOverflow(self.id))?;
        Ok(())
    }
}

/// Adds `sum` to the account unconditionally.
/// # Errors
/// Whatever [`BalanceAccount::change_balance`] reports, usually [`Error::NotLocked`]
pub fn credit<A>(account: &mut A, sum: Amount) -> Result<(), Error>
where
    A: BalanceAccount + ?Sized,
{
    account.change_balance(sum)
}

/// Subtracts `sum` from the account if its balance strictly exceeds `sum`.
///
/// Returns `false`, leaving the account untouched, if it can't cover the sum.
/// # Errors
/// Whatever [`BalanceAccount::change_balance`] reports, usually [`Error::NotLocked`]
pub fn debit<A>(account: &mut A, sum: Amount) -> Result<bool, Error>
where
    A: BalanceAccount + ?Sized,
{
    if account.balance() > sum {
        account.change_balance(-sum)?;
        return Ok(true);
    }
    Ok(false)
}

impl<L: TransferLog> TransferProcessor<L> {
    /// Moves `amount` from `from` to `to`, charging the sender the configured fee.
    ///
    /// Both accounts are locked sender first, the receiver is credited, then the sender is
    /// debited `amount + fee`. If the sender can't cover that, the credit is reversed and
    /// [`TransferOutcome::Declined`] is returned. Locks are released receiver first. Every
    /// transfer that gets this far is reported to the [`TransferLog`].
    ///
    /// A fee of more than half the amount declines the transfer before any account is touched
    /// and without reporting it.
    /// # Errors
    /// * [`Error::InvalidOperation`] if both accounts have the same id
    /// * [`Error::InvalidArgument`] if `amount` is negative
    /// * [`Error::BelowMinimum`] if `amount` is under the configured minimum
    /// * [`Error::AlreadyLocked`] and friends if an account refuses a lock step. Balances
    ///   changed before the failure are not restored, but no lock taken here stays held.
    pub fn transfer<F, T>(
        &mut self,
        from: &mut F,
        to: &mut T,
        amount: Amount,
    ) -> Result<TransferOutcome, Error>
    where
        F: BalanceAccount + ?Sized,
        T: BalanceAccount + ?Sized,
    {
        self.validate(from.id(), to.id(), amount)?;
        let fee = Amount::from(self.config.fee);
        // A u32 fee widened to i64 can't overflow when doubled
        if fee * 2 > amount {
            debug!(from = %from.id(), to = %to.id(), amount, fee, "fee leaves no room, declining");
            return Ok(TransferOutcome::Declined);
        }

        from.lock()?;
        if let Err(err) = to.lock() {
            if let Err(unlock_err) = from.unlock() {
                warn!(account = %from.id(), error = %unlock_err, "failed to release sender");
            }
            return Err(err);
        }
        let settled = settle(from, to, amount, fee);
        let to_released = to.unlock();
        let from_released = from.unlock();
        let debited = settled?;
        to_released?;
        from_released?;

        let outcome = if debited {
            TransferOutcome::Completed
        } else {
            TransferOutcome::Declined
        };
        info!(from = %from.id(), to = %to.id(), amount, fee, ?outcome, "transfer finished");
        self.report(&*from, &*to, amount, outcome);
        Ok(outcome)
    }

    /// Checks the request before any account is touched. First failing check wins.
    fn validate(&self, from: AccountId, to: AccountId, amount: Amount) -> Result<(), Error> {
        if from == to {
            return Err(Error::InvalidOperation(from));
        }
        if amount < 0 {
            return Err(Error::InvalidArgument(amount));
        }
        if amount < self.config.minimum_amount {
            return Err(Error::BelowMinimum {
                amount,
                minimum: self.config.minimum_amount,
            });
        }
        Ok(())
    }

    /// Hands the finished transfer to the log. A failing log doesn't fail the transfer.
    fn report<F, T>(&mut self, from: &F, to: &T, amount: Amount, outcome: TransferOutcome)
    where
        F: BalanceAccount + ?Sized,
        T: BalanceAccount + ?Sized,
    {
        let record = TransferRecord {
            from: from.id(),
            to: to.id(),
            amount,
            from_balance: from.balance(),
            to_balance: to.balance(),
            outcome,
        };
        if let Err(err) = self.log.record(&record) {
            warn!(from = %record.from, to = %record.to, error = %err, "failed to record transfer");
        }
    }
}

/// Credits the receiver, then tries to debit the sender, reversing the credit if that fails.
///
/// Both accounts must already be locked. Returns whether the sender was debited.
fn settle<F, T>(from: &mut F, to: &mut T, amount: Amount, fee: Amount) -> Result<bool, Error>
where
    F: BalanceAccount + ?Sized,
    T: BalanceAccount + ?Sized,
{
    credit(to, amount)?;
    // A saturated total is never covered, so the transfer rolls back
    let debited = debit(from, amount.saturating_add(fee))?;
    if !debited {
        debug!(from = %from.id(), to = %to.id(), amount, "insufficient funds, rolling back credit");
        to.change_balance(-amount)?;
    }
    Ok(debited)
}

impl TransferLog for MemoryTransferLog {
    fn record(&mut self, record: &TransferRecord) -> Result<(), Error> {
        self.records.push(record.clone());
        Ok(())
    }
}

impl<L: TransferLog + ?Sized> TransferLog for &mut L {
    fn record(&mut self, record: &TransferRecord) -> Result<(), Error> {
        (**self).record(record)
    }
}
