//! # Domain Invariants
//!
//! Business rules shared by the ledger, the escrow registry and the packet
//! callbacks.

use super::errors::{Address, Amount, DecodeError, Role, TransferError};

/// Invariant: every transferred amount is positive.
pub fn invariant_positive_amount(amount: Amount) -> Result<(), DecodeError> {
    if amount.is_zero() {
        return Err(DecodeError::ZeroAmount);
    }
    Ok(())
}

/// Invariant: privileged calls come from the holder of the role.
pub fn invariant_authorized(
    caller: &Address,
    expected: &Address,
    role: Role,
) -> Result<(), TransferError> {
    if caller != expected {
        return Err(TransferError::Unauthorized {
            caller: *caller,
            role,
        });
    }
    Ok(())
}

/// Invariant: a debit never exceeds the balance.
///
/// Returns the balance left after the debit.
pub fn invariant_sufficient_balance(
    account: &Address,
    denom: &str,
    balance: Amount,
    amount: Amount,
) -> Result<Amount, TransferError> {
    balance
        .checked_sub(amount)
        .ok_or_else(|| TransferError::InsufficientBalance {
            account: *account,
            denom: denom.to_string(),
            required: amount,
            available: balance,
        })
}

/// Invariant: an escrow release is fully covered by the escrow balance.
pub fn invariant_escrow_covers(
    channel: &str,
    denom: &str,
    balance: Amount,
    amount: Amount,
) -> Result<(), TransferError> {
    if balance < amount {
        return Err(TransferError::InsufficientEscrowBalance {
            channel: channel.to_string(),
            denom: denom.to_string(),
            required: amount,
            available: balance,
        });
    }
    Ok(())
}

/// Invariant: a credit never exceeds `U256::MAX`.
///
/// Returns the balance after the credit.
pub fn invariant_no_overflow(
    account: &Address,
    denom: &str,
    balance: Amount,
    amount: Amount,
) -> Result<Amount, TransferError> {
    balance
        .checked_add(amount)
        .ok_or_else(|| TransferError::Overflow {
            account: *account,
            denom: denom.to_string(),
        })
}
