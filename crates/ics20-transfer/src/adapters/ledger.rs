//! In-Memory Token Ledger
//!
//! Implements `TokenLedger`: balances keyed by (account, denomination),
//! mutated only by the configured operator.

use super::ownership::Ownership;
use crate::domain::{
    invariant_authorized, invariant_no_overflow, invariant_sufficient_balance, Address, Amount,
    Role, TransferError, TransferEvent, ZERO_ADDRESS,
};
use crate::ports::inbound::Owned;
use crate::ports::outbound::TokenLedger;
use parking_lot::RwLock;
use std::collections::HashMap;
use tracing::{debug, info};

/// In-memory multi-denomination ledger.
///
/// The balance lock is held across each check-then-write, so every
/// mutation is atomic.
pub struct InMemoryLedger {
    ownership: Ownership,
    /// Sole caller allowed to mutate balances; zero until set.
    operator: RwLock<Address>,
    /// (account, denom) -> balance.
    balances: RwLock<HashMap<(Address, String), Amount>>,
    /// Every emitted event, in order.
    events: RwLock<Vec<TransferEvent>>,
}

impl InMemoryLedger {
    /// Create an empty ledger owned by `owner`, with no operator.
    pub fn new(owner: Address) -> Self {
        Self {
            ownership: Ownership::new(owner),
            operator: RwLock::new(ZERO_ADDRESS),
            balances: RwLock::new(HashMap::new()),
            events: RwLock::new(Vec::new()),
        }
    }

    /// Configure the operator. Owner-only.
    pub fn set_operator(&self, caller: &Address, operator: Address) -> Result<(), TransferError> {
        self.ownership.ensure_owner(caller)?;
        info!("[ics20] Ledger operator set to 0x{}", hex::encode(operator));
        *self.operator.write() = operator;
        Ok(())
    }

    /// Current operator.
    pub fn operator(&self) -> Address {
        *self.operator.read()
    }

    /// Events emitted so far.
    pub fn events(&self) -> Vec<TransferEvent> {
        self.events.read().clone()
    }

    /// Sum of all balances of `denom`.
    pub fn total_supply(&self, denom: &str) -> Amount {
        self.balances
            .read()
            .iter()
            .filter(|((_, d), _)| d == denom)
            .fold(Amount::zero(), |acc, (_, b)| acc.saturating_add(*b))
    }

    fn ensure_operator(&self, caller: &Address) -> Result<(), TransferError> {
        let operator = self.operator.read();
        if *operator == ZERO_ADDRESS {
            return Err(TransferError::Unauthorized {
                caller: *caller,
                role: Role::Operator,
            });
        }
        invariant_authorized(caller, &operator, Role::Operator)
    }

    fn emit(&self, event: TransferEvent) -> TransferEvent {
        self.events.write().push(event.clone());
        event
    }
}

impl TokenLedger for InMemoryLedger {
    fn balance_of(&self, account: &Address, denom: &str) -> Amount {
        self.balances
            .read()
            .get(&(*account, denom.to_string()))
            .copied()
            .unwrap_or_default()
    }

    fn mint(
        &self,
        caller: &Address,
        to: &Address,
        denom: &str,
        amount: Amount,
    ) -> Result<TransferEvent, TransferError> {
        self.ensure_operator(caller)?;

        let mut balances = self.balances.write();
        let key = (*to, denom.to_string());
        let current = balances.get(&key).copied().unwrap_or_default();
        let updated = invariant_no_overflow(to, denom, current, amount)?;
        balances.insert(key, updated);

        debug!(
            "[ics20] Minted {} {} to 0x{}",
            amount,
            denom,
            hex::encode(to)
        );
        Ok(self.emit(TransferEvent::mint(*to, denom, amount)))
    }

    fn burn(
        &self,
        caller: &Address,
        from: &Address,
        denom: &str,
        amount: Amount,
    ) -> Result<TransferEvent, TransferError> {
        self.ensure_operator(caller)?;

        let mut balances = self.balances.write();
        let key = (*from, denom.to_string());
        let current = balances.get(&key).copied().unwrap_or_default();
        let updated = invariant_sufficient_balance(from, denom, current, amount)?;
        balances.insert(key, updated);

        debug!(
            "[ics20] Burned {} {} from 0x{}",
            amount,
            denom,
            hex::encode(from)
        );
        Ok(self.emit(TransferEvent::burn(*from, denom, amount)))
    }

    fn transfer(
        &self,
        caller: &Address,
        from: &Address,
        to: &Address,
        denom: &str,
        amount: Amount,
    ) -> Result<TransferEvent, TransferError> {
        self.ensure_operator(caller)?;

        let mut balances = self.balances.write();
        let from_key = (*from, denom.to_string());
        let from_balance = balances.get(&from_key).copied().unwrap_or_default();
        let from_after = invariant_sufficient_balance(from, denom, from_balance, amount)?;

        if from != to {
            let to_key = (*to, denom.to_string());
            let to_balance = balances.get(&to_key).copied().unwrap_or_default();
            let to_after = invariant_no_overflow(to, denom, to_balance, amount)?;
            balances.insert(from_key, from_after);
            balances.insert(to_key, to_after);
        }

        debug!(
            "[ics20] Transferred {} {} 0x{} -> 0x{}",
            amount,
            denom,
            hex::encode(from),
            hex::encode(to)
        );
        Ok(self.emit(TransferEvent::transfer(*from, *to, denom, amount)))
    }
}

impl Owned for InMemoryLedger {
    fn owner(&self) -> Address {
        self.ownership.owner()
    }

    fn transfer_ownership(
        &self,
        caller: &Address,
        new_owner: Address,
    ) -> Result<(), TransferError> {
        self.ownership.transfer(caller, new_owner)
    }
}
