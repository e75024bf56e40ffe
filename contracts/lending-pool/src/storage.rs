use soroban_sdk::{contracttype, Address, Env};
use stellar_tokens::fungible::Base as TokenBase;

use crate::error::Error;
use crate::helpers::balance_to_u128;
use crate::rate_model::RateModel;

// Storage key types for the contract
#[contracttype]
pub enum DataKey {
    Config,            // PoolConfig, immutable after initialize
    Ledger,            // PoolLedger, read and written as one unit
    Position(Address), // AccountPosition per account
}

const TTL_THRESHOLD: u32 = 100_000;
const TTL_EXTEND_TO: u32 = 200_000;

/// Parameters accepted by `initialize`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InitParams {
    pub underlying: Address,
    pub collateral: Address,
    pub underlying_feed: Address,
    pub collateral_feed: Address,
    pub base_rate: u128,  // per second, scaled 1e18
    pub multiplier: u128, // per second, scaled 1e18
    pub reserve_factor: u128, // scaled 1e18
    pub ltv: u32,         // tenths
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolConfig {
    pub controller: Address,
    pub underlying: Address,
    pub collateral: Address,
    pub underlying_feed: Address,
    pub collateral_feed: Address,
    pub base_rate: u128,
    pub multiplier: u128,
    pub reserve_factor: u128,
    pub underlying_decimals: u32,
    pub collateral_decimals: u32,
}

impl PoolConfig {
    pub fn rate_model(&self) -> RateModel {
        RateModel {
            base_rate: self.base_rate,
            multiplier: self.multiplier,
        }
    }
}

/// Pool-wide aggregates mutated by every user-facing operation.
#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct PoolLedger {
    /// Underlying credited by suppliers, reduced on redemption.
    pub total_deposited: u128,
    /// Sum of borrower-debt units, not underlying.
    pub total_borrowed: u128,
    /// Underlying owed by borrowers including accrued interest.
    pub total_debt: u128,
    pub total_reserve: u128,
    /// Sum of every account's collateral balance.
    pub total_collateral: u128,
    pub ltv: u32,
    pub accrual_timestamp: u64,
}

impl PoolLedger {
    pub fn new(ltv: u32, now: u64) -> Self {
        Self {
            ltv,
            accrual_timestamp: now,
            ..Self::default()
        }
    }

    pub fn check_invariants(&self) -> Result<(), Error> {
        if self.total_debt < self.total_borrowed {
            return Err(Error::AccountingInvariantViolation);
        }
        Ok(())
    }

    /// Custody cash minus the reserve; the reserve is never lent out or redeemed.
    pub fn lendable_cash(&self, cash: u128) -> u128 {
        cash.saturating_sub(self.total_reserve)
    }
}

#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct AccountPosition {
    pub collateral_balance: u128,
    pub borrowed_units: u128,
}

pub fn is_initialized(env: &Env) -> bool {
    env.storage().persistent().has(&DataKey::Config)
}

pub fn read_config(env: &Env) -> Result<PoolConfig, Error> {
    let persistent = env.storage().persistent();
    let config = persistent
        .get::<_, PoolConfig>(&DataKey::Config)
        .ok_or(Error::NotInitialized)?;
    persistent.extend_ttl(&DataKey::Config, TTL_THRESHOLD, TTL_EXTEND_TO);
    Ok(config)
}

pub fn write_config(env: &Env, config: &PoolConfig) {
    env.storage().persistent().set(&DataKey::Config, config);
}

pub fn read_ledger(env: &Env) -> Result<PoolLedger, Error> {
    let persistent = env.storage().persistent();
    let ledger = persistent
        .get::<_, PoolLedger>(&DataKey::Ledger)
        .ok_or(Error::NotInitialized)?;
    persistent.extend_ttl(&DataKey::Ledger, TTL_THRESHOLD, TTL_EXTEND_TO);
    Ok(ledger)
}

pub fn write_ledger(env: &Env, ledger: &PoolLedger) -> Result<(), Error> {
    ledger.check_invariants()?;
    env.storage().persistent().set(&DataKey::Ledger, ledger);
    Ok(())
}

pub fn read_position(env: &Env, user: &Address) -> AccountPosition {
    let persistent = env.storage().persistent();
    let key = DataKey::Position(user.clone());
    match persistent.get::<_, AccountPosition>(&key) {
        Some(position) => {
            persistent.extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
            position
        }
        None => AccountPosition::default(),
    }
}

pub fn write_position(env: &Env, user: &Address, position: &AccountPosition) {
    let persistent = env.storage().persistent();
    let key = DataKey::Position(user.clone());
    persistent.set(&key, position);
    persistent.extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
}

pub fn share_balance(env: &Env, user: &Address) -> u128 {
    balance_to_u128(TokenBase::balance(env, user))
}

pub fn share_supply(env: &Env) -> u128 {
    balance_to_u128(TokenBase::total_supply(env))
}
