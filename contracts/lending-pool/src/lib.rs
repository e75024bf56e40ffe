#![no_std]

mod accrual;
mod constants;
mod contract;
mod custody;
mod error;
mod events;
mod exchange_rate;
mod helpers;
mod oracle;
mod rate_model;
mod solvency;
mod storage;

pub use accrual::{accrue, Accrual};
pub use constants::*;
pub use contract::{LendingPool, LendingPoolClient};
pub use error::Error;
pub use exchange_rate::{
    debt_for_units, debt_for_units_up, debt_rate, lend_rate, shares_for_underlying,
    underlying_for_shares, units_for_debt, units_for_debt_up,
};
pub use helpers::{mul_div, mul_div_up};
pub use oracle::{normalize_price, PriceFeedClient};
pub use rate_model::RateModel;
pub use solvency::{account_liquidity, usd_value, Liquidity, Prices};
pub use storage::{AccountPosition, InitParams, PoolConfig, PoolLedger};
