use crate::constants::WAD;
use crate::error::Error;
use crate::helpers::{mul_div, mul_div_up};
use crate::storage::PoolLedger;

/// Underlying per share, scaled 1e18.
///
/// Share value is custody cash plus outstanding debt minus the reserve.
/// Unity while no shares exist.
pub fn lend_rate(ledger: &PoolLedger, cash: u128, share_supply: u128) -> Result<u128, Error> {
    if share_supply == 0 {
        return Ok(WAD);
    }
    let gross = cash
        .checked_add(ledger.total_debt)
        .ok_or(Error::AccountingInvariantViolation)?;
    let net = gross
        .checked_sub(ledger.total_reserve)
        .ok_or(Error::AccountingInvariantViolation)?;
    mul_div(net, WAD, share_supply)
}

/// Underlying debt per borrowed unit, scaled 1e18. Unity while nothing is borrowed.
pub fn debt_rate(ledger: &PoolLedger) -> Result<u128, Error> {
    if ledger.total_borrowed == 0 {
        return Ok(WAD);
    }
    if ledger.total_debt < ledger.total_borrowed {
        return Err(Error::AccountingInvariantViolation);
    }
    mul_div(ledger.total_debt, WAD, ledger.total_borrowed)
}

pub fn shares_for_underlying(amount: u128, lend_rate: u128) -> Result<u128, Error> {
    mul_div(amount, WAD, lend_rate)
}

pub fn underlying_for_shares(shares: u128, lend_rate: u128) -> Result<u128, Error> {
    mul_div(shares, lend_rate, WAD)
}

pub fn units_for_debt(amount: u128, debt_rate: u128) -> Result<u128, Error> {
    mul_div(amount, WAD, debt_rate)
}

/// Units owed for drawing `amount`, rounded against the borrower.
pub fn units_for_debt_up(amount: u128, debt_rate: u128) -> Result<u128, Error> {
    mul_div_up(amount, WAD, debt_rate)
}

pub fn debt_for_units(units: u128, debt_rate: u128) -> Result<u128, Error> {
    mul_div(units, debt_rate, WAD)
}

/// Underlying needed to retire `units` completely.
pub fn debt_for_units_up(units: u128, debt_rate: u128) -> Result<u128, Error> {
    mul_div_up(units, debt_rate, WAD)
}

#[cfg(test)]
mod test {
    use super::*;

    fn ledger(total_borrowed: u128, total_debt: u128, total_reserve: u128) -> PoolLedger {
        PoolLedger {
            total_deposited: 0,
            total_borrowed,
            total_debt,
            total_reserve,
            total_collateral: 0,
            ltv: 8,
            accrual_timestamp: 0,
        }
    }

    #[test]
    fn empty_pool_rates_are_unity() {
        let empty = ledger(0, 0, 0);
        assert_eq!(lend_rate(&empty, 0, 0).unwrap(), WAD);
        assert_eq!(lend_rate(&empty, 1_000, 0).unwrap(), WAD);
        assert_eq!(debt_rate(&empty).unwrap(), WAD);
    }

    #[test]
    fn lend_rate_counts_debt_and_excludes_reserve() {
        // 900 cash + 210 debt - 10 reserve over 1_000 shares
        let state = ledger(200, 210, 10);
        assert_eq!(lend_rate(&state, 900, 1_000).unwrap(), WAD * 11 / 10);
    }

    #[test]
    fn reserve_above_cash_and_debt_is_an_invariant_violation() {
        let state = ledger(0, 0, 500);
        assert_eq!(
            lend_rate(&state, 100, 1_000),
            Err(Error::AccountingInvariantViolation)
        );
    }

    #[test]
    fn debt_rate_tracks_interest_per_unit() {
        let state = ledger(1_000, 1_050, 0);
        let rate = debt_rate(&state).unwrap();
        assert_eq!(rate, WAD * 105 / 100);
        assert_eq!(debt_for_units(1_000, rate).unwrap(), 1_050);
        assert_eq!(units_for_debt(1_050, rate).unwrap(), 1_000);
        assert_eq!(units_for_debt(100, rate).unwrap(), 95);
        assert_eq!(units_for_debt_up(100, rate).unwrap(), 96);
        assert_eq!(units_for_debt_up(1_050, rate).unwrap(), 1_000);
        assert_eq!(debt_for_units(95, rate).unwrap(), 99);
        assert_eq!(debt_for_units_up(95, rate).unwrap(), 100);
    }

    #[test]
    fn debt_below_units_is_rejected() {
        let state = ledger(1_000, 999, 0);
        assert_eq!(debt_rate(&state), Err(Error::AccountingInvariantViolation));
    }

    #[test]
    fn share_conversions_round_down() {
        let rate = WAD * 3 / 2;
        assert_eq!(shares_for_underlying(100, rate).unwrap(), 66);
        assert_eq!(underlying_for_shares(66, rate).unwrap(), 99);
    }
}
