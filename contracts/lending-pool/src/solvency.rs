use crate::constants::LTV_DENOMINATOR;
use crate::error::Error;
use crate::exchange_rate::debt_for_units;
use crate::helpers::{mul_div, pow10};
use crate::storage::AccountPosition;

/// Oracle prices normalized to 1e18 USD per whole unit, with each asset's decimals.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Prices {
    pub collateral: u128,
    pub underlying: u128,
    pub collateral_decimals: u32,
    pub underlying_decimals: u32,
}

/// USD headroom (`excess`) or deficit (`shortfall`), 1e18 scale. At most one is nonzero.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Liquidity {
    pub excess: u128,
    pub shortfall: u128,
}

/// Value of `amount` base units of an asset with `decimals` at `price` (1e18 USD).
pub fn usd_value(amount: u128, price: u128, decimals: u32) -> Result<u128, Error> {
    mul_div(amount, price, pow10(decimals)?)
}

pub fn account_liquidity(
    position: &AccountPosition,
    debt_rate: u128,
    ltv: u32,
    prices: &Prices,
) -> Result<Liquidity, Error> {
    let debt = debt_for_units(position.borrowed_units, debt_rate)?;
    let debt_usd = usd_value(debt, prices.underlying, prices.underlying_decimals)?;

    let borrowable_collateral = mul_div(position.collateral_balance, ltv as u128, LTV_DENOMINATOR)?;
    let collateral_usd = usd_value(
        borrowable_collateral,
        prices.collateral,
        prices.collateral_decimals,
    )?;

    if collateral_usd >= debt_usd {
        Ok(Liquidity {
            excess: collateral_usd - debt_usd,
            shortfall: 0,
        })
    } else {
        Ok(Liquidity {
            excess: 0,
            shortfall: debt_usd - collateral_usd,
        })
    }
}

/// Borrow gate: current excess must cover the USD value of the new borrow.
pub fn ensure_can_borrow(
    position: &AccountPosition,
    debt_rate: u128,
    ltv: u32,
    prices: &Prices,
    amount: u128,
) -> Result<Liquidity, Error> {
    let liquidity = account_liquidity(position, debt_rate, ltv, prices)?;
    let borrow_usd = usd_value(amount, prices.underlying, prices.underlying_decimals)?;
    if liquidity.excess < borrow_usd {
        return Err(Error::InsufficientCollateral);
    }
    Ok(liquidity)
}

/// Withdrawal gate: positions without debt are unconstrained; otherwise the
/// position with `amount` less collateral must not fall short.
pub fn ensure_can_withdraw(
    position: &AccountPosition,
    debt_rate: u128,
    ltv: u32,
    prices: &Prices,
    amount: u128,
) -> Result<(), Error> {
    if position.borrowed_units == 0 {
        return Ok(());
    }
    let remaining = AccountPosition {
        collateral_balance: position
            .collateral_balance
            .checked_sub(amount)
            .ok_or(Error::InvalidAmount)?,
        borrowed_units: position.borrowed_units,
    };
    let after = account_liquidity(&remaining, debt_rate, ltv, prices)?;
    if after.shortfall > 0 {
        return Err(Error::InsufficientCollateral);
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::constants::WAD;

    // collateral $0.50, underlying $1.00, both 7 decimals
    const PRICES: Prices = Prices {
        collateral: WAD / 2,
        underlying: WAD,
        collateral_decimals: 7,
        underlying_decimals: 7,
    };
    const UNIT: u128 = 10_000_000;

    #[test]
    fn debt_free_account_has_ltv_share_of_collateral_as_excess() {
        let position = AccountPosition {
            collateral_balance: UNIT,
            borrowed_units: 0,
        };
        let liquidity = account_liquidity(&position, WAD, 8, &PRICES).unwrap();
        assert_eq!(liquidity.excess, WAD * 8 / 10 / 2);
        assert_eq!(liquidity.shortfall, 0);
    }

    #[test]
    fn debt_is_priced_through_the_debt_rate() {
        let position = AccountPosition {
            collateral_balance: 10 * UNIT,
            borrowed_units: 4 * UNIT,
        };
        // collateral 10 * 0.8 * 0.5 = $4; debt 4 units at 1.0 = $4
        let balanced = account_liquidity(&position, WAD, 8, &PRICES).unwrap();
        assert_eq!(balanced, Liquidity::default());
        // after interest the same units owe $4.40
        let short = account_liquidity(&position, WAD * 11 / 10, 8, &PRICES).unwrap();
        assert_eq!(short.excess, 0);
        assert_eq!(short.shortfall, WAD * 4 / 10);
    }

    #[test]
    fn borrow_gate_uses_pre_borrow_excess() {
        let position = AccountPosition {
            collateral_balance: 10 * UNIT,
            borrowed_units: 0,
        };
        assert!(ensure_can_borrow(&position, WAD, 8, &PRICES, 4 * UNIT).is_ok());
        assert_eq!(
            ensure_can_borrow(&position, WAD, 8, &PRICES, 4 * UNIT + 1),
            Err(Error::InsufficientCollateral)
        );
    }

    #[test]
    fn withdraw_gate_skips_debt_free_accounts() {
        let position = AccountPosition {
            collateral_balance: 10 * UNIT,
            borrowed_units: 0,
        };
        assert!(ensure_can_withdraw(&position, WAD, 0, &PRICES, 10 * UNIT).is_ok());
    }

    #[test]
    fn withdraw_gate_checks_remaining_collateral() {
        let position = AccountPosition {
            collateral_balance: 10 * UNIT,
            borrowed_units: 2 * UNIT,
        };
        // $2 debt needs 5 collateral units at 80% of $0.50
        assert!(ensure_can_withdraw(&position, WAD, 8, &PRICES, 5 * UNIT).is_ok());
        assert_eq!(
            ensure_can_withdraw(&position, WAD, 8, &PRICES, 5 * UNIT + 1),
            Err(Error::InsufficientCollateral)
        );
    }
}
