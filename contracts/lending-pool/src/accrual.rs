use crate::constants::WAD;
use crate::error::Error;
use crate::helpers::mul_div;
use crate::rate_model::RateModel;
use crate::storage::PoolLedger;

/// Result of advancing the ledger to a new timestamp.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Accrual {
    pub ledger: PoolLedger,
    pub interest_accrued: u128,
    pub reserve_accrued: u128,
    pub borrow_rate: u128,
    /// `false` when `now` equals the stored timestamp and nothing moved.
    pub advanced: bool,
}

/// Advance debt and reserve by the time elapsed since the last accrual.
///
/// Interest is simple within one call (`rate * delta_t`) and is applied to
/// the debt-unit count; compounding comes from repeated calls. Only
/// `total_debt` and `total_reserve` grow, so the debt exchange rate rises
/// while `total_borrowed` stays put. The input is left untouched.
pub fn accrue(
    ledger: &PoolLedger,
    model: &RateModel,
    reserve_factor: u128,
    now: u64,
) -> Result<Accrual, Error> {
    if now < ledger.accrual_timestamp {
        return Err(Error::ClockRegression);
    }
    let utilization = RateModel::utilization(
        ledger.total_deposited,
        ledger.total_borrowed,
        ledger.total_reserve,
    )?;
    let borrow_rate = model.borrow_rate(utilization)?;
    if now == ledger.accrual_timestamp {
        return Ok(Accrual {
            ledger: ledger.clone(),
            interest_accrued: 0,
            reserve_accrued: 0,
            borrow_rate,
            advanced: false,
        });
    }

    let delta_t = (now - ledger.accrual_timestamp) as u128;
    let interest_factor = borrow_rate
        .checked_mul(delta_t)
        .ok_or(Error::AccountingInvariantViolation)?;
    let interest_accrued = mul_div(interest_factor, ledger.total_borrowed, WAD)?;
    let reserve_accrued = mul_div(interest_accrued, reserve_factor, WAD)?;

    let mut next = ledger.clone();
    next.total_debt = next
        .total_debt
        .checked_add(interest_accrued)
        .ok_or(Error::AccountingInvariantViolation)?;
    next.total_reserve = next
        .total_reserve
        .checked_add(reserve_accrued)
        .ok_or(Error::AccountingInvariantViolation)?;
    next.accrual_timestamp = now;
    next.check_invariants()?;

    Ok(Accrual {
        ledger: next,
        interest_accrued,
        reserve_accrued,
        borrow_rate,
        advanced: true,
    })
}
