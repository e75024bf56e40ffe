use crate::constants::WAD;
use crate::error::Error;
use crate::helpers::mul_div;

/// Linear utilization model: `rate = base_rate + utilization * multiplier`.
///
/// Both parameters are per-second fractions scaled by 1e18.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct RateModel {
    pub base_rate: u128,
    pub multiplier: u128,
}

impl RateModel {
    /// Borrowed units over lendable deposits (deposits minus reserve), scaled 1e18, at most 1e18.
    pub fn utilization(
        total_deposited: u128,
        total_borrowed: u128,
        total_reserve: u128,
    ) -> Result<u128, Error> {
        if total_deposited == 0 || total_borrowed == 0 {
            return Ok(0);
        }
        let lendable = total_deposited.saturating_sub(total_reserve);
        if lendable == 0 {
            return Ok(WAD);
        }
        Ok(mul_div(total_borrowed, WAD, lendable)?.min(WAD))
    }

    pub fn borrow_rate(&self, utilization: u128) -> Result<u128, Error> {
        let variable = mul_div(utilization, self.multiplier, WAD)?;
        self.base_rate
            .checked_add(variable)
            .ok_or(Error::AccountingInvariantViolation)
    }
}
