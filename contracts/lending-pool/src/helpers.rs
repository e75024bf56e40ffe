use crate::error::Error;

/// `floor(a * b / denominator)` without silent overflow.
///
/// When `a * b` does not fit in a `u128` the product is split as
/// `(a / d) * b + (a % d) * b / d`, which yields the same floored result as
/// long as both partial terms fit.
pub fn mul_div(a: u128, b: u128, denominator: u128) -> Result<u128, Error> {
    if denominator == 0 {
        return Err(Error::AccountingInvariantViolation);
    }
    if let Some(product) = a.checked_mul(b) {
        return Ok(product / denominator);
    }
    split_mul_div(a, b, denominator).or_else(|_| split_mul_div(b, a, denominator))
}

/// Same as [`mul_div`] but rounds up.
pub fn mul_div_up(a: u128, b: u128, denominator: u128) -> Result<u128, Error> {
    let floor = mul_div(a, b, denominator)?;
    // a * b ≡ (a mod d) * (b mod d) (mod d); an unrepresentable remainder product rounds up.
    let exact = match (a % denominator).checked_mul(b % denominator) {
        Some(residue) => residue % denominator == 0,
        None => false,
    };
    if exact {
        Ok(floor)
    } else {
        floor
            .checked_add(1)
            .ok_or(Error::AccountingInvariantViolation)
    }
}

fn split_mul_div(a: u128, b: u128, denominator: u128) -> Result<u128, Error> {
    let whole = (a / denominator)
        .checked_mul(b)
        .ok_or(Error::AccountingInvariantViolation)?;
    let part = (a % denominator)
        .checked_mul(b)
        .ok_or(Error::AccountingInvariantViolation)?
        / denominator;
    whole
        .checked_add(part)
        .ok_or(Error::AccountingInvariantViolation)
}

pub fn pow10(exp: u32) -> Result<u128, Error> {
    10u128
        .checked_pow(exp)
        .ok_or(Error::AccountingInvariantViolation)
}

pub fn to_i128(amount: u128) -> Result<i128, Error> {
    i128::try_from(amount).map_err(|_| Error::InvalidAmount)
}

/// Token balances are signed on Soroban; a negative balance reads as empty.
pub fn balance_to_u128(balance: i128) -> u128 {
    if balance < 0 {
        0u128
    } else {
        balance as u128
    }
}
