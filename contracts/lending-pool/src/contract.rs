use soroban_sdk::{contract, contractimpl, token, Address, Env, String};
use stellar_tokens::fungible::burnable::emit_burn;
use stellar_tokens::fungible::Base as TokenBase;

use crate::accrual::{accrue, Accrual};
use crate::constants::*;
use crate::custody::{balance_of_self, transfer_in, transfer_out};
use crate::error::Error;
use crate::events::*;
use crate::exchange_rate::*;
use crate::helpers::{balance_to_u128, mul_div, to_i128};
use crate::oracle::read_prices;
use crate::rate_model::RateModel;
use crate::solvency::{account_liquidity, ensure_can_borrow, ensure_can_withdraw};
use crate::storage::*;

#[contract]
pub struct LendingPool;

#[contractimpl]
impl LendingPool {
    /// Configure the pool once. `controller` is the only identity allowed to change `ltv`.
    pub fn initialize(env: Env, controller: Address, params: InitParams) -> Result<(), Error> {
        if is_initialized(&env) {
            return Err(Error::AlreadyInitialized);
        }
        controller.require_auth();
        if params.ltv > MAX_LTV {
            return Err(Error::InvalidLtv);
        }
        if params.reserve_factor > WAD
            || params.base_rate > MAX_RATE_PER_SECOND
            || params.multiplier > MAX_RATE_PER_SECOND
            || params.underlying == params.collateral
        {
            return Err(Error::InvalidConfig);
        }
        let underlying_decimals = asset_decimals(&env, &params.underlying)?;
        let collateral_decimals = asset_decimals(&env, &params.collateral)?;

        let config = PoolConfig {
            controller: controller.clone(),
            underlying: params.underlying.clone(),
            collateral: params.collateral.clone(),
            underlying_feed: params.underlying_feed,
            collateral_feed: params.collateral_feed,
            base_rate: params.base_rate,
            multiplier: params.multiplier,
            reserve_factor: params.reserve_factor,
            underlying_decimals,
            collateral_decimals,
        };
        write_config(&env, &config);
        write_ledger(&env, &PoolLedger::new(params.ltv, env.ledger().timestamp()))?;

        // Shares start 1:1 with underlying, so they carry the same precision.
        TokenBase::set_metadata(
            &env,
            underlying_decimals,
            String::from_str(&env, "Lending Pool Share"),
            String::from_str(&env, "LPS"),
        );

        PoolInitialized {
            controller,
            underlying: params.underlying,
            collateral: params.collateral,
            ltv: params.ltv,
        }
        .publish(&env);
        Ok(())
    }

    /// Advance interest to the current ledger timestamp.
    pub fn accrue_interest(env: Env) -> Result<(), Error> {
        let (_, ledger) = begin(&env)?;
        write_ledger(&env, &ledger)
    }

    /// Deposit underlying and receive shares at the current lend rate.
    pub fn supply(env: Env, user: Address, amount: u128) -> Result<u128, Error> {
        user.require_auth();
        if amount == 0 {
            return Err(Error::InvalidAmount);
        }
        let (config, mut ledger) = begin(&env)?;

        // Rate is taken before cash moves.
        let cash = balance_of_self(&env, &config.underlying)?;
        let rate = lend_rate(&ledger, cash, share_supply(&env))?;
        let shares = shares_for_underlying(amount, rate)?;
        if shares == 0 {
            return Err(Error::InvalidAmount);
        }
        ledger.total_deposited = ledger
            .total_deposited
            .checked_add(amount)
            .ok_or(Error::AccountingInvariantViolation)?;

        transfer_in(&env, &config.underlying, &user, amount)?;
        TokenBase::mint(&env, &user, to_i128(shares)?);
        write_ledger(&env, &ledger)?;

        Supply {
            supplier: user,
            supply_amount: amount,
            shares_minted: shares,
        }
        .publish(&env);
        Ok(shares)
    }

    /// Burn `shares` and receive the underlying they are worth.
    pub fn redeem(env: Env, user: Address, shares: u128) -> Result<u128, Error> {
        user.require_auth();
        if shares == 0 {
            return Err(Error::InvalidAmount);
        }
        let (config, mut ledger) = begin(&env)?;
        if shares > share_balance(&env, &user) {
            return Err(Error::InsufficientShares);
        }

        let cash = balance_of_self(&env, &config.underlying)?;
        let supply = share_supply(&env);
        let rate = lend_rate(&ledger, cash, supply)?;
        let underlying = underlying_for_shares(shares, rate)?;
        if underlying == 0 {
            return Err(Error::InvalidAmount);
        }
        if underlying > ledger.lendable_cash(cash) {
            return Err(Error::InsufficientLiquidity);
        }
        // The payout includes earned interest; deposits shrink by the redeemed
        // shares' pro-rata principal and reach zero with the last share.
        let principal = mul_div(ledger.total_deposited, shares, supply)?;
        ledger.total_deposited = ledger
            .total_deposited
            .checked_sub(principal)
            .ok_or(Error::AccountingInvariantViolation)?;

        let burn = to_i128(shares)?;
        TokenBase::update(&env, Some(&user), None, burn);
        emit_burn(&env, &user, burn);
        write_ledger(&env, &ledger)?;
        transfer_out(&env, &config.underlying, &user, underlying)?;

        Redeem {
            redeemer: user,
            redeem_amount: underlying,
            shares_burned: shares,
        }
        .publish(&env);
        Ok(underlying)
    }

    /// Post collateral for `user`.
    pub fn add_collateral(env: Env, user: Address, amount: u128) -> Result<(), Error> {
        user.require_auth();
        if amount == 0 {
            return Err(Error::InvalidAmount);
        }
        let (config, mut ledger) = begin(&env)?;
        let mut position = read_position(&env, &user);
        position.collateral_balance = position
            .collateral_balance
            .checked_add(amount)
            .ok_or(Error::AccountingInvariantViolation)?;
        ledger.total_collateral = ledger
            .total_collateral
            .checked_add(amount)
            .ok_or(Error::AccountingInvariantViolation)?;

        transfer_in(&env, &config.collateral, &user, amount)?;
        write_position(&env, &user, &position);
        write_ledger(&env, &ledger)?;

        CollateralAdded {
            account: user,
            amount,
            collateral_balance: position.collateral_balance,
        }
        .publish(&env);
        Ok(())
    }

    /// Withdraw collateral. Accounts with debt must stay solvent afterwards.
    pub fn remove_collateral(env: Env, user: Address, amount: u128) -> Result<(), Error> {
        user.require_auth();
        let (config, mut ledger) = begin(&env)?;
        let mut position = read_position(&env, &user);
        if amount == 0 || amount > position.collateral_balance {
            return Err(Error::InvalidAmount);
        }
        if position.borrowed_units > 0 {
            let prices = read_prices(&env, &config)?;
            let rate = debt_rate(&ledger)?;
            ensure_can_withdraw(&position, rate, ledger.ltv, &prices, amount)?;
        }

        position.collateral_balance -= amount;
        ledger.total_collateral = ledger
            .total_collateral
            .checked_sub(amount)
            .ok_or(Error::AccountingInvariantViolation)?;
        write_position(&env, &user, &position);
        write_ledger(&env, &ledger)?;
        transfer_out(&env, &config.collateral, &user, amount)?;

        CollateralRemoved {
            account: user,
            amount,
            collateral_balance: position.collateral_balance,
        }
        .publish(&env);
        Ok(())
    }

    /// Draw `amount` underlying against posted collateral. Returns the debt units issued.
    pub fn borrow(env: Env, user: Address, amount: u128) -> Result<u128, Error> {
        user.require_auth();
        if amount == 0 {
            return Err(Error::InvalidAmount);
        }
        let (config, mut ledger) = begin(&env)?;
        let mut position = read_position(&env, &user);
        let rate = debt_rate(&ledger)?;
        let prices = read_prices(&env, &config)?;
        ensure_can_borrow(&position, rate, ledger.ltv, &prices, amount)?;

        let cash = balance_of_self(&env, &config.underlying)?;
        if amount > ledger.lendable_cash(cash) {
            return Err(Error::InsufficientLiquidity);
        }
        // Rounded up so the units always price at least the amount drawn.
        let units = units_for_debt_up(amount, rate)?;

        position.borrowed_units = position
            .borrowed_units
            .checked_add(units)
            .ok_or(Error::AccountingInvariantViolation)?;
        ledger.total_borrowed = ledger
            .total_borrowed
            .checked_add(units)
            .ok_or(Error::AccountingInvariantViolation)?;
        ledger.total_debt = ledger
            .total_debt
            .checked_add(amount)
            .ok_or(Error::AccountingInvariantViolation)?;
        write_position(&env, &user, &position);
        write_ledger(&env, &ledger)?;
        transfer_out(&env, &config.underlying, &user, amount)?;

        Borrow {
            borrower: user,
            borrow_amount: amount,
            borrowed_units: units,
            account_units: position.borrowed_units,
            total_borrowed: ledger.total_borrowed,
        }
        .publish(&env);
        Ok(units)
    }

    /// Pay back `amount` underlying. Fails if it exceeds what the account owes.
    pub fn repay(env: Env, user: Address, amount: u128) -> Result<u128, Error> {
        user.require_auth();
        if amount == 0 {
            return Err(Error::InvalidAmount);
        }
        let (config, ledger) = begin(&env)?;
        let position = read_position(&env, &user);
        let rate = debt_rate(&ledger)?;
        let units = units_for_debt(amount, rate)?;
        if units > position.borrowed_units
            || amount > debt_for_units_up(position.borrowed_units, rate)?
        {
            return Err(Error::OverRepayment);
        }
        if units == 0 {
            return Err(Error::InvalidAmount);
        }
        settle(&env, &config, ledger, &user, position, amount, units)?;
        Ok(units)
    }

    /// Retire every unit `user` owes, rounding the payment up. Returns the amount paid.
    pub fn repay_all(env: Env, user: Address) -> Result<u128, Error> {
        user.require_auth();
        let (config, ledger) = begin(&env)?;
        let position = read_position(&env, &user);
        let units = position.borrowed_units;
        if units == 0 {
            return Err(Error::InvalidAmount);
        }
        let amount = debt_for_units_up(units, debt_rate(&ledger)?)?;
        settle(&env, &config, ledger, &user, position, amount, units)?;
        Ok(amount)
    }

    /// Controller: set the loan-to-value ratio in tenths (8 = 80%).
    pub fn set_ltv(env: Env, ltv: u32) -> Result<(), Error> {
        let config = read_config(&env)?;
        config.controller.require_auth();
        if ltv > MAX_LTV {
            return Err(Error::InvalidLtv);
        }
        let (_, mut ledger) = begin(&env)?;
        let old_ltv = ledger.ltv;
        ledger.ltv = ltv;
        write_ledger(&env, &ledger)?;
        NewLtv {
            old_ltv,
            new_ltv: ltv,
        }
        .publish(&env);
        Ok(())
    }

    pub fn get_config(env: Env) -> Result<PoolConfig, Error> {
        read_config(&env)
    }

    /// Ledger as it would be after accruing to the current timestamp.
    pub fn get_ledger(env: Env) -> Result<PoolLedger, Error> {
        Ok(project(&env)?.1.ledger)
    }

    pub fn get_position(env: Env, user: Address) -> AccountPosition {
        read_position(&env, &user)
    }

    pub fn get_lend_rate(env: Env) -> Result<u128, Error> {
        let (config, accrual) = project(&env)?;
        let cash = balance_of_self(&env, &config.underlying)?;
        lend_rate(&accrual.ledger, cash, share_supply(&env))
    }

    pub fn get_debt_rate(env: Env) -> Result<u128, Error> {
        debt_rate(&project(&env)?.1.ledger)
    }

    pub fn get_utilization(env: Env) -> Result<u128, Error> {
        let ledger = project(&env)?.1.ledger;
        RateModel::utilization(
            ledger.total_deposited,
            ledger.total_borrowed,
            ledger.total_reserve,
        )
    }

    /// Per-second borrow rate at current utilization, scaled 1e18.
    pub fn get_borrow_rate(env: Env) -> Result<u128, Error> {
        Ok(project(&env)?.1.borrow_rate)
    }

    /// Underlying currently owed by `user`.
    pub fn get_borrow_balance(env: Env, user: Address) -> Result<u128, Error> {
        let rate = debt_rate(&project(&env)?.1.ledger)?;
        debt_for_units(read_position(&env, &user).borrowed_units, rate)
    }

    /// `(excess, shortfall)` in 1e18 USD.
    pub fn get_account_liquidity(env: Env, user: Address) -> Result<(u128, u128), Error> {
        let (config, accrual) = project(&env)?;
        let prices = read_prices(&env, &config)?;
        let liquidity = account_liquidity(
            &read_position(&env, &user),
            debt_rate(&accrual.ledger)?,
            accrual.ledger.ltv,
            &prices,
        )?;
        Ok((liquidity.excess, liquidity.shortfall))
    }

    pub fn get_share_balance(env: Env, user: Address) -> u128 {
        share_balance(&env, &user)
    }

    // Share token surface
    pub fn name(env: Env) -> String {
        TokenBase::name(&env)
    }

    pub fn symbol(env: Env) -> String {
        TokenBase::symbol(&env)
    }

    pub fn decimals(env: Env) -> u32 {
        TokenBase::decimals(&env)
    }

    pub fn total_supply(env: Env) -> i128 {
        TokenBase::total_supply(&env)
    }

    pub fn balance(env: Env, who: Address) -> i128 {
        TokenBase::balance(&env, &who)
    }

    pub fn approve(env: Env, owner: Address, spender: Address, amount: u128) -> Result<(), Error> {
        owner.require_auth();
        TokenBase::approve(&env, &owner, &spender, to_i128(amount)?, u32::MAX);
        Ok(())
    }

    pub fn allowance(env: Env, owner: Address, spender: Address) -> u128 {
        balance_to_u128(TokenBase::allowance(&env, &owner, &spender))
    }

    pub fn transfer(env: Env, from: Address, to: Address, amount: u128) -> Result<(), Error> {
        move_shares(&env, &from, &to, amount, None)
    }

    pub fn transfer_from(
        env: Env,
        spender: Address,
        owner: Address,
        to: Address,
        amount: u128,
    ) -> Result<(), Error> {
        move_shares(&env, &owner, &to, amount, Some(&spender))
    }
}

/// Shares are not collateral here, so transfers carry no solvency gate.
fn move_shares(
    env: &Env,
    from: &Address,
    to: &Address,
    amount: u128,
    spender: Option<&Address>,
) -> Result<(), Error> {
    read_config(env)?;
    if amount == 0 {
        return Err(Error::InvalidAmount);
    }
    if amount > share_balance(env, from) {
        return Err(Error::InsufficientShares);
    }
    let amount = to_i128(amount)?;
    match spender {
        Some(spender) => TokenBase::transfer_from(env, spender, from, to, amount),
        None => TokenBase::transfer(env, from, to, amount),
    }
    Ok(())
}

/// Load config and ledger, accrue to now and log the accrual.
fn begin(env: &Env) -> Result<(PoolConfig, PoolLedger), Error> {
    let (config, accrual) = project(env)?;
    if accrual.advanced {
        AccrueInterest {
            interest_accumulated: accrual.interest_accrued,
            reserve_accumulated: accrual.reserve_accrued,
            borrow_rate: accrual.borrow_rate,
            total_debt: accrual.ledger.total_debt,
            total_reserve: accrual.ledger.total_reserve,
        }
        .publish(env);
    }
    Ok((config, accrual.ledger))
}

/// Accrue in memory without persisting.
fn project(env: &Env) -> Result<(PoolConfig, Accrual), Error> {
    let config = read_config(env)?;
    let stored = read_ledger(env)?;
    let accrual = accrue(
        &stored,
        &config.rate_model(),
        config.reserve_factor,
        env.ledger().timestamp(),
    )?;
    Ok((config, accrual))
}

fn settle(
    env: &Env,
    config: &PoolConfig,
    mut ledger: PoolLedger,
    user: &Address,
    mut position: AccountPosition,
    amount: u128,
    units: u128,
) -> Result<(), Error> {
    position.borrowed_units -= units;
    ledger.total_borrowed = ledger
        .total_borrowed
        .checked_sub(units)
        .ok_or(Error::AccountingInvariantViolation)?;
    // Floor rounding can leave dust above the remaining units; it never drops below them,
    // and it is written off once the last unit is repaid.
    ledger.total_debt = if ledger.total_borrowed == 0 {
        0
    } else {
        ledger
            .total_debt
            .saturating_sub(amount)
            .max(ledger.total_borrowed)
    };

    transfer_in(env, &config.underlying, user, amount)?;
    write_position(env, user, &position);
    write_ledger(env, &ledger)?;

    RepayBorrow {
        borrower: user.clone(),
        repay_amount: amount,
        repaid_units: units,
        account_units: position.borrowed_units,
        total_borrowed: ledger.total_borrowed,
    }
    .publish(env);
    Ok(())
}

fn asset_decimals(env: &Env, asset: &Address) -> Result<u32, Error> {
    match token::Client::new(env, asset).try_decimals() {
        Ok(Ok(decimals)) if decimals <= MAX_ASSET_DECIMALS => Ok(decimals),
        _ => Err(Error::InvalidConfig),
    }
}
