use lending_pool::{
    accrue, debt_for_units, debt_for_units_up, debt_rate, lend_rate, shares_for_underlying,
    underlying_for_shares, units_for_debt, units_for_debt_up, PoolLedger, RateModel,
    MAX_RATE_PER_SECOND, WAD,
};
use proptest::prelude::*;

const TEN_YEARS: u64 = 10 * 365 * 24 * 60 * 60;

prop_compose! {
    fn borrowed_ledger()(
        total_deposited in 1u128..1_000_000_000_000_000u128,
        borrow_pct in 0u128..=100u128,
        interest in 0u128..1_000_000_000_000u128,
        start in 0u64..1_000_000u64,
    ) -> PoolLedger {
        let total_borrowed = total_deposited * borrow_pct / 100;
        PoolLedger {
            total_deposited,
            total_borrowed,
            total_debt: total_borrowed + interest,
            total_reserve: 0,
            total_collateral: 0,
            ltv: 8,
            accrual_timestamp: start,
        }
    }
}

prop_compose! {
    fn rate_model()(
        base_rate in 0u128..=MAX_RATE_PER_SECOND,
        multiplier in 0u128..=MAX_RATE_PER_SECOND,
    ) -> RateModel {
        RateModel { base_rate, multiplier }
    }
}

proptest! {
    #[test]
    fn accrual_never_lets_debt_fall_below_units(
        ledger in borrowed_ledger(),
        model in rate_model(),
        reserve_factor in 0u128..=WAD,
        dt in 0u64..TEN_YEARS,
    ) {
        let now = ledger.accrual_timestamp + dt;
        let out = accrue(&ledger, &model, reserve_factor, now).unwrap();
        prop_assert!(out.ledger.total_debt >= out.ledger.total_borrowed);
        prop_assert!(out.ledger.total_debt >= ledger.total_debt);
        prop_assert!(out.reserve_accrued <= out.interest_accrued);
        prop_assert_eq!(out.ledger.total_borrowed, ledger.total_borrowed);
        prop_assert_eq!(out.ledger.accrual_timestamp, now);
    }

    #[test]
    fn rates_only_rise_with_time(
        ledger in borrowed_ledger(),
        model in rate_model(),
        reserve_factor in 0u128..=WAD,
        cash in 0u128..1_000_000_000_000_000u128,
        dt in 1u64..TEN_YEARS,
    ) {
        let supply = ledger.total_deposited;
        let out = accrue(&ledger, &model, reserve_factor, ledger.accrual_timestamp + dt).unwrap();
        prop_assert!(debt_rate(&out.ledger).unwrap() >= debt_rate(&ledger).unwrap());
        prop_assert!(
            lend_rate(&out.ledger, cash, supply).unwrap()
                >= lend_rate(&ledger, cash, supply).unwrap()
        );
    }

    #[test]
    fn accrual_at_the_same_timestamp_is_a_no_op(
        ledger in borrowed_ledger(),
        model in rate_model(),
        reserve_factor in 0u128..=WAD,
    ) {
        let out = accrue(&ledger, &model, reserve_factor, ledger.accrual_timestamp).unwrap();
        prop_assert!(!out.advanced);
        prop_assert_eq!(out.ledger, ledger);
    }

    #[test]
    fn repay_and_redeem_conversions_never_overpay_the_caller(
        amount in 0u128..1_000_000_000_000_000_000_000_000u128,
        rate in WAD..10 * WAD,
    ) {
        // units retired by a repayment are worth no more than what was paid
        let units = units_for_debt(amount, rate).unwrap();
        prop_assert!(debt_for_units(units, rate).unwrap() <= amount);
        prop_assert!(debt_for_units_up(units, rate).unwrap() <= amount);

        let shares = shares_for_underlying(amount, rate).unwrap();
        prop_assert!(underlying_for_shares(shares, rate).unwrap() <= amount);
    }

    #[test]
    fn borrowed_units_cover_the_amount_drawn(
        amount in 1u128..1_000_000_000_000_000_000_000_000u128,
        rate in WAD..10 * WAD,
    ) {
        let units = units_for_debt_up(amount, rate).unwrap();
        prop_assert!(units <= amount);
        prop_assert!(debt_for_units(units, rate).unwrap() >= amount);
    }

    #[test]
    fn utilization_stays_a_fraction(
        total_deposited in 0u128..1_000_000_000_000_000_000u128,
        total_borrowed in 0u128..1_000_000_000_000_000_000u128,
        total_reserve in 0u128..1_000_000_000_000_000_000u128,
    ) {
        let utilization =
            RateModel::utilization(total_deposited, total_borrowed, total_reserve).unwrap();
        prop_assert!(utilization <= WAD);
        if total_deposited > 0
            && total_borrowed > 0
            && total_borrowed >= total_deposited.saturating_sub(total_reserve)
        {
            prop_assert_eq!(utilization, WAD);
        }
    }

    #[test]
    fn interleaved_borrows_and_accruals_keep_debt_covered(
        model in rate_model(),
        reserve_factor in 0u128..=WAD,
        steps in prop::collection::vec((0u64..30 * 24 * 60 * 60, 1u128..1_000_000_000_000u128), 1..40),
    ) {
        let mut ledger = PoolLedger::new(8, 0);
        ledger.total_deposited = 1_000_000_000_000_000;
        let mut last_rate = debt_rate(&ledger).unwrap();
        for (dt, amount) in steps {
            let now = ledger.accrual_timestamp + dt;
            ledger = accrue(&ledger, &model, reserve_factor, now).unwrap().ledger;
            let rate = debt_rate(&ledger).unwrap();
            prop_assert!(rate >= last_rate);

            let units = units_for_debt_up(amount, rate).unwrap();
            prop_assert!(debt_for_units(units, rate).unwrap() >= amount);
            ledger.total_borrowed += units;
            ledger.total_debt += amount;
            prop_assert!(ledger.check_invariants().is_ok());
            last_rate = debt_rate(&ledger).unwrap();
            prop_assert!(last_rate >= WAD);
        }
    }
}
