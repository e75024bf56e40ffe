use soroban_sdk::{contractevent, Address, Symbol};

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolInitialized {
    #[topic]
    pub controller: Address,
    pub underlying: Address,
    pub collateral: Address,
    pub ltv: u32,
}

/// Emitted whenever accrual moves the clock forward.
#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AccrueInterest {
    pub interest_accumulated: u128,
    pub reserve_accumulated: u128,
    pub borrow_rate: u128,
    pub total_debt: u128,
    pub total_reserve: u128,
}

/// Underlying supplied and shares minted.
#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Supply {
    #[topic]
    pub supplier: Address,
    pub supply_amount: u128,
    pub shares_minted: u128,
}

/// Shares burned and underlying paid out.
#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Redeem {
    #[topic]
    pub redeemer: Address,
    pub redeem_amount: u128,
    pub shares_burned: u128,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CollateralAdded {
    #[topic]
    pub account: Address,
    pub amount: u128,
    pub collateral_balance: u128,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CollateralRemoved {
    #[topic]
    pub account: Address,
    pub amount: u128,
    pub collateral_balance: u128,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Borrow {
    #[topic]
    pub borrower: Address,
    pub borrow_amount: u128,
    pub borrowed_units: u128,
    pub account_units: u128,
    pub total_borrowed: u128,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RepayBorrow {
    #[topic]
    pub borrower: Address,
    pub repay_amount: u128,
    pub repaid_units: u128,
    pub account_units: u128,
    pub total_borrowed: u128,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct NewLtv {
    pub old_ltv: u32,
    pub new_ltv: u32,
}

/// A price feed or custody contract call failed; the operation is aborted.
#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ExternalCallFailed {
    #[topic]
    pub contract: Address,
    #[topic]
    pub function: Symbol,
}
