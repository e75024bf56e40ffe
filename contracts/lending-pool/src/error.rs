use soroban_sdk::contracterror;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    /// Zero or out-of-range amount.
    InvalidAmount = 1,
    InsufficientCollateral = 2,
    OverRepayment = 3,
    InsufficientShares = 4,
    /// Accrual asked to run at a timestamp earlier than the last one.
    ClockRegression = 5,
    /// Ledger arithmetic overflowed or a ledger invariant no longer holds.
    AccountingInvariantViolation = 6,
    ExternalTransferFailed = 7,
    PriceUnavailable = 8,
    InsufficientLiquidity = 9,
    NotInitialized = 10,
    AlreadyInitialized = 11,
    InvalidConfig = 12,
    InvalidLtv = 13,
}
