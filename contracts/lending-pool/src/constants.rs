/// Fixed-point scale shared by rates, prices and USD values.
pub const WAD: u128 = 1_000_000_000_000_000_000u128; // 1e18
pub const WAD_DECIMALS: u32 = 18;
/// `ltv` is expressed in tenths of the collateral value.
pub const LTV_DENOMINATOR: u128 = 10;
pub const MAX_LTV: u32 = 10;
/// Cap for the base rate and the utilization multiplier (1000% APR expressed per second).
pub const MAX_RATE_PER_SECOND: u128 = 10 * WAD / SECONDS_PER_YEAR;
pub const SECONDS_PER_YEAR: u128 = 365 * 24 * 60 * 60;
pub const MAX_ASSET_DECIMALS: u32 = 18;
