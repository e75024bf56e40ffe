use soroban_sdk::{contractclient, Address, Env, Symbol};

use crate::constants::WAD_DECIMALS;
use crate::error::Error;
use crate::events::ExternalCallFailed;
use crate::helpers::pow10;
use crate::solvency::Prices;
use crate::storage::PoolConfig;

/// Read contract every price feed must expose.
#[contractclient(name = "PriceFeedClient")]
pub trait PriceFeed {
    /// USD price of one whole asset unit and the number of decimals it carries.
    fn latest_price(env: Env) -> (i128, u32);
}

/// Scale a feed price to 18 decimals. Non-positive prices are unusable.
pub fn normalize_price(price: i128, decimals: u32) -> Result<u128, Error> {
    if price <= 0 {
        return Err(Error::PriceUnavailable);
    }
    let price = price as u128;
    if decimals <= WAD_DECIMALS {
        price
            .checked_mul(pow10(WAD_DECIMALS - decimals)?)
            .ok_or(Error::AccountingInvariantViolation)
    } else {
        let scaled = price / pow10(decimals - WAD_DECIMALS).map_err(|_| Error::PriceUnavailable)?;
        if scaled == 0 {
            return Err(Error::PriceUnavailable);
        }
        Ok(scaled)
    }
}

/// One fresh read of `feed`; a failed or malformed answer is reported, never retried.
pub fn read_price(env: &Env, feed: &Address) -> Result<u128, Error> {
    let client = PriceFeedClient::new(env, feed);
    match client.try_latest_price() {
        Ok(Ok((price, decimals))) => normalize_price(price, decimals),
        Ok(Err(_)) | Err(_) => {
            ExternalCallFailed {
                contract: feed.clone(),
                function: Symbol::new(env, "latest_price"),
            }
            .publish(env);
            Err(Error::PriceUnavailable)
        }
    }
}

/// Both prices, read in the same operation.
pub fn read_prices(env: &Env, config: &PoolConfig) -> Result<Prices, Error> {
    Ok(Prices {
        collateral: read_price(env, &config.collateral_feed)?,
        underlying: read_price(env, &config.underlying_feed)?,
        collateral_decimals: config.collateral_decimals,
        underlying_decimals: config.underlying_decimals,
    })
}
