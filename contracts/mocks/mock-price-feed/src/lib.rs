#![no_std]
use soroban_sdk::{contract, contractimpl, contracttype, Address, Env};

#[contracttype]
enum DataKey {
    Admin,
    Price,    // i128, raw feed units
    Decimals, // u32
}

/// Settable price feed exposing the `latest_price` read the pool consumes.
#[contract]
pub struct MockPriceFeed;

#[contractimpl]
impl MockPriceFeed {
    pub fn initialize(env: Env, admin: Address, decimals: u32) {
        if env
            .storage()
            .persistent()
            .get::<_, Address>(&DataKey::Admin)
            .is_some()
        {
            panic!("already initialized");
        }
        admin.require_auth();
        env.storage().persistent().set(&DataKey::Admin, &admin);
        env.storage()
            .persistent()
            .set(&DataKey::Decimals, &decimals);
    }

    pub fn set_price(env: Env, price: i128) {
        let admin: Address = env
            .storage()
            .persistent()
            .get(&DataKey::Admin)
            .expect("feed not initialized");
        admin.require_auth();
        env.storage().persistent().set(&DataKey::Price, &price);
    }

    pub fn set_decimals(env: Env, decimals: u32) {
        let admin: Address = env
            .storage()
            .persistent()
            .get(&DataKey::Admin)
            .expect("feed not initialized");
        admin.require_auth();
        env.storage()
            .persistent()
            .set(&DataKey::Decimals, &decimals);
    }

    /// Returns `(price, decimals)`. Panics until a price has been published.
    pub fn latest_price(env: Env) -> (i128, u32) {
        let price: i128 = env
            .storage()
            .persistent()
            .get(&DataKey::Price)
            .expect("price not set");
        let decimals: u32 = env
            .storage()
            .persistent()
            .get(&DataKey::Decimals)
            .unwrap_or(8);
        (price, decimals)
    }
}
