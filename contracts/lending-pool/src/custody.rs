use soroban_sdk::{token, Address, Env, IntoVal, InvokeError, Symbol, Val, Vec};

use crate::error::Error;
use crate::events::ExternalCallFailed;
use crate::helpers::{balance_to_u128, to_i128};

/// Pull `amount` of `asset` from `from` into the pool.
pub fn transfer_in(env: &Env, asset: &Address, from: &Address, amount: u128) -> Result<(), Error> {
    let amount = to_i128(amount)?;
    let client = token::Client::new(env, asset);
    match client.try_transfer(from, &env.current_contract_address(), &amount) {
        Ok(Ok(())) => Ok(()),
        _ => Err(transfer_failed(env, asset)),
    }
}

/// Push `amount` of `asset` from the pool to `to`.
pub fn transfer_out(env: &Env, asset: &Address, to: &Address, amount: u128) -> Result<(), Error> {
    let amount = to_i128(amount)?;
    let client = token::Client::new(env, asset);
    match client.try_transfer(&env.current_contract_address(), to, &amount) {
        Ok(Ok(())) => Ok(()),
        _ => Err(transfer_failed(env, asset)),
    }
}

/// Pool's own balance of `asset`, trying `balance` then `balance_of`.
pub fn balance_of_self(env: &Env, asset: &Address) -> Result<u128, Error> {
    let args: Vec<Val> = (env.current_contract_address(),).into_val(env);
    for func in ["balance", "balance_of"] {
        let symbol = Symbol::new(env, func);
        if let Ok(Ok(balance)) =
            env.try_invoke_contract::<i128, InvokeError>(asset, &symbol, args.clone())
        {
            return Ok(balance_to_u128(balance));
        }
    }
    ExternalCallFailed {
        contract: asset.clone(),
        function: Symbol::new(env, "balance"),
    }
    .publish(env);
    Err(Error::ExternalTransferFailed)
}

fn transfer_failed(env: &Env, asset: &Address) -> Error {
    ExternalCallFailed {
        contract: asset.clone(),
        function: Symbol::new(env, "transfer"),
    }
    .publish(env);
    Error::ExternalTransferFailed
}
