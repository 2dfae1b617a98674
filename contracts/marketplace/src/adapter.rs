//! Asset adapter: a uniform interface over the two supported asset kinds
//!
//! Single-unit assets transfer whole-token ownership; quantity-bearing assets
//! move an explicit amount of a token id. Dispatch is a `match` on a closed
//! classification variant, never runtime introspection.

use soroban_sdk::{contractclient, contracttype, symbol_short, Address, Env, Symbol};

use crate::MarketError;

/// Classification of a registered asset contract
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AssetKind {
    /// One owner per token id; quantity must be zero
    SingleUnit,
    /// Balance-carrying token ids; quantity must be strictly positive
    QuantityBearing,
}

impl AssetKind {
    /// Short label used in notification events
    pub fn label(&self) -> Symbol {
        match self {
            AssetKind::SingleUnit => symbol_short!("single"),
            AssetKind::QuantityBearing => symbol_short!("quantity"),
        }
    }
}

/// Interface required of single-unit asset contracts
#[contractclient(name = "SingleUnitClient")]
pub trait SingleUnitAsset {
    fn owner_of(e: Env, token_id: u64) -> Address;
    fn transfer(e: Env, from: Address, to: Address, token_id: u64);
}

/// Interface required of quantity-bearing asset contracts
#[contractclient(name = "QuantityClient")]
pub trait QuantityAsset {
    fn balance_of(e: Env, owner: Address, token_id: u64) -> i128;
    fn transfer(e: Env, from: Address, to: Address, token_id: u64, amount: i128);
}

/// Verify that `holder` can escrow the described asset.
///
/// Single-unit assets must be held with a quantity of exactly zero and owned
/// by `holder`; quantity-bearing assets need a strictly positive quantity not
/// exceeding the holder's balance.
pub fn verify_holding(
    e: &Env,
    kind: AssetKind,
    asset: &Address,
    holder: &Address,
    token_id: u64,
    quantity: i128,
) -> Result<(), MarketError> {
    match kind {
        AssetKind::SingleUnit => {
            if quantity != 0 {
                return Err(MarketError::InvalidQuantity);
            }
            let owner = SingleUnitClient::new(e, asset).owner_of(&token_id);
            if owner != *holder {
                return Err(MarketError::NotOwnerOrNotApproved);
            }
        }
        AssetKind::QuantityBearing => {
            if quantity <= 0 {
                return Err(MarketError::InvalidQuantity);
            }
            let balance = QuantityClient::new(e, asset).balance_of(holder, &token_id);
            if balance < quantity {
                return Err(MarketError::InsufficientBalance);
            }
        }
    }
    Ok(())
}

/// Move the asset from `from` into marketplace custody.
pub fn transfer_in(
    e: &Env,
    kind: AssetKind,
    asset: &Address,
    from: &Address,
    token_id: u64,
    quantity: i128,
) {
    let custody = e.current_contract_address();
    match kind {
        AssetKind::SingleUnit => {
            SingleUnitClient::new(e, asset).transfer(from, &custody, &token_id);
        }
        AssetKind::QuantityBearing => {
            QuantityClient::new(e, asset).transfer(from, &custody, &token_id, &quantity);
        }
    }
}

/// Move the asset from marketplace custody to `to`.
///
/// Custody is expected to hold the asset; a failing transfer here traps and
/// rolls back the whole invocation.
pub fn transfer_out(
    e: &Env,
    kind: AssetKind,
    asset: &Address,
    to: &Address,
    token_id: u64,
    quantity: i128,
) {
    let custody = e.current_contract_address();
    match kind {
        AssetKind::SingleUnit => {
            SingleUnitClient::new(e, asset).transfer(&custody, to, &token_id);
        }
        AssetKind::QuantityBearing => {
            QuantityClient::new(e, asset).transfer(&custody, to, &token_id, &quantity);
        }
    }
}
