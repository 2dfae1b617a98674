//! Notification-sink event emitters
//!
//! One emitter per structured state-transition record. All events are
//! fire-and-forget and never affect contract state.

use soroban_sdk::{symbol_short, Address, Env, Symbol};

/// Marketplace event emission helpers
pub struct MarketEvents;

impl MarketEvents {
    /// Contract initialized with an admin and a treasury
    pub fn initialized(e: &Env, admin: &Address, treasury: &Address) {
        e.events()
            .publish((symbol_short!("Init"),), (admin.clone(), treasury.clone()));
    }

    /// Fee rates changed by the admin
    pub fn rates_set(e: &Env, sell_rate: u32, buy_rate: u32) {
        e.events()
            .publish((symbol_short!("RatesSet"),), (sell_rate, buy_rate));
    }

    /// User added to the blacklist
    pub fn user_banned(e: &Env, user: &Address) {
        e.events().publish((symbol_short!("Banned"),), user.clone());
    }

    /// User removed from the blacklist
    pub fn user_unbanned(e: &Env, user: &Address) {
        e.events().publish((symbol_short!("Unbanned"),), user.clone());
    }

    /// Asset contract registered with a kind label
    pub fn asset_registered(e: &Env, asset: &Address, kind: Symbol) {
        e.events()
            .publish((symbol_short!("AssetReg"), asset.clone()), kind);
    }

    /// Fixed-price listing created
    pub fn sale_listed(e: &Env, sale_id: u64, seller: &Address, price: i128) {
        e.events()
            .publish((symbol_short!("SaleNew"), sale_id), (seller.clone(), price));
    }

    /// Fixed-price listing bought
    pub fn sale_bought(e: &Env, sale_id: u64, buyer: &Address, price: i128) {
        e.events()
            .publish((symbol_short!("SaleDone"), sale_id), (buyer.clone(), price));
    }

    /// Fixed-price listing canceled by the seller
    pub fn sale_cancelled(e: &Env, sale_id: u64, seller: &Address) {
        e.events()
            .publish((symbol_short!("SaleCncl"), sale_id), seller.clone());
    }

    /// Auction created
    pub fn auction_created(e: &Env, auction_id: u64, seller: &Address, floor_price: i128, end_time: u64) {
        e.events().publish(
            (symbol_short!("AucNew"), auction_id),
            (seller.clone(), floor_price, end_time),
        );
    }

    /// Bid accepted as the new standing bid
    pub fn bid_placed(e: &Env, auction_id: u64, bidder: &Address, amount: i128) {
        e.events()
            .publish((symbol_short!("BidNew"), auction_id), (bidder.clone(), amount));
    }

    /// Auction ended with a winner
    pub fn auction_ended(e: &Env, auction_id: u64, winner: &Address, price: i128) {
        e.events()
            .publish((symbol_short!("AucEnd"), auction_id), (winner.clone(), price));
    }

    /// Auction ended with zero bids; asset returned to the seller
    pub fn auction_ended_no_winner(e: &Env, auction_id: u64, seller: &Address) {
        e.events()
            .publish((symbol_short!("AucNoBid"), auction_id), seller.clone());
    }

    /// Auction canceled before start
    pub fn auction_cancelled(e: &Env, auction_id: u64, seller: &Address) {
        e.events()
            .publish((symbol_short!("AucCncl"), auction_id), seller.clone());
    }

    /// Winner withdrew the auctioned asset from custody
    pub fn asset_claimed(e: &Env, auction_id: u64, winner: &Address) {
        e.events()
            .publish((symbol_short!("AucClaim"), auction_id), winner.clone());
    }

    /// Escrow ledger balance withdrawn
    pub fn withdrawal(e: &Env, beneficiary: &Address, payment_token: &Address, amount: i128) {
        e.events().publish(
            (symbol_short!("Withdraw"), beneficiary.clone()),
            (payment_token.clone(), amount),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use soroban_sdk::testutils::Address as TestAddress;

    #[test]
    fn test_emit_sale_listed() {
        let env = Env::default();
        let seller = <soroban_sdk::Address as TestAddress>::generate(&env);

        MarketEvents::sale_listed(&env, 1, &seller, 1000);
    }

    #[test]
    fn test_emit_withdrawal() {
        let env = Env::default();
        let beneficiary = <soroban_sdk::Address as TestAddress>::generate(&env);
        let token = <soroban_sdk::Address as TestAddress>::generate(&env);

        MarketEvents::withdrawal(&env, &beneficiary, &token, 500);
    }
}
