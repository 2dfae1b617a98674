#![no_std]

//! Marketplace settlement contract
//!
//! Sellers list single-unit or quantity-bearing assets either at a fixed
//! price or as timed ascending-bid auctions, paid in any registered payment
//! token (the wrapped native asset included). The contract is the custodian
//! of every escrowed asset and every pending balance between listing and
//! settlement; proceeds and outbid refunds accumulate in a withdrawable
//! escrow ledger rather than being pushed synchronously.

use soroban_sdk::{
    contract, contracterror, contractimpl, contracttype, token, Address, Env, Vec,
};

use market_utils::{
    AccessControl, FeeMath, MarketEvents, ReentrancyLock, Storage, TimeUtils, Validation,
};

pub mod adapter;
pub use adapter::AssetKind;


// ============================================================================
// Error Types
// ============================================================================

/// Marketplace errors
#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum MarketError {
    /// Contract not initialized
    NotInitialized = 1,
    /// Already initialized
    AlreadyInitialized = 2,
    /// Caller is not the admin
    Unauthorized = 3,
    /// Caller is blacklisted
    UserBanned = 4,
    /// Fee rate above 100 percent
    RateOutOfBounds = 5,
    /// Asset contract is not registered with a supported kind
    UnsupportedAssetType = 6,
    /// Price must be strictly positive
    InvalidPrice = 7,
    /// Quantity invalid for the asset kind
    InvalidQuantity = 8,
    /// Bid increment must be strictly positive
    InvalidBidIncrement = 9,
    /// Holder's balance is below the listed quantity
    InsufficientBalance = 10,
    /// Seller does not own the asset
    NotOwnerOrNotApproved = 11,
    /// Listing does not exist
    SaleNotExists = 12,
    /// Listing already settled
    AlreadySold = 13,
    /// Payment below price plus buyer fee
    PriceNotMet = 14,
    /// Caller is not the seller
    NotSeller = 15,
    /// Auction start time must be strictly in the future
    InvalidStartTime = 16,
    /// Auction must start before it ends
    InvalidTimeWindow = 17,
    /// Auction does not exist
    AuctionNotExists = 18,
    /// Auction has not reached its start time
    AuctionNotStarted = 19,
    /// Auction is past its end time or already finalized
    AuctionEnded = 20,
    /// First bid below the floor price
    BidBelowFloor = 21,
    /// Bid below standing bid plus increment
    BidIncrementNotMet = 22,
    /// Auction end time not reached
    AuctionNotYetEnded = 23,
    /// Auction already finalized
    AlreadyEnded = 24,
    /// Auction not finalized yet
    AuctionNotEnded = 25,
    /// Caller is not the winning bidder
    NotWinner = 26,
    /// Winner already withdrew the asset
    AlreadyClaimed = 27,
    /// Auction already has accepted bids
    AlreadyHasBids = 28,
    /// Auction already started
    AuctionAlreadyStarted = 29,
    /// Reentrant call detected
    ReentrancyDetected = 30,
    /// Arithmetic overflow; the operation fails closed
    ArithmeticOverflow = 31,
}

// ============================================================================
// Data Types
// ============================================================================

/// Fixed-price listing
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Sale {
    pub seller: Address,
    pub asset: Address,
    pub asset_id: u64,
    pub quantity: i128,
    pub kind: AssetKind,
    pub payment_token: Address,
    pub price: i128,
    /// Set exactly once, monotonic false -> true
    pub settled: bool,
}

/// Timed ascending-bid auction
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Auction {
    pub seller: Address,
    pub asset: Address,
    pub asset_id: u64,
    pub quantity: i128,
    pub kind: AssetKind,
    pub payment_token: Address,
    pub floor_price: i128,
    pub bid_increment: i128,
    pub start_time: u64,
    pub end_time: u64,
    pub bid_count: u32,
    /// Standing highest bid; 0 until the first accepted bid
    pub current_bid_price: i128,
    /// Owner of the standing bid; `None` until the first accepted bid
    pub current_bid_owner: Option<Address>,
    /// Amount held in custody for the standing bid (bid plus its buyer fee)
    pub current_bid_charge: i128,
    pub ended: bool,
    pub claimed: bool,
}

/// Storage keys
#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    /// Treasury address receiving platform fees
    Treasury,
    /// Seller-side fee rate (whole percent)
    SellRate,
    /// Buyer-side fee rate (whole percent)
    BuyRate,
    /// Monotonic listing id counter
    NextSaleId,
    /// Monotonic auction id counter
    NextAuctionId,
    /// Listing arena (sale_id -> Sale)
    Sale(u64),
    /// Auction arena (auction_id -> Auction)
    Auction(u64),
    /// Escrow ledger ((beneficiary, payment_token) -> amount)
    Proceeds(Address, Address),
    /// Blacklist membership
    Banned(Address),
    /// Asset classification registry (asset contract -> kind)
    AssetKind(Address),
}

// ============================================================================
// Storage Module
// ============================================================================

mod store {
    use super::*;

    // --- Config ---

    pub fn set_treasury(e: &Env, treasury: &Address) {
        e.storage().instance().set(&DataKey::Treasury, treasury);
    }

    pub fn treasury(e: &Env) -> Address {
        // Set during initialize; every caller checks initialization first.
        e.storage().instance().get(&DataKey::Treasury).unwrap()
    }

    pub fn set_rates(e: &Env, sell_rate: u32, buy_rate: u32) {
        e.storage().instance().set(&DataKey::SellRate, &sell_rate);
        e.storage().instance().set(&DataKey::BuyRate, &buy_rate);
    }

    pub fn rates(e: &Env) -> (u32, u32) {
        let sell: u32 = e.storage().instance().get(&DataKey::SellRate).unwrap_or(0);
        let buy: u32 = e.storage().instance().get(&DataKey::BuyRate).unwrap_or(0);
        (sell, buy)
    }

    // --- Id Counters ---

    pub fn next_sale_id(e: &Env) -> u64 {
        let id: u64 = e.storage().instance().get(&DataKey::NextSaleId).unwrap_or(0);
        e.storage().instance().set(&DataKey::NextSaleId, &(id + 1));
        id
    }

    pub fn next_auction_id(e: &Env) -> u64 {
        let id: u64 = e
            .storage()
            .instance()
            .get(&DataKey::NextAuctionId)
            .unwrap_or(0);
        e.storage().instance().set(&DataKey::NextAuctionId, &(id + 1));
        id
    }

    // --- Sales ---

    pub fn sale(e: &Env, sale_id: u64) -> Option<Sale> {
        e.storage().persistent().get(&DataKey::Sale(sale_id))
    }

    pub fn set_sale(e: &Env, sale_id: u64, sale: &Sale) {
        e.storage().persistent().set(&DataKey::Sale(sale_id), sale);
    }

    pub fn remove_sale(e: &Env, sale_id: u64) {
        e.storage().persistent().remove(&DataKey::Sale(sale_id));
    }

    // --- Auctions ---

    pub fn auction(e: &Env, auction_id: u64) -> Option<Auction> {
        e.storage().persistent().get(&DataKey::Auction(auction_id))
    }

    pub fn set_auction(e: &Env, auction_id: u64, auction: &Auction) {
        e.storage()
            .persistent()
            .set(&DataKey::Auction(auction_id), auction);
    }

    pub fn remove_auction(e: &Env, auction_id: u64) {
        e.storage().persistent().remove(&DataKey::Auction(auction_id));
    }

    // --- Escrow Ledger ---

    pub fn proceeds(e: &Env, beneficiary: &Address, payment_token: &Address) -> i128 {
        e.storage()
            .persistent()
            .get(&DataKey::Proceeds(beneficiary.clone(), payment_token.clone()))
            .unwrap_or(0)
    }

    pub fn set_proceeds(e: &Env, beneficiary: &Address, payment_token: &Address, amount: i128) {
        e.storage().persistent().set(
            &DataKey::Proceeds(beneficiary.clone(), payment_token.clone()),
            &amount,
        );
    }

    pub fn clear_proceeds(e: &Env, beneficiary: &Address, payment_token: &Address) {
        e.storage()
            .persistent()
            .remove(&DataKey::Proceeds(beneficiary.clone(), payment_token.clone()));
    }

    // --- Blacklist ---

    pub fn is_banned(e: &Env, user: &Address) -> bool {
        e.storage()
            .persistent()
            .get(&DataKey::Banned(user.clone()))
            .unwrap_or(false)
    }

    pub fn set_banned(e: &Env, user: &Address) {
        e.storage()
            .persistent()
            .set(&DataKey::Banned(user.clone()), &true);
    }

    pub fn clear_banned(e: &Env, user: &Address) {
        e.storage().persistent().remove(&DataKey::Banned(user.clone()));
    }

    // --- Asset Registry ---

    pub fn asset_kind(e: &Env, asset: &Address) -> Option<AssetKind> {
        e.storage().instance().get(&DataKey::AssetKind(asset.clone()))
    }

    pub fn set_asset_kind(e: &Env, asset: &Address, kind: AssetKind) {
        e.storage()
            .instance()
            .set(&DataKey::AssetKind(asset.clone()), &kind);
    }
}

// ============================================================================
// Internal Helpers
// ============================================================================

fn require_ready(e: &Env) -> Result<(), MarketError> {
    if !Storage::is_initialized(e) {
        return Err(MarketError::NotInitialized);
    }
    Ok(())
}

fn require_not_banned(e: &Env, user: &Address) -> Result<(), MarketError> {
    if store::is_banned(e, user) {
        return Err(MarketError::UserBanned);
    }
    Ok(())
}

fn require_admin(e: &Env, caller: &Address) -> Result<(), MarketError> {
    caller.require_auth();
    require_ready(e)?;
    if !AccessControl::is_admin(e, caller) {
        return Err(MarketError::Unauthorized);
    }
    Ok(())
}

fn fee_on(price: i128, rate: u32) -> Result<i128, MarketError> {
    FeeMath::fee_amount(price, rate).ok_or(MarketError::ArithmeticOverflow)
}

fn add(a: i128, b: i128) -> Result<i128, MarketError> {
    FeeMath::checked_add(a, b).ok_or(MarketError::ArithmeticOverflow)
}

fn sub(a: i128, b: i128) -> Result<i128, MarketError> {
    FeeMath::checked_sub(a, b).ok_or(MarketError::ArithmeticOverflow)
}

fn credit_proceeds(
    e: &Env,
    beneficiary: &Address,
    payment_token: &Address,
    amount: i128,
) -> Result<(), MarketError> {
    // Amounts are always internally sourced; append-only accumulation.
    let balance = store::proceeds(e, beneficiary, payment_token);
    store::set_proceeds(e, beneficiary, payment_token, add(balance, amount)?);
    Ok(())
}

// ============================================================================
// Contract Implementation
// ============================================================================

#[contract]
pub struct Marketplace;

#[contractimpl]
impl Marketplace {
    // ========================================================================
    // Initialization & Administration
    // ========================================================================

    /// Initialize the marketplace.
    ///
    /// Two-phase startup: the contract carries no business state until this
    /// single idempotence-guarded call sets the admin, the treasury address
    /// receiving platform fees, and the initial fee rates (whole percent).
    pub fn initialize(
        e: Env,
        admin: Address,
        treasury: Address,
        sell_rate: u32,
        buy_rate: u32,
    ) -> Result<(), MarketError> {
        if Storage::is_initialized(&e) {
            return Err(MarketError::AlreadyInitialized);
        }
        admin.require_auth();

        if !FeeMath::is_valid_rate(sell_rate) || !FeeMath::is_valid_rate(buy_rate) {
            return Err(MarketError::RateOutOfBounds);
        }

        Storage::set_admin(&e, &admin);
        store::set_treasury(&e, &treasury);
        store::set_rates(&e, sell_rate, buy_rate);
        Storage::set_initialized(&e);

        MarketEvents::initialized(&e, &admin, &treasury);
        Ok(())
    }

    /// Get the admin address
    pub fn get_admin(e: Env) -> Result<Address, MarketError> {
        Storage::get_admin(&e).ok_or(MarketError::NotInitialized)
    }

    /// Get the treasury address
    pub fn get_treasury(e: Env) -> Result<Address, MarketError> {
        require_ready(&e)?;
        Ok(store::treasury(&e))
    }

    /// Get the current (seller, buyer) fee rates in whole percent
    pub fn get_fee_rates(e: Env) -> Result<(u32, u32), MarketError> {
        require_ready(&e)?;
        Ok(store::rates(&e))
    }

    /// Update the fee rates (admin only). Either rate above 100 percent is
    /// rejected with `RateOutOfBounds`.
    pub fn set_fee_rates(
        e: Env,
        caller: Address,
        sell_rate: u32,
        buy_rate: u32,
    ) -> Result<(), MarketError> {
        require_admin(&e, &caller)?;

        if !FeeMath::is_valid_rate(sell_rate) || !FeeMath::is_valid_rate(buy_rate) {
            return Err(MarketError::RateOutOfBounds);
        }
        store::set_rates(&e, sell_rate, buy_rate);

        MarketEvents::rates_set(&e, sell_rate, buy_rate);
        Ok(())
    }

    // ========================================================================
    // Access Gate
    // ========================================================================

    /// Add a user to the blacklist (admin only)
    pub fn ban_user(e: Env, caller: Address, user: Address) -> Result<(), MarketError> {
        require_admin(&e, &caller)?;
        store::set_banned(&e, &user);

        MarketEvents::user_banned(&e, &user);
        Ok(())
    }

    /// Remove a user from the blacklist (admin only)
    pub fn unban_user(e: Env, caller: Address, user: Address) -> Result<(), MarketError> {
        require_admin(&e, &caller)?;
        store::clear_banned(&e, &user);

        MarketEvents::user_unbanned(&e, &user);
        Ok(())
    }

    /// Check blacklist membership
    pub fn is_banned(e: Env, user: Address) -> bool {
        store::is_banned(&e, &user)
    }

    // ========================================================================
    // Asset Registry
    // ========================================================================

    /// Register an asset contract under one of the supported kinds
    /// (admin only). Listing or auctioning an unregistered asset fails with
    /// `UnsupportedAssetType`.
    pub fn register_asset(
        e: Env,
        caller: Address,
        asset: Address,
        kind: AssetKind,
    ) -> Result<(), MarketError> {
        require_admin(&e, &caller)?;
        store::set_asset_kind(&e, &asset, kind);

        MarketEvents::asset_registered(&e, &asset, kind.label());
        Ok(())
    }

    /// Classify an asset contract; `None` means unsupported
    pub fn get_asset_kind(e: Env, asset: Address) -> Option<AssetKind> {
        store::asset_kind(&e, &asset)
    }

    // ========================================================================
    // Direct Sale Registry
    // ========================================================================

    /// List an asset for sale at a fixed price.
    ///
    /// The asset moves into marketplace custody immediately. `quantity` must
    /// be zero for single-unit assets and strictly positive (and covered by
    /// the seller's balance) for quantity-bearing assets. The price is fixed
    /// at creation; there are no price edits once placed.
    pub fn list_for_sale(
        e: Env,
        seller: Address,
        payment_token: Address,
        asset: Address,
        asset_id: u64,
        quantity: i128,
        price: i128,
    ) -> Result<u64, MarketError> {
        let _lock = ReentrancyLock::acquire(&e).ok_or(MarketError::ReentrancyDetected)?;

        // CHECKS
        seller.require_auth();
        require_ready(&e)?;
        require_not_banned(&e, &seller)?;

        if !Validation::is_positive(price) {
            return Err(MarketError::InvalidPrice);
        }
        let kind = store::asset_kind(&e, &asset).ok_or(MarketError::UnsupportedAssetType)?;
        adapter::verify_holding(&e, kind, &asset, &seller, asset_id, quantity)?;

        // EFFECTS
        let sale_id = store::next_sale_id(&e);
        let sale = Sale {
            seller: seller.clone(),
            asset: asset.clone(),
            asset_id,
            quantity,
            kind,
            payment_token,
            price,
            settled: false,
        };
        store::set_sale(&e, sale_id, &sale);

        // INTERACTIONS
        adapter::transfer_in(&e, kind, &asset, &seller, asset_id, quantity);

        MarketEvents::sale_listed(&e, sale_id, &seller, price);
        Ok(sale_id)
    }

    /// Buy a listed asset.
    ///
    /// `amount` is the payment the buyer authorizes; it must cover
    /// `price + buyer_fee`, and exactly that much is pulled. The combined
    /// seller and buyer fee goes to the treasury; the seller's net proceeds
    /// are credited to the escrow ledger for later withdrawal.
    pub fn buy_item(
        e: Env,
        buyer: Address,
        sale_id: u64,
        amount: i128,
    ) -> Result<(), MarketError> {
        let _lock = ReentrancyLock::acquire(&e).ok_or(MarketError::ReentrancyDetected)?;

        // CHECKS
        buyer.require_auth();
        require_ready(&e)?;
        require_not_banned(&e, &buyer)?;

        let mut sale = store::sale(&e, sale_id).ok_or(MarketError::SaleNotExists)?;
        if sale.settled {
            return Err(MarketError::AlreadySold);
        }

        let (sell_rate, buy_rate) = store::rates(&e);
        let buyer_fee = fee_on(sale.price, buy_rate)?;
        let seller_fee = fee_on(sale.price, sell_rate)?;
        let total_charge = add(sale.price, buyer_fee)?;
        if amount < total_charge {
            return Err(MarketError::PriceNotMet);
        }
        let platform_take = add(seller_fee, buyer_fee)?;
        let seller_proceeds = sub(sale.price, seller_fee)?;

        // EFFECTS
        sale.settled = true;
        store::set_sale(&e, sale_id, &sale);
        credit_proceeds(&e, &sale.seller, &sale.payment_token, seller_proceeds)?;

        // INTERACTIONS
        let custody = e.current_contract_address();
        let pay = token::Client::new(&e, &sale.payment_token);
        pay.transfer(&buyer, &custody, &total_charge);
        if platform_take > 0 {
            pay.transfer(&custody, &store::treasury(&e), &platform_take);
        }
        adapter::transfer_out(&e, sale.kind, &sale.asset, &buyer, sale.asset_id, sale.quantity);

        MarketEvents::sale_bought(&e, sale_id, &buyer, sale.price);
        Ok(())
    }

    /// Cancel a listing and return the asset to the seller.
    ///
    /// The entry is deleted outright; a canceled id no longer exists.
    pub fn cancel_listing(e: Env, seller: Address, sale_id: u64) -> Result<(), MarketError> {
        let _lock = ReentrancyLock::acquire(&e).ok_or(MarketError::ReentrancyDetected)?;

        // CHECKS
        seller.require_auth();
        require_ready(&e)?;

        let sale = store::sale(&e, sale_id).ok_or(MarketError::SaleNotExists)?;
        if !AccessControl::is_owner(&seller, &sale.seller) {
            return Err(MarketError::NotSeller);
        }
        if sale.settled {
            return Err(MarketError::AlreadySold);
        }

        // EFFECTS
        store::remove_sale(&e, sale_id);

        // INTERACTIONS
        adapter::transfer_out(&e, sale.kind, &sale.asset, &seller, sale.asset_id, sale.quantity);

        MarketEvents::sale_cancelled(&e, sale_id, &seller);
        Ok(())
    }

    /// Get a listing
    pub fn get_sale(e: Env, sale_id: u64) -> Result<Sale, MarketError> {
        store::sale(&e, sale_id).ok_or(MarketError::SaleNotExists)
    }

    // ========================================================================
    // Auction Registry
    // ========================================================================

    /// Create a timed ascending-bid auction.
    ///
    /// The asset is escrowed at creation, not at start. `start_time` must be
    /// strictly in the future and before `end_time`.
    pub fn create_auction(
        e: Env,
        seller: Address,
        payment_token: Address,
        asset: Address,
        asset_id: u64,
        floor_price: i128,
        start_time: u64,
        end_time: u64,
        quantity: i128,
        bid_increment: i128,
    ) -> Result<u64, MarketError> {
        let _lock = ReentrancyLock::acquire(&e).ok_or(MarketError::ReentrancyDetected)?;

        // CHECKS
        seller.require_auth();
        require_ready(&e)?;
        require_not_banned(&e, &seller)?;

        if !Validation::is_positive(floor_price) {
            return Err(MarketError::InvalidPrice);
        }
        if !Validation::is_positive(bid_increment) {
            return Err(MarketError::InvalidBidIncrement);
        }
        if !TimeUtils::is_future(&e, start_time) {
            return Err(MarketError::InvalidStartTime);
        }
        if !Validation::is_valid_window(start_time, end_time) {
            return Err(MarketError::InvalidTimeWindow);
        }
        let kind = store::asset_kind(&e, &asset).ok_or(MarketError::UnsupportedAssetType)?;
        adapter::verify_holding(&e, kind, &asset, &seller, asset_id, quantity)?;

        // EFFECTS
        let auction_id = store::next_auction_id(&e);
        let auction = Auction {
            seller: seller.clone(),
            asset: asset.clone(),
            asset_id,
            quantity,
            kind,
            payment_token,
            floor_price,
            bid_increment,
            start_time,
            end_time,
            bid_count: 0,
            current_bid_price: 0,
            current_bid_owner: None,
            current_bid_charge: 0,
            ended: false,
            claimed: false,
        };
        store::set_auction(&e, auction_id, &auction);

        // INTERACTIONS
        adapter::transfer_in(&e, kind, &asset, &seller, asset_id, quantity);

        MarketEvents::auction_created(&e, auction_id, &seller, floor_price, end_time);
        Ok(auction_id)
    }

    /// Place a bid on a live auction.
    ///
    /// The first bid must reach the floor price; each later bid must reach
    /// the standing bid plus the increment. The bidder is charged
    /// `bid_amount + buyer_fee(bid_amount)` into custody. The displaced
    /// bidder's full prior charge is credited to the escrow ledger
    /// (refund-by-credit, never pushed synchronously).
    pub fn place_new_bid(
        e: Env,
        bidder: Address,
        auction_id: u64,
        bid_amount: i128,
    ) -> Result<(), MarketError> {
        let _lock = ReentrancyLock::acquire(&e).ok_or(MarketError::ReentrancyDetected)?;

        // CHECKS
        bidder.require_auth();
        require_ready(&e)?;
        require_not_banned(&e, &bidder)?;

        let mut auction = store::auction(&e, auction_id).ok_or(MarketError::AuctionNotExists)?;
        let now = TimeUtils::now(&e);
        if auction.ended || now >= auction.end_time {
            return Err(MarketError::AuctionEnded);
        }
        if now < auction.start_time {
            return Err(MarketError::AuctionNotStarted);
        }

        if auction.bid_count == 0 {
            if bid_amount < auction.floor_price {
                return Err(MarketError::BidBelowFloor);
            }
        } else {
            let minimum = add(auction.current_bid_price, auction.bid_increment)?;
            if bid_amount < minimum {
                return Err(MarketError::BidIncrementNotMet);
            }
        }

        let (_, buy_rate) = store::rates(&e);
        let buyer_fee = fee_on(bid_amount, buy_rate)?;
        let charge = add(bid_amount, buyer_fee)?;

        // EFFECTS
        if let Some(displaced) = auction.current_bid_owner.clone() {
            // Refund the full prior charge, fee included, as a ledger credit.
            credit_proceeds(&e, &displaced, &auction.payment_token, auction.current_bid_charge)?;
        }
        auction.current_bid_price = bid_amount;
        auction.current_bid_owner = Some(bidder.clone());
        auction.current_bid_charge = charge;
        auction.bid_count += 1;
        store::set_auction(&e, auction_id, &auction);

        // INTERACTIONS
        token::Client::new(&e, &auction.payment_token).transfer(
            &bidder,
            &e.current_contract_address(),
            &charge,
        );

        MarketEvents::bid_placed(&e, auction_id, &bidder, bid_amount);
        Ok(())
    }

    /// End an auction once its end time has passed.
    ///
    /// Permissionless: any caller may trigger the transition once due. With
    /// zero bids the asset goes straight back to the seller and no fee is
    /// computed. With bids, the combined fee on the winning price goes to the
    /// treasury and the seller's net proceeds are credited to the escrow
    /// ledger; the asset stays in custody until the winner claims it.
    pub fn end_auction(e: Env, auction_id: u64) -> Result<(), MarketError> {
        let _lock = ReentrancyLock::acquire(&e).ok_or(MarketError::ReentrancyDetected)?;

        // CHECKS
        require_ready(&e)?;

        let mut auction = store::auction(&e, auction_id).ok_or(MarketError::AuctionNotExists)?;
        if auction.ended {
            return Err(MarketError::AlreadyEnded);
        }
        if !TimeUtils::is_expired(&e, auction.end_time) {
            return Err(MarketError::AuctionNotYetEnded);
        }

        if auction.bid_count == 0 {
            // EFFECTS
            auction.ended = true;
            auction.claimed = true;
            store::set_auction(&e, auction_id, &auction);

            // INTERACTIONS
            adapter::transfer_out(
                &e,
                auction.kind,
                &auction.asset,
                &auction.seller,
                auction.asset_id,
                auction.quantity,
            );

            MarketEvents::auction_ended_no_winner(&e, auction_id, &auction.seller);
            return Ok(());
        }

        let (sell_rate, _) = store::rates(&e);
        let seller_fee = fee_on(auction.current_bid_price, sell_rate)?;
        // The buyer-side fee was collected at bid time; settle with what is
        // actually held so a rate change mid-auction cannot break solvency.
        let buyer_fee_held = sub(auction.current_bid_charge, auction.current_bid_price)?;
        let platform_take = add(seller_fee, buyer_fee_held)?;
        let seller_proceeds = sub(auction.current_bid_price, seller_fee)?;
        let winner = auction
            .current_bid_owner
            .clone()
            .ok_or(MarketError::AuctionNotExists)?;

        // EFFECTS
        auction.ended = true;
        store::set_auction(&e, auction_id, &auction);
        credit_proceeds(&e, &auction.seller, &auction.payment_token, seller_proceeds)?;

        // INTERACTIONS
        if platform_take > 0 {
            token::Client::new(&e, &auction.payment_token).transfer(
                &e.current_contract_address(),
                &store::treasury(&e),
                &platform_take,
            );
        }

        MarketEvents::auction_ended(&e, auction_id, &winner, auction.current_bid_price);
        Ok(())
    }

    /// Withdraw the auctioned asset after the auction ended.
    ///
    /// Restricted to the final standing-bid owner; releases custody exactly
    /// once.
    pub fn withdraw_auction_asset(
        e: Env,
        caller: Address,
        auction_id: u64,
    ) -> Result<(), MarketError> {
        let _lock = ReentrancyLock::acquire(&e).ok_or(MarketError::ReentrancyDetected)?;

        // CHECKS
        caller.require_auth();
        require_ready(&e)?;

        let mut auction = store::auction(&e, auction_id).ok_or(MarketError::AuctionNotExists)?;
        if !auction.ended {
            return Err(MarketError::AuctionNotEnded);
        }
        match &auction.current_bid_owner {
            Some(winner) if *winner == caller => {}
            _ => return Err(MarketError::NotWinner),
        }
        if auction.claimed {
            return Err(MarketError::AlreadyClaimed);
        }

        // EFFECTS
        auction.claimed = true;
        store::set_auction(&e, auction_id, &auction);

        // INTERACTIONS
        adapter::transfer_out(
            &e,
            auction.kind,
            &auction.asset,
            &caller,
            auction.asset_id,
            auction.quantity,
        );

        MarketEvents::asset_claimed(&e, auction_id, &caller);
        Ok(())
    }

    /// Cancel an auction before it starts, while it has no bids.
    ///
    /// The asset returns to the seller and the entry is deleted.
    pub fn cancel_auction(e: Env, seller: Address, auction_id: u64) -> Result<(), MarketError> {
        let _lock = ReentrancyLock::acquire(&e).ok_or(MarketError::ReentrancyDetected)?;

        // CHECKS
        seller.require_auth();
        require_ready(&e)?;

        let auction = store::auction(&e, auction_id).ok_or(MarketError::AuctionNotExists)?;
        if !AccessControl::is_owner(&seller, &auction.seller) {
            return Err(MarketError::NotSeller);
        }
        if auction.bid_count > 0 {
            return Err(MarketError::AlreadyHasBids);
        }
        if TimeUtils::is_expired(&e, auction.start_time) {
            return Err(MarketError::AuctionAlreadyStarted);
        }

        // EFFECTS
        store::remove_auction(&e, auction_id);

        // INTERACTIONS
        adapter::transfer_out(
            &e,
            auction.kind,
            &auction.asset,
            &seller,
            auction.asset_id,
            auction.quantity,
        );

        MarketEvents::auction_cancelled(&e, auction_id, &seller);
        Ok(())
    }

    /// Get an auction
    pub fn get_auction(e: Env, auction_id: u64) -> Result<Auction, MarketError> {
        store::auction(&e, auction_id).ok_or(MarketError::AuctionNotExists)
    }

    // ========================================================================
    // Escrow Ledger
    // ========================================================================

    /// Get the withdrawable balance for a (beneficiary, payment token) pair
    pub fn get_proceeds(e: Env, beneficiary: Address, payment_token: Address) -> i128 {
        store::proceeds(&e, &beneficiary, &payment_token)
    }

    /// Withdraw accumulated proceeds for each listed payment token.
    ///
    /// Each balance is zeroed before the external transfer; a failing
    /// transfer traps and rolls back every debit in the call, so settlement
    /// is all-or-nothing.
    pub fn withdraw(
        e: Env,
        caller: Address,
        payment_tokens: Vec<Address>,
    ) -> Result<(), MarketError> {
        let _lock = ReentrancyLock::acquire(&e).ok_or(MarketError::ReentrancyDetected)?;

        // CHECKS
        caller.require_auth();
        require_ready(&e)?;

        let custody = e.current_contract_address();
        for payment_token in payment_tokens.iter() {
            let balance = store::proceeds(&e, &caller, &payment_token);
            if balance <= 0 {
                continue;
            }

            // EFFECTS: zero before transferring
            store::clear_proceeds(&e, &caller, &payment_token);

            // INTERACTIONS
            token::Client::new(&e, &payment_token).transfer(&custody, &caller, &balance);

            MarketEvents::withdrawal(&e, &caller, &payment_token, balance);
        }
        Ok(())
    }
}
