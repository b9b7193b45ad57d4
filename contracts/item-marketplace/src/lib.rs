/*!
 * Item Marketplace Smart Contract
 *
 * A ledger of uniquely numbered items that can be listed, bought once at a fixed price
 * and handed over between accounts.
 * Key features:
 * - Sequential item ids starting at 1, never reused
 * - Exact-price purchases paid directly to the seller in the configured payment token
 * - Owner-only transfers that keep the sold flag and price untouched
 * - Per-owner index so clients can fetch "my items" without scanning the registry
 * - Pausable by an admin for emergency situations
 *
 * Business Logic:
 * 1. A seller lists an item with a name and a positive price
 * 2. Any account other than the seller buys it once by paying exactly the price
 * 3. Whoever owns an item can transfer it to another account at any time
 */

#![no_std]

mod types;


use soroban_sdk::{contract, contractimpl, log, token, Address, Env, String, Symbol, Vec, symbol_short};

pub use types::{
    DataKey, Error, Item, ADMIN_UPDATED, ITEM_LISTED, ITEM_PURCHASED, ITEM_TRANSFERRED, PAUSED,
    UNPAUSED,
};

#[contract]
pub struct ItemMarketplace;

// Storage keys
// Persistent storage holds configuration and the per-item / per-owner entries
// Instance storage holds the counters and flags every call touches
const ADMIN_KEY: Symbol = symbol_short!("ADMIN");                 // Admin address (persistent)
const PAYMENT_TOKEN_KEY: Symbol = symbol_short!("PAY_TKN");       // Payment token contract address (persistent)
const ITEM_COUNT_KEY: Symbol = symbol_short!("ITEM_CNT");         // Highest item id handed out so far (instance)
const PAUSED_KEY: Symbol = symbol_short!("PAUSED");               // Contract pause state (instance)

// TTL management, in ledgers (~5s each)
const DAY_IN_LEDGERS: u32 = 17_280;
const BUMP_AMOUNT: u32 = 30 * DAY_IN_LEDGERS;
const BUMP_THRESHOLD: u32 = BUMP_AMOUNT - DAY_IN_LEDGERS;

/// Upper bound on the items returned by one `get_items` call, keeping each read well
/// inside the per-transaction read-entry and budget limits.
pub const MAX_PAGE_SIZE: u32 = 25;

#[contractimpl]
impl ItemMarketplace {
    /// Initializes the marketplace. Can only be called once.
    ///
    /// # Arguments
    /// * `admin` - Address allowed to pause the marketplace and hand over the admin role
    /// * `payment_token` - Token contract used to pay for items (the native asset contract
    ///   on a live network)
    ///
    /// # Errors
    /// - AlreadyInitialized: If the contract was already set up
    pub fn initialize(env: Env, admin: Address, payment_token: Address) -> Result<(), Error> {
        if env.storage().persistent().has(&ADMIN_KEY) {
            return Err(Error::AlreadyInitialized);
        }

        env.storage().persistent().set(&ADMIN_KEY, &admin);
        env.storage().persistent().set(&PAYMENT_TOKEN_KEY, &payment_token);
        Self::_bump_config(&env, &ADMIN_KEY);
        Self::_bump_config(&env, &PAYMENT_TOKEN_KEY);

        env.storage().instance().set(&ITEM_COUNT_KEY, &0u64);
        env.storage().instance().set(&PAUSED_KEY, &false);
        env.storage().instance().extend_ttl(BUMP_THRESHOLD, BUMP_AMOUNT);

        Ok(())
    }

    /// Loads the admin and requires its signature.
    fn _require_admin(env: &Env) -> Result<Address, Error> {
        let admin: Address = env
            .storage()
            .persistent()
            .get(&ADMIN_KEY)
            .ok_or(Error::NotInitialized)?;
        admin.require_auth();
        Ok(admin)
    }

    /// Shared precondition of every trading call: initialized and not paused.
    fn _require_trading(env: &Env) -> Result<(), Error> {
        if !env.storage().persistent().has(&ADMIN_KEY) {
            return Err(Error::NotInitialized);
        }
        if env.storage().instance().get(&PAUSED_KEY).unwrap_or(false) {
            return Err(Error::ContractPaused);
        }
        env.storage().instance().extend_ttl(BUMP_THRESHOLD, BUMP_AMOUNT);
        Ok(())
    }

    fn _bump_persistent(env: &Env, key: &DataKey) {
        env.storage().persistent().extend_ttl(key, BUMP_THRESHOLD, BUMP_AMOUNT);
    }

    fn _bump_config(env: &Env, key: &Symbol) {
        env.storage().persistent().extend_ttl(key, BUMP_THRESHOLD, BUMP_AMOUNT);
    }

    fn _load_item(env: &Env, item_id: u64) -> Result<Item, Error> {
        env.storage()
            .persistent()
            .get(&DataKey::Item(item_id))
            .ok_or(Error::ItemNotFound)
    }

    fn _store_item(env: &Env, item: &Item) {
        let key = DataKey::Item(item.id);
        env.storage().persistent().set(&key, item);
        Self::_bump_persistent(env, &key);
    }

    fn _owner_items(env: &Env, owner: &Address) -> Vec<u64> {
        env.storage()
            .persistent()
            .get(&DataKey::OwnerItems(owner.clone()))
            .unwrap_or_else(|| Vec::new(env))
    }

    fn _store_owner_items(env: &Env, owner: &Address, ids: &Vec<u64>) {
        let key = DataKey::OwnerItems(owner.clone());
        env.storage().persistent().set(&key, ids);
        Self::_bump_persistent(env, &key);
    }

    /// Moves `item_id` from `from`'s owner index to `to`'s, keeping both ascending.
    fn _move_ownership(env: &Env, item_id: u64, from: &Address, to: &Address) {
        if from == to {
            return;
        }

        let mut from_ids = Self::_owner_items(env, from);
        if let Some(index) = from_ids.first_index_of(item_id) {
            from_ids.remove(index);
        }
        Self::_store_owner_items(env, from, &from_ids);

        let mut to_ids = Self::_owner_items(env, to);
        if let Err(index) = to_ids.binary_search(item_id) {
            to_ids.insert(index, item_id);
        }
        Self::_store_owner_items(env, to, &to_ids);
    }

    /// Lists a new item owned by the caller.
    ///
    /// # Business Flow
    /// 1. Validates seller authorization and price
    /// 2. Takes the next id from the counter
    /// 3. Stores the item with the seller as owner and appends it to the seller's index
    /// 4. Emits `item_lst`
    ///
    /// # Arguments
    /// * `seller` - The listing account (must sign the transaction)
    /// * `name` - Free-form item name
    /// * `price` - Price in the smallest unit of the payment token
    ///
    /// # Returns
    /// The id of the new item
    ///
    /// # Errors
    /// - NotInitialized / ContractPaused
    /// - InvalidPrice: If `price <= 0`
    pub fn list_item(env: Env, seller: Address, name: String, price: i128) -> Result<u64, Error> {
        Self::_require_trading(&env)?;

        seller.require_auth();

        if price <= 0 {
            log!(&env, "Price must be greater than zero. Provided: {}", price);
            return Err(Error::InvalidPrice);
        }

        let item_count: u64 = env.storage().instance().get(&ITEM_COUNT_KEY).unwrap_or(0);
        let item_id = item_count + 1;

        let item = Item {
            id: item_id,
            name,
            price,
            seller: seller.clone(),
            owner: seller.clone(),
            is_sold: false,
        };
        Self::_store_item(&env, &item);

        // New ids are always the largest, so appending keeps the index ascending
        let mut owned = Self::_owner_items(&env, &seller);
        owned.push_back(item_id);
        Self::_store_owner_items(&env, &seller, &owned);

        env.storage().instance().set(&ITEM_COUNT_KEY, &item_id);

        env.events().publish((ITEM_LISTED, seller), (item_id, price));

        Ok(item_id)
    }

    /// Buys an unsold item at exactly its listed price.
    ///
    /// # Business Flow
    /// 1. Validates buyer authorization and that the item exists
    /// 2. Rejects items already sold, purchases by the seller and wrong payments
    /// 3. Transfers `payment` from the buyer to the seller
    /// 4. Makes the buyer the owner, marks the item sold, updates both owner indices
    /// 5. Emits `item_buy`
    ///
    /// # Arguments
    /// * `buyer` - The purchasing account (must sign the transaction)
    /// * `item_id` - The item to buy
    /// * `payment` - Amount offered, must equal the item price
    ///
    /// # Errors
    /// - NotInitialized / ContractPaused
    /// - ItemNotFound: If no item has this id
    /// - ItemAlreadySold: If the item was purchased before
    /// - SellerCannotPurchase: If the buyer is the item's seller
    /// - IncorrectPayment: If `payment != price`
    /// - TokenTransferFailed: If the payment token refuses the transfer
    pub fn purchase_item(env: Env, buyer: Address, item_id: u64, payment: i128) -> Result<(), Error> {
        Self::_require_trading(&env)?;

        buyer.require_auth();

        let mut item = Self::_load_item(&env, item_id)?;

        if item.is_sold {
            return Err(Error::ItemAlreadySold);
        }

        if buyer == item.seller {
            return Err(Error::SellerCannotPurchase);
        }

        if payment != item.price {
            log!(&env, "Incorrect payment. Price: {}, Provided: {}", item.price, payment);
            return Err(Error::IncorrectPayment);
        }

        let payment_token: Address = env
            .storage()
            .persistent()
            .get(&PAYMENT_TOKEN_KEY)
            .ok_or(Error::NotInitialized)?;
        let token_client = token::Client::new(&env, &payment_token);

        // Pay the seller before touching any item state
        match token_client.try_transfer(&buyer, &item.seller, &payment) {
            Ok(Ok(())) => {}
            _ => {
                log!(&env, "Payment transfer failed for amount: {}", payment);
                return Err(Error::TokenTransferFailed);
            }
        }

        let previous_owner = item.owner.clone();
        item.owner = buyer.clone();
        item.is_sold = true;
        Self::_store_item(&env, &item);
        Self::_move_ownership(&env, item_id, &previous_owner, &buyer);

        env.events().publish((ITEM_PURCHASED, buyer), (item_id, payment));

        Ok(())
    }

    /// Hands an item over to another account without payment.
    ///
    /// Price, seller and the sold flag are left as they are. Transferring to oneself
    /// is accepted and changes nothing.
    ///
    /// # Arguments
    /// * `from` - The current owner (must sign the transaction)
    /// * `item_id` - The item to transfer
    /// * `to` - The new owner
    ///
    /// # Errors
    /// - NotInitialized / ContractPaused
    /// - ItemNotFound: If no item has this id
    /// - NotItemOwner: If `from` does not own the item
    pub fn transfer_item(env: Env, from: Address, item_id: u64, to: Address) -> Result<(), Error> {
        Self::_require_trading(&env)?;

        from.require_auth();

        let mut item = Self::_load_item(&env, item_id)?;

        if item.owner != from {
            return Err(Error::NotItemOwner);
        }

        item.owner = to.clone();
        Self::_store_item(&env, &item);
        Self::_move_ownership(&env, item_id, &from, &to);

        env.events().publish((ITEM_TRANSFERRED, from), (item_id, to));

        Ok(())
    }

    /// Halts listing, purchases and transfers. Admin only.
    pub fn pause(env: Env) -> Result<(), Error> {
        let admin = Self::_require_admin(&env)?;
        env.storage().instance().set(&PAUSED_KEY, &true);
        env.events().publish((PAUSED, admin), ());
        Ok(())
    }

    /// Resumes trading. Admin only.
    pub fn unpause(env: Env) -> Result<(), Error> {
        let admin = Self::_require_admin(&env)?;
        env.storage().instance().set(&PAUSED_KEY, &false);
        env.events().publish((UNPAUSED, admin), ());
        Ok(())
    }

    /// Hands the admin role to `new_admin`. Requires the current admin's signature.
    pub fn update_admin(env: Env, new_admin: Address) -> Result<(), Error> {
        Self::_require_admin(&env)?;
        env.storage().persistent().set(&ADMIN_KEY, &new_admin);
        Self::_bump_config(&env, &ADMIN_KEY);
        env.events().publish((ADMIN_UPDATED, env.current_contract_address()), &new_admin);
        Ok(())
    }

    // ============================================================================================
    // READ-ONLY QUERIES
    // ============================================================================================

    /// Number of items ever listed, which is also the highest id in use.
    pub fn item_count(env: Env) -> u64 {
        env.storage().instance().get(&ITEM_COUNT_KEY).unwrap_or(0)
    }

    /// Looks up one item.
    ///
    /// Returns `None` for id 0 and for ids above `item_count`; every listed item stays
    /// retrievable forever. Item entries only have their TTL extended when written, so an
    /// item left untouched for a long time may be archived and must be restored before it
    /// can be read.
    pub fn get_item(env: Env, item_id: u64) -> Option<Item> {
        env.storage().persistent().get(&DataKey::Item(item_id))
    }

    /// One page of items in listing order, starting at `start_id`.
    ///
    /// Returns at most `min(limit, MAX_PAGE_SIZE)` items with ids from `start_id` upwards
    /// (id 0 is read as 1). A zero `limit` or a `start_id` past `item_count` gives an
    /// empty page. Clients page through the registry by passing the last id they received
    /// plus one.
    pub fn get_items(env: Env, start_id: u64, limit: u32) -> Vec<Item> {
        let mut items = Vec::new(&env);
        let item_count = Self::item_count(env.clone());
        let first = start_id.max(1);
        if first > item_count {
            return items;
        }

        let page_size = limit.min(MAX_PAGE_SIZE) as u64;
        if page_size == 0 {
            return items;
        }
        let last = item_count.min(first.saturating_add(page_size - 1));

        for item_id in first..=last {
            if let Some(item) = Self::get_item(env.clone(), item_id) {
                items.push_back(item);
            }
        }
        items
    }

    /// Ids of the items `owner` currently owns, ascending.
    pub fn get_items_by_owner(env: Env, owner: Address) -> Vec<u64> {
        Self::_owner_items(&env, &owner)
    }

    pub fn get_admin(env: Env) -> Option<Address> {
        env.storage().persistent().get(&ADMIN_KEY)
    }

    pub fn get_payment_token(env: Env) -> Option<Address> {
        env.storage().persistent().get(&PAYMENT_TOKEN_KEY)
    }

    pub fn is_paused(env: Env) -> bool {
        env.storage().instance().get(&PAUSED_KEY).unwrap_or(false)
    }
}
