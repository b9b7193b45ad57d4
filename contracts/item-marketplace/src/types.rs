/*!
 * Type Definitions for the Item Marketplace Smart Contract
 *
 * This module defines the data structures, storage keys, errors and event symbols
 * used by the marketplace contract. Items are the only entity: they are created by
 * listing, change hands through purchase or transfer, and are never removed.
 */

use soroban_sdk::{contracterror, contracttype, symbol_short, Address, String, Symbol};

// ================================================================================================
// CORE DATA STRUCTURES
// ================================================================================================

/// A good listed in the marketplace.
///
/// # Lifecycle
/// - Created by `list_item`: `owner == seller`, `is_sold == false`
/// - First successful `purchase_item`: payment goes to the seller, `owner` becomes the
///   buyer and `is_sold` flips to `true` for good
/// - `transfer_item`: `owner` changes, nothing else does
///
/// `id`, `name`, `price` and `seller` never change after listing.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Item {
    /// 1-based id, assigned from the item counter at listing time
    pub id: u64,

    /// Free-form name supplied by the seller
    pub name: String,

    /// Price in the smallest unit of the payment token (stroops for XLM)
    pub price: i128,

    /// Account that listed the item and receives the purchase payment
    pub seller: Address,

    /// Current owner
    pub owner: Address,

    /// Set once, on the first purchase
    pub is_sold: bool,
}

/// Keys for entries that grow with usage. These live in persistent storage with
/// their TTL bumped on every write.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DataKey {
    /// Item id -> Item
    Item(u64),

    /// Owner -> ascending list of the item ids it currently owns
    OwnerItems(Address),
}

// ================================================================================================
// ERROR DEFINITIONS
// ================================================================================================

/// Every way a marketplace call can be rejected.
///
/// Codes are part of the contract interface: clients match on them, so existing
/// variants keep their number.
#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    /// No item was ever listed under the requested id
    ItemNotFound = 1,

    /// Listing price is zero or negative
    InvalidPrice = 2,

    /// Payment does not match the item price exactly
    IncorrectPayment = 3,

    /// Item has already been purchased once
    ItemAlreadySold = 4,

    /// The seller tried to purchase their own item
    SellerCannotPurchase = 5,

    /// Caller is not the current owner of the item
    NotItemOwner = 6,

    /// Trading is halted by the admin
    ContractPaused = 7,

    /// `initialize` was already called
    AlreadyInitialized = 8,

    /// A mutating call arrived before `initialize`
    NotInitialized = 9,

    /// The payment token refused to move the funds (usually insufficient balance)
    TokenTransferFailed = 10,
}

impl Error {
    /// Human readable rejection reason, for clients that display failures.
    pub fn reason(&self) -> &'static str {
        match self {
            Error::ItemNotFound => "Item does not exist",
            Error::InvalidPrice => "Price must be greater than zero",
            Error::IncorrectPayment => "Payment must equal the item price",
            Error::ItemAlreadySold => "Item has already been sold",
            Error::SellerCannotPurchase => "Seller cannot purchase their own item",
            Error::NotItemOwner => "Only the owner can transfer the item",
            Error::ContractPaused => "Marketplace is paused",
            Error::AlreadyInitialized => "Contract already initialized",
            Error::NotInitialized => "Contract not initialized",
            Error::TokenTransferFailed => "Payment transfer failed",
        }
    }
}

// ================================================================================================
// EVENT CONSTANTS
// ================================================================================================

/// Event emitted when an item is listed
/// Topics: (ITEM_LISTED, seller) Data: (item_id, price)
pub const ITEM_LISTED: Symbol = symbol_short!("item_lst");

/// Event emitted when an item is purchased
/// Topics: (ITEM_PURCHASED, buyer) Data: (item_id, price)
pub const ITEM_PURCHASED: Symbol = symbol_short!("item_buy");

/// Event emitted when an item changes owner without payment
/// Topics: (ITEM_TRANSFERRED, from) Data: (item_id, to)
pub const ITEM_TRANSFERRED: Symbol = symbol_short!("item_xfr");

/// Event emitted when trading is halted
pub const PAUSED: Symbol = symbol_short!("paused");

/// Event emitted when trading resumes
pub const UNPAUSED: Symbol = symbol_short!("unpaused");

/// Event emitted when the admin is replaced
/// Topics: (ADMIN_UPDATED, contract) Data: new_admin
pub const ADMIN_UPDATED: Symbol = symbol_short!("adm_upd");
