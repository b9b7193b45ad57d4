/*!
 * Storefront client for the Item Marketplace contract
 *
 * The storefront is what a marketplace UI talks to. It holds the signing account the
 * wallet exposes, a handle to the marketplace contract and the two lists a UI renders:
 * every item, and the items the account owns.
 *
 * Each user action issues exactly one contract call. When the call succeeds both lists
 * are fetched again from the ledger; when it is rejected the lists stay as they were and
 * the contract's reason is returned to the caller.
 */

mod amount;
mod error;


use item_marketplace::{Item, ItemMarketplaceClient, MAX_PAGE_SIZE};
use soroban_sdk::{Address, Env, String};
use tracing::{debug, info, warn};

pub use amount::{format_amount, parse_amount, DECIMALS};
pub use error::StorefrontError;

/// Source of the signing identity, e.g. a browser wallet or a local key store.
pub trait WalletProvider {
    /// Accounts the user granted access to, active account first.
    fn request_accounts(&self) -> Vec<Address>;
}

impl WalletProvider for Vec<Address> {
    fn request_accounts(&self) -> Vec<Address> {
        self.clone()
    }
}

/// Flattens the nested result of a generated `try_*` contract call.
fn settle<T, C, E, I>(result: Result<Result<T, C>, Result<E, I>>) -> Result<T, StorefrontError>
where
    E: Into<StorefrontError>,
    I: Into<StorefrontError>,
{
    match result {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(_)) => Err(StorefrontError::Conversion),
        Err(Ok(err)) => Err(err.into()),
        Err(Err(err)) => Err(err.into()),
    }
}

/// A connected view of the marketplace for one wallet account.
///
/// Holds the contract handle and the item lists as of the last reload. Actions take
/// `&mut self`, so one storefront never has two writes in flight.
pub struct Storefront<'a> {
    env: Env,
    contract_id: Address,
    contract: ItemMarketplaceClient<'a>,
    account: Address,
    items: Vec<Item>,
    owned_items: Vec<Item>,
}

impl<'a> Storefront<'a> {
    /// Asks the wallet for its accounts and loads both lists for the active one.
    pub fn connect<W>(env: &Env, contract_id: &Address, wallet: &W) -> Result<Self, StorefrontError>
    where
        W: WalletProvider + ?Sized,
    {
        let account = wallet
            .request_accounts()
            .into_iter()
            .next()
            .ok_or(StorefrontError::NoAccount)?;

        let mut storefront = Storefront {
            env: env.clone(),
            contract_id: contract_id.clone(),
            contract: ItemMarketplaceClient::new(env, contract_id),
            account,
            items: Vec::new(),
            owned_items: Vec::new(),
        };
        info!(account = ?storefront.account, "connected to marketplace");
        storefront.reload()?;
        Ok(storefront)
    }

    /// Switches to the wallet's new active account.
    ///
    /// Rebuilds the contract handle and reloads both lists. An empty account list is an
    /// error and leaves the storefront on its previous account.
    pub fn accounts_changed(&mut self, accounts: &[Address]) -> Result<(), StorefrontError> {
        let account = accounts.first().ok_or(StorefrontError::NoAccount)?;
        self.account = account.clone();
        self.contract = ItemMarketplaceClient::new(&self.env, &self.contract_id);
        info!(account = ?self.account, "active account changed");
        self.reload()
    }

    /// Fetches every item and the active account's items from the ledger.
    ///
    /// The item registry is read page by page so a long listing history never has to fit
    /// into a single invocation's budget.
    pub fn reload(&mut self) -> Result<(), StorefrontError> {
        let item_count = settle(self.contract.try_item_count())?;
        let mut items = Vec::with_capacity(item_count as usize);
        let mut next_id = 1u64;
        while next_id <= item_count {
            let page = settle(self.contract.try_get_items(&next_id, &MAX_PAGE_SIZE))?;
            let Some(last) = page.last() else {
                break;
            };
            next_id = last.id + 1;
            items.extend(page.iter());
        }

        let owned_ids = settle(self.contract.try_get_items_by_owner(&self.account))?;
        let mut owned_items = Vec::with_capacity(owned_ids.len() as usize);
        for item_id in owned_ids.iter() {
            if let Some(item) = settle(self.contract.try_get_item(&item_id))? {
                owned_items.push(item);
            }
        }

        self.items = items;
        self.owned_items = owned_items;
        debug!(items = self.items.len(), owned = self.owned_items.len(), "reloaded item lists");
        Ok(())
    }

    /// Lists an item priced in whole-token decimal notation (`"2.5"`).
    pub fn list_item(&mut self, name: &str, price: &str) -> Result<u64, StorefrontError> {
        let price = parse_amount(price)?;
        info!(account = ?self.account, name, price = %price, "listing item");

        let name = String::from_str(&self.env, name);
        let result = settle(self.contract.try_list_item(&self.account, &name, &price));
        self.finish("list", result)
    }

    /// Buys an item from the loaded list, paying its listed price.
    pub fn purchase_item(&mut self, item_id: u64) -> Result<(), StorefrontError> {
        let price = self
            .items
            .iter()
            .find(|item| item.id == item_id)
            .map(|item| item.price)
            .ok_or(StorefrontError::UnknownItem(item_id))?;
        info!(account = ?self.account, item_id, price = %price, "purchasing item");

        let result = settle(self.contract.try_purchase_item(&self.account, &item_id, &price));
        self.finish("purchase", result)
    }

    /// Hands one of the active account's items to `to`.
    pub fn transfer_item(&mut self, item_id: u64, to: &Address) -> Result<(), StorefrontError> {
        info!(account = ?self.account, item_id, to = ?to, "transferring item");

        let result = settle(self.contract.try_transfer_item(&self.account, &item_id, to));
        self.finish("transfer", result)
    }

    /// Reloads after a successful write; reports a failed one and keeps the lists.
    fn finish<T>(&mut self, action: &str, result: Result<T, StorefrontError>) -> Result<T, StorefrontError> {
        match result {
            Ok(value) => {
                self.reload()?;
                Ok(value)
            }
            Err(err) => {
                warn!(account = ?self.account, action, error = %err, "marketplace call failed");
                Err(err)
            }
        }
    }

    pub fn account(&self) -> &Address {
        &self.account
    }

    pub fn contract_id(&self) -> &Address {
        &self.contract_id
    }

    /// Every item, in listing order, as of the last reload.
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// The active account's items, ascending by id, as of the last reload.
    pub fn owned_items(&self) -> &[Item] {
        &self.owned_items
    }

    /// Whether a purchase button makes sense for `item`: unsold and owned by someone else.
    pub fn is_purchasable(&self, item: &Item) -> bool {
        !item.is_sold && item.owner != self.account
    }

    pub fn purchasable_items(&self) -> impl Iterator<Item = &Item> + '_ {
        self.items.iter().filter(|item| self.is_purchasable(item))
    }
}
