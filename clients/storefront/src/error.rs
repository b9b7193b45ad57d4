use item_marketplace::Error as MarketplaceError;
use soroban_sdk::InvokeError;
use thiserror::Error;

/// Everything a storefront action can fail with.
#[derive(Debug, Error)]
pub enum StorefrontError {
    /// The wallet did not expose any account.
    #[error("wallet exposed no account")]
    NoAccount,

    /// A price typed by the user is not a non-negative decimal with at most 7 fractional digits.
    #[error("invalid amount: {0:?}")]
    InvalidAmount(String),

    /// The item is not in the last fetched list.
    #[error("item {0} is not in the loaded item list")]
    UnknownItem(u64),

    /// The marketplace contract rejected the call.
    #[error("rejected by marketplace: {}", .0.reason())]
    Rejected(MarketplaceError),

    /// The host failed a read call.
    #[error("marketplace query failed: {0:?}")]
    Host(soroban_sdk::Error),

    /// The invocation aborted without a marketplace error code.
    #[error("invocation failed: {0:?}")]
    Invoke(InvokeError),

    #[error("unexpected value returned by marketplace")]
    Conversion,
}

impl StorefrontError {
    /// The marketplace error behind a rejection, if that is what this is.
    pub fn rejection(&self) -> Option<MarketplaceError> {
        match self {
            StorefrontError::Rejected(err) => Some(*err),
            _ => None,
        }
    }
}

impl From<MarketplaceError> for StorefrontError {
    fn from(err: MarketplaceError) -> Self {
        StorefrontError::Rejected(err)
    }
}

impl From<soroban_sdk::Error> for StorefrontError {
    fn from(err: soroban_sdk::Error) -> Self {
        StorefrontError::Host(err)
    }
}

impl From<InvokeError> for StorefrontError {
    fn from(err: InvokeError) -> Self {
        StorefrontError::Invoke(err)
    }
}
