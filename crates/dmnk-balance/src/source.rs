//! Balance source trait

use crate::FetchError;
use async_trait::async_trait;
use dmnk_core::Address;
use std::future::Future;

/// Asynchronous balance read for one address
///
/// Units and ledger are the implementor's business. Closures of the form
/// `Fn(Address) -> impl Future<Output = Result<f64, FetchError>>` implement
/// this trait directly.
#[async_trait]
pub trait BalanceSource: Send + Sync {
    /// Fetch the current balance of `address`
    async fn fetch_balance(&self, address: &Address) -> Result<f64, FetchError>;
}

#[async_trait]
impl<F, Fut> BalanceSource for F
where
    F: Fn(Address) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<f64, FetchError>> + Send + 'static,
{
    async fn fetch_balance(&self, address: &Address) -> Result<f64, FetchError> {
        (self)(*address).await
    }
}
