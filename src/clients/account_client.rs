use crate::account_actor::{AccountAction, AccountActionResult, AccountError};
use crate::clients::actor_client::ActorClient;
use crate::framework::{EntitySupervisor, FrameworkError};
use crate::model::{Account, AccountDetails, AccountId, ReportEntry};
use async_trait::async_trait;
use tracing::{debug, instrument};

/// Client for interacting with account actors.
///
/// Every per-account call resolves the actor through the registry and then talks to
/// it directly; the supervisor is not on the request path.
#[derive(Clone)]
pub struct AccountClient {
    inner: EntitySupervisor<Account>,
}

impl AccountClient {
    pub fn new(inner: EntitySupervisor<Account>) -> Self {
        Self { inner }
    }

    #[instrument(skip(self))]
    pub async fn get_details(&self, id: AccountId) -> Result<AccountDetails, AccountError> {
        debug!("Sending request");
        let account = self.inner.get(&id).await.map_err(Self::map_error)?;
        Ok(account.details())
    }

    #[instrument(skip(self))]
    pub async fn get_counter(&self, id: AccountId) -> Result<u64, AccountError> {
        debug!("Sending request");
        match self.action(id, AccountAction::GetOrderCount).await? {
            AccountActionResult::GetOrderCount(count) => Ok(count),
            other => Err(unexpected(other)),
        }
    }

    /// Records one order. Returns the new count.
    #[instrument(skip(self))]
    pub async fn increment(&self, id: AccountId) -> Result<u64, AccountError> {
        debug!("Sending request");
        match self.action(id, AccountAction::Increment).await? {
            AccountActionResult::Increment(count) => Ok(count),
            other => Err(unexpected(other)),
        }
    }

    /// True iff a live actor is registered for `id`. Never creates one.
    pub fn is_alive(&self, id: AccountId) -> bool {
        self.inner.exists(&id)
    }

    /// Order count of every live account, in ascending id order.
    ///
    /// Accounts that terminate between enumeration and their query are left out.
    #[instrument(skip(self))]
    pub async fn list_report(&self) -> Result<Vec<ReportEntry>, AccountError> {
        let handles = self.inner.handles();
        debug!(size = handles.len(), "Collecting report");
        let mut report = Vec::with_capacity(handles.len());
        for handle in handles {
            let id = *handle.key();
            match handle.perform_action(AccountAction::GetOrderCount).await {
                Ok(AccountActionResult::GetOrderCount(order_count)) => {
                    report.push(ReportEntry { id, order_count })
                }
                Ok(other) => return Err(unexpected(other)),
                Err(e) if e.is_gone() => debug!(%id, "Account terminated during report"),
                Err(e) => return Err(Self::map_error(e)),
            }
        }
        Ok(report)
    }

    async fn action(&self, id: AccountId, action: AccountAction) -> Result<AccountActionResult, AccountError> {
        self.inner
            .perform_action(&id, action)
            .await
            .map_err(Self::map_error)
    }
}

fn unexpected(result: AccountActionResult) -> AccountError {
    AccountError::ActorCommunicationError(format!("unexpected action result: {result:?}"))
}

#[async_trait]
impl ActorClient<Account> for AccountClient {
    type Error = AccountError;

    fn supervisor(&self) -> &EntitySupervisor<Account> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        match e {
            FrameworkError::NotFound(id) => AccountError::NotFound(id),
            FrameworkError::CreationFailed(reason) => AccountError::CreationFailed(reason),
            FrameworkError::EntityError(source) => match source.downcast::<AccountError>() {
                Ok(account_error) => *account_error,
                Err(other) => AccountError::ActorCommunicationError(other.to_string()),
            },
            other => AccountError::ActorCommunicationError(other.to_string()),
        }
    }
}
