//! The account ledger.
//!
//! All balance mutations go through [`Ledger`]. It validates requests, builds
//! the purchase or transfer record, and hands the record to the store, which
//! re-reads the balance under a lock and commits the debit, credit and record
//! together.

use std::sync::Arc;

use merch_core::{
    Account, AccountInfo, Identity, LedgerError, PurchaseRecord, Result, TransferRecord,
};
use merch_store::{Store, StoreError};

use crate::catalog::Catalog;
use crate::history::HistoryQuery;
use crate::password::PasswordHasher;
use crate::token::TokenService;

/// A signed-in caller and the token they should present next.
#[derive(Debug, Clone)]
pub struct Session {
    /// The authenticated identity.
    pub identity: Identity,
    /// A freshly issued bearer token.
    pub token: String,
}

/// Outcome of a successful purchase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurchaseReceipt {
    /// Item bought.
    pub item: String,
    /// Coins debited.
    pub price: i64,
    /// Buyer's balance after the purchase.
    pub balance: i64,
}

/// Outcome of a successful transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferReceipt {
    /// Receiver's username.
    pub to_user: String,
    /// Coins moved.
    pub amount: i64,
    /// Sender's balance after the transfer.
    pub balance: i64,
}

/// Coin ledger over a [`Store`].
#[derive(Clone)]
pub struct Ledger {
    store: Arc<dyn Store>,
    tokens: Arc<TokenService>,
    hasher: Arc<dyn PasswordHasher>,
    catalog: Catalog,
    history: HistoryQuery,
}

impl Ledger {
    /// Create a ledger.
    #[must_use]
    pub fn new(
        store: Arc<dyn Store>,
        tokens: Arc<TokenService>,
        hasher: Arc<dyn PasswordHasher>,
    ) -> Self {
        Self {
            catalog: Catalog::new(Arc::clone(&store)),
            history: HistoryQuery::new(Arc::clone(&store)),
            store,
            tokens,
            hasher,
        }
    }

    /// The catalog this ledger sells from.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    // =========================================================================
    // Authentication
    // =========================================================================

    /// Sign in, creating the account on first use.
    ///
    /// A new account starts with the default balance. An existing account must
    /// present the password it was created with. Both branches return a fresh
    /// token.
    ///
    /// # Errors
    ///
    /// - `LedgerError::InvalidRequest` if username or password is empty.
    /// - `LedgerError::InvalidCredentials` if the password does not match.
    pub async fn authenticate_or_register(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Session> {
        if username.is_empty() || password.is_empty() {
            return Err(LedgerError::InvalidRequest(
                "username and password are required".into(),
            ));
        }

        let account = match self.store.get_account_by_username(username).await? {
            Some(account) => {
                self.check_password(&account, password).await?;
                account
            }
            None => self.register(username, password).await?,
        };

        let token = self.tokens.issue(&account.username)?;

        Ok(Session {
            identity: account.identity(),
            token,
        })
    }

    async fn register(&self, username: &str, password: &str) -> Result<Account> {
        let password_hash = self.hash_password(password).await?;
        let account = Account::new(username, password_hash);

        match self.store.create_account(&account).await {
            Ok(()) => {
                tracing::info!(
                    user = %username,
                    account_id = %account.id,
                    balance = account.balance,
                    "Account created"
                );
                Ok(account)
            }
            Err(StoreError::Conflict { .. }) => {
                // Lost a registration race; sign in against the winner instead.
                tracing::warn!(user = %username, "Concurrent registration, re-reading account");
                let existing = self
                    .store
                    .get_account_by_username(username)
                    .await?
                    .ok_or_else(|| {
                        LedgerError::Internal(format!(
                            "account {username} missing after registration conflict"
                        ))
                    })?;
                self.check_password(&existing, password).await?;
                Ok(existing)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn check_password(&self, account: &Account, password: &str) -> Result<()> {
        let hasher = Arc::clone(&self.hasher);
        let hash = account.password_hash.clone();
        let password = password.to_owned();

        let matches = tokio::task::spawn_blocking(move || hasher.verify(&hash, &password))
            .await
            .map_err(|e| LedgerError::Internal(format!("password check task failed: {e}")))??;

        if matches {
            Ok(())
        } else {
            tracing::debug!(user = %account.username, "Password mismatch");
            Err(LedgerError::InvalidCredentials)
        }
    }

    async fn hash_password(&self, password: &str) -> Result<String> {
        let hasher = Arc::clone(&self.hasher);
        let password = password.to_owned();

        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| LedgerError::Internal(format!("password hash task failed: {e}")))?
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Buy one unit of `item_name`.
    ///
    /// # Errors
    ///
    /// - `LedgerError::ItemNotFound` if the catalog has no such item.
    /// - `LedgerError::InsufficientFunds` if the balance is below the price.
    pub async fn purchase(&self, identity: &Identity, item_name: &str) -> Result<PurchaseReceipt> {
        let item = self.catalog.find_by_name(item_name).await?;
        let record = PurchaseRecord::new(identity.account_id, &item);

        let outcome = self.store.purchase(&record).await.map_err(|e| {
            tracing::debug!(user = %identity.username, item = %item.name, error = %e, "Purchase rejected");
            LedgerError::from(e)
        })?;

        if outcome.price != item.price {
            tracing::debug!(
                item = %item.name,
                listed = item.price,
                charged = outcome.price,
                "Item repriced during purchase"
            );
        }

        tracing::info!(
            user = %identity.username,
            item = %item.name,
            price = outcome.price,
            balance = outcome.balance,
            "Item purchased"
        );

        Ok(PurchaseReceipt {
            item: item.name,
            price: outcome.price,
            balance: outcome.balance,
        })
    }

    /// Send `amount` coins to `to_user`.
    ///
    /// Checks run in order: self-transfer, amount, receiver, funds.
    ///
    /// # Errors
    ///
    /// - `LedgerError::SelfTransfer` if `to_user` is the caller.
    /// - `LedgerError::InvalidAmount` if `amount` is not positive.
    /// - `LedgerError::ReceiverNotFound` if `to_user` has no account.
    /// - `LedgerError::InsufficientFunds` if the caller cannot cover `amount`.
    pub async fn transfer(
        &self,
        identity: &Identity,
        to_user: &str,
        amount: i64,
    ) -> Result<TransferReceipt> {
        if to_user == identity.username {
            return Err(LedgerError::SelfTransfer);
        }
        if amount <= 0 {
            return Err(LedgerError::InvalidAmount { amount });
        }

        let receiver = self
            .store
            .get_account_by_username(to_user)
            .await?
            .ok_or_else(|| LedgerError::ReceiverNotFound {
                username: to_user.to_string(),
            })?;

        let record = TransferRecord::new(identity.account_id, receiver.id, amount);
        let balance = self.store.transfer(&record).await.map_err(|e| {
            tracing::debug!(user = %identity.username, to_user = %to_user, error = %e, "Transfer rejected");
            LedgerError::from(e)
        })?;

        tracing::info!(
            user = %identity.username,
            to_user = %receiver.username,
            amount,
            balance,
            "Coins transferred"
        );

        Ok(TransferReceipt {
            to_user: receiver.username,
            amount,
            balance,
        })
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Balance, inventory and coin history of the caller.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::AccountNotFound` if the caller's account is gone.
    pub async fn account_info(&self, identity: &Identity) -> Result<AccountInfo> {
        let account = self
            .store
            .get_account(&identity.account_id)
            .await?
            .ok_or_else(|| LedgerError::AccountNotFound {
                username: identity.username.clone(),
            })?;

        let (inventory, coin_history) = futures::try_join!(
            self.history.inventory_of(&account.id),
            self.history.coin_history_of(&account.id),
        )?;

        Ok(AccountInfo {
            coins: account.balance,
            inventory,
            coin_history,
        })
    }
}
