use super::error::AuthError;
use super::models::{Account, NewAccount};
use super::repository::AccountRepository;
use async_trait::async_trait;
use sled::transaction::{
    abort, ConflictableTransactionResult, TransactionResult, Transactional,
};
use sled::Db;
use std::path::Path;

const ACCOUNTS_TREE: &str = "accounts";
const ACCOUNTS_BY_EMAIL_TREE: &str = "accounts_by_email";

/// Accounts keyed by big-endian id, plus an email -> id index.
///
/// Writes touch both trees inside one transaction.
#[derive(Clone)]
pub struct SledAccountRepository {
    db: Db,
}

impl SledAccountRepository {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, AuthError> {
        let db = sled::open(path)?;
        Ok(Self { db })
    }

    fn accounts_tree(&self) -> Result<sled::Tree, AuthError> {
        Ok(self.db.open_tree(ACCOUNTS_TREE)?)
    }

    fn accounts_by_email_tree(&self) -> Result<sled::Tree, AuthError> {
        Ok(self.db.open_tree(ACCOUNTS_BY_EMAIL_TREE)?)
    }
}

fn decode(bytes: &[u8]) -> ConflictableTransactionResult<Account, AuthError> {
    serde_json::from_slice(bytes).or_else(|e| abort(AuthError::from(e)))
}

#[async_trait]
impl AccountRepository for SledAccountRepository {
    async fn create(&self, account: NewAccount) -> Result<Account, AuthError> {
        // sled ids start at zero; keep zero out of the id space
        let id = self.db.generate_id()? + 1;
        let account = account.into_account(id);
        let account_json = serde_json::to_vec(&account)?;

        let accounts_tree = self.accounts_tree()?;
        let email_tree = self.accounts_by_email_tree()?;

        let result: TransactionResult<(), AuthError> =
            (&accounts_tree, &email_tree).transaction(|(accounts, by_email)| {
                if by_email.get(account.email.as_bytes())?.is_some() {
                    return abort(AuthError::AccountAlreadyExists);
                }
                by_email.insert(account.email.as_bytes(), &id.to_be_bytes()[..])?;
                accounts.insert(&id.to_be_bytes()[..], account_json.as_slice())?;
                Ok(())
            });
        result?;

        Ok(account)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, AuthError> {
        let email_tree = self.accounts_by_email_tree()?;
        let accounts_tree = self.accounts_tree()?;

        // First, get the account ID from the email index
        if let Some(account_id) = email_tree.get(email.as_bytes())? {
            if let Some(account_data) = accounts_tree.get(&account_id)? {
                let account: Account = serde_json::from_slice(&account_data)?;
                return Ok(Some(account));
            }
        }

        Ok(None)
    }

    async fn find_by_id(&self, id: u64) -> Result<Option<Account>, AuthError> {
        let accounts_tree = self.accounts_tree()?;

        if let Some(account_data) = accounts_tree.get(id.to_be_bytes())? {
            let account: Account = serde_json::from_slice(&account_data)?;
            return Ok(Some(account));
        }

        Ok(None)
    }

    async fn update(&self, account: Account) -> Result<Account, AuthError> {
        let account_json = serde_json::to_vec(&account)?;
        let id = account.id;

        let accounts_tree = self.accounts_tree()?;
        let email_tree = self.accounts_by_email_tree()?;

        let result: TransactionResult<(), AuthError> =
            (&accounts_tree, &email_tree).transaction(|(accounts, by_email)| {
                let previous = match accounts.get(id.to_be_bytes())? {
                    Some(bytes) => decode(&bytes)?,
                    None => return abort(AuthError::AccountNotFound),
                };

                if previous.email != account.email {
                    if by_email.get(account.email.as_bytes())?.is_some() {
                        return abort(AuthError::AccountAlreadyExists);
                    }
                    by_email.remove(previous.email.as_bytes())?;
                    by_email.insert(account.email.as_bytes(), &id.to_be_bytes()[..])?;
                }

                accounts.insert(&id.to_be_bytes()[..], account_json.as_slice())?;
                Ok(())
            });
        result?;

        Ok(account)
    }

    async fn delete(&self, id: u64) -> Result<(), AuthError> {
        let accounts_tree = self.accounts_tree()?;
        let email_tree = self.accounts_by_email_tree()?;

        let result: TransactionResult<(), AuthError> =
            (&accounts_tree, &email_tree).transaction(|(accounts, by_email)| {
                let Some(bytes) = accounts.remove(&id.to_be_bytes()[..])? else {
                    return abort(AuthError::AccountNotFound);
                };
                let account = decode(&bytes)?;
                by_email.remove(account.email.as_bytes())?;
                Ok(())
            });

        Ok(result?)
    }

    async fn email_exists(&self, email: &str) -> Result<bool, AuthError> {
        let email_tree = self.accounts_by_email_tree()?;
        Ok(email_tree.contains_key(email.as_bytes())?)
    }
}
