//! Workflow template store
//!
//! Accounts own named, ordered lists of master service names. Every change
//! is persisted and audited; an account's service configuration follows it
//! through renames and deletes.

use crate::audit::EntityType;
use crate::error::{QuoteError, QuoteResult};
use crate::models::{AccountConfig, AccountSummary, Workflows};
use crate::storage::Storage;

/// Service for accounts and their workflows
pub struct WorkflowService<'a> {
    storage: &'a Storage,
}

impl<'a> WorkflowService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    pub fn accounts(&self) -> QuoteResult<Vec<String>> {
        self.storage.workflows.read(|book| book.accounts())
    }

    pub fn account_summaries(&self) -> QuoteResult<Vec<AccountSummary>> {
        self.storage.workflows.read(|book| book.all_summaries())
    }

    pub fn account_summary(&self, account: &str) -> QuoteResult<AccountSummary> {
        self.storage
            .workflows
            .read(|book| book.account_summary(account))?
            .ok_or_else(|| QuoteError::account_not_found(account))
    }

    pub fn create_account(&self, account: &str) -> QuoteResult<()> {
        let account = account.trim();
        self.storage
            .workflows
            .modify(|book| book.create_account(account))?;
        self.storage.log_create(
            EntityType::Account,
            account,
            Some(account.to_string()),
            &Workflows::new(),
        )
    }

    /// Delete an account, its workflows and its service configuration
    pub fn delete_account(&self, account: &str) -> QuoteResult<Workflows> {
        let removed = self
            .storage
            .workflows
            .modify(|book| book.delete_account(account))?;
        self.storage
            .service_config
            .modify(|doc| Ok(doc.accounts.remove(account)))?;

        self.storage.log_delete(
            EntityType::Account,
            account,
            Some(account.to_string()),
            &removed,
        )?;
        Ok(removed)
    }

    pub fn rename_account(&self, old: &str, new: &str) -> QuoteResult<()> {
        let new = new.trim();
        self.storage
            .workflows
            .modify(|book| book.rename_account(old, new))?;
        self.storage.service_config.modify(|doc| {
            if let Some(config) = doc.accounts.remove(old) {
                doc.accounts.insert(new.to_string(), config);
            }
            Ok(())
        })?;

        self.storage.log_update(
            EntityType::Account,
            new,
            Some(new.to_string()),
            &old,
            &new,
            Some(format!("renamed {} -> {}", old, new)),
        )
    }

    /// Workflows of an account
    pub fn list(&self, account: &str) -> QuoteResult<Workflows> {
        self.storage.workflows.read(|book| {
            if book.has_account(account) {
                Ok(book.workflows(account))
            } else {
                Err(QuoteError::account_not_found(account))
            }
        })?
    }

    /// Services of one workflow
    pub fn get(&self, account: &str, workflow: &str) -> QuoteResult<Vec<String>> {
        self.storage.workflows.read(|book| {
            if !book.has_account(account) {
                return Err(QuoteError::account_not_found(account));
            }
            book.workflow_services(account, workflow)
                .map(<[String]>::to_vec)
                .ok_or_else(|| QuoteError::workflow_not_found(workflow))
        })?
    }

    pub fn create(&self, account: &str, workflow: &str, services: Vec<String>) -> QuoteResult<()> {
        let workflow = workflow.trim();
        self.storage
            .workflows
            .modify(|book| book.create_workflow(account, workflow, services.clone()))?;
        self.storage.log_create(
            EntityType::Workflow,
            format!("{}/{}", account, workflow),
            Some(workflow.to_string()),
            &services,
        )
    }

    /// Replace a workflow's services
    pub fn update(&self, account: &str, workflow: &str, services: Vec<String>) -> QuoteResult<()> {
        let previous = self
            .storage
            .workflows
            .modify(|book| book.update_workflow(account, workflow, services.clone()))?;
        self.storage.log_update(
            EntityType::Workflow,
            format!("{}/{}", account, workflow),
            Some(workflow.to_string()),
            &previous,
            &services,
            Some(format!("{} -> {} services", previous.len(), services.len())),
        )
    }

    pub fn delete(&self, account: &str, workflow: &str) -> QuoteResult<Vec<String>> {
        let removed = self
            .storage
            .workflows
            .modify(|book| book.delete_workflow(account, workflow))?;
        self.storage.log_delete(
            EntityType::Workflow,
            format!("{}/{}", account, workflow),
            Some(workflow.to_string()),
            &removed,
        )?;
        Ok(removed)
    }

    pub fn rename(&self, account: &str, old: &str, new: &str) -> QuoteResult<()> {
        let new = new.trim();
        self.storage
            .workflows
            .modify(|book| book.rename_workflow(account, old, new))?;
        self.storage.log_update(
            EntityType::Workflow,
            format!("{}/{}", account, new),
            Some(new.to_string()),
            &old,
            &new,
            Some(format!("renamed {} -> {}", old, new)),
        )
    }

    /// Copy a workflow into another account; returns the name it was stored under
    pub fn clone_to(
        &self,
        account: &str,
        workflow: &str,
        target_account: &str,
        new_name: Option<&str>,
    ) -> QuoteResult<String> {
        let stored = self.storage.workflows.modify(|book| {
            book.clone_workflow(account, workflow, target_account, new_name)
        })?;
        let services = self.get(target_account, &stored)?;
        self.storage.log_create(
            EntityType::Workflow,
            format!("{}/{}", target_account, stored),
            Some(stored.clone()),
            &services,
        )?;
        Ok(stored)
    }

    /// Service configuration of an account (defaults when it has none)
    pub fn account_config(&self, account: &str) -> QuoteResult<AccountConfig> {
        self.storage.service_config.read(|doc| doc.account(account))
    }

    pub fn save_account_config(&self, account: &str, config: AccountConfig) -> QuoteResult<()> {
        let previous = self
            .storage
            .service_config
            .modify(|doc| Ok(doc.accounts.insert(account.to_string(), config.clone())))?;
        match previous {
            Some(before) => self.storage.log_update(
                EntityType::ServiceConfig,
                account,
                Some(account.to_string()),
                &before,
                &config,
                None,
            ),
            None => self.storage.log_create(
                EntityType::ServiceConfig,
                account,
                Some(account.to_string()),
                &config,
            ),
        }
    }
}
