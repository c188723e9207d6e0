//! Workflow templates
//!
//! A workflow is a named, ordered list of master service names owned by an
//! account. The book holds every account's workflows.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{QuoteError, QuoteResult};

pub type Workflows = BTreeMap<String, Vec<String>>;

/// Summary of one account
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccountSummary {
    pub name: String,
    pub workflow_count: usize,
    pub workflows: Vec<String>,
}

/// All accounts and their workflows
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkflowBook {
    accounts: BTreeMap<String, Workflows>,
}

fn duplicate(entity_type: &'static str, identifier: &str) -> QuoteError {
    QuoteError::Duplicate {
        entity_type,
        identifier: identifier.to_string(),
    }
}

fn validate_name(kind: &str, name: &str) -> QuoteResult<()> {
    if name.trim().is_empty() {
        return Err(QuoteError::Validation(format!("{} name cannot be empty", kind)));
    }
    Ok(())
}

impl WorkflowBook {
    pub fn accounts(&self) -> Vec<String> {
        self.accounts.keys().cloned().collect()
    }

    pub fn has_account(&self, account: &str) -> bool {
        self.accounts.contains_key(account)
    }

    fn account(&self, account: &str) -> QuoteResult<&Workflows> {
        self.accounts
            .get(account)
            .ok_or_else(|| QuoteError::account_not_found(account))
    }

    fn account_mut(&mut self, account: &str) -> QuoteResult<&mut Workflows> {
        self.accounts
            .get_mut(account)
            .ok_or_else(|| QuoteError::account_not_found(account))
    }

    pub fn create_account(&mut self, account: &str) -> QuoteResult<()> {
        validate_name("Account", account)?;
        if self.has_account(account) {
            return Err(duplicate("Account", account));
        }
        self.accounts.insert(account.to_string(), Workflows::new());
        Ok(())
    }

    /// Delete an account with all its workflows, returning them
    pub fn delete_account(&mut self, account: &str) -> QuoteResult<Workflows> {
        self.accounts
            .remove(account)
            .ok_or_else(|| QuoteError::account_not_found(account))
    }

    pub fn rename_account(&mut self, old: &str, new: &str) -> QuoteResult<()> {
        validate_name("Account", new)?;
        if !self.has_account(old) {
            return Err(QuoteError::account_not_found(old));
        }
        if self.has_account(new) {
            return Err(duplicate("Account", new));
        }
        if let Some(workflows) = self.accounts.remove(old) {
            self.accounts.insert(new.to_string(), workflows);
        }
        Ok(())
    }

    /// Workflows of an account; empty for an unknown account
    pub fn workflows(&self, account: &str) -> Workflows {
        self.accounts.get(account).cloned().unwrap_or_default()
    }

    /// Services of one workflow, if both account and workflow exist
    pub fn workflow_services(&self, account: &str, workflow: &str) -> Option<&[String]> {
        self.accounts
            .get(account)
            .and_then(|w| w.get(workflow))
            .map(Vec::as_slice)
    }

    pub fn create_workflow(
        &mut self,
        account: &str,
        workflow: &str,
        services: Vec<String>,
    ) -> QuoteResult<()> {
        validate_name("Workflow", workflow)?;
        let workflows = self.account_mut(account)?;
        if workflows.contains_key(workflow) {
            return Err(duplicate("Workflow", workflow));
        }
        workflows.insert(workflow.to_string(), services);
        Ok(())
    }

    /// Replace a workflow's services, returning the previous list
    pub fn update_workflow(
        &mut self,
        account: &str,
        workflow: &str,
        services: Vec<String>,
    ) -> QuoteResult<Vec<String>> {
        let slot = self
            .account_mut(account)?
            .get_mut(workflow)
            .ok_or_else(|| QuoteError::workflow_not_found(workflow))?;
        Ok(std::mem::replace(slot, services))
    }

    pub fn delete_workflow(&mut self, account: &str, workflow: &str) -> QuoteResult<Vec<String>> {
        self.account_mut(account)?
            .remove(workflow)
            .ok_or_else(|| QuoteError::workflow_not_found(workflow))
    }

    pub fn rename_workflow(&mut self, account: &str, old: &str, new: &str) -> QuoteResult<()> {
        validate_name("Workflow", new)?;
        let workflows = self.account_mut(account)?;
        if !workflows.contains_key(old) {
            return Err(QuoteError::workflow_not_found(old));
        }
        if workflows.contains_key(new) {
            return Err(duplicate("Workflow", new));
        }
        if let Some(services) = workflows.remove(old) {
            workflows.insert(new.to_string(), services);
        }
        Ok(())
    }

    /// Copy a workflow into another account, keeping its name unless a new one is given
    ///
    /// Returns the name it was stored under.
    pub fn clone_workflow(
        &mut self,
        source_account: &str,
        workflow: &str,
        target_account: &str,
        new_name: Option<&str>,
    ) -> QuoteResult<String> {
        let services = self
            .account(source_account)?
            .get(workflow)
            .cloned()
            .ok_or_else(|| QuoteError::workflow_not_found(workflow))?;

        let target_name = new_name.unwrap_or(workflow).to_string();
        self.create_workflow(target_account, &target_name, services)?;
        Ok(target_name)
    }

    pub fn account_summary(&self, account: &str) -> Option<AccountSummary> {
        self.accounts.get(account).map(|workflows| AccountSummary {
            name: account.to_string(),
            workflow_count: workflows.len(),
            workflows: workflows.keys().cloned().collect(),
        })
    }

    pub fn all_summaries(&self) -> Vec<AccountSummary> {
        self.accounts
            .keys()
            .filter_map(|name| self.account_summary(name))
            .collect()
    }
}
