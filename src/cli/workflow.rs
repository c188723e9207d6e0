//! Account and workflow CLI commands

use clap::Subcommand;

use crate::display::{
    format_account_list, format_translation_summary, format_validation, format_workflow,
    format_workflow_list,
};
use crate::error::QuoteResult;
use crate::services::{WorkflowService, WorkflowTranslator};
use crate::storage::Storage;

/// Workflow subcommands
#[derive(Subcommand)]
pub enum WorkflowCommands {
    /// List accounts
    Accounts,

    /// Create an account
    #[command(name = "account-create")]
    AccountCreate { account: String },

    /// Delete an account with its workflows and configuration
    #[command(name = "account-delete")]
    AccountDelete { account: String },

    /// Rename an account
    #[command(name = "account-rename")]
    AccountRename { account: String, new_name: String },

    /// List an account's workflows
    List { account: String },

    /// Show a workflow's services
    Show { account: String, workflow: String },

    /// Create a workflow from master service names
    Create {
        account: String,
        workflow: String,
        #[arg(required = true)]
        services: Vec<String>,
    },

    /// Replace a workflow's services
    Update {
        account: String,
        workflow: String,
        #[arg(required = true)]
        services: Vec<String>,
    },

    /// Delete a workflow
    Delete { account: String, workflow: String },

    /// Rename a workflow
    Rename {
        account: String,
        workflow: String,
        new_name: String,
    },

    /// Copy a workflow into another account
    Clone {
        account: String,
        workflow: String,
        target_account: String,
        /// Store the copy under another name
        #[arg(long)]
        name: Option<String>,
    },

    /// Show a workflow in an entity's vocabulary
    Translate {
        account: String,
        workflow: String,
        entity: String,
    },

    /// Check that every service of a workflow maps into an entity
    Validate {
        account: String,
        workflow: String,
        entity: String,
    },
}

/// Handle a workflow command
pub fn handle_workflow_command(storage: &Storage, cmd: WorkflowCommands) -> QuoteResult<()> {
    let service = WorkflowService::new(storage);

    match cmd {
        WorkflowCommands::Accounts => {
            print!("{}", format_account_list(&service.account_summaries()?));
        }

        WorkflowCommands::AccountCreate { account } => {
            service.create_account(&account)?;
            println!("Created account: {}", account.trim());
        }

        WorkflowCommands::AccountDelete { account } => {
            let removed = service.delete_account(&account)?;
            println!("Deleted account: {} ({} workflows)", account, removed.len());
        }

        WorkflowCommands::AccountRename { account, new_name } => {
            service.rename_account(&account, &new_name)?;
            println!("Renamed account: {} -> {}", account, new_name.trim());
        }

        WorkflowCommands::List { account } => {
            println!("{}", format_workflow_list(&account, &service.list(&account)?));
        }

        WorkflowCommands::Show { account, workflow } => {
            print!("{}", format_workflow(&account, &workflow, &service.get(&account, &workflow)?));
        }

        WorkflowCommands::Create {
            account,
            workflow,
            services,
        } => {
            service.create(&account, &workflow, services)?;
            println!("Created workflow: {}", workflow.trim());
        }

        WorkflowCommands::Update {
            account,
            workflow,
            services,
        } => {
            service.update(&account, &workflow, services)?;
            println!("Updated workflow: {}", workflow);
        }

        WorkflowCommands::Delete { account, workflow } => {
            service.delete(&account, &workflow)?;
            println!("Deleted workflow: {}", workflow);
        }

        WorkflowCommands::Rename {
            account,
            workflow,
            new_name,
        } => {
            service.rename(&account, &workflow, &new_name)?;
            println!("Renamed workflow: {} -> {}", workflow, new_name.trim());
        }

        WorkflowCommands::Clone {
            account,
            workflow,
            target_account,
            name,
        } => {
            let stored = service.clone_to(&account, &workflow, &target_account, name.as_deref())?;
            println!("Cloned {} into {} as {}", workflow, target_account, stored);
        }

        WorkflowCommands::Translate {
            account,
            workflow,
            entity,
        } => {
            let services = service.get(&account, &workflow)?;
            let catalog = storage.catalog.snapshot()?;
            let mappings = storage.mappings.snapshot()?;
            let translator = WorkflowTranslator::new(&catalog, &mappings);
            let results = translator.translate_workflow(&services, &entity, true);
            println!(
                "{}",
                format_translation_summary(translator.master_entity(), &entity, &results)
            );
        }

        WorkflowCommands::Validate {
            account,
            workflow,
            entity,
        } => {
            let services = service.get(&account, &workflow)?;
            let catalog = storage.catalog.snapshot()?;
            let mappings = storage.mappings.snapshot()?;
            let (_, unmapped) =
                WorkflowTranslator::new(&catalog, &mappings).validate_workflow(&services, &entity);
            print!("{}", format_validation(&entity, &unmapped));
        }
    }

    Ok(())
}
