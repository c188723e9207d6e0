//! Entity CLI commands
//!
//! Listing, creating and deleting entities and extending their catalogs.

use clap::Subcommand;

use crate::display::{format_entity_details, format_entity_list, format_sync_status};
use crate::error::{QuoteError, QuoteResult};
use crate::models::{Service, UnitOfMeasure};
use crate::services::{CatalogService, MappingService};
use crate::storage::Storage;

/// Entity subcommands
#[derive(Subcommand)]
pub enum EntityCommands {
    /// List all entities
    List,

    /// Show an entity's services and their master mapping
    Show {
        /// Entity name
        entity: String,
    },

    /// Create a new entity and seed its mappings by position
    Create {
        /// Entity name (letters and digits, stored upper-case)
        entity: String,
        /// Copy the services of an existing entity
        #[arg(long)]
        copy_from: Option<String>,
    },

    /// Delete an entity and its mapping table
    Delete {
        /// Entity name
        entity: String,
        /// Required to confirm the deletion
        #[arg(long)]
        force: bool,
    },

    /// Append a service to an entity's catalog
    #[command(name = "add-service")]
    AddService {
        /// Entity name
        entity: String,
        /// Service group 1
        group1: String,
        /// Service group 2 (may be empty)
        group2: String,
        /// Service name
        name: String,
        /// Unit of measure (Word, Hour, Fee)
        uom: String,
    },

    /// Compare every entity with the master catalog
    Status,

    /// Append missing master services to every entity
    Sync,
}

/// Handle an entity command
pub fn handle_entity_command(storage: &Storage, cmd: EntityCommands) -> QuoteResult<()> {
    let service = CatalogService::new(storage);
    let mapper = MappingService::new(storage);

    match cmd {
        EntityCommands::List => {
            let entities = service.list()?;
            print!("{}", format_entity_list(&entities, &mapper.master_entity()?));
        }

        EntityCommands::Show { entity } => {
            let found = service.get(&entity)?;
            let table = if entity == mapper.master_entity()? {
                None
            } else {
                Some(mapper.entity_table(&entity)?)
            };
            print!("{}", format_entity_details(&found, table.as_ref()));
        }

        EntityCommands::Create { entity, copy_from } => {
            let created = service.create_entity(&entity, copy_from.as_deref())?;
            println!(
                "Created entity: {} ({} services)",
                created.name, created.service_count
            );
            if !created.seeded.is_empty() {
                println!("Seeded mappings by position, please review:");
                for (entity_service, master_service) in &created.seeded {
                    println!("  {} -> {}", entity_service, master_service);
                }
            }
        }

        EntityCommands::Delete { entity, force } => {
            if !force {
                return Err(QuoteError::Validation(format!(
                    "Deleting {} also removes its mapping table; pass --force to confirm",
                    entity
                )));
            }
            let removed = service.delete_entity(&entity)?;
            println!("Deleted entity: {}", removed.name);
        }

        EntityCommands::AddService {
            entity,
            group1,
            group2,
            name,
            uom,
        } => {
            let new_service = Service::new(group1, group2, name, UnitOfMeasure::parse(&uom));
            let name = new_service.name.clone();
            let updated = service.add_service(&entity, new_service)?;
            println!("Added service '{}' to {}", name, entity.to_ascii_uppercase());
            if !updated.is_empty() {
                println!("Identity-mapped into: {}", updated.join(", "));
            }
        }

        EntityCommands::Status => {
            print!("{}", format_sync_status(&service.sync_status()?));
        }

        EntityCommands::Sync => {
            let added = service.sync_all()?;
            if added.is_empty() {
                println!("All entities already in sync.");
            }
            for (entity, services) in added {
                println!("{}: added {}", entity, services.join(", "));
            }
        }
    }

    Ok(())
}
