//! Mapping CLI commands

use clap::Subcommand;

use crate::display::format_mapping_table;
use crate::error::QuoteResult;
use crate::services::MappingService;
use crate::storage::Storage;

/// Mapping subcommands
#[derive(Subcommand)]
pub enum MappingCommands {
    /// Show an entity's mapping table
    Show {
        /// Entity name
        entity: String,
    },

    /// Map an entity service to a master service
    Set {
        entity: String,
        entity_service: String,
        master_service: String,
    },

    /// Remove an entity service's mapping
    Remove {
        entity: String,
        entity_service: String,
    },

    /// Translate a service name from one entity to another
    Translate {
        from: String,
        to: String,
        name: String,
    },

    /// Entity services without a mapping
    Unmapped {
        entity: String,
    },

    /// Master services nothing in the entity maps to
    Gaps {
        entity: String,
    },

    /// Seed an entity's table by catalog position
    Seed {
        entity: String,
    },
}

fn print_list(empty: &str, names: &[String]) {
    if names.is_empty() {
        println!("{}", empty);
    }
    for name in names {
        println!("  {}", name);
    }
}

/// Handle a mapping command
pub fn handle_mapping_command(storage: &Storage, cmd: MappingCommands) -> QuoteResult<()> {
    let service = MappingService::new(storage);

    match cmd {
        MappingCommands::Show { entity } => {
            println!("{}", format_mapping_table(&entity, &service.entity_table(&entity)?));
        }

        MappingCommands::Set {
            entity,
            entity_service,
            master_service,
        } => {
            service.set_mapping(&entity, &entity_service, &master_service)?;
            println!("{}: {} -> {}", entity, entity_service, master_service);
        }

        MappingCommands::Remove {
            entity,
            entity_service,
        } => {
            if service.remove_mapping(&entity, &entity_service)? {
                println!("Removed mapping for {} in {}", entity_service, entity);
            } else {
                println!("No mapping for {} in {}", entity_service, entity);
            }
        }

        MappingCommands::Translate { from, to, name } => {
            match service.translate_service(&from, &to, &name)? {
                Some(translated) => println!("{}", translated),
                None => println!("No translation for '{}' from {} to {}", name, from, to),
            }
        }

        MappingCommands::Unmapped { entity } => {
            print_list(
                "Every service is mapped.",
                &service.get_unmapped_services(&entity)?,
            );
        }

        MappingCommands::Gaps { entity } => {
            print_list(
                "Every master service is covered.",
                &service.sync_entity_to_master(&entity)?,
            );
        }

        MappingCommands::Seed { entity } => {
            let pairs = service.create_entity_mappings(&entity)?;
            println!("Seeded {} mapping(s) for {}:", pairs.len(), entity);
            for (entity_service, master_service) in pairs {
                println!("  {} -> {}", entity_service, master_service);
            }
        }
    }

    Ok(())
}
