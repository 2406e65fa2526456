use std::io;
use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use crate::entity::EntityKind;
use crate::error::Result;
use crate::types::EntityId;

/// Shared `--json` switch
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputOptions {
    pub json: bool,
}

#[derive(Parser)]
#[command(name = "intered")]
#[command(about = "Admin client for the InterEd recruitment dashboard")]
#[command(version)]
pub struct Cli {
    /// Serve collections from a JSON file instead of the API
    /// (mutations are not persisted)
    #[arg(long, global = true, env = "INTERED_FIXTURES", value_name = "FILE")]
    pub fixtures: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List a collection, one page at a time
    #[command(visible_alias = "l")]
    Ls {
        /// Entity collection (students, agents, universities, ...)
        entity: EntityKind,

        /// Case-insensitive text search over name-like fields
        #[arg(short, long)]
        search: Option<String>,

        /// Status/stage tab, or "all"
        #[arg(short, long)]
        tab: Option<String>,

        /// Page number (1-based, clamped to the last page)
        #[arg(short, long, value_parser = parse_positive)]
        page: Option<usize>,

        /// Rows per page (default from list.page_size)
        #[arg(long, value_parser = parse_positive)]
        page_size: Option<usize>,

        /// Render cards instead of a table
        #[arg(long)]
        cards: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show one record with its references resolved
    #[command(visible_alias = "s")]
    Show {
        entity: EntityKind,

        #[arg(value_parser = parse_entity_id)]
        id: EntityId,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Create a record
    #[command(visible_alias = "c")]
    Create {
        entity: EntityKind,

        /// Field assignment, e.g. --set email=ana@example.com (repeatable)
        #[arg(long = "set", value_name = "FIELD=VALUE")]
        assignments: Vec<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Update a record; unassigned fields keep their values
    #[command(visible_alias = "u")]
    Update {
        entity: EntityKind,

        #[arg(value_parser = parse_entity_id)]
        id: EntityId,

        /// Field assignment, e.g. --set stage=offer (repeatable)
        #[arg(long = "set", value_name = "FIELD=VALUE")]
        assignments: Vec<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Delete one or more records
    #[command(visible_alias = "rm")]
    Delete {
        entity: EntityKind,

        #[arg(required = true, value_parser = parse_entity_id)]
        ids: Vec<EntityId>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Count records per status/stage
    Stats {
        entity: EntityKind,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the local log of successful mutations
    Events {
        #[command(subcommand)]
        action: Option<EventsAction>,

        /// Number of most recent events to show
        #[arg(short = 'n', long, default_value = "20")]
        limit: usize,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for [possible values: bash, zsh, fish, powershell, elvish]
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum EventsAction {
    /// Clear the event log
    Prune {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Set a configuration value (api.url, api.token, api.timeout, list.page_size)
    Set {
        key: String,
        value: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Get a configuration value
    Get {
        key: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    /// Execute the command, dispatching to the appropriate handler.
    pub async fn run(self) -> Result<()> {
        use crate::commands::{
            AppContext, LsOptions, cmd_config_get, cmd_config_set, cmd_config_show, cmd_create,
            cmd_delete, cmd_events, cmd_events_prune, cmd_ls, cmd_show, cmd_stats, cmd_update,
            parse_assignments,
        };
        use crate::events::EventLog;
        use crate::with_entity;

        let fixtures = self.fixtures;
        let context = || AppContext::load(fixtures.as_deref());

        match self.command {
            Commands::Ls {
                entity,
                search,
                tab,
                page,
                page_size,
                cards,
                json,
            } => {
                let ctx = context()?;
                let opts = LsOptions {
                    search,
                    tab,
                    page,
                    page_size,
                    cards,
                };
                with_entity!(entity, E => cmd_ls::<E>(&ctx, &opts, OutputOptions { json }).await)
            }
            Commands::Show { entity, id, json } => {
                let ctx = context()?;
                with_entity!(entity, E => cmd_show::<E>(&ctx, id, OutputOptions { json }).await)
            }
            Commands::Create {
                entity,
                assignments,
                json,
            } => {
                let assignments = parse_assignments(&assignments)?;
                let ctx = context()?;
                with_entity!(entity, E => {
                    cmd_create::<E>(&ctx, &assignments, OutputOptions { json }).await
                })
            }
            Commands::Update {
                entity,
                id,
                assignments,
                json,
            } => {
                let assignments = parse_assignments(&assignments)?;
                let ctx = context()?;
                with_entity!(entity, E => {
                    cmd_update::<E>(&ctx, id, &assignments, OutputOptions { json }).await
                })
            }
            Commands::Delete { entity, ids, json } => {
                let ctx = context()?;
                with_entity!(entity, E => cmd_delete::<E>(&ctx, &ids, OutputOptions { json }).await)
            }
            Commands::Stats { entity, json } => {
                let ctx = context()?;
                with_entity!(entity, E => cmd_stats::<E>(&ctx, OutputOptions { json }).await)
            }
            Commands::Events {
                action,
                limit,
                json,
            } => {
                let log = EventLog::default_location();
                match action {
                    Some(EventsAction::Prune { json }) => {
                        cmd_events_prune(&log, OutputOptions { json })
                    }
                    None => cmd_events(&log, limit, OutputOptions { json }),
                }
            }
            Commands::Config { action } => match action {
                ConfigAction::Show { json } => cmd_config_show(OutputOptions { json }),
                ConfigAction::Set { key, value, json } => {
                    cmd_config_set(&key, &value, OutputOptions { json })
                }
                ConfigAction::Get { key, json } => cmd_config_get(&key, OutputOptions { json }),
            },
            Commands::Completions { shell } => {
                generate_completions(shell);
                Ok(())
            }
        }
    }
}

fn parse_entity_id(s: &str) -> std::result::Result<EntityId, String> {
    s.parse().map_err(|e: crate::error::InterEdError| e.to_string())
}

fn parse_positive(s: &str) -> std::result::Result<usize, String> {
    match s.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(format!("Invalid value '{s}'. Must be a positive integer")),
    }
}

pub fn generate_completions(shell: Shell) {
    let mut cmd = Cli::command();
    clap_complete::generate(shell, &mut cmd, "intered", &mut io::stdout());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_positive() {
        assert_eq!(parse_positive("3").unwrap(), 3);
        assert!(parse_positive("0").is_err());
        assert!(parse_positive("-1").is_err());
        assert!(parse_positive("two").is_err());
    }

    #[test]
    fn test_parse_entity_id_error_message() {
        assert_eq!(parse_entity_id("#12").unwrap(), EntityId::new(12));
        let err = parse_entity_id("abc").unwrap_err();
        assert!(err.contains("positive integer"), "got: {err}");
    }

    #[test]
    fn test_parse_ls_with_singular_alias() {
        let cli = Cli::try_parse_from([
            "intered", "ls", "student", "--tab", "offer", "--page", "2",
        ])
        .unwrap();
        match cli.command {
            Commands::Ls {
                entity, tab, page, ..
            } => {
                assert_eq!(entity, EntityKind::Students);
                assert_eq!(tab.as_deref(), Some("offer"));
                assert_eq!(page, Some(2));
            }
            _ => panic!("expected ls"),
        }
    }

    #[test]
    fn test_delete_requires_an_id() {
        assert!(Cli::try_parse_from(["intered", "delete", "agents"]).is_err());
        assert!(Cli::try_parse_from(["intered", "delete", "agents", "1", "2"]).is_ok());
    }
}
