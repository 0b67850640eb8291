//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, OutputFormat, WebhookCommands};
use crate::client::{CachingClient, FetchOptions, WriteOptions};
use crate::config::ClientConfig;
use crate::error::{Error, Result, ResultExt};
use crate::matcher::match_record_ids;
use crate::records::FlatRow;
use crate::types::{JsonValue, ProcessMode};
use serde::Serialize;
use serde_json::json;
use std::fs;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Fetch {
                table,
                view,
                fields,
                formula,
                max_records,
                page_size,
                via_cache,
            } => {
                let mut options = FetchOptions::new().process(self.process_mode());
                options.view.clone_from(view);
                options.fields.clone_from(fields);
                options.filter_by_formula.clone_from(formula);
                options.max_records = *max_records;
                options.page_size = *page_size;
                if *via_cache {
                    options = options.via_cache();
                }
                let records = self.client()?.fetch(table, &options).await?;
                self.output(&records)
            }
            Commands::Create { table, input } => {
                let data = read_input(input)?;
                let options = WriteOptions::new().process(self.process_mode());
                let created = self.client()?.create(table, data, &options).await?;
                self.output(&created)
            }
            Commands::Update {
                table,
                input,
                keep_none,
            } => {
                let data = read_input(input)?;
                let options = WriteOptions::new()
                    .process(self.process_mode())
                    .keep_none(*keep_none);
                let updated = self.client()?.update(table, data, &options).await?;
                self.output(&updated)
            }
            Commands::Delete { table, ids } => {
                let deleted = self.client()?.delete(table, ids, None).await?;
                self.output(&deleted)
            }
            Commands::Match {
                without_ids,
                with_ids,
                keys,
            } => {
                let incoming = read_rows(without_ids)?;
                let known = read_rows(with_ids)?;
                let outcome = match_record_ids(incoming, &known, keys)?;
                self.output(&outcome)
            }
            Commands::Webhooks { command } => self.webhooks(command).await,
        }
    }

    async fn webhooks(&self, command: &WebhookCommands) -> Result<()> {
        let client = self.client()?;
        let base = client
            .default_base()
            .map(str::to_string)
            .ok_or_else(|| Error::missing_field("base"))?;
        let webhooks = client.webhooks()?;

        match command {
            WebhookCommands::List => self.output(&webhooks.list(&base).await?),
            WebhookCommands::Create {
                spec,
                notification_url,
            } => {
                let specification = read_input(spec)?;
                let created = webhooks
                    .create(&base, &specification, notification_url.as_deref())
                    .await?;
                self.output(&created)
            }
            WebhookCommands::Delete { id } => {
                webhooks.delete(&base, id).await?;
                self.output(&json!({ "id": id, "deleted": true }))
            }
            WebhookCommands::Payloads { id, cursor, limit } => {
                self.output(&webhooks.payloads(&base, id, *cursor, *limit).await?)
            }
            WebhookCommands::Refresh { id } => self.output(&webhooks.refresh(&base, id).await?),
            WebhookCommands::Notifications { id, disable } => {
                webhooks.set_notifications(&base, id, !disable).await?;
                self.output(&json!({ "id": id, "enable": !disable }))
            }
        }
    }

    /// Load configuration from the file, the environment and flags
    fn load_config(&self) -> Result<ClientConfig> {
        let mut config = match &self.cli.config {
            Some(path) => ClientConfig::from_file(path)?.with_env(),
            None => ClientConfig::from_env(),
        };
        if let Some(base) = &self.cli.base {
            config.base = Some(base.clone());
        }
        debug!("Loaded config: {:?}", config);
        Ok(config)
    }

    fn client(&self) -> Result<CachingClient> {
        CachingClient::new(&self.load_config()?)
    }

    fn process_mode(&self) -> ProcessMode {
        if self.cli.process {
            ProcessMode::Processed
        } else if self.cli.raw {
            ProcessMode::Raw
        } else {
            ProcessMode::Inherit
        }
    }

    /// Output a result
    fn output<T: Serialize>(&self, value: &T) -> Result<()> {
        let text = match self.cli.format {
            OutputFormat::Json => serde_json::to_string(value)?,
            OutputFormat::Pretty => serde_json::to_string_pretty(value)?,
        };
        println!("{text}");
        Ok(())
    }
}

/// Read JSON from a file, or from stdin for `-`
fn read_input(source: &str) -> Result<JsonValue> {
    let content = if source == "-" {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read stdin")?;
        buffer
    } else {
        read_file(Path::new(source))?
    };
    serde_json::from_str(&content).map_err(|e| Error::decode(format!("invalid JSON input: {e}")))
}

fn read_rows(path: &Path) -> Result<Vec<FlatRow>> {
    let content = read_file(path)?;
    serde_json::from_str(&content)
        .map_err(|e| Error::decode(format!("expected a list of rows in {}: {e}", path.display())))
}

fn read_file(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(Error::FileNotFound {
            path: path.display().to_string(),
        });
    }
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}
