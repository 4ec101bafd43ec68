//! Implementation of the `prmend init` command.

use anyhow::{Context, Result};
use std::path::PathBuf;
use tokio::fs;

use crate::cli::output::{output, CommandOutput};
use crate::cli::types::InitArgs;
use crate::domain::models::Config;
use crate::infrastructure::database::DatabaseConnection;

#[derive(Debug, serde::Serialize)]
pub struct InitOutput {
    pub success: bool,
    pub message: String,
    pub config_path: PathBuf,
    pub database_initialized: bool,
}

impl CommandOutput for InitOutput {
    fn to_human(&self) -> String {
        let mut lines = vec![self.message.clone()];
        if self.database_initialized {
            lines.push("Database initialized at .prmend/prmend.db".to_string());
        }
        lines.join("\n")
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub async fn execute(args: InitArgs, json_mode: bool) -> Result<()> {
    let prmend_dir = PathBuf::from(".prmend");
    let config_path = prmend_dir.join("config.yaml");

    if config_path.exists() && !args.force {
        let output_data = InitOutput {
            success: false,
            message: "Project already initialized. Use --force to reinitialize.".to_string(),
            config_path,
            database_initialized: false,
        };
        output(&output_data, json_mode);
        return Ok(());
    }

    fs::create_dir_all(&prmend_dir)
        .await
        .context("Failed to create .prmend directory")?;

    let defaults =
        serde_yaml::to_string(&Config::default()).context("Failed to render default config")?;
    fs::write(&config_path, defaults)
        .await
        .context("Failed to write config.yaml")?;

    let db_path = prmend_dir.join("prmend.db");
    let db_url = format!("sqlite:{}", db_path.display());
    let db = DatabaseConnection::new(&db_url)
        .await
        .context("Failed to initialize database")?;
    db.migrate().await.context("Failed to run migrations")?;
    db.close().await;

    let output_data = InitOutput {
        success: true,
        message: if args.force {
            "Project reinitialized successfully.".to_string()
        } else {
            "Project initialized successfully.".to_string()
        },
        config_path,
        database_initialized: true,
    };
    output(&output_data, json_mode);
    Ok(())
}
