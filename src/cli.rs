use anyhow::{anyhow, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::time::Duration;

use crate::config::ToasterConfig;
use crate::toast::{LogSurface, ToastAction, ToastPatch, ToastPayload, ToastState, Toaster};

/// Toaster - in-memory toast notification dispatcher
#[derive(Parser)]
#[command(name = "toaster")]
#[command(about = "Drive the toast dispatcher from the command line")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Configuration file path
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Print snapshots as JSON
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a scripted create/update/dismiss scenario
    Demo,

    /// Show a single toast
    Show(ShowArgs),

    /// Print the effective configuration
    Config,
}

#[derive(Args)]
pub struct ShowArgs {
    /// Toast title
    #[arg(long)]
    pub title: String,

    /// Toast description
    #[arg(long)]
    pub description: Option<String>,

    /// Show as a destructive (error) toast
    #[arg(long)]
    pub destructive: bool,

    /// Dismiss the toast after this many milliseconds
    #[arg(long, default_value = "1000")]
    pub dismiss_after: u64,
}

/// Command-line interface handler
pub struct CliHandler {
    config: ToasterConfig,
    json: bool,
}

impl CliHandler {
    /// Create a new CLI handler, loading configuration from `config_path` or the default location
    pub async fn new(config_path: Option<PathBuf>, json: bool) -> Result<Self> {
        let path = match config_path {
            Some(path) => Some(path),
            None => ToasterConfig::default_path(),
        };

        let config = match path {
            Some(path) => ToasterConfig::load_from_file(&path)
                .await
                .map_err(|e| anyhow!("Failed to load config from {}: {}", path.display(), e))?,
            None => ToasterConfig::default(),
        };

        Ok(Self { config, json })
    }

    /// Handle CLI commands
    pub async fn handle_command(&self, command: Commands) -> Result<()> {
        match command {
            Commands::Demo => self.handle_demo().await,
            Commands::Show(args) => self.handle_show(args).await,
            Commands::Config => self.handle_config(),
        }
    }

    fn toaster(&self) -> Toaster {
        Toaster::new(self.config.clone(), Arc::new(LogSurface::new()))
    }

    fn print_snapshot(&self, label: &str, state: &ToastState) -> Result<()> {
        if self.json {
            println!("{}", serde_json::to_string(&state)?);
            return Ok(());
        }

        println!("── {} ({} active)", label, state.len());
        for toast in &state.toasts {
            let marker = if toast.dismissed { "✗" } else { "●" };
            println!(
                "  {} #{} [{:?}] {}{}",
                marker,
                toast.id,
                toast.variant,
                toast.title.as_deref().unwrap_or("(untitled)"),
                toast
                    .description
                    .as_deref()
                    .map(|d| format!(" - {}", d))
                    .unwrap_or_default()
            );
        }
        Ok(())
    }

    async fn handle_demo(&self) -> Result<()> {
        let toaster = self.toaster();
        let mut feed = toaster.use_toasts();

        let renamed = toaster.create(
            ToastPayload::titled("File renamed")
                .description("notes.txt → ideas.txt")
                .action(ToastAction::new("Undo", || {
                    tracing::info!("Undo requested");
                })),
        );
        self.print_snapshot("created", &feed.toasts())?;

        renamed.update(ToastPatch::new().title("File renamed and shared"));
        self.print_snapshot("updated", &feed.toasts())?;

        toaster.create(
            ToastPayload::titled("Delete failed")
                .description("Permission denied")
                .destructive(),
        );
        self.print_snapshot("evicted by newer toast", &feed.toasts())?;

        feed.dismiss(None);
        self.print_snapshot("dismissed", &feed.toasts())?;

        toaster.dispatcher().cancel_all_removals();
        toaster.dispatcher().dispatch(crate::toast::Action::Remove(None));
        if let Some(state) = feed.changed().await {
            self.print_snapshot("removed", &state)?;
        }

        Ok(())
    }

    async fn handle_show(&self, args: ShowArgs) -> Result<()> {
        let toaster = self.toaster();

        let mut payload = ToastPayload::titled(args.title);
        if let Some(description) = args.description {
            payload = payload.description(description);
        }
        if args.destructive {
            payload = payload.destructive();
        }

        let handle = toaster.create(payload);
        self.print_snapshot("shown", &toaster.toasts())?;

        tokio::time::sleep(Duration::from_millis(args.dismiss_after)).await;
        handle.dismiss();
        self.print_snapshot("dismissed", &toaster.toasts())?;

        Ok(())
    }

    fn handle_config(&self) -> Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(&self.config)?);
        } else {
            print!("{}", toml::to_string_pretty(&self.config)?);
        }
        Ok(())
    }
}
