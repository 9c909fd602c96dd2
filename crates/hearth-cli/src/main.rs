//! `hearth` — terminal front-end for family-member records.
//!
//! # Usage
//!
//! ```
//! hearth                                   # interactive table
//! hearth --url http://localhost:3000/api/v1 list --html
//! hearth add --first-name Ada --last-name Lovelace --age 36 --relationship Aunt
//! hearth --config ~/.config/hearth/config.toml delete 4
//! ```

mod app;
mod client;
mod controller;
mod markup;
mod ui;

use std::{
  fs::OpenOptions,
  io,
  path::{Path, PathBuf},
  sync::{Arc, Mutex},
  time::Duration,
};

use anyhow::{Context, Result, anyhow};
use app::App;
use clap::{Args as ClapArgs, Parser, Subcommand};
use client::{ApiClient, ApiConfig, DEFAULT_BASE_URL};
use controller::{Controller, Status};
use crossterm::{
  event::{self, Event},
  execute,
  terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use hearth_core::{Field, RecordId, RecordStore};
use ratatui::{Terminal, backend::CrosstermBackend};
use serde::Deserialize;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "hearth", about = "Terminal front-end for family-member records")]
struct Args {
  /// Path to a TOML config file (url, timeout_secs).
  #[arg(short, long, value_name = "FILE")]
  config: Option<PathBuf>,

  /// Base URL the `familyMembers` collection hangs off.
  #[arg(long, env = "HEARTH_URL")]
  url: Option<String>,

  /// Per-request timeout in seconds.
  #[arg(long, value_name = "SECS")]
  timeout: Option<u64>,

  /// Append logs to this file. Without it the interactive UI logs nothing.
  #[arg(long, value_name = "FILE")]
  log_file: Option<PathBuf>,

  #[command(subcommand)]
  command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Print every record, newest first.
  List {
    /// Emit `<tbody>` rows instead of a text table.
    #[arg(long, conflicts_with = "json")]
    html: bool,
    /// Emit the records as a JSON array.
    #[arg(long)]
    json: bool,
  },
  /// Print one record as JSON.
  Show { id: String },
  /// Create a record.
  Add(FieldArgs),
  /// Change fields of an existing record; unspecified fields are kept.
  Edit {
    id: String,
    #[command(flatten)]
    fields: FieldArgs,
  },
  /// Delete a record.
  Delete { id: String },
}

#[derive(ClapArgs, Debug, Default)]
struct FieldArgs {
  #[arg(long)]
  first_name:   Option<String>,
  #[arg(long)]
  last_name:    Option<String>,
  #[arg(long)]
  age:          Option<String>,
  #[arg(long)]
  relationship: Option<String>,
}

impl FieldArgs {
  fn values(&self) -> impl Iterator<Item = (Field, &str)> {
    [
      (Field::FirstName, &self.first_name),
      (Field::LastName, &self.last_name),
      (Field::Age, &self.age),
      (Field::Relationship, &self.relationship),
    ]
    .into_iter()
    .filter_map(|(field, value)| value.as_deref().map(|v| (field, v)))
  }
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// Shape of the optional TOML config file.
#[derive(Deserialize, Default)]
struct ConfigFile {
  #[serde(default)]
  url:          String,
  #[serde(default)]
  timeout_secs: Option<u64>,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  let args = Args::parse();
  init_tracing(args.log_file.as_deref(), args.command.is_none())?;

  // Load config file if provided.
  let file_cfg: ConfigFile = if let Some(path) = &args.config {
    let raw = std::fs::read_to_string(path)
      .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&raw).context("parsing config file")?
  } else {
    ConfigFile::default()
  };

  // CLI flags override config file, which overrides defaults.
  let api_config = ApiConfig {
    base_url: args
      .url
      .or_else(|| (!file_cfg.url.is_empty()).then(|| file_cfg.url.clone()))
      .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
    timeout:  Duration::from_secs(args.timeout.or(file_cfg.timeout_secs).unwrap_or(30)),
  };
  tracing::debug!(base_url = %api_config.base_url, "using record API");

  let client = ApiClient::new(api_config).context("creating API client")?;

  match args.command {
    None => run_tui(client).await,
    Some(command) => run_command(client, command).await,
  }
}

/// The interactive UI owns the terminal, so its logs only go to a file.
/// One-shot commands log warnings to stderr unless a file is given.
fn init_tracing(log_file: Option<&Path>, interactive: bool) -> Result<()> {
  let filter = |default: LevelFilter| {
    EnvFilter::builder()
      .with_default_directive(default.into())
      .from_env_lossy()
  };
  match log_file {
    Some(path) => {
      let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening log file {}", path.display()))?;
      tracing_subscriber::fmt()
        .with_env_filter(filter(LevelFilter::INFO))
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    }
    None if !interactive => {
      tracing_subscriber::fmt()
        .with_env_filter(filter(LevelFilter::WARN))
        .with_writer(io::stderr)
        .init();
    }
    None => {}
  }
  Ok(())
}

// ─── One-shot commands ────────────────────────────────────────────────────────

async fn run_command(client: ApiClient, command: Command) -> Result<()> {
  let mut controller = Controller::new(Arc::new(client));

  match command {
    Command::List { html, json } => {
      controller.refresh().await?;
      let table = controller.table();
      if html {
        print!("{}", markup::html_rows(table));
      } else if json {
        let rows: Vec<_> = table.rows().collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
      } else {
        print!("{}", markup::text_table(table));
      }
      return Ok(());
    }
    Command::Show { id } => {
      let record = controller
        .store()
        .get(RecordId::new(id.as_str()))
        .await?
        .ok_or_else(|| anyhow!("no record with id {id}"))?;
      println!("{}", serde_json::to_string_pretty(&record)?);
      return Ok(());
    }
    Command::Add(fields) => {
      controller.open_form(RecordId::sentinel());
      fill_form(&mut controller, &fields);
      controller.save().await?;
    }
    Command::Edit { id, fields } => {
      controller.refresh().await?;
      if !controller.open_form(RecordId::new(id.as_str())) {
        return Err(anyhow!("no record with id {id}"));
      }
      fill_form(&mut controller, &fields);
      controller.save().await?;
    }
    Command::Delete { id } => {
      controller.delete_record(RecordId::new(id)).await?;
    }
  }

  if let Some(Status::Info(msg)) = controller.status() {
    eprintln!("{msg}");
  }
  print!("{}", markup::text_table(controller.table()));
  Ok(())
}

fn fill_form<S: RecordStore>(controller: &mut Controller<S>, fields: &FieldArgs) {
  if let Some(form) = controller.dialog_mut().form_mut() {
    for (field, value) in fields.values() {
      form.set(field, value);
    }
  }
}

// ─── Interactive UI ───────────────────────────────────────────────────────────

async fn run_tui(client: ApiClient) -> Result<()> {
  let mut app = App::new(client);

  // Set up the terminal.
  enable_raw_mode().context("enabling raw mode")?;
  let mut stdout = io::stdout();
  execute!(stdout, EnterAlternateScreen).context("entering alternate screen")?;
  let backend = CrosstermBackend::new(stdout);
  let mut terminal = Terminal::new(backend).context("creating terminal")?;

  // Load initial data in the background. A failure shows in the status bar
  // rather than aborting; `r` retries.
  app.start();

  // Run the event loop; restore terminal even on error.
  let run_result = run_event_loop(&mut terminal, &mut app).await;

  // Restore terminal regardless of result.
  disable_raw_mode().ok();
  execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
  terminal.show_cursor().ok();

  run_result
}

async fn run_event_loop(
  terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
  app: &mut App<ApiClient>,
) -> Result<()> {
  loop {
    app.drain_outcomes();
    terminal.draw(|f| ui::draw(f, app)).context("drawing frame")?;

    // Poll for an event, yielding control to tokio while waiting.
    let maybe_event = tokio::task::block_in_place(|| {
      if event::poll(Duration::from_millis(50))? {
        Ok::<_, io::Error>(Some(event::read()?))
      } else {
        Ok(None)
      }
    })?;

    if let Some(Event::Key(key)) = maybe_event {
      if !app.handle_key(key) {
        break;
      }
    }
  }

  Ok(())
}
