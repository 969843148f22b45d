use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use clap::{Parser, Subcommand, ValueEnum};
use log::{debug, error};

use quotament::clipboard::MemoryClipboard;
use quotament::screen::QuoteScreen;
use quotament::widget::{MemoryWidgetStore, WidgetAction, WidgetTaskHandler};
use quotament::{QuotamentConfig, QuoteBackend};

#[derive(Parser, Debug)]
#[command(name = "quotament", version, about = "Tiny 5-6 word quotes")]
struct Cli
{   /// JSON config file; GEMINI_API_KEY fills a missing credential
    #[arg(long, global = true)]
    config: Option<PathBuf>

  , #[command(subcommand)]
    command: Option<Command>
}

#[derive(Subcommand, Debug)]
enum Command
{   /// Discover a model and print generated quotes
    Generate
    {   #[arg(long, short = 'n', default_value_t = 1)]
        count: usize
    }
  , /// Replay widget clicks against an in-memory widget store
    Widget
    {   #[arg(value_enum, required = true)]
        clicks: Vec<Click>
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Click
{   Gen
  , Copy
}

impl From<Click> for WidgetAction
{   fn from(click: Click) -> Self
    {   match click
        {   Click::Gen => WidgetAction::Generate
          , Click::Copy => WidgetAction::Copy
        }
    }
}

fn load_config(path: Option<&PathBuf>)
  -> Result<QuotamentConfig, quotament::Error>
{   match path
    {   Some(path) => QuotamentConfig::from_json_file(path)
      , None => {
          let config = QuotamentConfig::from_env();
          config.validate()?;
          Ok(config)
        }
    }
}

async fn run_generate(
  config: QuotamentConfig
, count: usize
) -> Result<(), quotament::Error>
{   let backend = QuoteBackend::new(config)?;
    let mut screen = QuoteScreen::new();

    let discovery = backend.discovery().await;
    screen.on_discovery(&discovery);
    println!("{}", screen.subtitle());
    if let Err(e) = discovery
    {   let _ = backend.shutdown().await;
        return Err(e);
    }

    for _ in 0..count
    {   screen.generate(&backend).await;
        println!("{}", screen.display_quote());
        if let Some(err) = &screen.error
        {   eprintln!("{}", err);
        }
    }

    backend.shutdown().await
}

async fn run_widget(
  config: QuotamentConfig
, clicks: Vec<Click>
) -> Result<(), quotament::Error>
{   let handler = WidgetTaskHandler::new(
      Arc::new(MemoryWidgetStore::new())
    , Arc::new(MemoryClipboard::new())
    , config.widget
    );
    for click in clicks
    {   debug!("Widget click {:?}", click);
        let state = handler.handle(Some(click.into())).await?;
        println!(
          "{}{}",
          state.text,
          if state.copied { "  [copied]" } else { "" }
        );
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode
{   env_logger::init();
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_ref())
    {   Ok(config) => config
      , Err(e) => {
          error!("{}", e);
          eprintln!("{}", e);
          return ExitCode::FAILURE;
        }
    };

    let result = match cli.command
      .unwrap_or(Command::Generate { count: 1 })
    {   Command::Generate { count } => run_generate(config, count).await
      , Command::Widget { clicks } => run_widget(config, clicks).await
    };

    match result
    {   Ok(()) => ExitCode::SUCCESS
      , Err(e) => {
          eprintln!("{}", e);
          if e.is_terminal()
          {   eprintln!("Fix the configuration and restart.");
          }
          ExitCode::FAILURE
        }
    }
}
