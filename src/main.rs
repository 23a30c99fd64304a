// ABOUTME: Main entry point for the fold-deck program.
// ABOUTME: Provides CLI interface and executes commands from the library.

use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use fold_deck::{Config, GenerateOptions, Presentation, Theme, WatchConfig};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the HTML presentation from a deck file
    Generate(GenerateArgs),

    /// Regenerate the presentation whenever the deck or its inputs change
    Watch(WatchArgs),

    /// Load a deck file and report what ingestion had to drop
    Check(CheckArgs),
}

#[derive(Clone, Copy, ValueEnum)]
enum ResourceMode {
    Embed,
    Link,
}

#[derive(Args)]
struct GenerateArgs {
    /// Deck file (JSON or YAML); the built-in sample deck is used when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output folder; defaults to <output root>/<sanitized title>
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Folder holding the images referenced by the deck
    #[arg(long)]
    images_dir: Option<PathBuf>,

    /// Colour theme
    #[arg(long, value_enum)]
    theme: Option<Theme>,

    /// Custom page template containing a {{sections}} placeholder
    #[arg(long)]
    template: Option<PathBuf>,

    /// Image used for nodes whose image is missing
    #[arg(long)]
    placeholder: Option<PathBuf>,

    /// Extra CSS files to include (local paths or URLs)
    #[arg(long, value_delimiter = ',')]
    css: Vec<String>,

    /// Extra JavaScript files to include (local paths or URLs)
    #[arg(long, value_delimiter = ',')]
    js: Vec<String>,

    /// Whether local CSS/JS is embedded into the page or linked
    #[arg(long, value_enum)]
    mode: Option<ResourceMode>,
}

impl GenerateArgs {
    fn options(&self, app_config: &Config) -> GenerateOptions {
        app_config.get_generate_options(
            self.output_dir.clone(),
            self.images_dir.clone(),
            self.placeholder.clone(),
            self.template.clone(),
            self.theme,
            &self.css,
            &self.js,
            self.mode.map(|mode| matches!(mode, ResourceMode::Embed)),
        )
    }
}

#[derive(Args)]
struct WatchArgs {
    #[command(flatten)]
    generate: GenerateArgs,

    /// Debounce time for file system events, in milliseconds
    #[arg(long)]
    debounce_ms: Option<u64>,
}

#[derive(Args)]
struct CheckArgs {
    /// Deck file (JSON or YAML)
    #[arg(short, long)]
    config: PathBuf,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let app_config = Config::from_env();

    match cli.command {
        Some(Commands::Generate(args)) => {
            let presentation = match &args.config {
                Some(path) => fold_deck::load_presentation(path)
                    .with_context(|| format!("Failed to load deck {:?}", path))?,
                None => {
                    println!("No deck file given; generating the sample deck.");
                    Presentation::sample()
                }
            };

            let options = args.options(&app_config);
            let generated = fold_deck::generate_presentation(presentation, &options)
                .context("Failed to generate presentation")?;

            println!("Presentation saved to {}", generated.html_path.display());
            if !generated.ingest.is_clean() {
                println!(
                    "Dropped {} malformed values while reading the deck (see warnings).",
                    generated.ingest.total()
                );
            }
            if generated.images.placeholders > 0 {
                println!(
                    "{} image(s) replaced by the placeholder.",
                    generated.images.placeholders
                );
            }
            Ok(())
        }
        Some(Commands::Watch(args)) => {
            let Some(deck_path) = args.generate.config.clone() else {
                bail!("watch needs a deck file; pass --config <PATH>");
            };
            let config = WatchConfig {
                options: args.generate.options(&app_config),
                deck_path,
                debounce_ms: args.debounce_ms.unwrap_or(app_config.debounce_ms),
            };
            fold_deck::watch_deck(config).context("Watch mode stopped")?;
            Ok(())
        }
        Some(Commands::Check(args)) => {
            let presentation = fold_deck::load_presentation(&args.config)
                .with_context(|| format!("Failed to load deck {:?}", args.config))?;
            let deck = &presentation.deck;
            let report = deck.report;

            println!("Title: {}", presentation.title);
            println!("Sections: {}", deck.nodes.len());
            println!("Folds: {}", deck.fold_count());
            println!("Dropped sections: {}", report.dropped_nodes);
            println!("Dropped folds: {}", report.dropped_folds);
            println!("Dropped content items: {}", report.dropped_items);
            Ok(())
        }
        None => {
            println!("No command specified. Use --help for usage information.");
            Ok(())
        }
    }
}
