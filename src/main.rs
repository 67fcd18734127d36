// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use demo_trio::{
    are_brackets_balanced, init_logging, load_or_empty, validate_email, BossOdds, Category,
    DemoConfig, ListEditor, LogFallback, ScoringPolicy,
};

/// Email check, linked list editor and boss-fight odds in one binary.
#[derive(Debug, Parser)]
#[command(name = "demo-trio", version)]
struct Cli {
    /// Path to a YAML configuration file.
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Override the game history CSV location.
    #[arg(long, value_name = "FILE", global = true)]
    data: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Interactive terminal UI (default)
    Ui,
    /// Validate one email address
    Email { address: String },
    /// Build a list from --add values, then optionally filter it
    List {
        /// Value to append; repeatable. Non-integers are ignored.
        #[arg(long = "add", value_name = "N", allow_hyphen_values = true)]
        values: Vec<String>,
        /// Remove every value greater than this
        #[arg(long, value_name = "N", allow_hyphen_values = true)]
        remove_above: Option<String>,
    },
    /// Win probability for one set of picks
    Odds {
        #[arg(long)]
        suit: Option<String>,
        #[arg(long)]
        animal: Option<String>,
        #[arg(long)]
        fruit: Option<String>,
        #[arg(long, value_enum)]
        policy: Option<ScoringPolicy>,
    },
    /// Check that (), [] and {} are balanced
    Brackets { text: String },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = DemoConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;

    if let Some(data) = cli.data {
        config.data_path = data;
    }

    match cli.command.unwrap_or(Command::Ui) {
        Command::Ui => run_ui_mode(&config)?,
        Command::Email { address } => {
            let _guard = init_logging(&config.logging, LogFallback::Stderr)?;
            run_email(&address);
        }
        Command::List { values, remove_above } => {
            let _guard = init_logging(&config.logging, LogFallback::Stderr)?;
            run_list(values, remove_above);
        }
        Command::Odds { suit, animal, fruit, policy } => {
            let _guard = init_logging(&config.logging, LogFallback::Stderr)?;
            if let Some(suit) = suit {
                config.query.set(Category::Suit, suit);
            }
            if let Some(animal) = animal {
                config.query.set(Category::Animal, animal);
            }
            if let Some(fruit) = fruit {
                config.query.set(Category::Fruit, fruit);
            }
            if let Some(policy) = policy {
                config.policy = policy;
            }
            run_odds(&config);
        }
        Command::Brackets { text } => {
            let verdict = if are_brackets_balanced(&text) { "balanced" } else { "unbalanced" };
            println!("{verdict}");
        }
    }

    Ok(())
}

fn run_email(address: &str) {
    match validate_email(address) {
        None => println!("✓ {address} looks valid"),
        Some(error) => println!("✗ {error}"),
    }
}

fn run_list(values: Vec<String>, remove_above: Option<String>) {
    let mut editor = ListEditor::new();

    for value in values {
        editor.add_input = value;
        editor.submit_add();
    }
    println!("List:     {:?}", editor.list.to_vec());

    if let Some(threshold) = remove_above {
        editor.threshold_input = threshold;
        if editor.submit_threshold() {
            println!("Filtered: {:?}", editor.list.to_vec());
        }
    }
}

fn run_odds(config: &DemoConfig) {
    println!("🐉 Boss Win Probability");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let odds = BossOdds::new(load_or_empty(&config.data_path));

    let Some(estimate) = odds.estimate(&config.query, config.policy) else {
        println!("No data found in {}", config.data_path.display());
        return;
    };

    println!("📂 {} fights loaded from {}", odds.model().total, config.data_path.display());
    for category in Category::ALL {
        let stats = estimate.stats(category);
        println!(
            "   {:<7} {:<11} {:>3}/{:<3} wins ({:.1}%)",
            category.name(),
            estimate.query.value(category),
            stats.wins,
            stats.total,
            stats.prob * 100.0
        );
    }
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("Overall ({}): {}", estimate.policy.name(), estimate.percent());
}

#[cfg(feature = "tui")]
fn run_ui_mode(config: &DemoConfig) -> Result<()> {
    let _guard = init_logging(&config.logging, LogFallback::Silent)?;

    println!("🖥️  Loading boss data...\n");
    let odds = BossOdds::new(load_or_empty(&config.data_path));
    println!("✓ Loaded {} fights\n", odds.model().total);

    let source = config
        .data_path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| config.data_path.display().to_string());

    let boss = ui::BossPage::new(odds, config.query.clone(), config.policy, source);
    let mut app = ui::App::new(boss);
    ui::run_ui(&mut app)?;

    println!("\n✅ UI closed successfully");

    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode(_config: &DemoConfig) -> Result<()> {
    eprintln!("❌ TUI mode not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    eprintln!("   Or use the web UI: cargo run --bin demo-server --features server");
    std::process::exit(1);
}
