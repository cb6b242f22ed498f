//! Till - two-SKU point-of-sale and inventory tracker.
//!
//! Thin CLI over the session: ring up sales, manage stock, inspect
//! history and daily totals, export CSV, and mirror everything to the
//! configured remote document.

use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;
use till_client::{Config, GitHubRemote, LocalStore, Mirror, Session};
use till_engine::{
    group_by_date, reference_tz, Pesos, PriceTier, RemoveOutcome, SALES_CSV_FILENAME,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "till", about = "Two-SKU point-of-sale and inventory tracker")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Record a sale
    Sale {
        /// Price tier (69 or 99)
        #[arg(long)]
        price: u32,
        /// Number of items
        #[arg(long, default_value_t = 1)]
        qty: u32,
        /// Money received, in pesos
        #[arg(long)]
        paid: f64,
    },
    /// Manage stock counters
    Stock {
        #[command(subcommand)]
        action: StockAction,
    },
    /// Delete a sale by record ID, restoring its stock
    Delete { id: String },
    /// Show the sales history, newest first
    History,
    /// Show daily totals
    Daily,
    /// Export the sales log as CSV
    Export {
        /// Output file
        #[arg(long, default_value = SALES_CSV_FILENAME)]
        out: PathBuf,
    },
    /// Pull and push the remote mirror
    Sync,
}

#[derive(Subcommand)]
enum StockAction {
    /// Add stock to a tier
    Add {
        #[arg(long)]
        price: u32,
        #[arg(long)]
        qty: u32,
    },
    /// Remove stock from a tier
    Remove {
        #[arg(long)]
        price: u32,
        #[arg(long)]
        qty: u32,
        /// Confirm a removal that exceeds the counter (clamps to zero)
        #[arg(long)]
        confirm: bool,
    },
}

/// One-time interactive credential prompt. A blank answer disables sync
/// for this session; a token is persisted for later sessions.
fn prompt_for_token(store: &LocalStore) -> Option<String> {
    eprint!("Sync credential token (leave blank to run without sync): ");
    std::io::stderr().flush().ok();

    let mut line = String::new();
    std::io::stdin().read_line(&mut line).ok()?;
    let token = line.trim().to_string();
    if token.is_empty() {
        return None;
    }
    if let Err(e) = store.set_token(&token) {
        tracing::warn!("could not persist credential: {}", e);
    }
    Some(token)
}

fn build_mirror(config: &Config, store: &LocalStore) -> Option<Mirror> {
    let remote = config.remote.clone()?;

    let token = config
        .token
        .clone()
        .or_else(|| store.get_token().ok().flatten())
        .or_else(|| prompt_for_token(store));

    match token {
        Some(token) => Some(Mirror::new(Box::new(GitHubRemote::new(remote, token)))),
        None => {
            tracing::info!("no credential supplied, sync disabled for this session");
            None
        }
    }
}

fn pesos_from_input(pesos: f64) -> Pesos {
    Pesos::from_centavos((pesos * 100.0).round() as i64)
}

fn print_history(session: &Session) {
    let history = session.ledger().history();
    if history.is_empty() {
        println!("No sales recorded.");
        return;
    }
    for record in history {
        let when = record
            .timestamp
            .with_timezone(&reference_tz())
            .format("%Y-%m-%d %H:%M:%S");
        let paid = record
            .paid
            .map(|p| p.to_string())
            .unwrap_or_else(|| "-".to_string());
        let change = record
            .change()
            .map(|c| c.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{}  {}  {} x{}  total {}  paid {}  change {}",
            record.id,
            when,
            record.price,
            record.quantity,
            record.total(),
            paid,
            change,
        );
    }
}

fn print_daily(session: &Session) {
    let grouped = group_by_date(session.ledger().sales());
    if grouped.is_empty() {
        println!("No sales recorded.");
        return;
    }
    // Newest day first, like the dashboard table
    for (date, summary) in grouped.iter().rev() {
        println!(
            "{}  ₱69 x{}  ₱99 x{}  gross {}",
            date,
            summary.sold(PriceTier::P69),
            summary.sold(PriceTier::P99),
            summary.gross,
        );
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "till_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let config = Config::from_env()?;

    let store = LocalStore::open(&config.data_dir)?;
    let mirror = build_mirror(&config, &store);
    let mut session = Session::new(store, mirror)?;

    // Pull-then-push reconciliation before anything renders or mutates
    session.startup().await?;

    match cli.command {
        Command::Sale { price, qty, paid } => {
            let tier = PriceTier::try_from(price)?;
            match session.record_sale(tier, qty, pesos_from_input(paid)) {
                Ok(receipt) => println!(
                    "Sale recorded: {} x{}, total {}, change {} (id {})",
                    tier,
                    qty,
                    receipt.record.total(),
                    receipt.change,
                    receipt.record.id,
                ),
                Err(e) => println!("Sale rejected: {}", e),
            }
        }
        Command::Stock { action } => match action {
            StockAction::Add { price, qty } => {
                let tier = PriceTier::try_from(price)?;
                let new_count = session.add_stock(tier, qty)?;
                println!("Added {} item(s) to {}. Now: {}", qty, tier, new_count);
            }
            StockAction::Remove { price, qty, confirm } => {
                let tier = PriceTier::try_from(price)?;
                match session.remove_stock(tier, qty, confirm)? {
                    RemoveOutcome::Removed { new_count, clamped } => {
                        if clamped {
                            println!("Removed all stock from {} (excess discarded). Now: 0", tier);
                        } else {
                            println!("Removed {} item(s) from {}. Now: {}", qty, tier, new_count);
                        }
                    }
                    RemoveOutcome::NeedsConfirmation { available } => {
                        println!(
                            "Only {} item(s) available at {}. Re-run with --confirm to clamp to zero.",
                            available, tier
                        );
                    }
                }
            }
        },
        Command::Delete { id } => match session.delete_sale(&id)? {
            Some(record) => println!(
                "Deleted sale {} ({} x{}), stock restored.",
                record.id, record.price, record.quantity
            ),
            None => println!("No sale with id {}.", id),
        },
        Command::History => print_history(&session),
        Command::Daily => print_daily(&session),
        Command::Export { out } => {
            session.export_csv(&out)?;
            println!("Exported {} record(s) to {}", session.ledger().sales().len(), out.display());
        }
        Command::Sync => {
            // startup() already pulled and pushed; report where we ended up
            if session.sync_enabled() {
                println!("Sync complete.");
            } else {
                println!("Sync is disabled (no remote configured or no credential).");
            }
        }
    }

    for tier in PriceTier::ALL {
        tracing::info!("{} stock: {}", tier, session.ledger().inventory().count(tier));
    }

    // Let any background push settle before the process exits
    session.flush().await;

    Ok(())
}
