mod export;
mod scrape;
mod sink;

use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use despensa_core::{ProductErrorPolicy, Vendor};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "despensa")]
#[command(about = "Grocery catalog scraper for Mercadona and Consum")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Where scraped records are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputSink {
    /// Replace the vendor's rows in the `products` table (CSV fallback on failure)
    Db,
    /// Write every record to a CSV file
    Csv,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Walk vendor catalogs and store the flattened products
    Scrape {
        /// Restrict the scrape to one vendor (mercadona or consum)
        #[arg(long)]
        vendor: Option<Vendor>,

        /// Where to write the records
        #[arg(long, value_enum, default_value_t = OutputSink::Db)]
        output: OutputSink,

        /// Destination file for `--output csv`
        #[arg(long, default_value = "catalog.csv")]
        csv_path: PathBuf,

        /// What to do with a product that fails to normalize (abort or skip);
        /// overrides DESPENSA_PRODUCT_ERROR_POLICY
        #[arg(long)]
        on_product_error: Option<ProductErrorPolicy>,
    },
    /// Load a previously exported CSV into the products table
    ImportCsv {
        /// CSV file with one record per row and a header line
        path: PathBuf,

        /// Only import rows of this vendor
        #[arg(long)]
        vendor: Option<Vendor>,
    },
    /// Show stored product counts and a sample of rows
    Products {
        /// Restrict the listing to one vendor
        #[arg(long)]
        vendor: Option<Vendor>,

        /// Maximum number of rows to show
        #[arg(long, default_value = "20")]
        limit: i64,
    },
    /// Show recent scrape runs, or one run by id
    Runs {
        /// Show only the run with this id
        #[arg(long)]
        id: Option<i64>,

        /// Maximum number of runs to show
        #[arg(long, default_value = "20")]
        limit: i64,
    },
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },
}

#[derive(Debug, Subcommand)]
enum DbCommands {
    /// Check that the database is reachable
    Ping,
    /// Apply pending migrations
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let config = despensa_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    match cli.command {
        Some(Commands::Scrape {
            vendor,
            output,
            csv_path,
            on_product_error,
        }) => {
            let vendors = vendor.map_or_else(|| Vendor::ALL.to_vec(), |v| vec![v]);
            let policy = on_product_error.unwrap_or(config.product_error_policy);
            scrape::run_scrape(&config, &vendors, output, &csv_path, policy).await?;
        }
        Some(Commands::ImportCsv { path, vendor }) => {
            let pool = despensa_db::connect_pool_from_config(&config).await?;
            despensa_db::run_migrations(&pool).await?;
            sink::run_import_csv(&pool, &path, vendor).await?;
        }
        Some(Commands::Products { vendor, limit }) => {
            let pool = despensa_db::connect_pool_from_config(&config).await?;
            run_products(&pool, vendor, limit).await?;
        }
        Some(Commands::Runs { id, limit }) => {
            let pool = despensa_db::connect_pool_from_config(&config).await?;
            run_runs(&pool, id, limit).await?;
        }
        Some(Commands::Db { command }) => {
            let pool = despensa_db::connect_pool_from_config(&config).await?;
            match command {
                DbCommands::Ping => {
                    despensa_db::ping(&pool).await?;
                    println!("database reachable");
                }
                DbCommands::Migrate => {
                    let applied = despensa_db::run_migrations(&pool).await?;
                    println!("applied {applied} migrations");
                }
            }
        }
        None => Cli::command().print_help()?,
    }

    Ok(())
}

async fn run_products(
    pool: &sqlx::PgPool,
    vendor: Option<Vendor>,
    limit: i64,
) -> anyhow::Result<()> {
    let counts = despensa_db::count_products_by_vendor(pool).await?;
    if counts.is_empty() {
        println!("no products stored");
        return Ok(());
    }
    for count in &counts {
        println!("{:<10} {:>6} products", count.vendor, count.products);
    }

    let rows = despensa_db::list_products(pool, vendor, limit).await?;
    println!();
    for row in &rows {
        let size = match (&row.size, &row.size_format) {
            (Some(size), Some(format)) => format!("{size} {format}"),
            (Some(size), None) => size.to_string(),
            _ => "-".to_string(),
        };
        println!(
            "{:<10} {:<10} {:<48} {:>12} {:>10} {} / {}",
            row.vendor, row.external_id, row.name, size, row.price, row.category, row.subtype
        );
    }
    Ok(())
}

async fn run_runs(pool: &sqlx::PgPool, id: Option<i64>, limit: i64) -> anyhow::Result<()> {
    let runs = match id {
        Some(id) => match despensa_db::get_scrape_run(pool, id).await {
            Ok(run) => vec![run],
            Err(despensa_db::DbError::NotFound) => anyhow::bail!("no scrape run with id {id}"),
            Err(err) => return Err(err.into()),
        },
        None => despensa_db::list_scrape_runs(pool, limit).await?,
    };
    if runs.is_empty() {
        println!("no scrape runs recorded");
        return Ok(());
    }
    for run in &runs {
        println!(
            "{:>5} {:<10} {:<10} {:>7} {} {}",
            run.id,
            run.vendor,
            run.status,
            run.records_processed,
            run.created_at.format("%Y-%m-%d %H:%M:%S"),
            run.error_message.as_deref().unwrap_or("")
        );
    }
    Ok(())
}

/// Marks a scrape run failed, logging instead of propagating if that update
/// itself fails.
pub(crate) async fn fail_run_best_effort(
    pool: &sqlx::PgPool,
    run_id: i64,
    vendor: Vendor,
    message: String,
) {
    if let Err(mark_err) = despensa_db::fail_scrape_run(pool, run_id, &message).await {
        tracing::error!(
            run_id,
            %vendor,
            error = %mark_err,
            "failed to mark scrape run as failed"
        );
    }
}

#[cfg(test)]
mod tests;
