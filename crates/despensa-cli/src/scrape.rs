//! `scrape` command: walk each requested vendor and hand its records to the
//! selected sink.
//!
//! Vendors are walked one after another. A vendor whose walk fails is logged
//! and skipped so the others still land; the command then exits with an
//! error naming how many vendors failed.

use std::path::Path;

use despensa_core::{AppConfig, CatalogRecord, ProductErrorPolicy, Vendor};
use despensa_scraper::{
    CatalogClient, CatalogSource, CatalogWalker, ConsumSource, MercadonaSource, ScraperError,
};

use crate::{export, sink, OutputSink};

/// Runs a scrape for `vendors` and writes the results to `output`.
///
/// # Errors
///
/// Returns an error if the HTTP client cannot be built, the CSV output
/// cannot be written, or any vendor failed.
pub(crate) async fn run_scrape(
    config: &AppConfig,
    vendors: &[Vendor],
    output: OutputSink,
    csv_path: &Path,
    policy: ProductErrorPolicy,
) -> anyhow::Result<()> {
    let client = CatalogClient::new(
        config.scraper_request_timeout_secs,
        &config.scraper_user_agent,
    )?;

    let pool = match output {
        OutputSink::Db => sink::connect_sink(config).await,
        OutputSink::Csv => None,
    };

    let mut csv_records: Vec<CatalogRecord> = Vec::new();
    let mut failed_vendors: usize = 0;

    for &vendor in vendors {
        let run_id = match &pool {
            Some(pool) => sink::begin_run(pool, vendor).await,
            None => None,
        };

        let records = match walk_vendor(config, &client, vendor, policy).await {
            Ok(records) => records,
            Err(err) => {
                tracing::error!(%vendor, error = %err, "catalog walk failed; nothing stored");
                if let (Some(pool), Some(run_id)) = (&pool, run_id) {
                    crate::fail_run_best_effort(pool, run_id, vendor, err.to_string()).await;
                }
                failed_vendors += 1;
                continue;
            }
        };

        match output {
            OutputSink::Db => {
                let stored =
                    sink::persist_records(pool.as_ref(), run_id, vendor, &records, config).await?;
                println!("{vendor}: {} products {stored}", records.len());
            }
            OutputSink::Csv => {
                println!("{vendor}: {} products", records.len());
                csv_records.extend(records);
            }
        }
    }

    if output == OutputSink::Csv {
        export::write_records(csv_path, &csv_records)?;
        println!(
            "wrote {} records to {}",
            csv_records.len(),
            csv_path.display()
        );
    }

    if failed_vendors > 0 {
        anyhow::bail!(
            "{failed_vendors} of {} vendors failed to scrape",
            vendors.len()
        );
    }
    Ok(())
}

/// Walks one vendor's catalog and flattens it into records.
async fn walk_vendor(
    config: &AppConfig,
    client: &CatalogClient,
    vendor: Vendor,
    policy: ProductErrorPolicy,
) -> Result<Vec<CatalogRecord>, ScraperError> {
    match vendor {
        Vendor::Mercadona => {
            let source = MercadonaSource::new(
                client.clone(),
                &config.mercadona_base_url,
                &config.mercadona_lang,
                &config.mercadona_warehouse,
            );
            walk_source(&source, config, policy).await
        }
        Vendor::Consum => {
            let source = ConsumSource::new(
                client.clone(),
                &config.consum_base_url,
                config.consum_page_limit,
            );
            walk_source(&source, config, policy).await
        }
    }
}

async fn walk_source<S: CatalogSource>(
    source: &S,
    config: &AppConfig,
    policy: ProductErrorPolicy,
) -> Result<Vec<CatalogRecord>, ScraperError> {
    let outcome = CatalogWalker::new(source)
        .with_policy(policy)
        .with_inter_request_delay(config.scraper_inter_request_delay_ms)
        .walk()
        .await?;
    Ok(outcome.into_records())
}
