//! Database sink with emergency CSV fallback.
//!
//! Every database failure on the scrape path (connect, migrate, run
//! bookkeeping, or the catalog write itself) is logged and the records are
//! appended to the emergency CSV instead, so a completed walk is never lost.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use despensa_core::{AppConfig, CatalogRecord, Vendor};

use crate::export;

/// Where a vendor's records ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Destination {
    Database,
    EmergencyCsv(PathBuf),
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Destination::Database => write!(f, "stored in database"),
            Destination::EmergencyCsv(path) => {
                write!(f, "saved to emergency CSV {}", path.display())
            }
        }
    }
}

/// Connects and migrates, returning `None` (after logging why) when the
/// database is unusable.
pub(crate) async fn connect_sink(config: &AppConfig) -> Option<sqlx::PgPool> {
    let pool = match despensa_db::connect_pool_from_config(config).await {
        Ok(pool) => pool,
        Err(err) => {
            tracing::error!(
                error = %err,
                path = %config.emergency_csv_path.display(),
                "database unavailable; records will go to the emergency CSV"
            );
            return None;
        }
    };

    if let Err(err) = despensa_db::run_migrations(&pool).await {
        tracing::error!(
            error = %err,
            path = %config.emergency_csv_path.display(),
            "database migration failed; records will go to the emergency CSV"
        );
        return None;
    }

    Some(pool)
}

/// Creates and starts a scrape run. Bookkeeping failures are logged and
/// yield `None`; the scrape proceeds without a run row.
pub(crate) async fn begin_run(pool: &sqlx::PgPool, vendor: Vendor) -> Option<i64> {
    let run = match despensa_db::create_scrape_run(pool, vendor, "cli").await {
        Ok(run) => run,
        Err(err) => {
            tracing::warn!(%vendor, error = %err, "could not create scrape run");
            return None;
        }
    };

    if let Err(err) = despensa_db::start_scrape_run(pool, run.id).await {
        tracing::warn!(%vendor, run_id = run.id, error = %err, "could not start scrape run");
        return None;
    }

    tracing::info!(%vendor, run_id = run.id, public_id = %run.public_id, "scrape run started");
    Some(run.id)
}

/// Replaces `vendor`'s rows with `records`, falling back to the emergency
/// CSV when there is no pool or the write fails.
///
/// # Errors
///
/// Returns an error only if the emergency CSV cannot be written either.
pub(crate) async fn persist_records(
    pool: Option<&sqlx::PgPool>,
    run_id: Option<i64>,
    vendor: Vendor,
    records: &[CatalogRecord],
    config: &AppConfig,
) -> anyhow::Result<Destination> {
    if let Some(pool) = pool {
        match despensa_db::replace_vendor_catalog(pool, vendor, records).await {
            Ok(inserted) => {
                if let Some(run_id) = run_id {
                    let processed = i32::try_from(inserted).unwrap_or(i32::MAX);
                    if let Err(err) =
                        despensa_db::complete_scrape_run(pool, run_id, processed).await
                    {
                        tracing::warn!(%vendor, run_id, error = %err, "could not complete scrape run");
                    }
                }
                tracing::info!(%vendor, inserted, "catalog stored");
                return Ok(Destination::Database);
            }
            Err(err) => {
                tracing::error!(%vendor, error = %err, "catalog write failed; saving emergency CSV");
                if let Some(run_id) = run_id {
                    crate::fail_run_best_effort(pool, run_id, vendor, format!("{err:#}")).await;
                }
            }
        }
    }

    let path = &config.emergency_csv_path;
    export::append_records(path, records)?;
    tracing::warn!(%vendor, path = %path.display(), records = records.len(), "records saved to emergency CSV");
    Ok(Destination::EmergencyCsv(path.clone()))
}

/// Groups `records` by vendor, keeping only `vendor_filter` when given.
pub(crate) fn group_by_vendor(
    records: Vec<CatalogRecord>,
    vendor_filter: Option<Vendor>,
) -> BTreeMap<&'static str, (Vendor, Vec<CatalogRecord>)> {
    let mut groups: BTreeMap<&'static str, (Vendor, Vec<CatalogRecord>)> = BTreeMap::new();
    for record in records {
        if vendor_filter.is_some_and(|v| v != record.vendor) {
            continue;
        }
        groups
            .entry(record.vendor.name())
            .or_insert_with(|| (record.vendor, Vec::new()))
            .1
            .push(record);
    }
    groups
}

/// Loads a CSV export and replaces the catalog of every vendor it contains.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, or a vendor's
/// catalog cannot be written.
pub(crate) async fn run_import_csv(
    pool: &sqlx::PgPool,
    path: &Path,
    vendor_filter: Option<Vendor>,
) -> anyhow::Result<()> {
    let records = export::read_records(path)?;
    let groups = group_by_vendor(records, vendor_filter);
    if groups.is_empty() {
        println!("no matching records in {}", path.display());
        return Ok(());
    }

    for (vendor, records) in groups.into_values() {
        let inserted = despensa_db::replace_vendor_catalog(pool, vendor, &records).await?;
        tracing::info!(%vendor, inserted, path = %path.display(), "imported CSV");
        println!("{vendor}: imported {inserted} products");
    }
    Ok(())
}

#[cfg(test)]
#[path = "sink_test.rs"]
mod tests;
