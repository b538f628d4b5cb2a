//! Database operations for the flattened `products` catalog table.

use chrono::{DateTime, Utc};
use despensa_core::{CatalogRecord, Vendor};
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::DbError;

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

/// A row from the `products` table.
///
/// Numeric columns come back as [`Decimal`]; see [`replace_vendor_catalog`]
/// for the precision they are stored at.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProductRow {
    pub id: i64,
    pub external_id: String,
    pub name: String,
    pub brand: Option<String>,
    pub image_url: String,
    pub size: Option<Decimal>,
    pub is_approx_size: bool,
    pub size_format: Option<String>,
    pub price: Decimal,
    pub price_per_size: Decimal,
    pub is_pack: bool,
    pub total_units: Option<i32>,
    pub packaging: Option<String>,
    pub unit_name: Option<String>,
    pub department: Option<String>,
    pub category: String,
    pub subcategory: String,
    pub subtype: String,
    /// `"Mercadona"` or `"Consum"`.
    pub vendor: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Row count per vendor, as returned by [`count_products_by_vendor`].
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct VendorCount {
    pub vendor: String,
    pub products: i64,
}

// ---------------------------------------------------------------------------
// products operations
// ---------------------------------------------------------------------------

/// Replaces every row of `vendor` with `records` in one transaction.
///
/// Rows of other vendors are untouched. Records whose `vendor` differs from
/// `vendor` are skipped. The insert is a single `INSERT … SELECT * FROM
/// UNNEST(…)` so a whole catalog goes in one round-trip.
///
/// Floating fields are bound as `f64` and cast to fixed-scale `NUMERIC`
/// (`size` at `12,3`, prices at `12,4`) by the database engine; this is
/// where scrape-time floats are rounded.
///
/// Returns the number of rows inserted.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if any statement fails; the transaction is
/// rolled back and the previous rows stay in place.
pub async fn replace_vendor_catalog(
    pool: &PgPool,
    vendor: Vendor,
    records: &[CatalogRecord],
) -> Result<u64, DbError> {
    let records: Vec<&CatalogRecord> = records.iter().filter(|r| r.vendor == vendor).collect();

    let mut external_ids: Vec<&str> = Vec::with_capacity(records.len());
    let mut names: Vec<&str> = Vec::with_capacity(records.len());
    let mut brands: Vec<Option<&str>> = Vec::with_capacity(records.len());
    let mut image_urls: Vec<&str> = Vec::with_capacity(records.len());
    let mut sizes: Vec<Option<f64>> = Vec::with_capacity(records.len());
    let mut approx_sizes: Vec<bool> = Vec::with_capacity(records.len());
    let mut size_formats: Vec<Option<&str>> = Vec::with_capacity(records.len());
    let mut prices: Vec<f64> = Vec::with_capacity(records.len());
    let mut prices_per_size: Vec<f64> = Vec::with_capacity(records.len());
    let mut packs: Vec<bool> = Vec::with_capacity(records.len());
    let mut total_units: Vec<Option<i64>> = Vec::with_capacity(records.len());
    let mut packagings: Vec<Option<&str>> = Vec::with_capacity(records.len());
    let mut unit_names: Vec<Option<&str>> = Vec::with_capacity(records.len());
    let mut departments: Vec<Option<&str>> = Vec::with_capacity(records.len());
    let mut categories: Vec<&str> = Vec::with_capacity(records.len());
    let mut subcategories: Vec<&str> = Vec::with_capacity(records.len());
    let mut subtypes: Vec<&str> = Vec::with_capacity(records.len());

    for record in &records {
        external_ids.push(&record.external_id);
        names.push(&record.name);
        brands.push(record.brand.as_deref());
        image_urls.push(&record.image_url);
        sizes.push(record.size);
        approx_sizes.push(record.is_approx_size);
        size_formats.push(record.size_format.as_deref());
        prices.push(record.price);
        prices_per_size.push(record.price_per_size);
        packs.push(record.is_pack);
        total_units.push(record.total_units.map(i64::from));
        packagings.push(record.packaging.as_deref());
        unit_names.push(record.unit_name.as_deref());
        departments.push(record.department.as_deref());
        categories.push(&record.category);
        subcategories.push(&record.subcategory);
        subtypes.push(&record.subtype);
    }

    let mut tx = pool.begin().await?;

    let deleted = sqlx::query("DELETE FROM products WHERE vendor = $1")
        .bind(vendor.name())
        .execute(&mut *tx)
        .await?
        .rows_affected();

    let inserted = if records.is_empty() {
        0
    } else {
        sqlx::query(
            "INSERT INTO products \
                 (vendor, external_id, name, brand, image_url, size, is_approx_size, \
                  size_format, price, price_per_size, is_pack, total_units, packaging, \
                  unit_name, department, category, subcategory, subtype) \
             SELECT $1, t.external_id, t.name, t.brand, t.image_url, \
                    t.size::numeric(12,3), t.is_approx_size, t.size_format, \
                    t.price::numeric(12,4), t.price_per_size::numeric(12,4), t.is_pack, \
                    t.total_units::integer, t.packaging, t.unit_name, t.department, \
                    t.category, t.subcategory, t.subtype \
             FROM UNNEST(\
                  $2::text[], $3::text[], $4::text[], $5::text[], $6::float8[], $7::bool[], \
                  $8::text[], $9::float8[], $10::float8[], $11::bool[], $12::int8[], \
                  $13::text[], $14::text[], $15::text[], $16::text[], $17::text[], $18::text[]) \
                  AS t(external_id, name, brand, image_url, size, is_approx_size, \
                       size_format, price, price_per_size, is_pack, total_units, packaging, \
                       unit_name, department, category, subcategory, subtype)",
        )
        .bind(vendor.name())
        .bind(&external_ids)
        .bind(&names)
        .bind(&brands)
        .bind(&image_urls)
        .bind(&sizes)
        .bind(&approx_sizes)
        .bind(&size_formats)
        .bind(&prices)
        .bind(&prices_per_size)
        .bind(&packs)
        .bind(&total_units)
        .bind(&packagings)
        .bind(&unit_names)
        .bind(&departments)
        .bind(&categories)
        .bind(&subcategories)
        .bind(&subtypes)
        .execute(&mut *tx)
        .await?
        .rows_affected()
    };

    tx.commit().await?;

    tracing::debug!(vendor = %vendor, deleted, inserted, "replaced vendor catalog");
    Ok(inserted)
}

/// Returns up to `limit` products, optionally restricted to one vendor,
/// ordered by vendor and then by catalog position.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_products(
    pool: &PgPool,
    vendor: Option<Vendor>,
    limit: i64,
) -> Result<Vec<ProductRow>, DbError> {
    let rows = sqlx::query_as::<_, ProductRow>(
        "SELECT id, external_id, name, brand, image_url, size, is_approx_size, size_format, \
                price, price_per_size, is_pack, total_units, packaging, unit_name, \
                department, category, subcategory, subtype, vendor, created_at, updated_at \
         FROM products \
         WHERE ($1::text IS NULL OR vendor = $1) \
         ORDER BY vendor, id \
         LIMIT $2",
    )
    .bind(vendor.map(Vendor::name))
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Returns the number of stored products per vendor, vendors with no rows
/// omitted.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn count_products_by_vendor(pool: &PgPool) -> Result<Vec<VendorCount>, DbError> {
    let rows = sqlx::query_as::<_, VendorCount>(
        "SELECT vendor, COUNT(*) AS products \
         FROM products \
         GROUP BY vendor \
         ORDER BY vendor",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
