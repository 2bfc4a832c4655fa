//! Raw-material reorder analysis service
//!
//! Loads material master data and the target year's consumption history,
//! invokes the reorder analyzer, and returns the sorted classification.
//! Analysis results are not persisted.

use std::collections::HashMap;

use chrono::{Datelike, Utc};
use sqlx::PgPool;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::models::{
    parse_lead_time_months, AnalyzeRequest, MonthlySeries, RawMaterial, ReorderAnalysis,
    ReorderInput,
};
use shared::forecast::analyze_reorder;
use shared::types::StockStatus;
use shared::validation::{validate_sku, validate_target_year};

/// Reorder analysis service
#[derive(Clone)]
pub struct ReorderAnalysisService {
    db: PgPool,
}

impl ReorderAnalysisService {
    /// Create a new ReorderAnalysisService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Analyze the supplied stock snapshot against the target year's
    /// consumption history
    pub async fn analyze(&self, request: AnalyzeRequest) -> AppResult<ReorderAnalysis> {
        request
            .validate()
            .map_err(|e| AppError::ValidationError(e.to_string()))?;

        if request.items.is_empty() {
            return Err(AppError::Validation {
                field: "items".to_string(),
                message: "Stock snapshot must not be empty".to_string(),
                message_de: "Bestandsliste darf nicht leer sein".to_string(),
            });
        }

        // Wall clock is read once here; the engine itself is pure
        let today = Utc::now().date_naive();
        let year = request.year.unwrap_or_else(|| today.year());
        validate_target_year(year).map_err(|message| AppError::Validation {
            field: "year".to_string(),
            message: message.to_string(),
            message_de: "Jahr außerhalb des unterstützten Bereichs".to_string(),
        })?;

        // Normalize the snapshot; material lookups are case-insensitive, so
        // the join key is the lower-cased trimmed SKU
        let mut snapshot = Vec::with_capacity(request.items.len());
        for row in &request.items {
            let sku = row.sku.trim().to_string();
            if validate_sku(&sku).is_err() {
                tracing::warn!("Skipping snapshot row with unusable SKU: {:?}", row.sku);
                continue;
            }
            let key = sku.to_lowercase();
            snapshot.push((sku, key, row.name.clone(), row.stock_or_default()));
        }
        if snapshot.is_empty() {
            return Err(AppError::Validation {
                field: "items".to_string(),
                message: "Stock snapshot contains no usable rows".to_string(),
                message_de: "Bestandsliste enthält keine verwertbaren Zeilen".to_string(),
            });
        }

        let keys: Vec<String> = snapshot.iter().map(|(_, key, _, _)| key.clone()).collect();
        let materials = self.load_materials(&keys).await?;
        let mut series = self.load_consumption_series(year, &keys).await?;

        let inputs: Vec<ReorderInput> = snapshot
            .into_iter()
            .map(|(sku, key, row_name, current_stock)| {
                let master = materials.get(&key);
                let name = master
                    .map(|m| m.name.clone())
                    .or(row_name)
                    .unwrap_or_else(|| sku.clone());
                let lead_time_months =
                    master.and_then(|m| parse_lead_time_months(m.lead_time_months.as_deref()));
                ReorderInput {
                    sku,
                    name,
                    current_stock,
                    lead_time_months,
                    history: series.remove(&key),
                }
            })
            .collect();

        let items = analyze_reorder(&inputs, today);

        let count_of = |status: StockStatus| items.iter().filter(|i| i.status == status).count();
        let analysis = ReorderAnalysis {
            year,
            item_count: items.len(),
            critical_count: count_of(StockStatus::Critical),
            warning_count: count_of(StockStatus::Warning),
            attention_count: count_of(StockStatus::Attention),
            sufficient_count: count_of(StockStatus::Sufficient),
            items,
        };

        tracing::info!(
            year,
            items = analysis.item_count,
            critical = analysis.critical_count,
            "Analyzed raw-material coverage"
        );

        Ok(analysis)
    }

    /// Load material master records keyed by lower-cased SKU
    async fn load_materials(&self, keys: &[String]) -> AppResult<HashMap<String, RawMaterial>> {
        let rows = sqlx::query_as::<_, (String, String, Option<String>)>(
            "SELECT sku, name, lead_time_months FROM raw_materials WHERE LOWER(sku) = ANY($1)",
        )
        .bind(keys)
        .fetch_all(&self.db)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(sku, name, lead_time_months)| {
                let key = sku.to_lowercase();
                (
                    key,
                    RawMaterial {
                        sku,
                        name,
                        lead_time_months,
                    },
                )
            })
            .collect())
    }

    /// Load the target year's monthly consumption keyed by lower-cased SKU
    async fn load_consumption_series(
        &self,
        year: i32,
        keys: &[String],
    ) -> AppResult<HashMap<String, MonthlySeries>> {
        let rows = sqlx::query_as::<_, (String, i32, f64)>(
            r#"
            SELECT sku, month, quantity
            FROM material_consumption
            WHERE year = $1 AND LOWER(sku) = ANY($2)
            "#,
        )
        .bind(year)
        .bind(keys)
        .fetch_all(&self.db)
        .await?;

        let mut map: HashMap<String, MonthlySeries> = HashMap::new();
        for (sku, month, quantity) in rows {
            let key = sku.to_lowercase();
            let series = map
                .entry(key)
                .or_insert_with(|| MonthlySeries::new(sku, year));
            if (1..=12).contains(&month) {
                series.set((month - 1) as u32, quantity);
            }
        }
        Ok(map)
    }
}
