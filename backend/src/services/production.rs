//! Production planning service
//!
//! Loads article master data and previous-year sales history, invokes the
//! planning engine, and persists the result as a labeled run. Persistence is
//! all-or-nothing: line items reference the run header, so a failed write
//! aborts the whole invocation.

use std::collections::HashMap;

use chrono::{DateTime, Datelike, Utc};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::config::PlanningDefaults;
use crate::error::{AppError, AppResult};
use crate::models::{
    Article, ComputePlanRequest, MonthlySeries, ProductionConfig, ProductionDecision,
    ProductionInput, ProductionRun, ProductionRunDetail,
};
use shared::forecast::plan_production;
use shared::types::ProductionPriority;
use shared::validation::{validate_production_config, validate_sku};

/// Production planning service
#[derive(Clone)]
pub struct ProductionPlanningService {
    db: PgPool,
    defaults: PlanningDefaults,
}

/// Row for run header queries
#[derive(Debug, sqlx::FromRow)]
struct RunRow {
    id: Uuid,
    label: Option<String>,
    coverage_days: f64,
    safety_buffer_days: f64,
    holiday_lead_time_days: i64,
    holiday_factor: f64,
    item_count: i64,
    created_by: Option<Uuid>,
    created_at: DateTime<Utc>,
}

impl From<RunRow> for ProductionRun {
    fn from(row: RunRow) -> Self {
        ProductionRun {
            id: row.id,
            label: row.label,
            coverage_days: row.coverage_days,
            safety_buffer_days: row.safety_buffer_days,
            holiday_lead_time_days: row.holiday_lead_time_days,
            holiday_factor: row.holiday_factor,
            item_count: row.item_count,
            created_by: row.created_by,
            created_at: row.created_at,
        }
    }
}

/// Row for run line item queries
#[derive(Debug, sqlx::FromRow)]
struct RunItemRow {
    sku: String,
    name: String,
    current_stock: f64,
    min_stock: f64,
    daily_usage: f64,
    days_until_stockout: f64,
    desired_stock: f64,
    amount_to_produce: f64,
    must_produce: bool,
    priority: String,
    used_fallback: bool,
}

impl ProductionPlanningService {
    /// Create a new ProductionPlanningService instance
    pub fn new(db: PgPool, defaults: PlanningDefaults) -> Self {
        Self { db, defaults }
    }

    /// Compute the production plan for the supplied stock snapshot and
    /// persist it as a run
    pub async fn compute_and_persist(
        &self,
        user_id: Uuid,
        request: ComputePlanRequest,
    ) -> AppResult<ProductionRunDetail> {
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

        let config = ProductionConfig {
            coverage_days: request.coverage_days.unwrap_or(self.defaults.coverage_days),
            safety_buffer_days: request
                .safety_buffer_days
                .unwrap_or(self.defaults.safety_buffer_days),
            holiday_lead_time_days: request
                .holiday_lead_time_days
                .unwrap_or(self.defaults.holiday_lead_time_days),
        };
        validate_production_config(&config).map_err(|message| AppError::Validation {
            field: "config".to_string(),
            message: message.to_string(),
            message_de: "Ungültige Planungskonfiguration".to_string(),
        })?;

        // Wall clock is read once here; the engine itself is pure
        let today = Utc::now().date_naive();
        let history_year = today.year() - 1;

        // Normalize the snapshot; rows without a usable SKU are skipped the
        // same way invalid month values are
        let mut snapshot = Vec::with_capacity(request.items.len());
        for row in &request.items {
            let sku = row.sku.trim().to_string();
            if validate_sku(&sku).is_err() {
                tracing::warn!("Skipping snapshot row with unusable SKU: {:?}", row.sku);
                continue;
            }
            snapshot.push((sku, row.name.clone(), row.stock_or_default()));
        }
        if snapshot.is_empty() {
            return Err(AppError::Validation {
                field: "items".to_string(),
                message: "Stock snapshot contains no usable rows".to_string(),
                message_de: "Bestandsliste enthält keine verwertbaren Zeilen".to_string(),
            });
        }

        let skus: Vec<String> = snapshot.iter().map(|(sku, _, _)| sku.clone()).collect();
        let articles = self.load_articles(&skus).await?;
        let mut series = self.load_sales_series(history_year, &skus).await?;

        // Production joins are case-sensitive on the trimmed SKU
        let inputs: Vec<ProductionInput> = snapshot
            .into_iter()
            .map(|(sku, row_name, current_stock)| {
                let master = articles.get(&sku);
                let name = master
                    .map(|a| a.name.clone())
                    .or(row_name)
                    .unwrap_or_else(|| sku.clone());
                ProductionInput {
                    name,
                    current_stock,
                    min_stock: master.map(|a| a.min_stock).unwrap_or(0.0),
                    history: series.remove(&sku),
                    sku,
                }
            })
            .collect();

        let plan = plan_production(&inputs, &config, today);

        tracing::info!(
            items = plan.decisions.len(),
            holiday_factor = plan.holiday_factor,
            "Computed production plan"
        );

        let run = self
            .persist_run(user_id, &request.label, &config, &plan.decisions, plan.holiday_factor)
            .await?;

        Ok(ProductionRunDetail {
            run,
            items: plan.decisions,
        })
    }

    /// List persisted run headers, newest first
    pub async fn list_runs(&self) -> AppResult<Vec<ProductionRun>> {
        let rows = sqlx::query_as::<_, RunRow>(
            r#"
            SELECT id, label, coverage_days, safety_buffer_days, holiday_lead_time_days,
                   holiday_factor, item_count, created_by, created_at
            FROM production_runs
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(ProductionRun::from).collect())
    }

    /// Get one run with its line items in stored order
    pub async fn get_run(&self, run_id: Uuid) -> AppResult<ProductionRunDetail> {
        let run = sqlx::query_as::<_, RunRow>(
            r#"
            SELECT id, label, coverage_days, safety_buffer_days, holiday_lead_time_days,
                   holiday_factor, item_count, created_by, created_at
            FROM production_runs
            WHERE id = $1
            "#,
        )
        .bind(run_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Production run".to_string()))?;

        let rows = sqlx::query_as::<_, RunItemRow>(
            r#"
            SELECT sku, name, current_stock, min_stock, daily_usage, days_until_stockout,
                   desired_stock, amount_to_produce, must_produce, priority, used_fallback
            FROM production_run_items
            WHERE run_id = $1
            ORDER BY position ASC
            "#,
        )
        .bind(run_id)
        .fetch_all(&self.db)
        .await?;

        let items = rows
            .into_iter()
            .map(|row| {
                let priority = ProductionPriority::parse(&row.priority).ok_or_else(|| {
                    AppError::Internal(format!("Unknown priority in stored run: {}", row.priority))
                })?;
                Ok(ProductionDecision {
                    sku: row.sku,
                    name: row.name,
                    current_stock: row.current_stock,
                    min_stock: row.min_stock,
                    daily_usage: row.daily_usage,
                    days_until_stockout: row.days_until_stockout,
                    desired_stock: row.desired_stock,
                    amount_to_produce: row.amount_to_produce,
                    must_produce: row.must_produce,
                    priority,
                    used_fallback: row.used_fallback,
                })
            })
            .collect::<AppResult<Vec<_>>>()?;

        Ok(ProductionRunDetail {
            run: ProductionRun::from(run),
            items,
        })
    }

    /// Load article master records for the given SKUs
    async fn load_articles(&self, skus: &[String]) -> AppResult<HashMap<String, Article>> {
        let rows = sqlx::query_as::<_, (String, String, f64)>(
            "SELECT sku, name, min_stock FROM articles WHERE sku = ANY($1)",
        )
        .bind(skus)
        .fetch_all(&self.db)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(sku, name, min_stock)| {
                let key = sku.clone();
                (key, Article { sku, name, min_stock })
            })
            .collect())
    }

    /// Load previous-year monthly sales for the given SKUs
    async fn load_sales_series(
        &self,
        year: i32,
        skus: &[String],
    ) -> AppResult<HashMap<String, MonthlySeries>> {
        let rows = sqlx::query_as::<_, (String, i32, f64)>(
            r#"
            SELECT sku, month, quantity
            FROM article_sales
            WHERE year = $1 AND sku = ANY($2)
            "#,
        )
        .bind(year)
        .bind(skus)
        .fetch_all(&self.db)
        .await?;

        let mut map: HashMap<String, MonthlySeries> = HashMap::new();
        for (sku, month, quantity) in rows {
            let series = map
                .entry(sku.clone())
                .or_insert_with(|| MonthlySeries::new(sku, year));
            if (1..=12).contains(&month) {
                series.set((month - 1) as u32, quantity);
            }
        }
        Ok(map)
    }

    /// Persist the run header and its line items in one transaction
    async fn persist_run(
        &self,
        user_id: Uuid,
        label: &Option<String>,
        config: &ProductionConfig,
        decisions: &[ProductionDecision],
        holiday_factor: f64,
    ) -> AppResult<ProductionRun> {
        let run_id = Uuid::new_v4();
        let mut tx = self.db.begin().await?;

        let created_at = sqlx::query_scalar::<_, DateTime<Utc>>(
            r#"
            INSERT INTO production_runs (
                id, label, coverage_days, safety_buffer_days, holiday_lead_time_days,
                holiday_factor, item_count, created_by
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING created_at
            "#,
        )
        .bind(run_id)
        .bind(label)
        .bind(config.coverage_days)
        .bind(config.safety_buffer_days)
        .bind(config.holiday_lead_time_days)
        .bind(holiday_factor)
        .bind(decisions.len() as i64)
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await?;

        for (position, decision) in decisions.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO production_run_items (
                    run_id, position, sku, name, current_stock, min_stock, daily_usage,
                    days_until_stockout, desired_stock, amount_to_produce, must_produce,
                    priority, used_fallback
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
                "#,
            )
            .bind(run_id)
            .bind(position as i32)
            .bind(&decision.sku)
            .bind(&decision.name)
            .bind(decision.current_stock)
            .bind(decision.min_stock)
            .bind(decision.daily_usage)
            .bind(decision.days_until_stockout)
            .bind(decision.desired_stock)
            .bind(decision.amount_to_produce)
            .bind(decision.must_produce)
            .bind(decision.priority.as_str())
            .bind(decision.used_fallback)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(ProductionRun {
            id: run_id,
            label: label.clone(),
            coverage_days: config.coverage_days,
            safety_buffer_days: config.safety_buffer_days,
            holiday_lead_time_days: config.holiday_lead_time_days,
            holiday_factor,
            item_count: decisions.len() as i64,
            created_by: Some(user_id),
            created_at,
        })
    }
}
