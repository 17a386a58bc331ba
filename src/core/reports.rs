//! Report business logic - saved report definitions and the chart series on the reports page.
//!
//! Report contents are not computed: generating a report records its definition, and
//! exporting one only returns the confirmation text. The chart series are fixed demo data.

use crate::{
    core::{matches_term, new_id},
    entities::{Report, ReportType, report},
    errors::{Error, Result},
};
use chrono::{DateTime, Datelike, Utc};
use sea_orm::{ActiveEnum, QueryOrder, Set, prelude::*};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{info, instrument};

/// Creator recorded on generated reports
pub const GENERATED_BY: &str = "Usuario actual";

/// Filters a report is generated with. All are optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    /// First day covered (`YYYY-MM-DD`)
    pub date_from: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// Last day covered (`YYYY-MM-DD`)
    pub date_to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// Budget the report is restricted to
    pub budget_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// Budget items the report is restricted to
    pub item_ids: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// Item or transfer status to keep
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// Item category to keep
    pub category: Option<String>,
}

impl ReportFilters {
    /// Filters covering an inclusive date range (`YYYY-MM-DD`).
    #[must_use]
    pub fn period(from: &str, to: &str) -> Self {
        Self {
            date_from: Some(from.to_string()),
            date_to: Some(to.to_string()),
            ..Self::default()
        }
    }

    /// Restricts the filters to one budget.
    #[must_use]
    pub fn for_budget(mut self, budget_id: &str) -> Self {
        self.budget_id = Some(budget_id.to_string());
        self
    }
}

/// One month of budget execution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExecutionData {
    /// Short Spanish month name
    pub month: &'static str,
    /// Amount budgeted for the month
    pub budgeted: f64,
    /// Amount spent in the month
    pub executed: f64,
    /// `budgeted - executed`
    pub remaining: f64,
    /// Executed share of the budget, in percent
    pub percentage: i32,
}

/// One month of transfer activity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransferData {
    /// Short Spanish month name
    pub month: &'static str,
    /// Transfers approved
    pub approved: u32,
    /// Transfers still pending
    pub pending: u32,
    /// Transfers rejected
    pub rejected: u32,
    /// All transfers requested in the month
    pub total: u32,
}

/// Impact of a change on the audit chart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Impact {
    /// Routine change
    Low,
    /// Noticeable change
    Medium,
    /// Change to money or access
    High,
}

/// One row of the change audit shown on the reports page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuditData {
    /// Day of the change (`YYYY-MM-DD`)
    pub date: &'static str,
    /// Who made the change
    pub user: &'static str,
    /// What was done
    pub action: &'static str,
    /// What was changed
    pub entity: &'static str,
    /// Free-text description
    pub details: &'static str,
    /// How much the change matters
    pub impact: Impact,
}

/// Export formats offered for a report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportExportFormat {
    /// Spreadsheet
    Excel,
    /// Printable document
    Pdf,
}

impl fmt::Display for ReportExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Excel => write!(f, "EXCEL"),
            Self::Pdf => write!(f, "PDF"),
        }
    }
}

/// Saved reports, newest first.
pub async fn get_reports(db: &DatabaseConnection) -> Result<Vec<report::Model>> {
    Report::find()
        .order_by_desc(report::Column::CreatedAt)
        .order_by_asc(report::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Saved reports whose name or description contains the term.
pub async fn search_reports(db: &DatabaseConnection, term: &str) -> Result<Vec<report::Model>> {
    let reports = get_reports(db).await?;
    Ok(reports
        .into_iter()
        .filter(|r| matches_term(&r.name, term) || matches_term(&r.description, term))
        .collect())
}

/// Number of saved reports created in the same calendar month as `now`.
pub async fn reports_this_month(db: &DatabaseConnection, now: DateTime<Utc>) -> Result<usize> {
    let reports = get_reports(db).await?;
    Ok(reports
        .iter()
        .filter(|r| r.created_at.year() == now.year() && r.created_at.month() == now.month())
        .count())
}

/// Display name of a generated report, e.g. `"Reporte execution - 5/3/2025"`.
#[must_use]
pub fn generated_report_name(report_type: ReportType, at: DateTime<Utc>) -> String {
    format!(
        "Reporte {} - {}/{}/{}",
        report_type.to_value(),
        at.day(),
        at.month(),
        at.year()
    )
}

/// Records a new report definition.
#[instrument(skip(db))]
pub async fn generate_report(
    db: &DatabaseConnection,
    report_type: ReportType,
    filters: ReportFilters,
) -> Result<report::Model> {
    let now = Utc::now();
    let model = report::ActiveModel {
        id: Set(new_id("report")),
        name: Set(generated_report_name(report_type, now)),
        report_type: Set(report_type),
        description: Set("Reporte generado automáticamente".to_string()),
        created_at: Set(now),
        created_by: Set(GENERATED_BY.to_string()),
        data: Set(serde_json::json!({})),
        filters: Set(serde_json::to_value(&filters)?),
    };

    let report = model.insert(db).await?;
    info!("Generated report {}", report.id);
    Ok(report)
}

/// Deletes a report. Returns whether it existed.
pub async fn delete_report(db: &DatabaseConnection, id: &str) -> Result<bool> {
    let result = Report::delete_by_id(id).exec(db).await?;
    Ok(result.rows_affected > 0)
}

/// Simulated export: checks the report exists and returns the confirmation text.
pub async fn export_report(
    db: &DatabaseConnection,
    id: &str,
    format: ReportExportFormat,
) -> Result<String> {
    if Report::find_by_id(id).one(db).await?.is_none() {
        return Err(Error::ReportNotFound { id: id.to_string() });
    }
    info!("Exporting report {} as {}", id, format);
    Ok(format!("Reporte exportado exitosamente en formato {format}"))
}

/// Monthly budget execution series.
#[must_use]
pub fn execution_data() -> Vec<ExecutionData> {
    [
        ("Ene", 1_000_000.0, 850_000.0, 85),
        ("Feb", 1_200_000.0, 1_100_000.0, 92),
        ("Mar", 1_100_000.0, 950_000.0, 86),
        ("Abr", 1_300_000.0, 1_200_000.0, 92),
        ("May", 1_150_000.0, 980_000.0, 85),
        ("Jun", 1_250_000.0, 1_180_000.0, 94),
    ]
    .into_iter()
    .map(|(month, budgeted, executed, percentage)| ExecutionData {
        month,
        budgeted,
        executed,
        remaining: budgeted - executed,
        percentage,
    })
    .collect()
}

/// Monthly transfer counts series.
#[must_use]
pub fn transfer_data() -> Vec<TransferData> {
    [
        ("Ene", 15, 3, 2),
        ("Feb", 22, 5, 1),
        ("Mar", 18, 7, 3),
        ("Abr", 25, 4, 2),
        ("May", 20, 6, 1),
        ("Jun", 19, 8, 2),
    ]
    .into_iter()
    .map(|(month, approved, pending, rejected)| TransferData {
        month,
        approved,
        pending,
        rejected,
        total: approved + pending + rejected,
    })
    .collect()
}

/// Recent changes shown in the audit chart.
#[must_use]
pub fn audit_data() -> Vec<AuditData> {
    vec![
        AuditData {
            date: "2024-03-30T14:30:00Z",
            user: "María González",
            action: "Modificar presupuesto",
            entity: "Presupuesto 2024",
            details: "Actualización de partida 001-2024",
            impact: Impact::Medium,
        },
        AuditData {
            date: "2024-03-30T11:15:00Z",
            user: "Carlos Rodríguez",
            action: "Aprobar traspaso",
            entity: "Traspaso #TR-2024-045",
            details: "Traspaso de $50,000 entre partidas",
            impact: Impact::High,
        },
        AuditData {
            date: "2024-03-29T16:45:00Z",
            user: "Ana Martínez",
            action: "Crear usuario",
            entity: "Usuario: jperez",
            details: "Nuevo usuario con rol financiero",
            impact: Impact::Low,
        },
        AuditData {
            date: "2024-03-29T09:20:00Z",
            user: "María González",
            action: "Exportar reporte",
            entity: "Reporte de ejecución",
            details: "Exportación a Excel del Q1 2024",
            impact: Impact::Low,
        },
    ]
}
