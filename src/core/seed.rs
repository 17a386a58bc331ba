//! Demo data loaded into the in-memory store at startup.
//!
//! Item derived fields are recomputed from the literal amounts; budget totals are stored
//! as given, so they only start tracking the item sums after the first item mutation.

use crate::{
    core::{admin, reports::ReportFilters, status},
    entities::{
        ApprovalStatus, BudgetStatus, Role, Severity, TransferStatus, UserStatus, account,
        audit_log, budget, budget_approval, budget_item, budget_transfer, report,
        system_user, ReportType,
    },
    errors::{Error, Result},
};
use chrono::{DateTime, TimeZone, Utc};
use sea_orm::{ActiveModelTrait, ConnectionTrait, DatabaseConnection, Set, TransactionTrait};
use tracing::{info, instrument};

const DESKTOP_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> Result<DateTime<Utc>> {
    Utc.with_ymd_and_hms(year, month, day, hour, minute, 0)
        .single()
        .ok_or_else(|| Error::Config {
            message: format!("invalid seed timestamp {year}-{month}-{day} {hour}:{minute}"),
        })
}

/// Loads every demo record in a single transaction.
#[instrument(skip(db))]
pub async fn seed_demo_data(db: &DatabaseConnection) -> Result<()> {
    let txn = db.begin().await?;

    seed_budgets(&txn).await?;
    seed_transfers(&txn).await?;
    seed_accounts(&txn).await?;
    seed_system_users(&txn).await?;
    seed_audit_logs(&txn).await?;
    admin::save_system_config(&txn, &admin::SystemConfig::default()).await?;
    seed_reports(&txn).await?;

    txn.commit().await?;
    info!("Demo data seeded.");
    Ok(())
}

async fn seed_budgets<C: ConnectionTrait>(db: &C) -> Result<()> {
    budget::ActiveModel {
        id: Set("budget-2024".to_string()),
        name: Set("Presupuesto Anual 2024".to_string()),
        year: Set(2024),
        status: Set(BudgetStatus::Active),
        total_budget: Set(2_400_000.0),
        total_spent: Set(1_872_000.0),
        total_available: Set(528_000.0),
        currency: Set("USD".to_string()),
        created_at: Set(at(2024, 1, 1, 0, 0)?),
        created_by: Set("Carlos Administrador".to_string()),
        last_modified: Set(at(2024, 12, 15, 10, 30)?),
    }
    .insert(db)
    .await?;

    budget::ActiveModel {
        id: Set("budget-2025".to_string()),
        name: Set("Presupuesto Anual 2025".to_string()),
        year: Set(2025),
        status: Set(BudgetStatus::Draft),
        total_budget: Set(3_200_000.0),
        total_spent: Set(0.0),
        total_available: Set(3_200_000.0),
        currency: Set("USD".to_string()),
        created_at: Set(at(2024, 12, 1, 0, 0)?),
        created_by: Set("María Financiera".to_string()),
        last_modified: Set(at(2024, 12, 15, 11, 0)?),
    }
    .insert(db)
    .await?;

    let items = [
        ("item-1", "OP-001", "Operaciones Generales", "Operacional", "Operaciones", 850_000.0, 722_500.0, at(2024, 12, 15, 8, 0)?, "María Financiera"),
        ("item-2", "MK-001", "Marketing Digital", "Marketing", "Marketing", 320_000.0, 198_400.0, at(2024, 12, 15, 9, 15)?, "María Financiera"),
        ("item-3", "TI-001", "Infraestructura Tecnológica", "Tecnología", "Tecnología", 450_000.0, 337_500.0, at(2024, 12, 15, 7, 45)?, "Carlos Administrador"),
        ("item-4", "RH-001", "Recursos Humanos", "Personal", "Recursos Humanos", 280_000.0, 266_000.0, at(2024, 12, 15, 10, 30)?, "María Financiera"),
        ("item-5", "AD-001", "Administración General", "Administrativo", "Administración", 180_000.0, 126_000.0, at(2024, 12, 14, 16, 20)?, "Carlos Administrador"),
        ("item-6", "PU-001", "Publicidad Tradicional", "Marketing", "Marketing", 150_000.0, 87_000.0, at(2024, 12, 13, 14, 10)?, "María Financiera"),
    ];

    for (position, (id, code, name, category, department, budget_amount, spent_amount, modified, creator)) in
        (0_i32..).zip(items)
    {
        let derived = status::derive(spent_amount, budget_amount);
        budget_item::ActiveModel {
            id: Set(id.to_string()),
            budget_id: Set("budget-2024".to_string()),
            position: Set(position),
            code: Set(code.to_string()),
            name: Set(name.to_string()),
            category: Set(category.to_string()),
            department: Set(department.to_string()),
            budget_amount: Set(budget_amount),
            spent_amount: Set(spent_amount),
            available_amount: Set(derived.available_amount),
            percentage: Set(derived.percentage),
            status: Set(derived.status),
            last_modified: Set(modified),
            created_by: Set(creator.to_string()),
        }
        .insert(db)
        .await?;
    }

    budget_approval::ActiveModel {
        id: Set("approval-1".to_string()),
        budget_id: Set("budget-2024".to_string()),
        approved_by: Set("Carlos Administrador".to_string()),
        approved_at: Set(at(2024, 1, 5, 10, 0)?),
        status: Set(ApprovalStatus::Approved),
        comments: Set(Some("Presupuesto aprobado para el año fiscal 2024".to_string())),
    }
    .insert(db)
    .await?;

    Ok(())
}

async fn seed_transfers<C: ConnectionTrait>(db: &C) -> Result<()> {
    budget_transfer::ActiveModel {
        id: Set("transfer-1".to_string()),
        from_item_id: Set("item-2".to_string()),
        to_item_id: Set("item-1".to_string()),
        amount: Set(15_000.0),
        reason: Set("Refuerzo para operaciones críticas".to_string()),
        requested_by: Set("María Financiera".to_string()),
        requested_at: Set(at(2024, 12, 15, 8, 0)?),
        approved_by: Set(Some("Carlos Administrador".to_string())),
        approved_at: Set(Some(at(2024, 12, 15, 10, 0)?)),
        status: Set(TransferStatus::Approved),
        comments: Set(Some("Aprobado para cubrir gastos operacionales urgentes".to_string())),
    }
    .insert(db)
    .await?;

    budget_transfer::ActiveModel {
        id: Set("transfer-2".to_string()),
        from_item_id: Set("item-5".to_string()),
        to_item_id: Set("item-4".to_string()),
        amount: Set(25_000.0),
        reason: Set("Contratación de personal adicional".to_string()),
        requested_by: Set("Juan Auditor".to_string()),
        requested_at: Set(at(2024, 12, 15, 9, 30)?),
        approved_by: Set(None),
        approved_at: Set(None),
        status: Set(TransferStatus::Pending),
        comments: Set(None),
    }
    .insert(db)
    .await?;

    Ok(())
}

async fn seed_accounts<C: ConnectionTrait>(db: &C) -> Result<()> {
    let accounts = [
        ("1", "admin@empresa.com", "Carlos Administrador", Role::Administrador),
        ("2", "financiero@empresa.com", "María Financiera", Role::Financiero),
        ("3", "auditor@empresa.com", "Juan Auditor", Role::Auditor),
        ("4", "invitado@empresa.com", "Ana Invitada", Role::Invitado),
    ];

    let created_at = at(2024, 1, 1, 0, 0)?;
    let now = Utc::now();
    for (id, email, name, role) in accounts {
        account::ActiveModel {
            id: Set(id.to_string()),
            email: Set(email.to_string()),
            name: Set(name.to_string()),
            role: Set(role),
            company: Set("Empresa Demo".to_string()),
            avatar: Set(None),
            created_at: Set(created_at),
            last_login: Set(now),
        }
        .insert(db)
        .await?;
    }
    Ok(())
}

async fn seed_system_users<C: ConnectionTrait>(db: &C) -> Result<()> {
    let users = [
        ("1", "María González", "maria.gonzalez@empresa.com", Role::Administrador, UserStatus::Active, at(2024, 3, 30, 14, 30)?, at(2024, 1, 15, 10, 0)?, vec!["all"], "Administración", "+1-809-555-0101"),
        ("2", "Carlos Rodríguez", "carlos.rodriguez@empresa.com", Role::Financiero, UserStatus::Active, at(2024, 3, 30, 11, 15)?, at(2024, 1, 20, 9, 30)?, vec!["budgets", "transfers", "reports"], "Finanzas", "+1-809-555-0102"),
        ("3", "Ana Martínez", "ana.martinez@empresa.com", Role::Auditor, UserStatus::Active, at(2024, 3, 29, 16, 45)?, at(2024, 2, 1, 14, 0)?, vec!["reports", "audit"], "Auditoría", "+1-809-555-0103"),
        ("4", "Juan Pérez", "juan.perez@empresa.com", Role::Invitado, UserStatus::Inactive, at(2024, 3, 25, 8, 20)?, at(2024, 2, 15, 11, 30)?, vec!["view"], "Consultoría", "+1-809-555-0104"),
    ];

    for (id, name, email, role, status, last_login, created_at, permissions, department, phone) in users {
        system_user::ActiveModel {
            id: Set(id.to_string()),
            name: Set(name.to_string()),
            email: Set(email.to_string()),
            role: Set(role),
            status: Set(status),
            last_login: Set(Some(last_login)),
            created_at: Set(created_at),
            permissions: Set(serde_json::json!(permissions)),
            department: Set(Some(department.to_string())),
            phone: Set(Some(phone.to_string())),
        }
        .insert(db)
        .await?;
    }
    Ok(())
}

async fn seed_audit_logs<C: ConnectionTrait>(db: &C) -> Result<()> {
    // Oldest first so sequence numbers follow time
    let logs = [
        (at(2024, 3, 30, 13, 45)?, "1", "María González", "CREATE_USER", "Usuario", Some("4"), "Creación de nuevo usuario: juan.perez@empresa.com", "192.168.1.100", Severity::Medium),
        (at(2024, 3, 30, 14, 20)?, "2", "Carlos Rodríguez", "APPROVE_TRANSFER", "Traspaso", Some("TR-2024-045"), "Aprobación de traspaso por $50,000", "192.168.1.101", Severity::High),
        (at(2024, 3, 30, 14, 25)?, "2", "Carlos Rodríguez", "UPDATE_BUDGET", "Presupuesto", Some("1"), "Modificación de partida presupuestaria 001-2024", "192.168.1.101", Severity::Medium),
        (at(2024, 3, 30, 14, 30)?, "1", "María González", "LOGIN", "Sistema", None, "Inicio de sesión exitoso", "192.168.1.100", Severity::Low),
    ];

    for (timestamp, user_id, user_name, action, entity, entity_id, details, ip_address, severity) in logs {
        audit_log::ActiveModel {
            timestamp: Set(timestamp),
            user_id: Set(user_id.to_string()),
            user_name: Set(user_name.to_string()),
            action: Set(action.to_string()),
            entity: Set(entity.to_string()),
            entity_id: Set(entity_id.map(str::to_string)),
            details: Set(details.to_string()),
            ip_address: Set(ip_address.to_string()),
            user_agent: Set(DESKTOP_AGENT.to_string()),
            severity: Set(severity),
            ..Default::default()
        }
        .insert(db)
        .await?;
    }
    Ok(())
}

async fn seed_reports<C: ConnectionTrait>(db: &C) -> Result<()> {
    let reports = [
        ("1", "Ejecución Presupuestaria Q1 2024", ReportType::Execution, "Reporte de ejecución del primer trimestre", at(2024, 3, 31, 10, 0)?, "María González", ReportFilters::period("2024-01-01", "2024-03-31").for_budget("1")),
        ("2", "Traspasos Marzo 2024", ReportType::Transfers, "Análisis de traspasos del mes de marzo", at(2024, 3, 31, 15, 30)?, "Carlos Rodríguez", ReportFilters::period("2024-03-01", "2024-03-31")),
        ("3", "Auditoría de Cambios", ReportType::Audit, "Registro de cambios y modificaciones", at(2024, 3, 30, 9, 15)?, "Ana Martínez", ReportFilters::period("2024-03-01", "2024-03-30")),
    ];

    for (id, name, report_type, description, created_at, created_by, filters) in reports {
        report::ActiveModel {
            id: Set(id.to_string()),
            name: Set(name.to_string()),
            report_type: Set(report_type),
            description: Set(description.to_string()),
            created_at: Set(created_at),
            created_by: Set(created_by.to_string()),
            data: Set(serde_json::json!({})),
            filters: Set(serde_json::to_value(&filters)?),
        }
        .insert(db)
        .await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::{
        core::budget::get_budget_items,
        entities::{Account, AuditLog, ItemStatus, Report, SystemUser},
        test_utils::setup_seeded_db,
    };
    use sea_orm::EntityTrait;

    #[tokio::test]
    async fn test_seeded_counts() -> Result<()> {
        let db = setup_seeded_db().await?;

        assert_eq!(Account::find().all(&db).await?.len(), 4);
        assert_eq!(SystemUser::find().all(&db).await?.len(), 4);
        assert_eq!(AuditLog::find().all(&db).await?.len(), 4);
        assert_eq!(Report::find().all(&db).await?.len(), 3);
        Ok(())
    }

    #[tokio::test]
    async fn test_seeded_items_have_recomputed_status() -> Result<()> {
        let db = setup_seeded_db().await?;

        let items = get_budget_items(&db, "budget-2024").await?;
        let statuses: Vec<ItemStatus> = items.iter().map(|i| i.status).collect();
        assert_eq!(
            statuses,
            [
                ItemStatus::Warning,
                ItemStatus::Healthy,
                ItemStatus::Warning,
                ItemStatus::Critical,
                ItemStatus::Healthy,
                ItemStatus::Healthy,
            ]
        );
        Ok(())
    }
}
