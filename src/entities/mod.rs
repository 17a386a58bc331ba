//! Entity module - Contains all SeaORM entity definitions for the in-memory store.
//! Each entity has a Model struct for data and an Entity struct for operations.
//! Status-like columns are stored as text through `DeriveActiveEnum` enums.

pub mod account;
pub mod audit_log;
pub mod budget;
pub mod budget_approval;
pub mod budget_item;
pub mod budget_transfer;
pub mod report;
pub mod session;
pub mod setting;
pub mod system_user;

// Re-export specific types to avoid conflicts
pub use account::{Entity as Account, Model as AccountModel, Role};
pub use audit_log::{Entity as AuditLog, Model as AuditLogModel, Severity};
pub use budget::{BudgetStatus, Entity as Budget, Model as BudgetModel};
pub use budget_approval::{ApprovalStatus, Entity as BudgetApproval, Model as BudgetApprovalModel};
pub use budget_item::{Entity as BudgetItem, ItemStatus, Model as BudgetItemModel};
pub use budget_transfer::{Entity as BudgetTransfer, Model as BudgetTransferModel, TransferStatus};
pub use report::{Entity as Report, Model as ReportModel, ReportType};
pub use session::{Entity as Session, Model as SessionModel};
pub use setting::{Entity as Setting, Model as SettingModel};
pub use system_user::{Entity as SystemUser, Model as SystemUserModel, UserStatus};
