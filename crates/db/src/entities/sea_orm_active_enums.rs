//! Database enum types mapped to PostgreSQL enums.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Role of an application user.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "user_role")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Full administrative access.
    #[sea_orm(string_value = "admin")]
    Admin,
    /// Administrative staff.
    #[sea_orm(string_value = "staff")]
    Staff,
    /// Teaching staff.
    #[sea_orm(string_value = "teacher")]
    Teacher,
}

/// Enrollment status of a student.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "student_status")]
#[serde(rename_all = "lowercase")]
pub enum StudentStatus {
    /// Currently enrolled.
    #[sea_orm(string_value = "active")]
    Active,
    /// Temporarily not attending.
    #[sea_orm(string_value = "inactive")]
    Inactive,
    /// Finished school.
    #[sea_orm(string_value = "graduated")]
    Graduated,
}

/// Attendance status for one student on one scheduled lesson.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "attendance_status")]
#[serde(rename_all = "lowercase")]
pub enum AttendanceStatus {
    /// Present in class.
    #[sea_orm(string_value = "present")]
    Present,
    /// Absent due to illness.
    #[sea_orm(string_value = "sick")]
    Sick,
    /// Absent with permission.
    #[sea_orm(string_value = "excused")]
    Excused,
    /// Absent without notice.
    #[sea_orm(string_value = "absent")]
    Absent,
}

/// Kind of graded assessment.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "assessment_kind")]
#[serde(rename_all = "lowercase")]
pub enum AssessmentKind {
    /// Regular class assignment.
    #[sea_orm(string_value = "assignment")]
    Assignment,
    /// Midterm exam.
    #[sea_orm(string_value = "midterm")]
    Midterm,
    /// Final exam.
    #[sea_orm(string_value = "final")]
    Final,
}

/// Account classification in the chart of accounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "account_type")]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    /// Assets (cash, receivables).
    #[sea_orm(string_value = "asset")]
    Asset,
    /// Liabilities (tax payable).
    #[sea_orm(string_value = "liability")]
    Liability,
    /// Equity.
    #[sea_orm(string_value = "equity")]
    Equity,
    /// Income / revenue.
    #[sea_orm(string_value = "income")]
    Income,
    /// Expenses.
    #[sea_orm(string_value = "expense")]
    Expense,
}

/// Posting role an account plays for invoice journals.
///
/// Replaces free-text name matching with an explicit, stable tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "account_role")]
#[serde(rename_all = "snake_case")]
pub enum AccountRole {
    /// Accounts receivable, debited for the gross invoice amount.
    #[sea_orm(string_value = "receivable")]
    Receivable,
    /// Revenue, credited for the net portion.
    #[sea_orm(string_value = "revenue")]
    Revenue,
    /// Output tax liability, credited for the tax portion.
    #[sea_orm(string_value = "tax_output")]
    TaxOutput,
}

/// Kind of journal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "journal_kind")]
#[serde(rename_all = "lowercase")]
pub enum JournalKind {
    /// Records an original financial event.
    #[sea_orm(string_value = "standard")]
    Standard,
    /// Negates a prior journal.
    #[sea_orm(string_value = "reversal")]
    Reversal,
}

/// Lifecycle status of an invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "invoice_status")]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    /// Issued, awaiting payment.
    #[sea_orm(string_value = "pending")]
    Pending,
    /// Paid in full.
    #[sea_orm(string_value = "paid")]
    Paid,
    /// Cancelled. Terminal.
    #[sea_orm(string_value = "batal")]
    Batal,
}

/// Kind of credit transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "credit_kind")]
#[serde(rename_all = "lowercase")]
pub enum CreditKind {
    /// Hours added by buying a package.
    #[sea_orm(string_value = "purchase")]
    Purchase,
    /// Hours drawn down by lessons.
    #[sea_orm(string_value = "consumption")]
    Consumption,
}
