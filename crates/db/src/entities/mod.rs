//! `SeaORM` entity definitions for all Pelita tables.

pub mod sea_orm_active_enums;

pub mod accounts;
pub mod attendance_records;
pub mod chat_messages;
pub mod class_groups;
pub mod credit_packages;
pub mod credit_transactions;
pub mod grades;
pub mod invoices;
pub mod journal_entries;
pub mod journals;
pub mod schedules;
pub mod sessions;
pub mod students;
pub mod teachers;
pub mod users;
