//! Repository abstractions for data access.
//!
//! One repository per aggregate, each owning a `DatabaseConnection` clone
//! and exposing typed inputs, filters, and `thiserror` error enums.

pub mod account;
pub mod attendance;
pub mod chat;
pub mod class_group;
pub mod credit;
pub mod grade;
pub mod invoice;
pub mod journal;
pub mod session;
pub mod student;
pub mod teacher;
pub mod user;

pub use account::AccountRepository;
pub use attendance::AttendanceRepository;
pub use chat::ChatRepository;
pub use class_group::ClassGroupRepository;
pub use credit::CreditRepository;
pub use grade::GradeRepository;
pub use invoice::InvoiceRepository;
pub use journal::JournalRepository;
pub use session::SessionRepository;
pub use student::StudentRepository;
pub use teacher::TeacherRepository;
pub use user::UserRepository;
