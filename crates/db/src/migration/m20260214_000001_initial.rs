//! Initial database migration.
//!
//! Creates all enums and core tables: users, school administration
//! (students, teachers, class groups, schedules, attendance, grades),
//! finance (accounts, journals, journal entries, invoices), credit packages,
//! and chat.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: ENUMS
        // ============================================================
        db.execute_unprepared(ENUMS_SQL).await?;

        // ============================================================
        // PART 2: USERS
        // ============================================================
        db.execute_unprepared(USERS_SQL).await?;

        // ============================================================
        // PART 3: SCHOOL ADMINISTRATION
        // ============================================================
        db.execute_unprepared(TEACHERS_SQL).await?;
        db.execute_unprepared(CLASS_GROUPS_SQL).await?;
        db.execute_unprepared(STUDENTS_SQL).await?;
        db.execute_unprepared(SCHEDULES_SQL).await?;
        db.execute_unprepared(ATTENDANCE_SQL).await?;
        db.execute_unprepared(GRADES_SQL).await?;

        // ============================================================
        // PART 4: FINANCE
        // ============================================================
        db.execute_unprepared(ACCOUNTS_SQL).await?;
        db.execute_unprepared(JOURNALS_SQL).await?;
        db.execute_unprepared(JOURNAL_ENTRIES_SQL).await?;
        db.execute_unprepared(INVOICES_SQL).await?;

        // ============================================================
        // PART 5: CREDIT PACKAGES
        // ============================================================
        db.execute_unprepared(CREDIT_PACKAGES_SQL).await?;
        db.execute_unprepared(CREDIT_TRANSACTIONS_SQL).await?;

        // ============================================================
        // PART 6: CHAT
        // ============================================================
        db.execute_unprepared(CHAT_MESSAGES_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

// ============================================================
// SQL CONSTANTS
// ============================================================

const ENUMS_SQL: &str = r"
-- User roles
CREATE TYPE user_role AS ENUM (
    'admin',
    'staff',
    'teacher'
);

-- Student enrollment status
CREATE TYPE student_status AS ENUM (
    'active',
    'inactive',
    'graduated'
);

-- Attendance status
CREATE TYPE attendance_status AS ENUM (
    'present',
    'sick',
    'excused',
    'absent'
);

-- Graded assessment kinds
CREATE TYPE assessment_kind AS ENUM (
    'assignment',
    'midterm',
    'final'
);

-- Chart of accounts classification
CREATE TYPE account_type AS ENUM (
    'asset',
    'liability',
    'equity',
    'income',
    'expense'
);

-- Posting role an account plays for invoice journals
CREATE TYPE account_role AS ENUM (
    'receivable',
    'revenue',
    'tax_output'
);

-- Journal kinds
CREATE TYPE journal_kind AS ENUM (
    'standard',
    'reversal'
);

-- Invoice lifecycle
CREATE TYPE invoice_status AS ENUM (
    'pending',
    'paid',
    'batal'
);

-- Credit transaction kinds
CREATE TYPE credit_kind AS ENUM (
    'purchase',
    'consumption'
);
";

const USERS_SQL: &str = r"
CREATE TABLE users (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    email VARCHAR(255) NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    full_name VARCHAR(255) NOT NULL,
    role user_role NOT NULL DEFAULT 'staff',
    is_active BOOLEAN NOT NULL DEFAULT true,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_users_email ON users(email) WHERE is_active;
";

const TEACHERS_SQL: &str = r"
CREATE TABLE teachers (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    staff_number VARCHAR(32) NOT NULL UNIQUE,
    full_name VARCHAR(255) NOT NULL,
    email VARCHAR(255),
    phone VARCHAR(32),
    subject VARCHAR(100),
    is_active BOOLEAN NOT NULL DEFAULT true,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const CLASS_GROUPS_SQL: &str = r"
CREATE TABLE class_groups (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    name VARCHAR(100) NOT NULL,
    academic_year VARCHAR(9) NOT NULL,
    homeroom_teacher_id UUID REFERENCES teachers(id) ON DELETE SET NULL,
    capacity INTEGER NOT NULL DEFAULT 30 CHECK (capacity > 0),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT uq_class_groups_name_year UNIQUE (name, academic_year)
);
";

const STUDENTS_SQL: &str = r"
CREATE TABLE students (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    student_number VARCHAR(32) NOT NULL UNIQUE,
    full_name VARCHAR(255) NOT NULL,
    guardian_name VARCHAR(255),
    guardian_phone VARCHAR(32),
    address TEXT,
    class_group_id UUID REFERENCES class_groups(id) ON DELETE SET NULL,
    status student_status NOT NULL DEFAULT 'active',
    enrolled_on DATE NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_students_class_group ON students(class_group_id);
CREATE INDEX idx_students_status ON students(status);
";

const SCHEDULES_SQL: &str = r"
CREATE TABLE schedules (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    class_group_id UUID NOT NULL REFERENCES class_groups(id) ON DELETE CASCADE,
    teacher_id UUID NOT NULL REFERENCES teachers(id) ON DELETE CASCADE,
    subject VARCHAR(100) NOT NULL,
    day_of_week SMALLINT NOT NULL CHECK (day_of_week BETWEEN 1 AND 7),
    starts_at TIME NOT NULL,
    ends_at TIME NOT NULL,
    room VARCHAR(50),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_schedule_times CHECK (ends_at > starts_at)
);

CREATE INDEX idx_schedules_class_group ON schedules(class_group_id, day_of_week);
CREATE INDEX idx_schedules_teacher ON schedules(teacher_id, day_of_week);
";

const ATTENDANCE_SQL: &str = r"
CREATE TABLE attendance_records (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    student_id UUID NOT NULL REFERENCES students(id) ON DELETE CASCADE,
    schedule_id UUID NOT NULL REFERENCES schedules(id) ON DELETE CASCADE,
    record_date DATE NOT NULL,
    status attendance_status NOT NULL,
    note TEXT,
    recorded_by UUID NOT NULL REFERENCES users(id),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT uq_attendance UNIQUE (student_id, schedule_id, record_date)
);

CREATE INDEX idx_attendance_student_date ON attendance_records(student_id, record_date DESC);
";

const GRADES_SQL: &str = r"
CREATE TABLE grades (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    student_id UUID NOT NULL REFERENCES students(id) ON DELETE CASCADE,
    subject VARCHAR(100) NOT NULL,
    term VARCHAR(20) NOT NULL,
    assessment assessment_kind NOT NULL,
    score NUMERIC(5, 2) NOT NULL CHECK (score >= 0 AND score <= 100),
    recorded_by UUID NOT NULL REFERENCES users(id),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_grades_student ON grades(student_id, term);
";

const ACCOUNTS_SQL: &str = r"
CREATE TABLE accounts (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    code VARCHAR(20) NOT NULL UNIQUE,
    name VARCHAR(255) NOT NULL,
    account_type account_type NOT NULL,
    role account_role,
    is_active BOOLEAN NOT NULL DEFAULT true,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

-- At most one active account per posting role
CREATE UNIQUE INDEX uq_accounts_role ON accounts(role) WHERE role IS NOT NULL AND is_active;
";

const JOURNALS_SQL: &str = r"
CREATE TABLE journals (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    journal_date DATE NOT NULL,
    description TEXT NOT NULL,
    total NUMERIC(18, 2) NOT NULL CHECK (total >= 0),
    kind journal_kind NOT NULL DEFAULT 'standard',
    reverses_journal_id UUID REFERENCES journals(id),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_journals_date ON journals(journal_date DESC);
";

const JOURNAL_ENTRIES_SQL: &str = r"
CREATE TABLE journal_entries (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    journal_id UUID NOT NULL REFERENCES journals(id) ON DELETE CASCADE,
    account_id UUID NOT NULL REFERENCES accounts(id),
    debit NUMERIC(18, 2) NOT NULL DEFAULT 0 CHECK (debit >= 0),
    credit NUMERIC(18, 2) NOT NULL DEFAULT 0 CHECK (credit >= 0),
    position SMALLINT NOT NULL DEFAULT 0
);

CREATE INDEX idx_journal_entries_journal ON journal_entries(journal_id, position);
CREATE INDEX idx_journal_entries_account ON journal_entries(account_id);
";

const INVOICES_SQL: &str = r"
CREATE TABLE invoices (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    invoice_number VARCHAR(32) NOT NULL UNIQUE,
    student_id UUID NOT NULL REFERENCES students(id),
    description TEXT,
    amount NUMERIC(18, 2) NOT NULL CHECK (amount > 0),
    status invoice_status NOT NULL DEFAULT 'pending',
    journal_id UUID REFERENCES journals(id),
    issued_on DATE NOT NULL,
    paid_at TIMESTAMPTZ,
    cancelled_at TIMESTAMPTZ,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_invoices_student ON invoices(student_id, issued_on DESC);
CREATE INDEX idx_invoices_status ON invoices(status);
";

const CREDIT_PACKAGES_SQL: &str = r"
CREATE TABLE credit_packages (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    name VARCHAR(100) NOT NULL,
    hours INTEGER NOT NULL CHECK (hours > 0),
    price NUMERIC(18, 2) NOT NULL CHECK (price >= 0),
    is_active BOOLEAN NOT NULL DEFAULT true,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const CREDIT_TRANSACTIONS_SQL: &str = r"
CREATE TABLE credit_transactions (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    student_id UUID NOT NULL REFERENCES students(id) ON DELETE CASCADE,
    package_id UUID REFERENCES credit_packages(id),
    kind credit_kind NOT NULL,
    hours_delta INTEGER NOT NULL CHECK (hours_delta <> 0),
    note TEXT,
    created_by UUID NOT NULL REFERENCES users(id),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_credit_transactions_student ON credit_transactions(student_id, created_at DESC);
";

const CHAT_MESSAGES_SQL: &str = r"
CREATE TABLE chat_messages (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    sender_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    recipient_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    body TEXT NOT NULL,
    sent_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    read_at TIMESTAMPTZ
);

CREATE INDEX idx_chat_conversation ON chat_messages(sender_id, recipient_id, sent_at DESC);
CREATE INDEX idx_chat_unread ON chat_messages(recipient_id) WHERE read_at IS NULL;
";

const DROP_ALL_SQL: &str = r"
DROP TABLE IF EXISTS chat_messages CASCADE;
DROP TABLE IF EXISTS credit_transactions CASCADE;
DROP TABLE IF EXISTS credit_packages CASCADE;
DROP TABLE IF EXISTS invoices CASCADE;
DROP TABLE IF EXISTS journal_entries CASCADE;
DROP TABLE IF EXISTS journals CASCADE;
DROP TABLE IF EXISTS accounts CASCADE;
DROP TABLE IF EXISTS grades CASCADE;
DROP TABLE IF EXISTS attendance_records CASCADE;
DROP TABLE IF EXISTS schedules CASCADE;
DROP TABLE IF EXISTS students CASCADE;
DROP TABLE IF EXISTS class_groups CASCADE;
DROP TABLE IF EXISTS teachers CASCADE;
DROP TABLE IF EXISTS users CASCADE;

DROP TYPE IF EXISTS credit_kind;
DROP TYPE IF EXISTS invoice_status;
DROP TYPE IF EXISTS journal_kind;
DROP TYPE IF EXISTS account_role;
DROP TYPE IF EXISTS account_type;
DROP TYPE IF EXISTS assessment_kind;
DROP TYPE IF EXISTS attendance_status;
DROP TYPE IF EXISTS student_status;
DROP TYPE IF EXISTS user_role;
";
