//! Database seeder for Pelita development and testing.
//!
//! Seeds an admin user, the default chart of accounts (with posting roles),
//! sample teachers, a class group, students, and credit packages.
//!
//! Usage: cargo run --bin seeder

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use pelita_core::auth::hash_password;
use pelita_db::entities::{
    accounts, class_groups, credit_packages,
    sea_orm_active_enums::{AccountRole, AccountType, StudentStatus, UserRole},
    students, teachers, users,
};

/// Admin user ID (consistent for all seeds)
const ADMIN_USER_ID: &str = "00000000-0000-0000-0000-000000000001";

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");

    println!("Connecting to database...");
    let db = pelita_db::connect(&database_url)
        .await
        .expect("Failed to connect to database");

    println!("Seeding admin user...");
    seed_admin_user(&db).await;

    println!("Seeding chart of accounts...");
    seed_accounts(&db).await;

    println!("Seeding teachers...");
    seed_teachers(&db).await;

    println!("Seeding class group and students...");
    seed_class_and_students(&db).await;

    println!("Seeding credit packages...");
    seed_credit_packages(&db).await;

    println!("Seeding complete!");
}

fn admin_user_id() -> Uuid {
    Uuid::parse_str(ADMIN_USER_ID).unwrap()
}

/// Seeds the admin user for development.
async fn seed_admin_user(db: &DatabaseConnection) {
    if users::Entity::find_by_id(admin_user_id())
        .one(db)
        .await
        .ok()
        .flatten()
        .is_some()
    {
        println!("  Admin user already exists, skipping...");
        return;
    }

    let password_hash = hash_password("admin12345").expect("Failed to hash password");
    let user = users::ActiveModel {
        id: Set(admin_user_id()),
        email: Set("admin@pelita.sch.id".to_string()),
        password_hash: Set(password_hash),
        full_name: Set("Administrator".to_string()),
        role: Set(UserRole::Admin),
        is_active: Set(true),
        created_at: Set(Utc::now().into()),
        updated_at: Set(Utc::now().into()),
    };

    if let Err(e) = user.insert(db).await {
        eprintln!("Failed to insert admin user: {e}");
    } else {
        println!("  Created admin user: admin@pelita.sch.id");
    }
}

/// Seeds the default chart of accounts. The three posting roles are tagged
/// so invoice journals resolve accounts without name matching.
async fn seed_accounts(db: &DatabaseConnection) {
    let chart: [(&str, &str, AccountType, Option<AccountRole>); 7] = [
        ("1100", "Kas", AccountType::Asset, None),
        (
            "1200",
            "Piutang Usaha",
            AccountType::Asset,
            Some(AccountRole::Receivable),
        ),
        (
            "2100",
            "PPN Keluaran",
            AccountType::Liability,
            Some(AccountRole::TaxOutput),
        ),
        ("3100", "Modal", AccountType::Equity, None),
        (
            "4000",
            "Pendapatan Jasa Pendidikan",
            AccountType::Income,
            Some(AccountRole::Revenue),
        ),
        ("5100", "Beban Gaji", AccountType::Expense, None),
        ("5200", "Beban Operasional", AccountType::Expense, None),
    ];

    let mut inserted = 0;
    for (code, name, account_type, role) in chart {
        let exists = accounts::Entity::find()
            .filter(accounts::Column::Code.eq(code))
            .one(db)
            .await
            .ok()
            .flatten()
            .is_some();
        if exists {
            continue;
        }

        let account = accounts::ActiveModel {
            id: Set(Uuid::now_v7()),
            code: Set(code.to_string()),
            name: Set(name.to_string()),
            account_type: Set(account_type),
            role: Set(role),
            is_active: Set(true),
            created_at: Set(Utc::now().into()),
            updated_at: Set(Utc::now().into()),
        };

        if let Err(e) = account.insert(db).await {
            eprintln!("Failed to insert account {code}: {e}");
        } else {
            inserted += 1;
        }
    }

    println!("  Inserted {inserted} accounts");
}

/// Seeds sample teachers.
async fn seed_teachers(db: &DatabaseConnection) {
    let rows = [
        ("G-001", "Siti Rahmawati", "Matematika"),
        ("G-002", "Budi Santoso", "Bahasa Indonesia"),
        ("G-003", "Dewi Lestari", "Bahasa Inggris"),
    ];

    let mut inserted = 0;
    for (staff_number, full_name, subject) in rows {
        let exists = teachers::Entity::find()
            .filter(teachers::Column::StaffNumber.eq(staff_number))
            .one(db)
            .await
            .ok()
            .flatten()
            .is_some();
        if exists {
            continue;
        }

        let teacher = teachers::ActiveModel {
            id: Set(Uuid::now_v7()),
            staff_number: Set(staff_number.to_string()),
            full_name: Set(full_name.to_string()),
            email: Set(None),
            phone: Set(None),
            subject: Set(Some(subject.to_string())),
            is_active: Set(true),
            created_at: Set(Utc::now().into()),
            updated_at: Set(Utc::now().into()),
        };

        if let Err(e) = teacher.insert(db).await {
            eprintln!("Failed to insert teacher {staff_number}: {e}");
        } else {
            inserted += 1;
        }
    }

    println!("  Inserted {inserted} teachers");
}

/// Seeds one class group with a few students.
async fn seed_class_and_students(db: &DatabaseConnection) {
    let class_name = "7A";
    let academic_year = "2026/2027";

    let existing = class_groups::Entity::find()
        .filter(class_groups::Column::Name.eq(class_name))
        .filter(class_groups::Column::AcademicYear.eq(academic_year))
        .one(db)
        .await
        .ok()
        .flatten();

    let class_group_id = if let Some(group) = existing {
        println!("  Class group {class_name} already exists, skipping...");
        group.id
    } else {
        let id = Uuid::now_v7();
        let group = class_groups::ActiveModel {
            id: Set(id),
            name: Set(class_name.to_string()),
            academic_year: Set(academic_year.to_string()),
            homeroom_teacher_id: Set(None),
            capacity: Set(30),
            created_at: Set(Utc::now().into()),
            updated_at: Set(Utc::now().into()),
        };

        if let Err(e) = group.insert(db).await {
            eprintln!("Failed to insert class group: {e}");
            return;
        }
        println!("  Created class group {class_name} ({academic_year})");
        id
    };

    let rows = [
        ("S-2026-001", "Andi Wijaya"),
        ("S-2026-002", "Putri Maharani"),
        ("S-2026-003", "Rizky Pratama"),
    ];

    let mut inserted = 0;
    for (student_number, full_name) in rows {
        let exists = students::Entity::find()
            .filter(students::Column::StudentNumber.eq(student_number))
            .one(db)
            .await
            .ok()
            .flatten()
            .is_some();
        if exists {
            continue;
        }

        let student = students::ActiveModel {
            id: Set(Uuid::now_v7()),
            student_number: Set(student_number.to_string()),
            full_name: Set(full_name.to_string()),
            guardian_name: Set(None),
            guardian_phone: Set(None),
            address: Set(None),
            class_group_id: Set(Some(class_group_id)),
            status: Set(StudentStatus::Active),
            enrolled_on: Set(Utc::now().date_naive()),
            created_at: Set(Utc::now().into()),
            updated_at: Set(Utc::now().into()),
        };

        if let Err(e) = student.insert(db).await {
            eprintln!("Failed to insert student {student_number}: {e}");
        } else {
            inserted += 1;
        }
    }

    println!("  Inserted {inserted} students");
}

/// Seeds lesson-hour packages.
async fn seed_credit_packages(db: &DatabaseConnection) {
    let rows = [
        ("Paket 10 Jam", 10, Decimal::new(1_500_000, 0)),
        ("Paket 20 Jam", 20, Decimal::new(2_800_000, 0)),
        ("Paket 40 Jam", 40, Decimal::new(5_200_000, 0)),
    ];

    let mut inserted = 0;
    for (name, hours, price) in rows {
        let exists = credit_packages::Entity::find()
            .filter(credit_packages::Column::Name.eq(name))
            .one(db)
            .await
            .ok()
            .flatten()
            .is_some();
        if exists {
            continue;
        }

        let package = credit_packages::ActiveModel {
            id: Set(Uuid::now_v7()),
            name: Set(name.to_string()),
            hours: Set(hours),
            price: Set(price),
            is_active: Set(true),
            created_at: Set(Utc::now().into()),
            updated_at: Set(Utc::now().into()),
        };

        if let Err(e) = package.insert(db).await {
            eprintln!("Failed to insert package {name}: {e}");
        } else {
            inserted += 1;
        }
    }

    println!("  Inserted {inserted} credit packages");
}
