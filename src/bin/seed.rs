//! Seed script for development — populates a fresh database with sample
//! categories, courses, users and sales spread over the last ninety days.
//!
//! Usage: `cargo run --bin seed`
//!
//! Requires the `DATABASE_URL` environment variable (reads .env).

use chrono::{Duration, Utc};
use sqlx::PgPool;
use uuid::Uuid;

const CATEGORIES: [&str; 4] = ["Programming", "Design", "Marketing", "Data Science"];

const COURSES: [(&str, usize, i64); 8] = [
    ("Rust in Practice", 0, 4_900),
    ("Async Services with Tokio", 0, 5_900),
    ("Color Theory Basics", 1, 2_900),
    ("Typography for Interfaces", 1, 3_400),
    ("Growth Marketing 101", 2, 1_900),
    ("SQL for Analysts", 3, 3_900),
    ("Statistics Refresher", 3, 2_400),
    ("Machine Learning Foundations", 3, 7_900),
];

const USER_COUNT: i64 = 120;
const HISTORY_DAYS: i64 = 90;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let db_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&db_url)
        .await?;

    // Run migrations first
    dashboard_engine::db::run_migrations(&pool).await?;

    println!("=== Dashboard Seed Script ===");

    let category_ids = seed_categories(&pool).await?;
    let course_ids = seed_courses(&pool, &category_ids).await?;
    let user_ids = seed_users(&pool).await?;
    seed_sales(&pool, &user_ids, &course_ids).await?;

    println!("\n=== Seed complete! ===");
    Ok(())
}

async fn seed_categories(pool: &PgPool) -> anyhow::Result<Vec<Uuid>> {
    let mut ids = Vec::with_capacity(CATEGORIES.len());
    for name in CATEGORIES {
        let id = sqlx::query_scalar::<_, Uuid>(
            "INSERT INTO categories (id, name) VALUES ($1, $2)
             ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name
             RETURNING id",
        )
        .bind(Uuid::now_v7())
        .bind(name)
        .fetch_one(pool)
        .await?;
        ids.push(id);
    }
    println!("[done] Ensured {} categories", ids.len());
    Ok(ids)
}

async fn seed_courses(pool: &PgPool, category_ids: &[Uuid]) -> anyhow::Result<Vec<(Uuid, i64)>> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM courses")
        .fetch_one(pool)
        .await?;

    if count > 0 {
        println!("[skip] Courses already exist ({count})");
        let rows = sqlx::query_as::<_, (Uuid, i64)>("SELECT id, price_cents FROM courses")
            .fetch_all(pool)
            .await?;
        return Ok(rows);
    }

    let mut courses = Vec::with_capacity(COURSES.len());
    for (i, (title, category, price_cents)) in COURSES.into_iter().enumerate() {
        let id = Uuid::now_v7();
        sqlx::query(
            "INSERT INTO courses (id, title, category_id, price_cents, published, created_at)
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(id)
        .bind(title)
        .bind(category_ids[category])
        .bind(price_cents)
        .bind(i % 5 != 4)
        .bind(Utc::now() - Duration::days(HISTORY_DAYS + i as i64))
        .execute(pool)
        .await?;
        courses.push((id, price_cents));
    }

    println!("[done] Created {} sample courses", courses.len());
    Ok(courses)
}

async fn seed_users(pool: &PgPool) -> anyhow::Result<Vec<Uuid>> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await?;

    if count > 0 {
        println!("[skip] Users already exist ({count})");
        let ids = sqlx::query_scalar::<_, Uuid>("SELECT id FROM users")
            .fetch_all(pool)
            .await?;
        return Ok(ids);
    }

    let now = Utc::now();
    let mut ids = Vec::with_capacity(USER_COUNT as usize);
    for i in 0..USER_COUNT {
        let id = Uuid::now_v7();
        let role = match i % 20 {
            0 => "admin",
            1 | 2 => "instructor",
            _ => "student",
        };
        let created_at = now - Duration::days((i * 7) % HISTORY_DAYS) - Duration::hours(i % 24);
        let last_active_at = (i % 3 != 0).then(|| now - Duration::days(i % 45));
        sqlx::query(
            "INSERT INTO users (id, username, email, role, created_at, last_active_at)
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(id)
        .bind(format!("user{i:03}"))
        .bind(format!("user{i:03}@example.test"))
        .bind(role)
        .bind(created_at)
        .bind(last_active_at)
        .execute(pool)
        .await?;
        ids.push(id);
    }

    println!("[done] Created {} sample users", ids.len());
    Ok(ids)
}

async fn seed_sales(
    pool: &PgPool,
    user_ids: &[Uuid],
    courses: &[(Uuid, i64)],
) -> anyhow::Result<()> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sales")
        .fetch_one(pool)
        .await?;

    if count > 0 {
        println!("[skip] Sales already exist ({count})");
        return Ok(());
    }
    if user_ids.is_empty() || courses.is_empty() {
        println!("[skip] No users or courses to sell to");
        return Ok(());
    }

    let now = Utc::now();
    let mut created = 0;
    // Roughly two thirds of users buy something; a few buy several courses.
    for (i, user_id) in user_ids.iter().enumerate() {
        if i % 3 == 2 {
            continue;
        }
        let purchases = 1 + i % 3;
        for p in 0..purchases {
            let (course_id, price_cents) = courses[(i * 7 + p * 3) % courses.len()];
            let created_at = now - Duration::days(((i * 11 + p * 5) as i64) % HISTORY_DAYS)
                - Duration::hours(((i + p) % 24) as i64);
            sqlx::query(
                "INSERT INTO sales (id, user_id, course_id, amount_cents, created_at)
                 VALUES ($1, $2, $3, $4, $5)",
            )
            .bind(Uuid::now_v7())
            .bind(user_id)
            .bind(course_id)
            .bind(price_cents)
            .bind(created_at)
            .execute(pool)
            .await?;
            created += 1;
        }
    }

    println!("[done] Created {created} sample sales");
    Ok(())
}
