use argon2::{
    Argon2, PasswordHasher,
    password_hash::{rand_core::OsRng, SaltString},
};
use axum_catering_api::{
    config::AppConfig,
    db::{create_orm_conn, create_pool, run_migrations},
};
use serde_json::json;
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let pool = create_pool(&config.database_url).await?;
    // Ensure migrations are applied.
    let orm = create_orm_conn(&config.database_url).await?;
    run_migrations(&orm).await?;

    let admin_id = ensure_admin(&pool, "admin@example.com", "admin123").await?;
    let user_id = ensure_user(&pool, "user@example.com", "user123").await?;
    seed_catalog(&pool).await?;
    seed_videos(&pool).await?;

    println!("Seed completed. Admin ID: {admin_id}, User ID: {user_id}");
    Ok(())
}

async fn ensure_admin(pool: &sqlx::PgPool, email: &str, password: &str) -> anyhow::Result<Uuid> {
    ensure_user_with_role(pool, email, password, "admin").await
}

async fn ensure_user(pool: &sqlx::PgPool, email: &str, password: &str) -> anyhow::Result<Uuid> {
    ensure_user_with_role(pool, email, password, "user").await
}

async fn ensure_user_with_role(
    pool: &sqlx::PgPool,
    email: &str,
    password: &str,
    role: &str,
) -> anyhow::Result<Uuid> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!(e.to_string()))?
        .to_string();

    let row: Option<(Uuid,)> = sqlx::query_as(
        r#"
        INSERT INTO users (id, email, password_hash, role)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (email) DO UPDATE SET role = EXCLUDED.role
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(email)
    .bind(password_hash)
    .bind(role)
    .fetch_optional(pool)
    .await?;

    // If user already exists, fetch id
    let user_id = match row {
        Some((id,)) => id,
        None => {
            let existing: (Uuid,) = sqlx::query_as("SELECT id FROM users WHERE email = $1")
                .bind(email)
                .fetch_one(pool)
                .await?;
            existing.0
        }
    };

    sqlx::query(
        r#"
        INSERT INTO user_profiles (user_id, name)
        VALUES ($1, $2)
        ON CONFLICT (user_id) DO NOTHING
        "#,
    )
    .bind(user_id)
    .bind(email.split('@').next().unwrap_or(""))
    .execute(pool)
    .await?;

    println!("Ensured user {email} (role={role})");
    Ok(user_id)
}

async fn seed_catalog(pool: &sqlx::PgPool) -> anyhow::Result<()> {
    let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM ingredients")
        .fetch_one(pool)
        .await?;
    if count.0 > 0 {
        println!("Catalog already seeded, skipping");
        return Ok(());
    }

    // name, category, weight, (kcal, protein, carbs, fats)
    let ingredients = vec![
        ("Steamed rice", "rice_carb", 150.0, (195.0, 4.0, 42.0, 0.4)),
        ("Brown rice", "rice_carb", 150.0, (165.0, 3.7, 34.5, 1.3)),
        ("Grilled chicken breast", "animal_protein", 120.0, (198.0, 37.2, 0.0, 4.3)),
        ("Baked salmon", "animal_protein", 100.0, (208.0, 20.4, 0.0, 13.4)),
        ("Tempeh", "plant_protein", 100.0, (193.0, 18.5, 9.4, 10.8)),
        ("Tofu", "plant_protein", 100.0, (76.0, 8.1, 1.9, 4.8)),
        ("Stir-fried broccoli", "vegetable", 100.0, (55.0, 3.7, 11.2, 0.6)),
        ("Sauteed spinach", "vegetable", 100.0, (41.0, 5.3, 6.8, 0.5)),
        ("Apple slices", "fruit", 100.0, (52.0, 0.3, 13.8, 0.2)),
        ("Banana", "fruit", 118.0, (105.0, 1.3, 27.0, 0.4)),
        ("Roasted almonds", "snack", 30.0, (178.0, 6.2, 6.1, 15.2)),
        ("Infused water", "drink", 250.0, (5.0, 0.0, 1.2, 0.0)),
    ];

    let mut ids = std::collections::HashMap::new();
    for (name, category, weight, (cal, protein, carbs, fats)) in &ingredients {
        let id = Uuid::new_v4();
        sqlx::query(
            r#"
            INSERT INTO ingredients
                (id, name, category, serving_weight, serving_unit,
                 calories, protein, carbs, fats)
            VALUES ($1, $2, $3, $4, 'g', $5, $6, $7, $8)
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(category)
        .bind(weight)
        .bind(cal)
        .bind(protein)
        .bind(carbs)
        .bind(fats)
        .execute(pool)
        .await?;
        ids.insert(*name, id);
    }
    println!("Seeded {} ingredients", ingredients.len());

    // The vegetable slot of a mixed package does not count towards the
    // stored aggregate, matching how the admin endpoints compute it.
    let menus = vec![
        (
            "Balanced Bowl",
            "mixed_package",
            25000i64,
            json!({
                "rice_carb": { "required": true, "multi_select": false,
                    "options": [ids["Steamed rice"]] },
                "animal_protein": { "required": true, "multi_select": false,
                    "options": [ids["Grilled chicken breast"]] },
                "vegetable": { "required": true, "multi_select": false,
                    "options": [ids["Stir-fried broccoli"]] },
            }),
            (393.0, 41.2, 42.0, 4.7),
        ),
        (
            "Plant Power Pack",
            "mixed_package",
            22000i64,
            json!({
                "rice_carb": { "required": true, "multi_select": false,
                    "options": [ids["Brown rice"]] },
                "plant_protein": { "required": true, "multi_select": true,
                    "options": [ids["Tempeh"], ids["Tofu"]] },
                "vegetable": { "required": true, "multi_select": false,
                    "options": [ids["Sauteed spinach"]] },
            }),
            (434.0, 30.3, 45.8, 16.9),
        ),
        (
            "Fruit & Nut Box",
            "snack_box",
            18000i64,
            json!({
                "fruit": { "required": true, "multi_select": true,
                    "options": [ids["Apple slices"], ids["Banana"]] },
                "snack": { "required": true, "multi_select": false,
                    "options": [ids["Roasted almonds"]] },
                "drink": { "required": false, "multi_select": false,
                    "options": [ids["Infused water"]] },
            }),
            (340.0, 7.8, 48.1, 15.8),
        ),
    ];

    for (name, template_type, price, components, (cal, protein, carbs, fats)) in menus {
        sqlx::query(
            r#"
            INSERT INTO menu_templates
                (id, name, template_type, base_price, price_min, price_max,
                 components, calories, protein, carbs, fats, active)
            VALUES ($1, $2, $3, $4, $4, $4, $5, $6, $7, $8, $9, TRUE)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(template_type)
        .bind(price)
        .bind(components)
        .bind(cal)
        .bind(protein)
        .bind(carbs)
        .bind(fats)
        .execute(pool)
        .await?;
    }
    println!("Seeded menus");

    Ok(())
}

async fn seed_videos(pool: &sqlx::PgPool) -> anyhow::Result<()> {
    let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM fitness_videos")
        .fetch_one(pool)
        .await?;
    if count.0 > 0 {
        return Ok(());
    }

    let videos = vec![
        ("Morning Yoga Flow", "yoga", "beginner", 20, 90, "Sari W."),
        ("HIIT in 15", "cardio", "intermediate", 15, 180, "Dimas P."),
        ("Full Body Strength", "strength", "advanced", 40, 320, "Rina K."),
    ];

    for (title, category, difficulty, minutes, burned, instructor) in videos {
        sqlx::query(
            r#"
            INSERT INTO fitness_videos
                (id, title, video_url, category, difficulty,
                 duration_minutes, calories_burned, instructor, rating)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, 4.5)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(title)
        .bind(format!(
            "https://videos.example.com/{}",
            title.to_lowercase().replace(' ', "-")
        ))
        .bind(category)
        .bind(difficulty)
        .bind(minutes)
        .bind(burned)
        .bind(instructor)
        .execute(pool)
        .await?;
    }
    println!("Seeded videos");

    Ok(())
}
