use std::collections::BTreeMap;

use axum_catering_api::{
    clients::{chat::ChatClient, payment::PaymentClient},
    db::{create_orm_conn, create_pool, run_migrations},
    dto::{
        cart::AddToCartRequest,
        ingredients::CreateIngredientRequest,
        logs::{CreateMealRequest, UpdateMealRequest},
        menus::{ComponentSpec, CreateMenuRequest, UpdateMenuRequest},
        orders::CheckoutRequest,
        plans::GeneratePlanRequest,
    },
    domain::planner::DietGoal,
    entity::users::ActiveModel as UserActive,
    middleware::auth::AuthUser,
    services::{admin_service, cart_service, ledger_service, order_service, plan_service},
    state::AppState,
};
use chrono::NaiveDate;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, ConnectionTrait, Set, Statement};
use uuid::Uuid;

// Integration flow: admin builds the catalog, a customer shops and checks
// out, generates a diet plan and keeps a nutrition log for the day.
#[tokio::test]
async fn catalog_checkout_plan_and_ledger_flow() -> anyhow::Result<()> {
    // Allow skipping when no DB is configured in the environment.
    let database_url = match std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
    {
        Ok(url) => url,
        Err(_) => {
            eprintln!(
                "Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run integration flow tests."
            );
            return Ok(());
        }
    };

    let state = setup_state(&database_url).await?;

    let user_id = create_user(&state, "user", "user@example.com").await?;
    let admin_id = create_user(&state, "admin", "admin@example.com").await?;
    let auth_user = AuthUser {
        user_id,
        role: "user".into(),
    };
    let auth_admin = AuthUser {
        user_id: admin_id,
        role: "admin".into(),
    };

    // Admin builds the catalog.
    let rice = create_ingredient(&state, &auth_admin, "Steamed rice", "rice_carb", 195.0).await?;
    let chicken =
        create_ingredient(&state, &auth_admin, "Grilled chicken", "animal_protein", 198.0).await?;
    let broccoli =
        create_ingredient(&state, &auth_admin, "Broccoli", "vegetable", 55.0).await?;

    let mut components = BTreeMap::new();
    components.insert("rice_carb".to_string(), spec(vec![rice]));
    components.insert("animal_protein".to_string(), spec(vec![chicken]));
    components.insert("vegetable".to_string(), spec(vec![broccoli]));

    let menu_resp = admin_service::create_menu(
        &state,
        &auth_admin,
        CreateMenuRequest {
            name: "Balanced Bowl".into(),
            template_type: "mixed_package".into(),
            base_price: 25000,
            price_min: 25000,
            price_max: 25000,
            components,
            low_carb: false,
            high_protein: true,
            vegetarian: false,
            keto: false,
            diet_price_add_min: 0,
            diet_price_add_max: 0,
            active: true,
        },
    )
    .await?;
    let menu = menu_resp.data.unwrap();
    // The vegetable slot of a mixed package does not count: 195 + 198.
    assert_eq!(menu.calories, 393.0);

    // Editing an ingredient only shows up once the menu is re-saved.
    admin_service::update_ingredient(
        &state,
        &auth_admin,
        chicken,
        axum_catering_api::dto::ingredients::UpdateIngredientRequest {
            name: None,
            category: None,
            serving_weight: None,
            serving_unit: None,
            calories: Some(220.0),
            protein: None,
            carbs: None,
            fats: None,
            image_url: None,
            description: None,
        },
    )
    .await?;

    let resaved = admin_service::update_menu(
        &state,
        &auth_admin,
        menu.id,
        UpdateMenuRequest {
            name: None,
            template_type: None,
            base_price: None,
            price_min: None,
            price_max: None,
            components: None,
            low_carb: None,
            high_protein: None,
            vegetarian: None,
            keto: None,
            diet_price_add_min: None,
            diet_price_add_max: None,
            active: None,
        },
    )
    .await?;
    assert_eq!(resaved.data.unwrap().calories, 415.0);

    // Customer shops and checks out.
    cart_service::add_to_cart(
        &state,
        &auth_user,
        AddToCartRequest {
            menu_id: menu.id,
            quantity: 2,
            addon_ingredient_id: None,
        },
    )
    .await?;

    let checkout_resp = order_service::checkout(
        &state,
        &auth_user,
        CheckoutRequest {
            recipient_name: "Test Customer".into(),
            phone: "0800000000".into(),
            address: "Somewhere".into(),
        },
    )
    .await?;
    let placed = checkout_resp.data.unwrap();
    assert_eq!(placed.order.subtotal, 50000);
    assert_eq!(placed.order.total, 50000 + state.shipping_fee);
    assert_eq!(placed.items.len(), 1);
    assert_eq!(placed.items[0].quantity, 2);
    assert_eq!(placed.order.status, "pending");

    // Admin settles the order.
    let settled =
        admin_service::update_order_status(&state, &auth_admin, placed.order.id, "paid".into())
            .await?;
    assert_eq!(settled.data.unwrap().status, "paid");

    // Two more menus so the planner has enough to pick from.
    for name in ["Second Bowl", "Third Bowl"] {
        admin_service::create_menu(
            &state,
            &auth_admin,
            CreateMenuRequest {
                name: name.into(),
                template_type: "snack_box".into(),
                base_price: 15000,
                price_min: 15000,
                price_max: 15000,
                components: BTreeMap::new(),
                low_carb: false,
                high_protein: false,
                vegetarian: false,
                keto: false,
                diet_price_add_min: 0,
                diet_price_add_max: 0,
                active: true,
            },
        )
        .await?;
    }

    let plan_date = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();
    let plan_resp = plan_service::generate_plan(
        &state,
        &auth_user,
        GeneratePlanRequest {
            goal: DietGoal::HealthyLifestyle,
            date: Some(plan_date),
        },
    )
    .await?;
    let plan = plan_resp.data.unwrap();
    assert_eq!(plan.goal, "healthy_lifestyle");
    let breakfast_menu = plan.breakfast["menu_id"].as_str().unwrap().to_string();
    let lunch_menu = plan.lunch["menu_id"].as_str().unwrap().to_string();
    let dinner_menu = plan.dinner["menu_id"].as_str().unwrap().to_string();
    assert_ne!(breakfast_menu, lunch_menu);
    assert_ne!(lunch_menu, dinner_menu);
    assert_ne!(breakfast_menu, dinner_menu);

    // Regenerating for the same day replaces the plan instead of stacking.
    plan_service::generate_plan(
        &state,
        &auth_user,
        GeneratePlanRequest {
            goal: DietGoal::HealthyLifestyle,
            date: Some(plan_date),
        },
    )
    .await?;

    // Nutrition ledger: totals always equal the sum of the entries.
    let log_date = plan_date;
    let first = ledger_service::add_meal(
        &state,
        &auth_user,
        log_date,
        meal("Oatmeal", 300.0),
    )
    .await?
    .data
    .unwrap();

    let second = ledger_service::add_meal(
        &state,
        &auth_user,
        log_date,
        meal("Chicken salad", 500.0),
    )
    .await?
    .data
    .unwrap();

    let view = ledger_service::day_view(&state, &auth_user, log_date).await?;
    let log = view.data.as_ref().unwrap().log.as_ref().unwrap();
    assert_eq!(log.total_calories, 800.0);

    ledger_service::update_meal(
        &state,
        &auth_user,
        log_date,
        second.id,
        UpdateMealRequest {
            name: None,
            calories: Some(550.0),
            protein: None,
            carbs: None,
            fats: None,
        },
    )
    .await?;

    let view = ledger_service::day_view(&state, &auth_user, log_date).await?;
    let log = view.data.as_ref().unwrap().log.as_ref().unwrap();
    assert_eq!(log.total_calories, 850.0);

    let after_delete = ledger_service::delete_meal(&state, &auth_user, log_date, first.id)
        .await?
        .data
        .unwrap();
    assert_eq!(after_delete.total_calories, 550.0);

    // Logging a plan slot marks it consumed on both the plan and the day view.
    ledger_service::add_meal(
        &state,
        &auth_user,
        log_date,
        CreateMealRequest {
            name: "Plan lunch".into(),
            calories: 420.0,
            protein: 30.0,
            carbs: 40.0,
            fats: 10.0,
            source: "diet_plan".into(),
            meal_slot: Some("lunch".into()),
            order_id: None,
            order_item_index: None,
        },
    )
    .await?;

    let plan_view = plan_service::get_plan(&state, &auth_user, plan_date).await?;
    let consumed = plan_view.data.unwrap().consumed_slots;
    assert!(consumed.contains(&"lunch".to_string()));

    let view = ledger_service::day_view(&state, &auth_user, log_date).await?;
    let day = view.data.unwrap();
    assert!(day.consumed_plan_slots.contains(&"lunch".to_string()));

    Ok(())
}

fn spec(options: Vec<Uuid>) -> ComponentSpec {
    ComponentSpec {
        required: true,
        multi_select: false,
        options,
    }
}

fn meal(name: &str, calories: f64) -> CreateMealRequest {
    CreateMealRequest {
        name: name.into(),
        calories,
        protein: 10.0,
        carbs: 20.0,
        fats: 5.0,
        source: "manual".into(),
        meal_slot: None,
        order_id: None,
        order_item_index: None,
    }
}

async fn create_ingredient(
    state: &AppState,
    admin: &AuthUser,
    name: &str,
    category: &str,
    calories: f64,
) -> anyhow::Result<Uuid> {
    let resp = admin_service::create_ingredient(
        state,
        admin,
        CreateIngredientRequest {
            name: name.into(),
            category: category.into(),
            serving_weight: 100.0,
            serving_unit: "g".into(),
            calories,
            protein: 10.0,
            carbs: 15.0,
            fats: 3.0,
            image_url: None,
            description: None,
        },
    )
    .await?;
    Ok(resp.data.unwrap().id)
}

async fn setup_state(database_url: &str) -> anyhow::Result<AppState> {
    let pool = create_pool(database_url).await?;
    let orm = create_orm_conn(database_url).await?;
    run_migrations(&orm).await?;

    // Clean tables between runs
    let backend = orm.get_database_backend();
    orm.execute(Statement::from_string(
        backend,
        "TRUNCATE TABLE meal_entries, daily_logs, diet_plans, order_items, orders, cart_items, \
         menu_templates, ingredients, fitness_videos, user_profiles, audit_logs, users \
         RESTART IDENTITY CASCADE",
    ))
    .await?;

    Ok(AppState {
        pool,
        orm,
        payments: PaymentClient::new("http://127.0.0.1:9", "test-key"),
        chat: ChatClient::new("http://127.0.0.1:9", "test-key"),
        shipping_fee: 5000,
    })
}

async fn create_user(state: &AppState, role: &str, email: &str) -> anyhow::Result<Uuid> {
    let user = UserActive {
        id: Set(Uuid::new_v4()),
        email: Set(email.to_string()),
        password_hash: Set("dummy".into()),
        role: Set(role.into()),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    Ok(user.id)
}
