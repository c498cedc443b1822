use chrono::{NaiveDate, Utc};
use sea_orm::ActiveValue::NotSet;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    domain::planner::{self, ChosenMeal, PlanCandidate},
    dto::plans::{DietPlanDto, GeneratePlanRequest},
    entity::{
        daily_logs::{Column as LogCol, Entity as DailyLogs},
        diet_plans::{
            ActiveModel as PlanActive, Column as PlanCol, Entity as DietPlans, Model as PlanModel,
        },
        meal_entries::{Column as EntryCol, Entity as MealEntries},
        menu_templates::{Column as MenuCol, Entity as MenuTemplates},
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::DietPlan,
    response::{ApiResponse, Meta},
    state::AppState,
};

/// Generate a plan for the chosen goal and day, replacing any existing plan
/// for that day.
pub async fn generate_plan(
    state: &AppState,
    user: &AuthUser,
    payload: GeneratePlanRequest,
) -> AppResult<ApiResponse<DietPlan>> {
    let date = payload.date.unwrap_or_else(|| Utc::now().date_naive());

    let catalog: Vec<PlanCandidate> = MenuTemplates::find()
        .filter(MenuCol::Active.eq(true))
        .all(&state.orm)
        .await?
        .into_iter()
        .map(|m| PlanCandidate {
            menu_id: m.id,
            name: m.name,
            nutrition: crate::domain::nutrition::Nutrition::new(
                m.calories, m.protein, m.carbs, m.fats,
            ),
        })
        .collect();

    let selection = planner::select_meals(&catalog, payload.goal, &mut rand::thread_rng())
        .map_err(|_| {
            AppError::BadRequest(
                "at least three active menus are required to generate a plan".into(),
            )
        })?;

    if selection.fell_back {
        tracing::warn!(
            goal = payload.goal.as_str(),
            "goal filter matched fewer than three menus, using the full catalog"
        );
    }

    let totals = selection.totals.rounded();
    let slots: Vec<serde_json::Value> = selection.meals.iter().map(slot_snapshot).collect();

    let txn = state.orm.begin().await?;

    // One plan per user and day.
    DietPlans::delete_many()
        .filter(
            Condition::all()
                .add(PlanCol::UserId.eq(user.user_id))
                .add(PlanCol::PlanDate.eq(date)),
        )
        .exec(&txn)
        .await?;

    let plan = PlanActive {
        id: Set(Uuid::new_v4()),
        user_id: Set(user.user_id),
        plan_date: Set(date),
        goal: Set(payload.goal.as_str().to_string()),
        breakfast: Set(slots[0].clone()),
        lunch: Set(slots[1].clone()),
        dinner: Set(slots[2].clone()),
        total_calories: Set(totals.calories),
        total_protein: Set(totals.protein),
        total_carbs: Set(totals.carbs),
        total_fats: Set(totals.fats),
        created_at: NotSet,
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "plan_generated",
        Some("diet_plans"),
        Some(serde_json::json!({ "plan_id": plan.id, "goal": plan.goal, "date": date })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Plan generated",
        plan_from_entity(plan),
        Some(Meta::empty()),
    ))
}

pub async fn get_plan(
    state: &AppState,
    user: &AuthUser,
    date: NaiveDate,
) -> AppResult<ApiResponse<DietPlanDto>> {
    let plan = DietPlans::find()
        .filter(
            Condition::all()
                .add(PlanCol::UserId.eq(user.user_id))
                .add(PlanCol::PlanDate.eq(date)),
        )
        .one(&state.orm)
        .await?;
    let plan = match plan {
        Some(p) => p,
        None => return Err(AppError::NotFound),
    };

    // Consumed status is derived from the day's ledger entries, never stored.
    let consumed_slots = match DailyLogs::find()
        .filter(
            Condition::all()
                .add(LogCol::UserId.eq(user.user_id))
                .add(LogCol::LogDate.eq(date)),
        )
        .one(&state.orm)
        .await?
    {
        Some(log) => MealEntries::find()
            .filter(
                Condition::all()
                    .add(EntryCol::DailyLogId.eq(log.id))
                    .add(EntryCol::Source.eq("diet_plan")),
            )
            .all(&state.orm)
            .await?
            .into_iter()
            .filter_map(|e| e.meal_slot)
            .collect(),
        None => Vec::new(),
    };

    Ok(ApiResponse::success(
        "OK",
        DietPlanDto {
            plan: plan_from_entity(plan),
            consumed_slots,
        },
        Some(Meta::empty()),
    ))
}

fn slot_snapshot(meal: &ChosenMeal) -> serde_json::Value {
    let n = meal.menu.nutrition.rounded();
    serde_json::json!({
        "menu_id": meal.menu.menu_id,
        "name": meal.menu.name,
        "slot": meal.slot,
        "time": meal.time,
        "nutrition": {
            "calories": n.calories,
            "protein": n.protein,
            "carbs": n.carbs,
            "fats": n.fats,
        },
    })
}

fn plan_from_entity(model: PlanModel) -> DietPlan {
    DietPlan {
        id: model.id,
        user_id: model.user_id,
        plan_date: model.plan_date,
        goal: model.goal,
        breakfast: model.breakfast,
        lunch: model.lunch,
        dinner: model.dinner,
        total_calories: model.total_calories,
        total_protein: model.total_protein,
        total_carbs: model.total_carbs,
        total_fats: model.total_fats,
        created_at: model.created_at.with_timezone(&Utc),
    }
}
