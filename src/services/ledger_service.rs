use chrono::{NaiveDate, Utc};
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::LockType;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseTransaction, EntityTrait, ModelTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    domain::{
        ledger,
        nutrition::Nutrition,
    },
    dto::logs::{ConsumedOrderItem, CreateMealRequest, DayLogView, UpdateMealRequest},
    entity::{
        daily_logs::{
            ActiveModel as LogActive, Column as LogCol, Entity as DailyLogs, Model as LogModel,
        },
        meal_entries::{
            ActiveModel as EntryActive, Column as EntryCol, Entity as MealEntries,
            Model as EntryModel,
        },
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{DailyLog, MEAL_SOURCES, MealEntry},
    response::{ApiResponse, Meta},
    state::AppState,
};

/// The day's log, entries and the derived consumed back-references.
pub async fn day_view(
    state: &AppState,
    user: &AuthUser,
    date: NaiveDate,
) -> AppResult<ApiResponse<DayLogView>> {
    let log = DailyLogs::find()
        .filter(
            Condition::all()
                .add(LogCol::UserId.eq(user.user_id))
                .add(LogCol::LogDate.eq(date)),
        )
        .one(&state.orm)
        .await?;

    let entries: Vec<MealEntry> = match &log {
        Some(log) => MealEntries::find()
            .filter(EntryCol::DailyLogId.eq(log.id))
            .order_by_asc(EntryCol::LoggedAt)
            .all(&state.orm)
            .await?
            .into_iter()
            .map(entry_from_entity)
            .collect(),
        None => Vec::new(),
    };

    let refs = ledger::consumed_refs(entries.iter().map(|e| ledger::EntryRef {
        source: e.source.as_str(),
        meal_slot: e.meal_slot.as_deref(),
        order_id: e.order_id,
        order_item_index: e.order_item_index,
    }));

    Ok(ApiResponse::success(
        "OK",
        DayLogView {
            log: log.map(log_from_entity),
            entries,
            consumed_plan_slots: refs.plan_slots,
            consumed_order_items: refs
                .order_items
                .into_iter()
                .map(|(order_id, item_index)| ConsumedOrderItem {
                    order_id,
                    item_index,
                })
                .collect(),
        },
        Some(Meta::empty()),
    ))
}

/// Insert a meal entry. The entry and the updated totals are written in one
/// transaction so the log can never drift from its entries.
pub async fn add_meal(
    state: &AppState,
    user: &AuthUser,
    date: NaiveDate,
    payload: CreateMealRequest,
) -> AppResult<ApiResponse<MealEntry>> {
    if payload.name.trim().is_empty() {
        return Err(AppError::BadRequest("name is required".into()));
    }
    if !MEAL_SOURCES.contains(&payload.source.as_str()) {
        return Err(AppError::BadRequest("invalid meal source".into()));
    }

    let entry_nutrition = Nutrition::new(
        payload.calories,
        payload.protein,
        payload.carbs,
        payload.fats,
    );

    let txn = state.orm.begin().await?;

    let log = match lock_log(&txn, user.user_id, date).await? {
        Some(log) => {
            let totals = ledger::apply_insert(log_totals(&log), entry_nutrition);
            update_totals(&txn, log, totals).await?
        }
        None => {
            // First meal of the day creates the log seeded from the entry.
            LogActive {
                id: Set(Uuid::new_v4()),
                user_id: Set(user.user_id),
                log_date: Set(date),
                total_calories: Set(entry_nutrition.calories),
                total_protein: Set(entry_nutrition.protein),
                total_carbs: Set(entry_nutrition.carbs),
                total_fats: Set(entry_nutrition.fats),
            }
            .insert(&txn)
            .await?
        }
    };

    let entry = EntryActive {
        id: Set(Uuid::new_v4()),
        daily_log_id: Set(log.id),
        name: Set(payload.name),
        calories: Set(payload.calories),
        protein: Set(payload.protein),
        carbs: Set(payload.carbs),
        fats: Set(payload.fats),
        source: Set(payload.source),
        meal_slot: Set(payload.meal_slot),
        order_id: Set(payload.order_id),
        order_item_index: Set(payload.order_item_index),
        logged_at: NotSet,
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "meal_logged",
        Some("meal_entries"),
        Some(serde_json::json!({ "entry_id": entry.id, "date": date })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Meal logged",
        entry_from_entity(entry),
        Some(Meta::empty()),
    ))
}

pub async fn update_meal(
    state: &AppState,
    user: &AuthUser,
    date: NaiveDate,
    id: Uuid,
    payload: UpdateMealRequest,
) -> AppResult<ApiResponse<MealEntry>> {
    let txn = state.orm.begin().await?;

    let log = match lock_log(&txn, user.user_id, date).await? {
        Some(log) => log,
        None => return Err(AppError::NotFound),
    };

    let entry = MealEntries::find_by_id(id)
        .filter(EntryCol::DailyLogId.eq(log.id))
        .one(&txn)
        .await?;
    let entry = match entry {
        Some(e) => e,
        None => return Err(AppError::NotFound),
    };

    let old = entry_totals(&entry);
    let new = Nutrition::new(
        payload.calories.unwrap_or(entry.calories),
        payload.protein.unwrap_or(entry.protein),
        payload.carbs.unwrap_or(entry.carbs),
        payload.fats.unwrap_or(entry.fats),
    );
    let name = payload.name.unwrap_or_else(|| entry.name.clone());

    let totals = ledger::apply_edit(log_totals(&log), old, new);
    update_totals(&txn, log, totals).await?;

    let mut active: EntryActive = entry.into();
    active.name = Set(name);
    active.calories = Set(new.calories);
    active.protein = Set(new.protein);
    active.carbs = Set(new.carbs);
    active.fats = Set(new.fats);
    let entry = active.update(&txn).await?;

    txn.commit().await?;

    Ok(ApiResponse::success(
        "Meal updated",
        entry_from_entity(entry),
        Some(Meta::empty()),
    ))
}

pub async fn delete_meal(
    state: &AppState,
    user: &AuthUser,
    date: NaiveDate,
    id: Uuid,
) -> AppResult<ApiResponse<DailyLog>> {
    let txn = state.orm.begin().await?;

    let log = match lock_log(&txn, user.user_id, date).await? {
        Some(log) => log,
        None => return Err(AppError::NotFound),
    };

    let entry = MealEntries::find_by_id(id)
        .filter(EntryCol::DailyLogId.eq(log.id))
        .one(&txn)
        .await?;
    let entry = match entry {
        Some(e) => e,
        None => return Err(AppError::NotFound),
    };

    let totals = ledger::apply_removal(log_totals(&log), entry_totals(&entry));
    entry.delete(&txn).await?;
    let log = update_totals(&txn, log, totals).await?;

    txn.commit().await?;

    Ok(ApiResponse::success(
        "Meal removed",
        log_from_entity(log),
        Some(Meta::empty()),
    ))
}

async fn lock_log(
    txn: &DatabaseTransaction,
    user_id: Uuid,
    date: NaiveDate,
) -> AppResult<Option<LogModel>> {
    let log = DailyLogs::find()
        .filter(
            Condition::all()
                .add(LogCol::UserId.eq(user_id))
                .add(LogCol::LogDate.eq(date)),
        )
        .lock(LockType::Update)
        .one(txn)
        .await?;
    Ok(log)
}

async fn update_totals(
    txn: &DatabaseTransaction,
    log: LogModel,
    totals: Nutrition,
) -> AppResult<LogModel> {
    let mut active: LogActive = log.into();
    active.total_calories = Set(totals.calories);
    active.total_protein = Set(totals.protein);
    active.total_carbs = Set(totals.carbs);
    active.total_fats = Set(totals.fats);
    Ok(active.update(txn).await?)
}

fn log_totals(log: &LogModel) -> Nutrition {
    Nutrition::new(
        log.total_calories,
        log.total_protein,
        log.total_carbs,
        log.total_fats,
    )
}

fn entry_totals(entry: &EntryModel) -> Nutrition {
    Nutrition::new(entry.calories, entry.protein, entry.carbs, entry.fats)
}

fn log_from_entity(model: LogModel) -> DailyLog {
    DailyLog {
        id: model.id,
        user_id: model.user_id,
        log_date: model.log_date,
        total_calories: model.total_calories,
        total_protein: model.total_protein,
        total_carbs: model.total_carbs,
        total_fats: model.total_fats,
    }
}

fn entry_from_entity(model: EntryModel) -> MealEntry {
    MealEntry {
        id: model.id,
        daily_log_id: model.daily_log_id,
        name: model.name,
        calories: model.calories,
        protein: model.protein,
        carbs: model.carbs,
        fats: model.fats,
        source: model.source,
        meal_slot: model.meal_slot,
        order_id: model.order_id,
        order_item_index: model.order_item_index,
        logged_at: model.logged_at.with_timezone(&Utc),
    }
}
