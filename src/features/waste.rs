use axum::{
    extract::State,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use sqlx::{FromRow, SqlitePool};
use time::{Date, OffsetDateTime};
use tracing::{info, instrument};

use crate::{
    auth::session::ApiAuth,
    error::AppError,
    sanitize::{sanitize_numeric, sanitize_string},
    state::AppState,
};

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct WasteCategory {
    pub id: i64,
    pub name: String,
    pub average_cost_per_unit: f64,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct WasteEntry {
    pub id: i64,
    pub user_id: i64,
    pub item_name: String,
    pub category: String,
    pub quantity: f64,
    pub unit: String,
    pub date_recorded: Date,
    pub cost_value: f64,
    pub notes: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Deserialize)]
pub struct CreateWasteEntry {
    #[serde(default)]
    pub item_name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub quantity: Value,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub date_recorded: String,
    #[serde(default)]
    pub cost_value: Value,
    #[serde(default)]
    pub notes: String,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/waste/categories", get(list_categories))
        .route("/api/waste/entries", get(list_entries).post(create_entry))
}

pub async fn fetch_categories(db: &SqlitePool) -> sqlx::Result<Vec<WasteCategory>> {
    sqlx::query_as::<_, WasteCategory>(
        "SELECT id, name, average_cost_per_unit FROM waste_categories ORDER BY id",
    )
    .fetch_all(db)
    .await
}

pub async fn fetch_entries(db: &SqlitePool, user_id: i64) -> sqlx::Result<Vec<WasteEntry>> {
    sqlx::query_as::<_, WasteEntry>(
        r#"
        SELECT id, user_id, item_name, category, quantity, unit,
               date_recorded, cost_value, notes, created_at
        FROM waste_entries
        WHERE user_id = ?
        ORDER BY date_recorded DESC, id DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(db)
    .await
}

#[instrument(skip(state))]
pub async fn list_categories(
    State(state): State<AppState>,
    ApiAuth(_session): ApiAuth,
) -> Result<Json<Value>, AppError> {
    let categories = fetch_categories(&state.db).await?;
    Ok(Json(json!({"success": true, "categories": categories})))
}

#[instrument(skip(state, session))]
pub async fn list_entries(
    State(state): State<AppState>,
    ApiAuth(session): ApiAuth,
) -> Result<Json<Value>, AppError> {
    let entries = fetch_entries(&state.db, session.user_id).await?;
    Ok(Json(json!({"success": true, "entries": entries})))
}

#[instrument(skip(state, session, payload))]
pub async fn create_entry(
    State(state): State<AppState>,
    ApiAuth(session): ApiAuth,
    Json(payload): Json<CreateWasteEntry>,
) -> Result<Json<Value>, AppError> {
    let item_name = sanitize_string(&payload.item_name, 100);
    let category = sanitize_string(&payload.category, 50);
    let unit = sanitize_string(&payload.unit, 20);
    let notes = sanitize_string(&payload.notes, 500);

    if item_name.is_empty() || category.is_empty() || unit.is_empty() {
        return Err(AppError::BadRequest("Item name, category, and unit required"));
    }

    let quantity = sanitize_numeric(&payload.quantity, Some(0.0), None, 0.0);
    if quantity <= 0.0 {
        return Err(AppError::BadRequest("Quantity must be a positive number"));
    }
    let cost_value = sanitize_numeric(&payload.cost_value, Some(0.0), None, 0.0);

    let date_format = time::macros::format_description!("[year]-[month]-[day]");
    let date_recorded = Date::parse(payload.date_recorded.trim(), &date_format)
        .map_err(|_| AppError::BadRequest("Invalid date"))?;

    let entry_id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO waste_entries
            (user_id, item_name, category, quantity, unit, date_recorded, cost_value, notes)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING id
        "#,
    )
    .bind(session.user_id)
    .bind(&item_name)
    .bind(&category)
    .bind(quantity)
    .bind(&unit)
    .bind(date_recorded)
    .bind(cost_value)
    .bind(if notes.is_empty() { None } else { Some(notes) })
    .fetch_one(&state.db)
    .await?;

    info!(user_id = session.user_id, entry_id, "waste entry recorded");
    Ok(Json(json!({
        "success": true,
        "message": "Waste entry recorded",
        "id": entry_id,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::session::SessionUser;
    use serde_json::json;

    fn session() -> SessionUser {
        SessionUser {
            user_id: 1,
            name: "Ada".into(),
            email: "ada@example.com".into(),
        }
    }

    fn entry_payload() -> CreateWasteEntry {
        CreateWasteEntry {
            item_name: "Tomatoes".into(),
            category: "Vegetables".into(),
            quantity: json!(2.5),
            unit: "kg".into(),
            date_recorded: "2024-03-01".into(),
            cost_value: json!("6.25"),
            notes: "over-ordered".into(),
        }
    }

    #[tokio::test]
    async fn categories_come_back_seeded() {
        let state = AppState::for_tests().await;
        let body = list_categories(State(state), ApiAuth(session()))
            .await
            .unwrap();
        let categories = body.0["categories"].as_array().unwrap();
        assert_eq!(categories.len(), 7);
        assert_eq!(categories[0]["name"], "Vegetables");
    }

    #[tokio::test]
    async fn create_then_list_entries() {
        let state = AppState::for_tests().await;

        let body = create_entry(State(state.clone()), ApiAuth(session()), Json(entry_payload()))
            .await
            .expect("entry created");
        assert_eq!(body.0["success"], true);

        let listed = list_entries(State(state.clone()), ApiAuth(session()))
            .await
            .unwrap();
        let entries = listed.0["entries"].as_array().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0]["item_name"], "Tomatoes");
        assert_eq!(entries[0]["cost_value"], 6.25);

        // Another user's listing stays empty.
        let other = SessionUser {
            user_id: 2,
            ..session()
        };
        let listed = list_entries(State(state), ApiAuth(other)).await.unwrap();
        assert!(listed.0["entries"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn create_rejects_bad_input() {
        let state = AppState::for_tests().await;

        let mut missing = entry_payload();
        missing.item_name = "  ".into();
        let err = create_entry(State(state.clone()), ApiAuth(session()), Json(missing))
            .await
            .expect_err("missing item name");
        assert!(matches!(err, AppError::BadRequest(_)));

        let mut bad_quantity = entry_payload();
        bad_quantity.quantity = json!("abc");
        let err = create_entry(State(state.clone()), ApiAuth(session()), Json(bad_quantity))
            .await
            .expect_err("unparseable quantity collapses to default 0");
        assert!(matches!(
            err,
            AppError::BadRequest("Quantity must be a positive number")
        ));

        let mut bad_date = entry_payload();
        bad_date.date_recorded = "03/01/2024".into();
        let err = create_entry(State(state), ApiAuth(session()), Json(bad_date))
            .await
            .expect_err("bad date");
        assert!(matches!(err, AppError::BadRequest("Invalid date")));
    }
}
