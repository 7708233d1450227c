use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{info, instrument};

use crate::{auth::session::ApiAuth, error::AppError, state::AppState};

#[derive(Debug, Clone, Serialize)]
pub struct Ingredient {
    pub name: &'static str,
    pub quantity: f64,
    pub unit: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct Recipe {
    pub name: &'static str,
    pub servings: u32,
    pub ingredients: Vec<Ingredient>,
}

fn ingredient(name: &'static str, quantity: f64, unit: &'static str) -> Ingredient {
    Ingredient {
        name,
        quantity,
        unit,
    }
}

/// Built-in recipe set loaded at startup.
pub fn init_recipes() -> Vec<Recipe> {
    let recipes = vec![
        Recipe {
            name: "Margherita Pizza",
            servings: 4,
            ingredients: vec![
                ingredient("Pizza dough", 0.5, "kg"),
                ingredient("Tomato sauce", 0.2, "l"),
                ingredient("Mozzarella", 0.25, "kg"),
                ingredient("Basil", 10.0, "g"),
            ],
        },
        Recipe {
            name: "Tomato Soup",
            servings: 6,
            ingredients: vec![
                ingredient("Tomatoes", 1.2, "kg"),
                ingredient("Onion", 0.2, "kg"),
                ingredient("Vegetable stock", 1.0, "l"),
                ingredient("Cream", 0.15, "l"),
            ],
        },
        Recipe {
            name: "Caesar Salad",
            servings: 2,
            ingredients: vec![
                ingredient("Romaine lettuce", 0.3, "kg"),
                ingredient("Parmesan", 0.05, "kg"),
                ingredient("Croutons", 0.08, "kg"),
                ingredient("Caesar dressing", 0.1, "l"),
            ],
        },
        Recipe {
            name: "Beef Burger",
            servings: 1,
            ingredients: vec![
                ingredient("Ground beef", 0.18, "kg"),
                ingredient("Burger bun", 1.0, "pcs"),
                ingredient("Cheddar", 0.03, "kg"),
                ingredient("Lettuce", 0.02, "kg"),
            ],
        },
    ];
    info!(count = recipes.len(), "recipe data ready");
    recipes
}

pub fn router() -> Router<AppState> {
    Router::new().route("/api/inventory/recipes", get(list_recipes))
}

#[instrument(skip(state))]
pub async fn list_recipes(
    State(state): State<AppState>,
    ApiAuth(_session): ApiAuth,
) -> Result<Json<Value>, AppError> {
    Ok(Json(json!({"success": true, "recipes": *state.recipes})))
}
