use axum::{extract::State, routing::post, Json, Router};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{info, instrument};

use crate::{auth::session::ApiAuth, error::AppError, sanitize::sanitize_numeric, state::AppState};

/// Margin model built once at startup. The thresholds mirror common
/// restaurant-industry guidance: full-service margins above ~10% are rare.
#[derive(Debug, Clone)]
pub struct ProfitPredictor {
    excellent_margin: f64,
    healthy_margin: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProfitEstimate {
    pub revenue: f64,
    pub total_cost: f64,
    pub profit: f64,
    pub margin_pct: f64,
    pub rating: &'static str,
}

impl ProfitPredictor {
    pub fn predict(&self, revenue: f64, food_cost: f64, labor_cost: f64, overhead: f64) -> ProfitEstimate {
        let total_cost = food_cost + labor_cost + overhead;
        let profit = revenue - total_cost;
        let margin_pct = if revenue > 0.0 { profit / revenue * 100.0 } else { 0.0 };

        let rating = if profit < 0.0 {
            "Loss-making"
        } else if margin_pct >= self.excellent_margin {
            "Excellent"
        } else if margin_pct >= self.healthy_margin {
            "Healthy"
        } else {
            "Tight"
        };

        ProfitEstimate {
            revenue,
            total_cost,
            profit,
            margin_pct,
            rating,
        }
    }
}

pub fn init_predictor() -> ProfitPredictor {
    info!("profitability predictor ready");
    ProfitPredictor {
        excellent_margin: 15.0,
        healthy_margin: 5.0,
    }
}

pub fn router() -> Router<AppState> {
    Router::new().route("/api/profit/predict", post(predict))
}

#[instrument(skip(state, payload))]
pub async fn predict(
    State(state): State<AppState>,
    ApiAuth(_session): ApiAuth,
    Json(payload): Json<Value>,
) -> Result<Json<Value>, AppError> {
    let revenue = sanitize_numeric(&payload["revenue"], Some(0.0), None, 0.0);
    if revenue <= 0.0 {
        return Err(AppError::BadRequest("Revenue must be a positive number"));
    }
    let food_cost = sanitize_numeric(&payload["food_cost"], Some(0.0), None, 0.0);
    let labor_cost = sanitize_numeric(&payload["labor_cost"], Some(0.0), None, 0.0);
    let overhead = sanitize_numeric(&payload["overhead"], Some(0.0), None, 0.0);

    let estimate = state.predictor.predict(revenue, food_cost, labor_cost, overhead);
    Ok(Json(json!({"success": true, "prediction": estimate})))
}
