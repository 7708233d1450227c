use axum::{extract::State, routing::post, Json, Router};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{info, instrument};

use crate::{auth::session::ApiAuth, error::AppError, sanitize::sanitize_numeric, state::AppState};

/// Rule-based persona bucketing over visit frequency and spend.
#[derive(Debug, Clone)]
pub struct CustomerPredictor {
    frequent_visits: f64,
    high_spend: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Persona {
    pub persona: &'static str,
    pub description: &'static str,
}

impl CustomerPredictor {
    pub fn predict(&self, visits_per_month: f64, avg_spend: f64, party_size: f64) -> Persona {
        let frequent = visits_per_month >= self.frequent_visits;
        let big_spender = avg_spend >= self.high_spend;

        let (persona, description) = match (frequent, big_spender) {
            (true, true) => (
                "Loyal Regular",
                "Visits often and spends well; reward with a loyalty program.",
            ),
            (true, false) => (
                "Habitual Visitor",
                "Comes back frequently on a budget; upsell sides and combos.",
            ),
            (false, true) => (
                "Occasion Diner",
                "Rare but high-value visits; target with event promotions.",
            ),
            (false, false) if party_size >= 4.0 => (
                "Family Diner",
                "Larger groups, price-conscious; family bundles work best.",
            ),
            _ => (
                "Occasional Visitor",
                "Low engagement; reach out with introductory offers.",
            ),
        };

        Persona {
            persona,
            description,
        }
    }
}

pub fn init_customer_predictor() -> CustomerPredictor {
    info!("customer persona predictor ready");
    CustomerPredictor {
        frequent_visits: 4.0,
        high_spend: 40.0,
    }
}

pub fn router() -> Router<AppState> {
    Router::new().route("/api/customer/predict-persona", post(predict_persona))
}

#[instrument(skip(state, payload))]
pub async fn predict_persona(
    State(state): State<AppState>,
    ApiAuth(_session): ApiAuth,
    Json(payload): Json<Value>,
) -> Result<Json<Value>, AppError> {
    let visits = sanitize_numeric(&payload["visits_per_month"], Some(0.0), None, 0.0);
    let avg_spend = sanitize_numeric(&payload["avg_spend"], Some(0.0), None, 0.0);
    let party_size = sanitize_numeric(&payload["party_size"], Some(1.0), None, 1.0);

    if visits <= 0.0 && avg_spend <= 0.0 {
        return Err(AppError::BadRequest(
            "Visit frequency or average spend required",
        ));
    }

    let persona = state.customer_model.predict(visits, avg_spend, party_size);
    Ok(Json(json!({"success": true, "persona": persona})))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buckets_cover_the_quadrants() {
        let model = init_customer_predictor();
        assert_eq!(model.predict(8.0, 55.0, 2.0).persona, "Loyal Regular");
        assert_eq!(model.predict(6.0, 15.0, 2.0).persona, "Habitual Visitor");
        assert_eq!(model.predict(1.0, 80.0, 2.0).persona, "Occasion Diner");
        assert_eq!(model.predict(1.0, 20.0, 5.0).persona, "Family Diner");
        assert_eq!(model.predict(1.0, 20.0, 2.0).persona, "Occasional Visitor");
    }

    #[tokio::test]
    async fn predict_endpoint_requires_some_signal() {
        let state = AppState::for_tests().await;
        let session = crate::auth::session::SessionUser {
            user_id: 1,
            name: "Ada".into(),
            email: "ada@example.com".into(),
        };

        let err = predict_persona(
            State(state.clone()),
            ApiAuth(session.clone()),
            Json(json!({})),
        )
        .await
        .expect_err("empty input");
        assert!(matches!(err, AppError::BadRequest(_)));

        let body = predict_persona(
            State(state),
            ApiAuth(session),
            Json(json!({"visits_per_month": 5, "avg_spend": 50})),
        )
        .await
        .unwrap();
        assert_eq!(body.0["persona"]["persona"], "Loyal Regular");
    }
}
