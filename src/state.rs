use std::sync::Arc;

use sqlx::SqlitePool;
use tracing::info;

use crate::{
    config::AppConfig,
    db,
    features::{
        customer::{init_customer_predictor, CustomerPredictor},
        inventory::{init_recipes, Recipe},
        profit::{init_predictor, ProfitPredictor},
    },
};

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub config: Arc<AppConfig>,
    pub predictor: Arc<ProfitPredictor>,
    pub recipes: Arc<Vec<Recipe>>,
    pub customer_model: Arc<CustomerPredictor>,
}

impl AppState {
    /// Initialize everything the shell owns, in startup order: predictor,
    /// database schema, recipe data, customer model. Any failure aborts
    /// startup.
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        let predictor = Arc::new(init_predictor());

        let db = db::connect(&config).await?;
        db::init_database(&db).await?;

        let recipes = Arc::new(init_recipes());
        let customer_model = Arc::new(init_customer_predictor());

        info!("all systems ready");
        Ok(Self {
            db,
            config,
            predictor,
            recipes,
            customer_model,
        })
    }

    #[cfg(test)]
    pub async fn for_tests() -> Self {
        let config = Arc::new(AppConfig {
            debug: true,
            database_path: ":memory:".into(),
            secret_key: "test-secret".into(),
            // Minimum bcrypt cost keeps the tests fast.
            bcrypt_cost: 4,
            session_ttl_minutes: 60,
            host: "127.0.0.1".into(),
            port: 0,
        });

        let db = db::test_pool().await;
        db::init_database(&db).await.expect("test schema");

        // Seed the logged-in user the test session helpers assume (user_id = 1)
        // so waste_entries' FOREIGN KEY (user_id) REFERENCES users(id) is satisfied.
        sqlx::query(
            "INSERT INTO users (name, email, password_hash) VALUES ('Ada', 'fixture@fbais.test', 'x')",
        )
        .execute(&db)
        .await
        .expect("seed test user");

        Self {
            db,
            config,
            predictor: Arc::new(init_predictor()),
            recipes: Arc::new(init_recipes()),
            customer_model: Arc::new(init_customer_predictor()),
        }
    }
}
