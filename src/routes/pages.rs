use axum::{
    extract::State,
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
    Router,
};
use tracing::instrument;

use crate::{
    auth::{
        repo::User,
        session::{RequireLogin, Session, SessionUser},
    },
    state::AppState,
};

const LANDING: &str = include_str!("../../templates/landing.html");
const DASHBOARD: &str = include_str!("../../templates/dashboard.html");
const PROFIT: &str = include_str!("../../templates/profit.html");
const INVENTORY: &str = include_str!("../../templates/inventory.html");
const CUSTOMER: &str = include_str!("../../templates/customer.html");
const PROFILE: &str = include_str!("../../templates/profile.html");

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/landing", get(landing))
        .route("/dashboard", get(dashboard))
        .route("/profitability-prediction", get(profitability_prediction))
        .route("/inventory-recipes", get(inventory_recipes))
        .route("/customer-personas", get(customer_personas))
        .route("/profile", get(profile))
}

fn escape_html(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Fill the static shell's placeholders from the freshly loaded user row,
/// falling back to the session copy when the row is gone.
fn render(shell: &str, user: Option<&User>, session: &SessionUser) -> Html<String> {
    let name = user.map(|u| u.name.as_str()).unwrap_or(&session.name);
    let email = user.map(|u| u.email.as_str()).unwrap_or(&session.email);
    let business = user
        .and_then(|u| u.business_name.as_deref())
        .unwrap_or("");
    let phone = user.and_then(|u| u.phone.as_deref()).unwrap_or("");

    Html(
        shell
            .replace("{{user_name}}", &escape_html(name))
            .replace("{{user_email}}", &escape_html(email))
            .replace("{{business_name}}", &escape_html(business))
            .replace("{{phone}}", &escape_html(phone)),
    )
}

/// Home: dashboard shell for a logged-in user, landing shell otherwise.
#[instrument(skip(state, session))]
pub async fn index(State(state): State<AppState>, Session(session): Session) -> Response {
    match session {
        Some(session) => {
            let user = User::find_by_id(&state.db, session.user_id)
                .await
                .ok()
                .flatten();
            render(DASHBOARD, user.as_ref(), &session).into_response()
        }
        None => Html(LANDING.to_string()).into_response(),
    }
}

pub async fn landing(Session(session): Session) -> Response {
    if session.is_some() {
        Redirect::to("/dashboard").into_response()
    } else {
        Html(LANDING.to_string()).into_response()
    }
}

#[instrument(skip(state, session))]
pub async fn dashboard(
    State(state): State<AppState>,
    RequireLogin(session): RequireLogin,
) -> Html<String> {
    // Read the row fresh so profile changes show up immediately.
    let user = User::find_by_id(&state.db, session.user_id)
        .await
        .ok()
        .flatten();
    render(DASHBOARD, user.as_ref(), &session)
}

pub async fn profitability_prediction(RequireLogin(_session): RequireLogin) -> Html<&'static str> {
    Html(PROFIT)
}

pub async fn inventory_recipes(RequireLogin(_session): RequireLogin) -> Html<&'static str> {
    Html(INVENTORY)
}

pub async fn customer_personas(RequireLogin(_session): RequireLogin) -> Html<&'static str> {
    Html(CUSTOMER)
}

#[instrument(skip(state, session))]
pub async fn profile(
    State(state): State<AppState>,
    RequireLogin(session): RequireLogin,
) -> Html<String> {
    let user = User::find_by_id(&state.db, session.user_id)
        .await
        .ok()
        .flatten();
    render(PROFILE, user.as_ref(), &session)
}
