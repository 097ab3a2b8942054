use std::{
    collections::{BTreeMap, HashMap},
    sync::Arc,
};

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, put},
    Form, Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

pub const FORBIDDEN_BODY: &str = r#"{ "error": "Your access token does not have the correct permissions" }"#;
pub const NOT_FOUND_BODY: &str = r#"{"error":"Not found"}"#;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Application {
    pub id: i64,
    pub state: String,
    pub user_account_id: String,
    pub service_id: i64,
    pub plan_id: i64,
    pub name: String,
    pub description: String,
    pub user_key: String,
    pub provider_verification_key: String,
    pub application_id: String,
    pub end_user_required: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ApplicationPlan {
    pub id: i64,
    pub name: String,
    pub system_name: String,
    pub custom: bool,
    pub state: String,
}

#[derive(Default)]
pub struct Db {
    next_id: i64,
    applications: BTreeMap<i64, Application>,
    /// Application id to the shared plan it had before customization.
    customized: HashMap<i64, i64>,
}

impl Db {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn owned(&self, account_id: i64, app_id: i64) -> Option<&Application> {
        self.applications
            .get(&app_id)
            .filter(|app| app.user_account_id == account_id.to_string())
    }

    fn owned_mut(&mut self, account_id: i64, app_id: i64) -> Option<&mut Application> {
        self.applications
            .get_mut(&app_id)
            .filter(|app| app.user_account_id == account_id.to_string())
    }
}

#[derive(Clone)]
pub struct AppState {
    db: Arc<RwLock<Db>>,
    access_token: Arc<str>,
}

type Fields = HashMap<String, String>;

pub fn app(access_token: &str) -> Router {
    let state = AppState {
        db: Arc::new(RwLock::new(Db::default())),
        access_token: Arc::from(access_token),
    };
    Router::new()
        .route("/admin/api/accounts/applications.json", get(list_all_applications))
        .route(
            "/admin/api/accounts/{account_id}/applications.json",
            get(list_applications).post(create_application),
        )
        .route(
            "/admin/api/accounts/{account_id}/applications/{app}",
            get(read_application)
                .put(update_application)
                .delete(delete_application),
        )
        .route(
            "/admin/api/accounts/{account_id}/applications/{app}/{action}",
            put(application_action),
        )
        .with_state(state)
}

pub async fn run(listener: TcpListener, access_token: &str) -> Result<(), std::io::Error> {
    axum::serve(listener, app(access_token)).await
}

fn error(status: StatusCode, body: &'static str) -> Response {
    (status, [(header::CONTENT_TYPE, "application/json")], body).into_response()
}

fn authorize(state: &AppState, fields: &Fields) -> Result<(), Response> {
    match fields.get("access_token") {
        Some(token) if token.as_str() == &*state.access_token => Ok(()),
        _ => Err(error(StatusCode::FORBIDDEN, FORBIDDEN_BODY)),
    }
}

/// `"21.json"` to `21`.
fn json_id(segment: &str) -> Option<i64> {
    segment.strip_suffix(".json")?.parse().ok()
}

fn application_json(app: &Application) -> Response {
    Json(serde_json::json!({ "application": app })).into_response()
}

fn list_json<'a>(apps: impl Iterator<Item = &'a Application>) -> Response {
    let applications: Vec<_> = apps
        .map(|app| serde_json::json!({ "application": app }))
        .collect();
    Json(serde_json::json!({ "applications": applications })).into_response()
}

async fn list_all_applications(State(state): State<AppState>, Query(query): Query<Fields>) -> Response {
    if let Err(denied) = authorize(&state, &query) {
        return denied;
    }
    let db = state.db.read().await;
    list_json(db.applications.values())
}

async fn list_applications(
    State(state): State<AppState>,
    Path(account_id): Path<i64>,
    Query(query): Query<Fields>,
) -> Response {
    if let Err(denied) = authorize(&state, &query) {
        return denied;
    }
    let account = account_id.to_string();
    let db = state.db.read().await;
    list_json(db.applications.values().filter(|app| app.user_account_id == account))
}

async fn create_application(
    State(state): State<AppState>,
    Path(account_id): Path<i64>,
    Form(fields): Form<Fields>,
) -> Response {
    if let Err(denied) = authorize(&state, &fields) {
        return denied;
    }
    let Some(plan_id) = fields.get("plan_id").and_then(|id| id.parse().ok()) else {
        return error(StatusCode::UNPROCESSABLE_ENTITY, r#"{"error":"plan_id is required"}"#);
    };

    let mut db = state.db.write().await;
    let app = Application {
        id: db.next_id(),
        state: "live".to_string(),
        user_account_id: account_id.to_string(),
        service_id: 1,
        plan_id,
        name: fields.get("name").cloned().unwrap_or_default(),
        description: fields.get("description").cloned().unwrap_or_default(),
        user_key: Uuid::new_v4().simple().to_string(),
        provider_verification_key: Uuid::new_v4().simple().to_string(),
        application_id: Uuid::new_v4().simple().to_string()[..8].to_string(),
        end_user_required: false,
    };
    db.applications.insert(app.id, app.clone());
    tracing::debug!(id = app.id, account_id, "created application");

    match quick_xml::se::to_string_with_root("application", &app) {
        Ok(xml) => (
            StatusCode::CREATED,
            [(header::CONTENT_TYPE, "application/xml")],
            format!(r#"<?xml version="1.0" encoding="UTF-8"?>{xml}"#),
        )
            .into_response(),
        Err(_) => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
    }
}

async fn read_application(
    State(state): State<AppState>,
    Path((account_id, app)): Path<(i64, String)>,
    Query(query): Query<Fields>,
) -> Response {
    if let Err(denied) = authorize(&state, &query) {
        return denied;
    }
    let Some(app_id) = json_id(&app) else {
        return error(StatusCode::NOT_FOUND, NOT_FOUND_BODY);
    };
    let db = state.db.read().await;
    match db.owned(account_id, app_id) {
        Some(app) => application_json(app),
        None => error(StatusCode::NOT_FOUND, NOT_FOUND_BODY),
    }
}

async fn update_application(
    State(state): State<AppState>,
    Path((account_id, app)): Path<(i64, String)>,
    Form(fields): Form<Fields>,
) -> Response {
    if let Err(denied) = authorize(&state, &fields) {
        return denied;
    }
    let Some(app_id) = json_id(&app) else {
        return error(StatusCode::NOT_FOUND, NOT_FOUND_BODY);
    };
    let mut db = state.db.write().await;
    let Some(app) = db.owned_mut(account_id, app_id) else {
        return error(StatusCode::NOT_FOUND, NOT_FOUND_BODY);
    };
    for (key, value) in &fields {
        match key.as_str() {
            "name" => app.name = value.clone(),
            "description" => app.description = value.clone(),
            "user_key" => app.user_key = value.clone(),
            _ => {}
        }
    }
    application_json(app)
}

async fn delete_application(
    State(state): State<AppState>,
    Path((account_id, app)): Path<(i64, String)>,
    Query(query): Query<Fields>,
) -> Response {
    if let Err(denied) = authorize(&state, &query) {
        return denied;
    }
    let mut db = state.db.write().await;
    let Some(app_id) = json_id(&app).filter(|app_id| db.owned_mut(account_id, *app_id).is_some()) else {
        return error(StatusCode::NOT_FOUND, NOT_FOUND_BODY);
    };
    db.applications.remove(&app_id);
    db.customized.remove(&app_id);
    tracing::debug!(id = app_id, account_id, "deleted application");
    StatusCode::OK.into_response()
}

async fn application_action(
    State(state): State<AppState>,
    Path((account_id, app_id, action)): Path<(i64, i64, String)>,
    Form(fields): Form<Fields>,
) -> Response {
    if let Err(denied) = authorize(&state, &fields) {
        return denied;
    }
    let mut db = state.db.write().await;
    if db.owned_mut(account_id, app_id).is_none() {
        return error(StatusCode::NOT_FOUND, NOT_FOUND_BODY);
    }

    match action.as_str() {
        "suspend.json" | "resume.json" => {
            let new_state = if action == "suspend.json" { "suspended" } else { "live" };
            let Some(app) = db.owned_mut(account_id, app_id) else {
                return error(StatusCode::NOT_FOUND, NOT_FOUND_BODY);
            };
            app.state = new_state.to_string();
            application_json(app)
        }
        "change_plan.json" => {
            let Some(plan_id) = fields.get("plan_id").and_then(|id| id.parse().ok()) else {
                return error(StatusCode::UNPROCESSABLE_ENTITY, r#"{"error":"plan_id is required"}"#);
            };
            db.customized.remove(&app_id);
            let Some(app) = db.owned_mut(account_id, app_id) else {
                return error(StatusCode::NOT_FOUND, NOT_FOUND_BODY);
            };
            app.plan_id = plan_id;
            application_json(app)
        }
        "customize_plan.json" => {
            let plan_id = db.next_id();
            let Some(app) = db.owned_mut(account_id, app_id) else {
                return error(StatusCode::NOT_FOUND, NOT_FOUND_BODY);
            };
            let shared_plan_id = std::mem::replace(&mut app.plan_id, plan_id);
            db.customized.entry(app_id).or_insert(shared_plan_id);
            let plan = ApplicationPlan {
                id: plan_id,
                name: format!("Custom plan {shared_plan_id}"),
                system_name: format!("custom_plan_{plan_id}"),
                custom: true,
                state: "published".to_string(),
            };
            Json(serde_json::json!({ "application_plan": plan })).into_response()
        }
        "decustomize_plan.json" => {
            let Some(shared_plan_id) = db.customized.remove(&app_id) else {
                return error(
                    StatusCode::UNPROCESSABLE_ENTITY,
                    r#"{"error":"Application plan is not customized"}"#,
                );
            };
            if let Some(app) = db.owned_mut(account_id, app_id) {
                app.plan_id = shared_plan_id;
            }
            StatusCode::OK.into_response()
        }
        _ => error(StatusCode::NOT_FOUND, NOT_FOUND_BODY),
    }
}
