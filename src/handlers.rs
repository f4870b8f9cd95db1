use crate::core::{Schedule, TaskTracker};
use crate::error::Result;
use crate::models::{NewTask, Settings, SettingsUpdate, Task, TaskInput};
use crate::server::AppState;
use axum::Json;
use axum::extract::{Path, State};
use chrono::Utc;
use serde::Serialize;

/// A read view: which page it is plus whatever that page shows
#[derive(Debug, Serialize)]
pub struct View<T: Serialize> {
    pub page: &'static str,
    #[serde(flatten)]
    pub data: T,
}

#[derive(Debug, Serialize)]
pub struct TaskList {
    pub tasks: Vec<Task>,
}

#[derive(Debug, Serialize)]
pub struct SettingsPage {
    pub settings: Settings,
}

#[derive(Debug, Serialize)]
pub struct Empty {}

/// Write acknowledgement
#[derive(Debug, Serialize)]
pub struct Ack {
    pub success: bool,
}

const ACK: Ack = Ack { success: true };

pub async fn home(State(state): State<AppState>) -> Result<Json<View<TaskList>>> {
    let today = Utc::now().date_naive();
    let tasks = state
        .store
        .run(move |session| TaskTracker::new(session.conn()?).home(today))
        .await?;
    Ok(Json(View {
        page: "home",
        data: TaskList { tasks },
    }))
}

pub async fn tasks(State(state): State<AppState>) -> Result<Json<View<TaskList>>> {
    let tasks = state
        .store
        .run(|session| TaskTracker::new(session.conn()?).all_tasks())
        .await?;
    Ok(Json(View {
        page: "tasks",
        data: TaskList { tasks },
    }))
}

pub async fn schedule(State(state): State<AppState>) -> Result<Json<View<Schedule>>> {
    let schedule = state
        .store
        .run(|session| TaskTracker::new(session.conn()?).schedule())
        .await?;
    Ok(Json(View {
        page: "schedule",
        data: schedule,
    }))
}

pub async fn settings(State(state): State<AppState>) -> Result<Json<View<SettingsPage>>> {
    let settings = state
        .store
        .run(|session| TaskTracker::new(session.conn()?).settings())
        .await?;
    Ok(Json(View {
        page: "settings",
        data: SettingsPage { settings },
    }))
}

pub async fn onboarding() -> Json<View<Empty>> {
    Json(View {
        page: "onboarding",
        data: Empty {},
    })
}

pub async fn create_task(
    State(state): State<AppState>,
    Json(task): Json<NewTask>,
) -> Result<Json<Ack>> {
    state
        .store
        .run(move |session| TaskTracker::new(session.conn()?).create_task(task))
        .await?;
    Ok(Json(ACK))
}

pub async fn update_task(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(input): Json<TaskInput>,
) -> Result<Json<Ack>> {
    state
        .store
        .run(move |session| TaskTracker::new(session.conn()?).update_task(id, input))
        .await?;
    Ok(Json(ACK))
}

pub async fn delete_task(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Ack>> {
    state
        .store
        .run(move |session| TaskTracker::new(session.conn()?).delete_task(id))
        .await?;
    Ok(Json(ACK))
}

pub async fn update_settings(
    State(state): State<AppState>,
    Json(update): Json<SettingsUpdate>,
) -> Result<Json<Ack>> {
    state
        .store
        .run(move |session| TaskTracker::new(session.conn()?).update_settings(update))
        .await?;
    Ok(Json(ACK))
}
