use axum::{extract::State, Extension, Json};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::commands::{require_id, IdPayload};
use crate::db::{DbPool, Task};
use crate::error::{AgriError, AgriResult};
use crate::middleware::auth::Claims;
use crate::permissions::{require_modify, ViewId};
use crate::state::AppState;
use crate::validation;

const TASK_SELECT: &str = "SELECT t.*, a.full_name AS assigned_to_name, \
     b.full_name AS assigned_by_name \
     FROM tasks t \
     LEFT JOIN profiles a ON a.id = t.assigned_to \
     LEFT JOIN profiles b ON b.id = t.assigned_by";

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskForm {
    pub id: Option<Uuid>,
    pub title: String,
    pub description: String,
    pub assigned_to: Option<Uuid>,
    pub assigned_by: Option<Uuid>,
    pub priority: Option<String>,
    pub status: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub start_date: Option<NaiveDate>,
    pub completed_date: Option<NaiveDate>,
    pub field_id: Option<Uuid>,
    pub crop_id: Option<Uuid>,
    pub livestock_id: Option<Uuid>,
    pub notes: Option<String>,
}

pub(crate) async fn fetch_tasks(pool: &DbPool) -> AgriResult<Vec<Task>> {
    Ok(
        sqlx::query_as::<_, Task>(&format!("{} ORDER BY t.created_at DESC", TASK_SELECT))
            .fetch_all(pool)
            .await?,
    )
}

async fn fetch_task(pool: &DbPool, id: Uuid) -> AgriResult<Task> {
    sqlx::query_as::<_, Task>(&format!("{} WHERE t.id = $1", TASK_SELECT))
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AgriError::NotFound("Task not found".into()))
}

pub async fn list_tasks(State(state): State<AppState>) -> AgriResult<Json<Vec<Task>>> {
    Ok(Json(fetch_tasks(&state.pool).await?))
}

pub async fn create_task(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(form): Json<TaskForm>,
) -> AgriResult<Json<Task>> {
    require_modify(&claims, ViewId::Tasks)?;
    validation::validate_task(&form).into_result()?;

    let assigned_by = form.assigned_by.unwrap_or(claims.user_id);

    let id: Uuid = sqlx::query_scalar(
        "INSERT INTO tasks (title, description, assigned_to, assigned_by, priority, status, \
         due_date, start_date, completed_date, field_id, crop_id, livestock_id, notes) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13) RETURNING id",
    )
    .bind(&form.title)
    .bind(&form.description)
    .bind(form.assigned_to)
    .bind(assigned_by)
    .bind(form.priority.as_deref().unwrap_or("medium"))
    .bind(form.status.as_deref().unwrap_or("pending"))
    .bind(form.due_date)
    .bind(form.start_date)
    .bind(form.completed_date)
    .bind(form.field_id)
    .bind(form.crop_id)
    .bind(form.livestock_id)
    .bind(&form.notes)
    .fetch_one(&state.pool)
    .await?;

    Ok(Json(fetch_task(&state.pool, id).await?))
}

pub async fn update_task(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(form): Json<TaskForm>,
) -> AgriResult<Json<Task>> {
    require_modify(&claims, ViewId::Tasks)?;
    validation::validate_task(&form).into_result()?;
    let id = require_id(form.id)?;

    let result = sqlx::query(
        "UPDATE tasks SET title = $1, description = $2, assigned_to = $3, assigned_by = $4, \
         priority = $5, status = $6, due_date = $7, start_date = $8, completed_date = $9, \
         field_id = $10, crop_id = $11, livestock_id = $12, notes = $13, updated_at = now() \
         WHERE id = $14",
    )
    .bind(&form.title)
    .bind(&form.description)
    .bind(form.assigned_to)
    .bind(form.assigned_by)
    .bind(form.priority.as_deref().unwrap_or("medium"))
    .bind(form.status.as_deref().unwrap_or("pending"))
    .bind(form.due_date)
    .bind(form.start_date)
    .bind(form.completed_date)
    .bind(form.field_id)
    .bind(form.crop_id)
    .bind(form.livestock_id)
    .bind(&form.notes)
    .bind(id)
    .execute(&state.pool)
    .await?;
    if result.rows_affected() == 0 {
        return Err(AgriError::NotFound("Task not found".into()));
    }

    Ok(Json(fetch_task(&state.pool, id).await?))
}

pub async fn delete_task(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<IdPayload>,
) -> AgriResult<Json<()>> {
    require_modify(&claims, ViewId::Tasks)?;

    let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
        .bind(payload.id)
        .execute(&state.pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AgriError::NotFound("Task not found".into()));
    }

    Ok(Json(()))
}
