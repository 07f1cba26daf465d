//! HTTP endpoint handlers. These are thin wrappers that forward to core logic.
//! Each handler is instrumented; failures surface as `AdminError` responses.

use std::sync::Arc;
use axum::{extract::{Path, State}, http::StatusCode, Json, response::IntoResponse};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::analytics::Dashboard;
use crate::error::AdminResult;
use crate::logic::*;
use crate::protocol::*;
use crate::state::AppState;

#[instrument(level = "info")]
pub async fn http_health() -> impl IntoResponse { Json(HealthOut { ok: true }) }

#[instrument(level = "info", skip(state))]
pub async fn http_get_analytics(State(state): State<Arc<AppState>>) -> AdminResult<Json<Dashboard>> {
  let dashboard = load_dashboard(&state).await?;
  info!(
    target: "analytics",
    modules = dashboard.modules.completion.len(),
    students = dashboard.students.students.len(),
    "HTTP dashboard served"
  );
  Ok(Json(dashboard))
}

#[instrument(level = "info", skip(state))]
pub async fn http_get_modules(State(state): State<Arc<AppState>>) -> AdminResult<Json<ModuleListOut>> {
  let modules = list_modules(&state).await?;
  Ok(Json(ModuleListOut { modules }))
}

#[instrument(level = "info", skip(state, body), fields(module_id = ?body.module_id))]
pub async fn http_post_session(
  State(state): State<Arc<AppState>>,
  Json(body): Json<OpenSessionIn>,
) -> AdminResult<(StatusCode, Json<EditorView>)> {
  let s = open_session(&state, body.module_id).await?;
  let view = to_view(&s, state.config.editor.ru_fields_policy, state.editor_chrome());
  Ok((StatusCode::CREATED, Json(view)))
}

#[instrument(level = "info", skip(state))]
pub async fn http_get_session(
  State(state): State<Arc<AppState>>,
  Path(id): Path<Uuid>,
) -> AdminResult<Json<EditorView>> {
  let s = state.get_session(id).await?;
  Ok(Json(to_view(&s, state.config.editor.ru_fields_policy, state.editor_chrome())))
}

#[instrument(level = "info", skip(state, body), fields(ops = body.ops.len()))]
pub async fn http_post_edits(
  State(state): State<Arc<AppState>>,
  Path(id): Path<Uuid>,
  Json(body): Json<EditsIn>,
) -> AdminResult<Json<EditorView>> {
  let s = state.edit_session(id, body.ops).await?;
  info!(target: "editor", session = %id, "HTTP edit batch applied");
  Ok(Json(to_view(&s, state.config.editor.ru_fields_policy, state.editor_chrome())))
}

#[instrument(level = "info", skip(state))]
pub async fn http_get_payload(
  State(state): State<Arc<AppState>>,
  Path(id): Path<Uuid>,
) -> AdminResult<Json<PayloadOut>> {
  Ok(Json(preview_payload(&state, id).await?))
}

#[instrument(level = "info", skip(state))]
pub async fn http_post_save(
  State(state): State<Arc<AppState>>,
  Path(id): Path<Uuid>,
) -> AdminResult<Json<SaveOut>> {
  let out = save_session(&state, id).await?;
  info!(target: "editor", session = %id, module_id = ?out.module_id, created = out.created, "HTTP save done");
  Ok(Json(out))
}

#[instrument(level = "info", skip(state))]
pub async fn http_delete_session(
  State(state): State<Arc<AppState>>,
  Path(id): Path<Uuid>,
) -> AdminResult<StatusCode> {
  state.remove_session(id).await?;
  info!(target: "editor", session = %id, "Editor session closed");
  Ok(StatusCode::NO_CONTENT)
}
