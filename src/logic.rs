//! Core behaviors behind the HTTP handlers.
//!
//! This includes:
//!   - Loading the analytics dashboard (ten-way fan-out, fail-fast)
//!   - Opening editor sessions from a platform record or blank
//!   - Previewing and sending the nested-write save

use serde_json::Value;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::analytics::{build_dashboard, AnalyticsSnapshot, Dashboard, ModuleSummary};
use crate::draft::ModuleDraft;
use crate::editor::{EditorSession, SaveRequest};
use crate::error::AdminResult;
use crate::protocol::{PayloadOut, SaveOut};
use crate::state::AppState;
use crate::upstream::{module_path, NEW_MODULE_PATH};

/// Fetch all ten collections concurrently and merge them. The first failing
/// fetch fails the whole load; nothing partial is returned.
#[instrument(level = "info", skip_all)]
pub async fn load_dashboard(state: &AppState) -> AdminResult<Dashboard> {
  let up = &state.upstream;
  let fetched = tokio::try_join!(
    up.students(),
    up.exam_results(),
    up.overview_stats(),
    up.engagement_metrics(),
    up.language_distribution(),
    up.country_distribution(),
    up.level_distribution(),
    up.top_performers(),
    up.difficult_modules(),
    up.modules()
  );
  let (students, exam_results, overview, engagement, languages, countries, levels, top_performers, difficult_modules, modules) =
    fetched.map_err(|e| {
      error!(target: "analytics", error = %e, "Dashboard load aborted");
      e
    })?;

  info!(
    target: "analytics",
    students = students.len(),
    modules = modules.len(),
    exam_results = exam_results.len(),
    "Dashboard collections loaded"
  );

  let snap = AnalyticsSnapshot {
    students,
    exam_results,
    overview,
    engagement,
    languages,
    countries,
    levels,
    top_performers,
    difficult_modules,
    modules,
  };
  Ok(build_dashboard(snap, &state.config.analytics.time_bucket_minutes, state.analytics_chrome()))
}

#[instrument(level = "info", skip_all)]
pub async fn list_modules(state: &AppState) -> AdminResult<Vec<ModuleSummary>> {
  state.upstream.modules().await
}

/// Open a session on an existing module (fetched and flattened) or on a blank
/// draft when `module_id` is `None`.
#[instrument(level = "info", skip(state))]
pub async fn open_session(state: &AppState, module_id: Option<i64>) -> AdminResult<EditorSession> {
  let draft = match module_id {
    Some(id) => ModuleDraft::from(state.upstream.module(id).await?),
    None => ModuleDraft::default(),
  };
  let session = EditorSession::new(module_id, draft, state.config.editor.show_russian_default);
  info!(
    target: "editor",
    session = %session.id,
    ?module_id,
    vocabulary = session.draft.vocabulary.len(),
    quiz = session.draft.quiz.len(),
    "Editor session opened"
  );
  state.insert_session(session.clone()).await;
  Ok(session)
}

fn describe(req: SaveRequest) -> PayloadOut {
  match req {
    SaveRequest::Update { module_id, body } => PayloadOut { method: "PATCH", path: module_path(module_id), body },
    SaveRequest::Create(body) => PayloadOut { method: "POST", path: NEW_MODULE_PATH.to_string(), body },
  }
}

#[instrument(level = "info", skip(state))]
pub async fn preview_payload(state: &AppState, session_id: Uuid) -> AdminResult<PayloadOut> {
  let s = state.get_session(session_id).await?;
  Ok(describe(s.save_request(state.config.editor.ru_fields_policy)?))
}

/// Id of a freshly created module, from `{"id": n}` or `{"module": {"id": n}}`.
fn created_id(response: &Value) -> Option<i64> {
  response
    .get("id")
    .or_else(|| response.get("module").and_then(|m| m.get("id")))
    .and_then(Value::as_i64)
}

/// Build the payload from a snapshot and send it as one PATCH or POST.
/// A create that succeeded upstream is reported as created even when the
/// session is gone by the time the new id comes back.
#[instrument(level = "info", skip(state))]
pub async fn save_session(state: &AppState, session_id: Uuid) -> AdminResult<SaveOut> {
  let snapshot = state.get_session(session_id).await?;
  let req = snapshot.save_request(state.config.editor.ru_fields_policy)?;
  if !snapshot.show_russian {
    info!(target: "editor", session = %session_id, policy = ?state.config.editor.ru_fields_policy, "Saving with Russian fields hidden");
  }

  match req {
    SaveRequest::Update { module_id, body } => {
      let response = state.upstream.update_module(module_id, &body).await.map_err(|e| {
        error!(target: "editor", session = %session_id, module_id, error = %e, "Module update failed");
        e
      })?;
      info!(target: "editor", session = %session_id, module_id, "Module updated");
      Ok(SaveOut { module_id: Some(module_id), created: false, response })
    }
    SaveRequest::Create(body) => {
      let response = state.upstream.create_module(&body).await.map_err(|e| {
        error!(target: "editor", session = %session_id, error = %e, "Module create failed");
        e
      })?;
      let module_id = created_id(&response);
      match module_id {
        Some(id) => match state.bind_module(session_id, id).await {
          Ok(()) => info!(target: "editor", session = %session_id, module_id = id, "Module created"),
          Err(e) => warn!(
            target: "editor",
            session = %session_id,
            module_id = id,
            error = %e,
            "Module created but the session closed before it could be bound"
          ),
        },
        None => warn!(target: "editor", session = %session_id, "Module created but response carried no id; session stays unbound"),
      }
      Ok(SaveOut { module_id, created: true, response })
    }
  }
}
