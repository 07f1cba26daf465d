//! Public protocol structs for the admin HTTP API (serde ready).
//! Keep this small and stable to evolve backend and frontend independently.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::analytics::ModuleSummary;
use crate::config::RuFieldsPolicy;
use crate::draft::ModuleDraft;
use crate::editor::{EditOp, EditorSession};

/// Page-level chrome: the class the frontend puts on `<body>` while the page
/// is mounted and removes when it unmounts.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PageChrome {
    pub body_class: String,
}

#[derive(Serialize)]
pub struct HealthOut {
    pub ok: bool,
}

#[derive(Serialize)]
pub struct ModuleListOut {
    pub modules: Vec<ModuleSummary>,
}

//
// Editor
//

#[derive(Debug, Default, Deserialize)]
pub struct OpenSessionIn {
    /// Absent for a new module.
    #[serde(default)]
    pub module_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct EditsIn {
    pub ops: Vec<EditOp>,
}

/// DTO for everything the editor page renders.
#[derive(Debug, Serialize)]
pub struct EditorView {
    pub session_id: Uuid,
    pub module_id: Option<i64>,
    pub show_russian: bool,
    pub ru_fields_policy: RuFieldsPolicy,
    pub page: PageChrome,
    pub draft: ModuleDraft,
}

/// Convert a session (internal) to the public DTO.
pub fn to_view(s: &EditorSession, policy: RuFieldsPolicy, page: PageChrome) -> EditorView {
    EditorView {
        session_id: s.id,
        module_id: s.module_id,
        show_russian: s.show_russian,
        ru_fields_policy: policy,
        page,
        draft: s.draft.clone(),
    }
}

/// The request a save would send, without sending it.
#[derive(Debug, Serialize)]
pub struct PayloadOut {
    pub method: &'static str,
    pub path: String,
    pub body: Value,
}

#[derive(Debug, Serialize)]
pub struct SaveOut {
    pub module_id: Option<i64>,
    pub created: bool,
    /// Platform response body, passed through.
    pub response: Value,
}
