use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Persisted per-Resource record: the declarative input and observed output
/// as of the last successful apply, plus enough identity metadata to
/// reconstruct and destroy the resource without its declaring program.
///
/// Field names match the reference file backend's wire format exactly
/// (`class`/`plan` rather than `class_tag`/`plan_class_tag`) so the JSON on
/// disk is identical across backends.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateEnvelope {
    pub output: Value,
    pub input: Value,
    #[serde(rename = "class")]
    pub class_tag: String,
    pub path: String,
    pub uuid: Uuid,
    #[serde(rename = "plan")]
    pub plan_class_tag: Option<String>,
    pub plan_uuid: Option<Uuid>,
    pub apply_uuid: Uuid,
}

impl StateEnvelope {
    pub fn new(
        uuid: Uuid,
        path: impl Into<String>,
        class_tag: impl Into<String>,
        input: Value,
        output: Value,
        apply_uuid: Uuid,
    ) -> Self {
        Self {
            output,
            input,
            class_tag: class_tag.into(),
            path: path.into(),
            uuid,
            plan_class_tag: None,
            plan_uuid: None,
            apply_uuid,
        }
    }

    pub fn with_plan(mut self, plan_uuid: Uuid, plan_class_tag: impl Into<String>) -> Self {
        self.plan_uuid = Some(plan_uuid);
        self.plan_class_tag = Some(plan_class_tag.into());
        self
    }
}
