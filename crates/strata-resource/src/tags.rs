use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identity metadata the engine derives on apply. Adapters are expected to
/// attach these to remote objects where the provider supports tagging, so
/// external drift checks can correlate a remote object back to its state
/// envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemTags {
    pub uuid: Uuid,
    pub class_tag: String,
    pub plan_uuid: Option<Uuid>,
    pub plan_class_tag: Option<String>,
    pub root_plan_uuid: Uuid,
    pub root_plan_class_tag: String,
}

impl SystemTags {
    /// Flattened as a string map, the shape most cloud SDKs' tag/label
    /// parameters expect.
    pub fn as_map(&self) -> BTreeMap<String, String> {
        let mut map = BTreeMap::new();
        map.insert("strata_uuid".to_string(), self.uuid.to_string());
        map.insert("strata_class".to_string(), self.class_tag.clone());
        map.insert("strata_root_plan_uuid".to_string(), self.root_plan_uuid.to_string());
        map.insert("strata_root_plan_class".to_string(), self.root_plan_class_tag.clone());
        if let Some(plan_uuid) = self.plan_uuid {
            map.insert("strata_plan_uuid".to_string(), plan_uuid.to_string());
        }
        if let Some(plan_class_tag) = &self.plan_class_tag {
            map.insert("strata_plan_class".to_string(), plan_class_tag.clone());
        }
        map
    }
}
