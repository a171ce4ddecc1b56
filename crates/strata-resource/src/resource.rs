use std::collections::HashSet;

use serde_json::Value;
use strata_connector::ResolveCtx;
use uuid::Uuid;

use crate::adapter::ResourceAdapter;
use crate::apply::{apply_resource, destroy_resource};
use crate::error::ResourceError;
use crate::node::{ResourceNode, RunContext};
use crate::tags::SystemTags;

/// A leaf Resource: an adapter plus its declared (possibly still-Deferred)
/// Input. Identity, dependency bookkeeping, and envelope I/O are owned by
/// the engine; the adapter only ever sees its five lifecycle hooks.
pub struct Resource<A: ResourceAdapter> {
    uuid: Uuid,
    path: String,
    adapter: A,
    input: A::Input,
    dependencies: HashSet<Uuid>,
    dependents: HashSet<Uuid>,
    plan_uuid: Option<Uuid>,
    plan_class_tag: Option<String>,
    applied: bool,
    check_drift: bool,
}

impl<A: ResourceAdapter> Resource<A> {
    /// `uuid`/`path`/`plan_*` are filled in by the owning Plan's
    /// `init_resources` call (spec §4.3); a root-level Resource supplies
    /// its own constant uuid and `"$"` path directly.
    pub fn new(uuid: Uuid, path: impl Into<String>, adapter: A, input: A::Input) -> Self {
        let dependencies = adapter.input_dependencies(&input);
        Self {
            uuid,
            path: path.into(),
            adapter,
            input,
            dependencies,
            dependents: HashSet::new(),
            plan_uuid: None,
            plan_class_tag: None,
            applied: false,
            check_drift: true,
        }
    }

    /// Constructed by declarative code inside a Plan's `init_resources`;
    /// uuid/path/plan back-reference are placeholders until the owning
    /// Plan's constructor assigns real ones via `set_identity`.
    pub fn pending(adapter: A, input: A::Input) -> Self {
        Self::new(Uuid::nil(), String::new(), adapter, input)
    }

    pub fn with_plan(mut self, plan_uuid: Uuid, plan_class_tag: impl Into<String>) -> Self {
        self.plan_uuid = Some(plan_uuid);
        self.plan_class_tag = Some(plan_class_tag.into());
        self
    }

    pub fn without_drift_check(mut self) -> Self {
        self.check_drift = false;
        self
    }

    pub fn input(&self) -> &A::Input {
        &self.input
    }

    pub fn adapter(&self) -> &A {
        &self.adapter
    }
}

impl<A: ResourceAdapter> ResourceNode for Resource<A> {
    fn uuid(&self) -> Uuid {
        self.uuid
    }

    fn path(&self) -> &str {
        &self.path
    }

    fn class_tag(&self) -> &'static str {
        self.adapter.class_tag()
    }

    fn plan_uuid(&self) -> Option<Uuid> {
        self.plan_uuid
    }

    fn set_identity(&mut self, uuid: Uuid, path: String, plan_uuid: Uuid, plan_class_tag: String) {
        self.uuid = uuid;
        self.path = path;
        self.plan_uuid = Some(plan_uuid);
        self.plan_class_tag = Some(plan_class_tag);
    }

    fn dependencies(&self) -> &HashSet<Uuid> {
        &self.dependencies
    }

    fn add_dependency(&mut self, dep: Uuid) {
        self.dependencies.insert(dep);
    }

    fn dependents(&self) -> &HashSet<Uuid> {
        &self.dependents
    }

    fn add_dependent(&mut self, dep: Uuid) {
        self.dependents.insert(dep);
    }

    fn applied(&self) -> bool {
        self.applied
    }

    fn reset_applied(&mut self) {
        self.applied = false;
    }

    fn children(&self) -> &[Uuid] {
        &[]
    }

    fn system_tags(&self, root_plan_uuid: Uuid, root_plan_class_tag: &str) -> SystemTags {
        SystemTags {
            uuid: self.uuid,
            class_tag: self.adapter.class_tag().to_string(),
            plan_uuid: self.plan_uuid,
            plan_class_tag: self.plan_class_tag.clone(),
            root_plan_uuid,
            root_plan_class_tag: root_plan_class_tag.to_string(),
        }
    }

    fn apply_self(&mut self, ctx: &RunContext<'_>, resolve: &dyn ResolveCtx) -> Result<Value, ResourceError> {
        self.adapter.resolve_input(&mut self.input, resolve)?;
        let tags = self.system_tags(ctx.root_plan_uuid, ctx.root_plan_class_tag);

        let outcome = apply_resource(
            &mut self.adapter,
            self.uuid,
            &self.path,
            self.plan_uuid,
            self.plan_class_tag.as_deref(),
            &self.input,
            &tags,
            ctx.provider,
            ctx.store,
            ctx.apply_uuid,
            ctx.dry,
            self.check_drift,
        )?;
        self.applied = true;
        Ok(serde_json::to_value(&outcome.output)?)
    }

    fn destroy_self(&mut self, ctx: &RunContext<'_>) -> Result<(), ResourceError> {
        destroy_resource(&mut self.adapter, self.uuid, ctx.provider, ctx.store, ctx.apply_uuid, ctx.dry, false)?;
        self.applied = false;
        Ok(())
    }
}
