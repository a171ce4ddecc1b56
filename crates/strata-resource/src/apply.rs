use strata_provider::CloudProvider;
use strata_state::{StateEnvelope, StateStore};
use tracing::debug;
use uuid::Uuid;

use crate::adapter::ResourceAdapter;
use crate::error::{AdapterError, ResourceError};
use crate::tags::SystemTags;

pub struct ApplyOutcome<Output> {
    pub output: Output,
    pub envelope: StateEnvelope,
}

/// The default apply algorithm from spec §4.2, shared by `Resource<A>` and
/// `Plan<A>` alike: read the prior envelope, diff against the current
/// (already-resolved) input, and drive create/update/replace accordingly.
/// `check_drift` lets a caller skip the adapter's `is_drifted` round-trip
/// entirely (e.g. during a destroy-only pass).
#[allow(clippy::too_many_arguments)]
pub fn apply_resource<A: ResourceAdapter>(
    adapter: &mut A,
    uuid: Uuid,
    path: &str,
    plan_uuid: Option<Uuid>,
    plan_class_tag: Option<&str>,
    input: &A::Input,
    tags: &SystemTags,
    provider: &dyn CloudProvider,
    store: &dyn StateStore,
    apply_uuid: Uuid,
    dry: bool,
    check_drift: bool,
) -> Result<ApplyOutcome<A::Output>, ResourceError> {
    let class_tag = adapter.class_tag();
    let prior = store.get(uuid, false)?;
    let input_value = serde_json::to_value(input)?;

    let output = match &prior {
        None => {
            debug!(%uuid, class = class_tag, "creating resource");
            adapter.create(input, tags, provider, apply_uuid, dry)?
        }
        Some(envelope) => {
            let prev_output: A::Output = serde_json::from_value(envelope.output.clone())?;
            let input_changed = envelope.input != input_value;
            let drifted = input_changed
                || (check_drift && adapter.is_drifted(&prev_output, provider, dry)?);

            if drifted {
                let prev_input: A::Input = serde_json::from_value(envelope.input.clone())?;
                debug!(%uuid, class = class_tag, input_changed, "resource drifted, attempting update");
                let updated = match adapter.update(input, &prev_input, tags, provider, apply_uuid, dry) {
                    Ok(ok) => ok,
                    Err(AdapterError::NotFound) => false,
                    Err(e) => return Err(e.into()),
                };

                if updated {
                    debug!(%uuid, class = class_tag, "resource updated in place");
                    prev_output
                } else if adapter.create_before_destroy() {
                    debug!(%uuid, class = class_tag, "replacing resource, create before destroy");
                    store.mark_destroy(envelope.clone())?;
                    adapter.create(input, tags, provider, apply_uuid, dry)?
                } else {
                    debug!(%uuid, class = class_tag, "replacing resource inline");
                    match adapter.destroy(&prev_input, provider, apply_uuid, dry) {
                        Ok(()) | Err(AdapterError::NotFound) => {}
                        Err(e) => return Err(e.into()),
                    }
                    adapter.create(input, tags, provider, apply_uuid, dry)?
                }
            } else {
                prev_output
            }
        }
    };

    let mut envelope = StateEnvelope::new(
        uuid,
        path,
        class_tag,
        input_value,
        serde_json::to_value(&output)?,
        apply_uuid,
    );
    if let (Some(plan_uuid), Some(plan_class_tag)) = (plan_uuid, plan_class_tag) {
        envelope = envelope.with_plan(plan_uuid, plan_class_tag);
    }
    store.put(uuid, envelope.clone())?;

    Ok(ApplyOutcome { output, envelope })
}

/// Destroys the envelope at `uuid` if one exists. `from_pending` routes the
/// read/delete at the pending-destroy collection, used when draining
/// deferred destroys rather than destroying a live resource.
pub fn destroy_resource<A: ResourceAdapter>(
    adapter: &mut A,
    uuid: Uuid,
    provider: &dyn CloudProvider,
    store: &dyn StateStore,
    apply_uuid: Uuid,
    dry: bool,
    from_pending: bool,
) -> Result<(), ResourceError> {
    let Some(envelope) = store.get(uuid, from_pending)? else {
        return Ok(());
    };
    debug!(%uuid, class = envelope.class_tag.as_str(), from_pending, "destroying resource");
    let prev_input: A::Input = serde_json::from_value(envelope.input.clone())?;
    match adapter.destroy(&prev_input, provider, apply_uuid, dry) {
        Ok(()) | Err(AdapterError::NotFound) => {}
        Err(e) => return Err(e.into()),
    }
    store.delete(uuid, from_pending)?;
    Ok(())
}
