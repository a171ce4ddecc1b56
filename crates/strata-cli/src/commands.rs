use std::path::Path;

use anyhow::Result;
use strata_provider::LocalProvider;
use strata_state::{FileStateStore, StateStore};

pub fn apply(state_path: &Path, dry_run: bool) -> Result<()> {
    let store = FileStateStore::new(state_path);
    let provider = LocalProvider::default();
    let apply_uuid = strata_demo_aws::apply_once(&store, &provider, strata_demo_aws::demo_input(), dry_run)?;
    tracing::info!(%apply_uuid, "apply finished");
    Ok(())
}

pub fn destroy(state_path: &Path, dry_run: bool) -> Result<()> {
    let store = FileStateStore::new(state_path);
    let provider = LocalProvider::default();
    let apply_uuid = strata_demo_aws::destroy_once(&store, &provider, strata_demo_aws::demo_input(), dry_run)?;
    tracing::info!(%apply_uuid, "destroy finished");
    Ok(())
}

pub fn status(state_path: &Path) -> Result<()> {
    let store = FileStateStore::new(state_path);
    let root_uuid = strata_demo_aws::ROOT_UUID;

    match store.get(root_uuid, false)? {
        Some(envelope) => {
            println!("{}", serde_json::to_string_pretty(&envelope)?);
        }
        None => println!("no envelope persisted yet for root {root_uuid}"),
    }

    let pending = store.list_pending_destroy()?;
    println!("{} entries pending destroy", pending.len());
    Ok(())
}
