use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::names::sanitize_name;
use crate::store::DataStore;

/// Remove a fish from disk. This is a hard delete; soft deletion is an
/// `update` with `deleted: true`.
pub fn run<S: DataStore>(store: &S, name: &str) -> Result<CmdResult> {
    let key = sanitize_name(name)?;

    let _guard = store.lock_name(&key);
    let fish = store.get_fish(&key)?;
    store.delete_fish(&key)?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!("Fish {} deleted", key)));
    Ok(result.with_affected_fish(vec![fish]))
}
