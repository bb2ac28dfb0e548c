use crate::commands::CmdResult;
use crate::error::Result;
use crate::names::sanitize_name;
use crate::store::DataStore;

pub fn run<S: DataStore>(store: &S, name: &str) -> Result<CmdResult> {
    let key = sanitize_name(name)?;
    let fish = store.get_fish(&key)?;
    let mut result = CmdResult::default();
    result.listed_fish.insert(key, fish);
    Ok(result)
}
