use crate::commands::CmdResult;
use crate::error::Result;
use crate::store::DataStore;

/// Which fish a listing reports. Soft-deleted fish are included unless
/// asked otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListFilter {
    pub include_deleted: bool,
}

impl Default for ListFilter {
    fn default() -> Self {
        Self {
            include_deleted: true,
        }
    }
}

impl ListFilter {
    pub fn hide_deleted() -> Self {
        Self {
            include_deleted: false,
        }
    }
}

pub fn run<S: DataStore>(store: &S, filter: ListFilter) -> Result<CmdResult> {
    let mut fish = store.list_fish()?;
    if !filter.include_deleted {
        fish.retain(|_, f| !f.deleted);
    }
    Ok(CmdResult::default().with_listed_fish(fish))
}
