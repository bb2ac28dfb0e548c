//! Merging attribute changes into an existing fish.
//!
//! Only these attributes are updatable: `waterType`, `aggression`, `size`,
//! `deleted`, `createdBy`, `userName`, `apiKey`, `createdAt`, `browserID`,
//! `thumbmark`. The name is the lookup key and never changes; unknown
//! attributes in the update are ignored, while unknown attributes already
//! stored are preserved.
//!
//! Rules that differ from creation:
//! - An empty string for `waterType` or `size` is ignored rather than
//!   resetting the field to its default.
//! - `aggression` is clamped into `1..=5` (`0` → `1`, `9` → `5`) instead of
//!   falling back to `3`. Non-numeric input leaves the stored level alone.

use crate::commands::{CmdMessage, CmdResult};
use crate::error::{Result, TankError};
use crate::model::{Aggression, Fish, FishInfo, RawFish};
use crate::names::sanitize_name;
use crate::normalize::parse_level;
use crate::store::DataStore;
use chrono::Utc;
use serde_json::Value;

pub fn run<S: DataStore>(store: &S, input: RawFish) -> Result<CmdResult> {
    let Some(name) = input.name.as_deref() else {
        return Err(TankError::Validation("Required field: name".to_string()));
    };
    let key = sanitize_name(name)?;

    let _guard = store.lock_name(&key);
    let existing = store.get_fish(&key)?;
    let fish = Fish::from_raw(apply_updates(existing.into_raw(), &input));
    store.save_fish(&key, &fish)?;

    let mut result = CmdResult::default();
    result.info = Some(FishInfo::project(&fish, &input, Utc::now().timestamp()));
    result.add_message(CmdMessage::success(format!("Fish {} updated", key)));
    Ok(result.with_affected_fish(vec![fish]))
}

/// Overlay the updatable attributes of `input` onto `current`.
pub fn apply_updates(mut current: RawFish, input: &RawFish) -> RawFish {
    if let Some(water) = input.water_type.as_ref().filter(|v| !is_empty_text(v)) {
        current.water_type = Some(water.clone());
    }
    if let Some(size) = input.size.as_ref().filter(|v| !is_empty_text(v)) {
        current.size = Some(size.clone());
    }
    if let Some(level) = input.aggression.as_ref().and_then(parse_level) {
        current.aggression = Some(Value::from(Aggression::clamped(level).get()));
    }
    if input.deleted.is_some() {
        current.deleted = input.deleted;
    }
    if input.created_at.is_some() {
        current.created_at = input.created_at;
    }
    for (target, update) in [
        (&mut current.created_by, &input.created_by),
        (&mut current.user_name, &input.user_name),
        (&mut current.api_key, &input.api_key),
        (&mut current.browser_id, &input.browser_id),
        (&mut current.thumbmark, &input.thumbmark),
    ] {
        if update.is_some() {
            target.clone_from(update);
        }
    }
    current
}

fn is_empty_text(value: &Value) -> bool {
    value.as_str() == Some("")
}
