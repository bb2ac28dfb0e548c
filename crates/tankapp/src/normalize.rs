//! Canonicalization of untrusted fish attributes.
//!
//! [`normalize`] is total: whatever the input holds, it produces a valid
//! water type, aggression level and size. Matching is ASCII
//! case-insensitive after trimming, and a handful of common spellings are
//! folded into their canonical value first:
//!
//! | Input                                   | Canonical     |
//! |-----------------------------------------|---------------|
//! | `Saltwater`, `salt water`               | `salt`        |
//! | `Freshwater`, `fresh water`             | `fresh`       |
//! | `Extra Large`, `extra_large`            | `extra-large` |
//!
//! Unrecognized values fall back to `fresh`, `small` and `3` respectively.
//! The name is passed through as-is; path safety is [`crate::names`]' job.

use serde_json::Value;

use crate::model::{Aggression, RawFish, Size, WaterType};

/// The four fields normalization decides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canonical {
    pub name: String,
    pub water_type: WaterType,
    pub aggression: Aggression,
    pub size: Size,
}

pub fn normalize(raw: &RawFish) -> Canonical {
    Canonical {
        name: raw.name.clone().unwrap_or_default(),
        water_type: raw
            .water_type
            .as_ref()
            .and_then(Value::as_str)
            .and_then(parse_water_type)
            .unwrap_or_default(),
        aggression: raw
            .aggression
            .as_ref()
            .and_then(parse_level)
            .and_then(Aggression::new)
            .unwrap_or_default(),
        size: raw
            .size
            .as_ref()
            .and_then(Value::as_str)
            .and_then(parse_size)
            .unwrap_or_default(),
    }
}

pub fn parse_water_type(input: &str) -> Option<WaterType> {
    let input = input.trim();
    if ["saltwater", "salt water"]
        .iter()
        .any(|alias| input.eq_ignore_ascii_case(alias))
    {
        return Some(WaterType::Salt);
    }
    if ["freshwater", "fresh water"]
        .iter()
        .any(|alias| input.eq_ignore_ascii_case(alias))
    {
        return Some(WaterType::Fresh);
    }
    WaterType::ALL
        .into_iter()
        .find(|water| input.eq_ignore_ascii_case(water.as_str()))
}

pub fn parse_size(input: &str) -> Option<Size> {
    let input = input.trim();
    if ["extra large", "extra_large"]
        .iter()
        .any(|alias| input.eq_ignore_ascii_case(alias))
    {
        return Some(Size::ExtraLarge);
    }
    Size::ALL
        .into_iter()
        .find(|size| input.eq_ignore_ascii_case(size.as_str()))
}

/// Reads an integer out of a loosely typed value: JSON integers, floats
/// (truncated toward zero) and numeric strings. Anything else is `None`.
pub fn parse_level(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(truncate)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(truncate))
        }
        _ => None,
    }
}

fn truncate(value: f64) -> Option<i64> {
    if value.is_finite() && value >= i64::MIN as f64 && value <= i64::MAX as f64 {
        Some(value.trunc() as i64)
    } else {
        None
    }
}
