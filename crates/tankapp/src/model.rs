//! # Domain Model: Fish Records
//!
//! A fish is the unit of storage: one record per name, persisted as a JSON
//! object in `<root>/<name>/info`.
//!
//! ## Two Shapes of the Same Record
//!
//! - [`RawFish`] is the untrusted attribute bag. It is what callers submit and
//!   what is parsed back from disk before normalization. The attributes the
//!   system understands are typed fields; everything else lands in `extra`
//!   and is carried along untouched.
//! - [`Fish`] is the canonical record. `waterType`, `aggression` and `size`
//!   always hold one of their enumerated values.
//!
//! Converting a [`RawFish`] into a [`Fish`] ([`Fish::from_raw`]) runs the
//! normalizer and overlays its output on top of the raw attributes, so
//! normalization wins for the four canonical fields while every other
//! attribute passes through.
//!
//! ## Field Names on Disk
//!
//! Persisted JSON keeps camelCase attribute names
//! (`waterType`, `createdBy`, `apiKey`, `createdAt`, `userName`) and the
//! irregular `browserID`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use crate::error::{Result, TankError};
use crate::normalize::normalize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WaterType {
    #[default]
    Fresh,
    Salt,
    Brackish,
}

impl WaterType {
    pub const ALL: [WaterType; 3] = [WaterType::Fresh, WaterType::Salt, WaterType::Brackish];

    pub fn as_str(&self) -> &'static str {
        match self {
            WaterType::Fresh => "fresh",
            WaterType::Salt => "salt",
            WaterType::Brackish => "brackish",
        }
    }
}

impl fmt::Display for WaterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Size {
    #[default]
    Small,
    Medium,
    Large,
    ExtraLarge,
}

impl Size {
    pub const ALL: [Size; 4] = [Size::Small, Size::Medium, Size::Large, Size::ExtraLarge];

    pub fn as_str(&self) -> &'static str {
        match self {
            Size::Small => "small",
            Size::Medium => "medium",
            Size::Large => "large",
            Size::ExtraLarge => "extra-large",
        }
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Aggression level, always within `1..=5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Aggression(u8);

impl Aggression {
    pub const MIN: i64 = 1;
    pub const MAX: i64 = 5;
    pub const DEFAULT: Aggression = Aggression(3);

    /// `None` when `level` is outside `1..=5`.
    pub fn new(level: i64) -> Option<Self> {
        if (Self::MIN..=Self::MAX).contains(&level) {
            Some(Aggression(level as u8))
        } else {
            None
        }
    }

    /// Pins `level` to the nearest bound of `1..=5`.
    pub fn clamped(level: i64) -> Self {
        Aggression(level.clamp(Self::MIN, Self::MAX) as u8)
    }

    pub fn get(&self) -> u8 {
        self.0
    }
}

impl Default for Aggression {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<i64> for Aggression {
    type Error = String;

    fn try_from(level: i64) -> std::result::Result<Self, Self::Error> {
        Aggression::new(level).ok_or_else(|| format!("aggression {} is outside 1..=5", level))
    }
}

impl From<Aggression> for i64 {
    fn from(value: Aggression) -> Self {
        i64::from(value.0)
    }
}

impl fmt::Display for Aggression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Untrusted attribute bag, as submitted by a caller or read back from disk.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawFish {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub water_type: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggression: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted: Option<bool>,
    #[serde(rename = "browserID", default, skip_serializing_if = "Option::is_none")]
    pub browser_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbmark: Option<String>,
    /// Attributes the system does not interpret.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RawFish {
    /// Parses caller-supplied JSON. Anything that is not an object with
    /// correctly typed known attributes is a validation failure.
    pub fn from_json(input: &str) -> Result<Self> {
        serde_json::from_str(input)
            .map_err(|e| TankError::Validation(format!("Malformed fish attributes: {}", e)))
    }

    /// Reads a stored info document. A known attribute holding an unexpected
    /// JSON type is kept verbatim as an unknown attribute instead of failing
    /// the whole record.
    pub fn from_document(mut document: Map<String, Value>) -> serde_json::Result<Self> {
        let mistyped: Vec<String> = document
            .iter()
            .filter(|(key, value)| !has_expected_type(key, value))
            .map(|(key, _)| key.clone())
            .collect();
        let mut kept = Map::new();
        for key in mistyped {
            if let Some(value) = document.remove(&key) {
                kept.insert(key, value);
            }
        }

        let mut raw: RawFish = serde_json::from_value(Value::Object(document))?;
        raw.extra.extend(kept);
        Ok(raw)
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }
}

const TEXT_ATTRIBUTES: [&str; 6] = [
    "name",
    "createdBy",
    "userName",
    "apiKey",
    "browserID",
    "thumbmark",
];

fn has_expected_type(key: &str, value: &Value) -> bool {
    if value.is_null() {
        return true;
    }
    match key {
        "createdAt" => value.as_i64().is_some(),
        "deleted" => value.is_boolean(),
        key if TEXT_ATTRIBUTES.contains(&key) => value.is_string(),
        _ => true,
    }
}

/// A normalized fish record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fish {
    pub name: String,
    pub water_type: WaterType,
    pub aggression: Aggression,
    pub size: Size,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<i64>,
    #[serde(default)]
    pub deleted: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    #[serde(rename = "browserID", default, skip_serializing_if = "Option::is_none")]
    pub browser_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbmark: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Fish {
    /// Normalizes `raw` and overlays the canonical fields on its attributes.
    pub fn from_raw(raw: RawFish) -> Self {
        let canonical = normalize(&raw);
        let mut fish = Self {
            name: canonical.name,
            water_type: canonical.water_type,
            aggression: canonical.aggression,
            size: canonical.size,
            created_by: raw.created_by,
            api_key: raw.api_key,
            created_at: raw.created_at,
            deleted: raw.deleted.unwrap_or(false),
            user_name: raw.user_name,
            browser_id: raw.browser_id,
            thumbmark: raw.thumbmark,
            extra: Map::new(),
        };
        // Unknown attributes never shadow a known one on disk.
        fish.extra = raw
            .extra
            .into_iter()
            .filter(|(key, _)| !fish.has_attribute(key))
            .collect();
        fish
    }

    fn has_attribute(&self, key: &str) -> bool {
        match key {
            "name" | "waterType" | "aggression" | "size" | "deleted" => true,
            "createdBy" => self.created_by.is_some(),
            "apiKey" => self.api_key.is_some(),
            "createdAt" => self.created_at.is_some(),
            "userName" => self.user_name.is_some(),
            "browserID" => self.browser_id.is_some(),
            "thumbmark" => self.thumbmark.is_some(),
            _ => false,
        }
    }

    pub fn into_raw(self) -> RawFish {
        RawFish {
            name: Some(self.name),
            water_type: Some(Value::from(self.water_type.as_str())),
            aggression: Some(Value::from(self.aggression.get())),
            size: Some(Value::from(self.size.as_str())),
            created_by: self.created_by,
            user_name: self.user_name,
            api_key: self.api_key,
            created_at: self.created_at,
            deleted: Some(self.deleted),
            browser_id: self.browser_id,
            thumbmark: self.thumbmark,
            extra: self.extra,
        }
    }
}

/// Response projection returned by an update.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FishInfo {
    pub name: String,
    pub created_by: String,
    pub api_key: String,
    pub created_at: i64,
    pub water_type: WaterType,
    pub aggression: Aggression,
    pub size: Size,
    pub deleted: bool,
    #[serde(rename = "browserID")]
    pub browser_id: Option<String>,
    pub thumbmark: String,
    pub user_name: String,
}

impl FishInfo {
    /// Each optional attribute prefers the stored value, then the update
    /// input, then a fixed default (`now` for `createdAt`).
    pub fn project(fish: &Fish, input: &RawFish, now: i64) -> Self {
        Self {
            name: fish.name.clone(),
            created_by: fish
                .created_by
                .clone()
                .or_else(|| input.user_name.clone())
                .unwrap_or_else(|| "unknown".to_string()),
            api_key: fish
                .api_key
                .clone()
                .or_else(|| input.api_key.clone())
                .unwrap_or_default(),
            created_at: fish.created_at.or(input.created_at).unwrap_or(now),
            water_type: fish.water_type,
            aggression: fish.aggression,
            size: fish.size,
            deleted: fish.deleted,
            browser_id: fish.browser_id.clone().or_else(|| input.browser_id.clone()),
            thumbmark: fish
                .thumbmark
                .clone()
                .or_else(|| input.thumbmark.clone())
                .unwrap_or_default(),
            user_name: fish
                .user_name
                .clone()
                .or_else(|| input.user_name.clone())
                .unwrap_or_default(),
        }
    }
}
