//! JSON envelopes for command results and failures.

use serde_json::{json, Map, Value};
use tankapp::commands::CmdResult;
use tankapp::error::{ErrorKind, TankError};
use tankapp::model::RawFish;

/// HTTP-style status class for an error kind.
pub fn status_code(kind: ErrorKind) -> u16 {
    match kind {
        ErrorKind::Validation => 400,
        ErrorKind::NotFound => 404,
        ErrorKind::Conflict => 409,
        ErrorKind::Storage => 500,
    }
}

fn headline(error: &TankError) -> String {
    match error {
        TankError::Validation(_) => "Invalid fish information".to_string(),
        TankError::NotFound(_) => "Fish not found".to_string(),
        TankError::Conflict(_) => "Fish name already exists".to_string(),
        TankError::Storage { op, .. } => format!("Error {}", op),
    }
}

pub fn error(error: &TankError) -> Value {
    let mut body = json!({
        "status": headline(error),
        "error": { "message": error.to_string() },
    });
    if let Some(path) = error.path() {
        body["path"] = json!(path.display().to_string());
    }
    body
}

pub fn created(result: &CmdResult) -> Value {
    json!({
        "status": result.summary(),
        "roomID": result.affected_fish.first().map(|f| f.name.as_str()),
    })
}

pub fn listed(result: &CmdResult) -> Value {
    json!(result.listed_fish)
}

pub fn single(result: &CmdResult) -> Value {
    result
        .listed_fish
        .values()
        .next()
        .map_or(Value::Null, |fish| json!(fish))
}

pub fn updated(result: &CmdResult) -> Value {
    json!({
        "status": result.summary(),
        "info": result.info,
    })
}

pub fn deleted(result: &CmdResult) -> Value {
    json!({ "status": result.summary() })
}

pub fn swept(result: &CmdResult) -> Value {
    let mut body = Map::new();
    body.insert("status".into(), json!(result.summary()));
    if let Some(Value::Object(report)) = result.sweep.as_ref().map(|r| json!(r)) {
        body.extend(report);
    }
    Value::Object(body)
}

pub fn noop(input: &RawFish) -> Value {
    json!({ "status": "noop", "input": input })
}
