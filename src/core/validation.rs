//! Shape checks for the homework API payload.
//!
//! The API answers with `{"homeworks": [...], "current_date": <unix seconds>}`
//! where `homeworks` is ordered most recent first. Every shape violation maps
//! to its own [`BotError`] variant so the polling loop can decide per kind.

use crate::core::error::BotError;
use crate::core::models::{HomeworkStatus, StatusReport};
use serde_json::{Map, Value};

/// A payload that passed [`check_response`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CheckedResponse<'a> {
    pub homework: &'a Map<String, Value>,
    pub current_date: i64,
}

pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Falsy values carry no news and are skipped without validation.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

pub fn check_response(response: &Value) -> Result<CheckedResponse<'_>, BotError> {
    let Value::Object(body) = response else {
        return Err(BotError::NotAMapping {
            found: json_type_name(response),
        });
    };

    let homeworks = body
        .get("homeworks")
        .ok_or(BotError::MissingKey("homeworks"))?;
    let current_date = body
        .get("current_date")
        .ok_or(BotError::MissingKey("current_date"))?;

    let Value::Array(homeworks) = homeworks else {
        return Err(BotError::WrongType {
            key: "homeworks",
            expected: "an array",
            found: json_type_name(homeworks),
        });
    };

    let first = homeworks.first().ok_or(BotError::EmptyHomeworks)?;

    let current_date = current_date.as_i64().ok_or(BotError::WrongType {
        key: "current_date",
        expected: "an integer",
        found: json_type_name(current_date),
    })?;

    let Value::Object(homework) = first else {
        return Err(BotError::WrongType {
            key: "homeworks[0]",
            expected: "an object",
            found: json_type_name(first),
        });
    };

    Ok(CheckedResponse {
        homework,
        current_date,
    })
}

pub fn parse_status(homework: &Map<String, Value>) -> Result<StatusReport, BotError> {
    let name = homework
        .get("homework_name")
        .ok_or(BotError::MissingKey("homework_name"))?;
    let status = homework
        .get("status")
        .ok_or(BotError::MissingKey("status"))?;

    if is_blank(name) || is_blank(status) {
        return Ok(StatusReport::NotYetSubmitted);
    }

    let homework_name = name.as_str().ok_or(BotError::WrongType {
        key: "homework_name",
        expected: "a string",
        found: json_type_name(name),
    })?;
    let status = status.as_str().ok_or(BotError::WrongType {
        key: "status",
        expected: "a string",
        found: json_type_name(status),
    })?;

    let status: HomeworkStatus = status.parse().map_err(BotError::UnknownStatus)?;

    Ok(StatusReport::Submitted {
        homework_name: homework_name.to_string(),
        status,
    })
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}
