use serde_json::{Map, Value};

use crate::authclient::outcome::LoginOutcome;

/// Reply of login.php. Both fields are optional and fall back to an empty string, so `{}` is a
/// valid (failed) reply.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct LoginReply {
    pub status: String,
    pub message: String,
}

impl LoginReply {
    pub const SUCCESS: &'static str = "success";

    pub fn from_object(obj: &Map<String, Value>) -> Self {
        Self {
            status: lookup(obj, "status"),
            message: lookup(obj, "message"),
        }
    }
}

/// Missing keys and nulls become "", other non-string values are kept as JSON text
fn lookup(obj: &Map<String, Value>, key: &str) -> String {
    match obj.get(key) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Classifies a response from the login endpoint.
///
/// The body is only looked at if the status is 2xx. `None` means the body could not be obtained
/// at all, which is treated the same as an empty body.
pub fn interpret(status: u16, body: Option<&str>) -> LoginOutcome {
    if !(200..300).contains(&status) {
        return LoginOutcome::ServerError(status);
    }
    let Some(body) = body.filter(|b| !b.trim().is_empty()) else {
        return LoginOutcome::MalformedResponse;
    };
    let value: Value = match serde_json::from_str(body) {
        Ok(v) => v,
        Err(e) => return LoginOutcome::UnparsableResponse(e.to_string()),
    };
    let Value::Object(obj) = value else {
        return LoginOutcome::UnparsableResponse(format!(
            "expected a JSON object, found {}",
            kind(&value)
        ));
    };
    let reply = LoginReply::from_object(&obj);
    if reply.status == LoginReply::SUCCESS {
        LoginOutcome::Success(reply.message)
    } else {
        LoginOutcome::Rejected(reply.message)
    }
}
