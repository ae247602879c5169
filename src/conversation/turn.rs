//! Dialog turns in the `{role, parts: [{text}]}` shape used by Gemini.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Author of a dialog turn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The human side of the conversation.
    #[default]
    User,
    /// The assistant side of the conversation.
    Model,
}

impl Role {
    /// Parse a role label leniently; unknown labels fall back to `User`.
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "model" | "assistant" => Self::Model,
            _ => Self::User,
        }
    }
}

/// A text fragment inside a turn.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Part {
    /// Fragment text.
    #[serde(default)]
    pub text: String,
}

impl Part {
    /// Create a text part.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// One chronological turn of the dialog.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    /// Who produced this turn.
    #[serde(default)]
    pub role: Role,
    /// Ordered text fragments.
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl Turn {
    /// Single-part user turn.
    #[must_use]
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            parts: vec![Part::text(text)],
        }
    }

    /// Single-part model turn.
    #[must_use]
    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: Role::Model,
            parts: vec![Part::text(text)],
        }
    }

    /// Read a turn out of arbitrary JSON.
    ///
    /// Returns `None` for anything that is not an object. Missing roles read
    /// as `user`, missing parts as empty, and parts without text as `""`.
    #[must_use]
    pub fn coerce(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;

        let role = obj
            .get("role")
            .and_then(Value::as_str)
            .map_or(Role::User, Role::from_label);

        let parts = obj
            .get("parts")
            .and_then(Value::as_array)
            .map(|parts| {
                parts
                    .iter()
                    .filter_map(Value::as_object)
                    .map(|part| {
                        Part::text(part.get("text").and_then(Value::as_str).unwrap_or_default())
                    })
                    .collect()
            })
            .unwrap_or_default();

        Some(Self { role, parts })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_role_labels() {
        assert_eq!(Role::from_label("model"), Role::Model);
        assert_eq!(Role::from_label("Assistant"), Role::Model);
        assert_eq!(Role::from_label("user"), Role::User);
        assert_eq!(Role::from_label("system"), Role::User);
    }

    #[test]
    fn test_turn_wire_shape() {
        let value = serde_json::to_value(Turn::model("Pick a crust")).ok();
        assert_eq!(
            value,
            Some(json!({"role": "model", "parts": [{"text": "Pick a crust"}]}))
        );
    }

    #[test]
    fn test_coerce_fills_missing_fields() {
        let turn = Turn::coerce(&json!({"parts": [{"text": "hi"}, {}, "junk"]}));
        assert_eq!(
            turn,
            Some(Turn {
                role: Role::User,
                parts: vec![Part::text("hi"), Part::text("")],
            })
        );

        assert_eq!(Turn::coerce(&json!("not a turn")), None);
        assert_eq!(
            Turn::coerce(&json!({"role": "model"})).map(|t| t.parts.len()),
            Some(0)
        );
    }
}
