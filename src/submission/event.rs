use std::collections::HashMap;

use serde::Deserialize;
use serde_json::Value;

/// One form submission: the item responses in the order the form lists them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormSubmissionEvent {
    pub item_responses: Vec<ItemResponse>,
}

/// One answer to one question. Checkbox-style questions answer with arrays,
/// so the answer stays a JSON value.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemResponse {
    pub title: String,
    pub response: Value,
}

impl ItemResponse {
    pub fn new(title: impl Into<String>, response: impl Into<Value>) -> Self {
        Self {
            title: title.into(),
            response: response.into(),
        }
    }
}

/// Question title -> answer, rebuilt for every event.
pub type FormDataMap = HashMap<String, Value>;

impl FormSubmissionEvent {
    pub fn new(item_responses: Vec<ItemResponse>) -> Self {
        Self { item_responses }
    }

    /// Later responses overwrite earlier ones that share a title.
    pub fn form_data(&self) -> FormDataMap {
        let mut data = FormDataMap::with_capacity(self.item_responses.len());
        for item in &self.item_responses {
            data.insert(item.title.clone(), item.response.clone());
        }
        data
    }

    /// Decode the trigger payload:
    /// `{"response": {"itemResponses": [{"item": {"title": ..}, "response": ..}]}}`.
    pub fn from_json(value: Value) -> Result<Self, String> {
        let wire: WireEvent =
            serde_json::from_value(value).map_err(|e| format!("Malformed event: {e}"))?;

        let item_responses = wire
            .response
            .item_responses
            .into_iter()
            .map(|r| ItemResponse {
                title: r.item.title,
                response: r.response,
            })
            .collect();

        Ok(Self { item_responses })
    }
}

#[derive(Deserialize)]
struct WireEvent {
    response: WireResponse,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireResponse {
    item_responses: Vec<WireItemResponse>,
}

#[derive(Deserialize)]
struct WireItemResponse {
    item: WireItem,
    #[serde(default)]
    response: Value,
}

#[derive(Deserialize)]
struct WireItem {
    title: String,
}

/// The address under `key`, if it is a non-empty string. Anything else
/// (missing, null, false, numbers, arrays) counts as no address.
pub fn email_address<'a>(data: &'a FormDataMap, key: &str) -> Option<&'a str> {
    match data.get(key)? {
        Value::String(s) if !s.is_empty() => Some(s.as_str()),
        _ => None,
    }
}
