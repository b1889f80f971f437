//! Wire format.
//!
//! Each WebSocket text frame carries one JSON record. Outbound records
//! describe component operations:
//!
//! ```json
//! {"method":"create","id":2,"type":"button","data":{"dialogId":1,"text":"ok","label":null}}
//! {"method":"action","id":1,"type":"dialog","data":null,"action":"show"}
//! ```
//!
//! Inbound records are events, `{"id":2,"event":"click"}`, with an optional
//! `data` field. The protocol has no version field.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::kind::RemoteKind;
use crate::error::{Error, Result};
use crate::render::ComponentId;

/// Key under which the handler for `event` on component `id` is stored.
pub fn correlation_key(id: ComponentId, event: &str) -> String {
    format!("{id}:{event}")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    Create,
    Update,
    Action,
}

/// A record sent to the peer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutboundMessage {
    pub method: Method,
    pub id: ComponentId,
    #[serde(rename = "type")]
    pub kind: String,
    /// `null` for actions.
    pub data: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
}

impl OutboundMessage {
    pub fn create(id: ComponentId, kind: RemoteKind, data: Map<String, Value>) -> Self {
        Self {
            method: Method::Create,
            id,
            kind: kind.as_str().to_owned(),
            data: Some(data),
            action: None,
        }
    }

    /// An update carrying only the changed key.
    pub fn update(id: ComponentId, kind: RemoteKind, key: &str, value: Value) -> Self {
        let mut data = Map::new();
        data.insert(key.to_owned(), value);
        Self {
            method: Method::Update,
            id,
            kind: kind.as_str().to_owned(),
            data: Some(data),
            action: None,
        }
    }

    pub fn action(id: ComponentId, kind: RemoteKind, action: &str) -> Self {
        Self {
            method: Method::Action,
            id,
            kind: kind.as_str().to_owned(),
            data: None,
            action: Some(action.to_owned()),
        }
    }

    pub fn encode(&self) -> Result<String> {
        serde_json::to_string(self).map_err(Error::Encode)
    }
}

/// An event reported by the peer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InboundEvent {
    pub id: ComponentId,
    pub event: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl InboundEvent {
    pub fn new(id: ComponentId, event: impl Into<String>) -> Self {
        Self {
            id,
            event: event.into(),
            data: None,
        }
    }

    pub fn decode(frame: &str) -> Result<Self> {
        serde_json::from_str(frame).map_err(Error::Decode)
    }

    pub fn correlation_key(&self) -> String {
        correlation_key(self.id, &self.event)
    }
}
