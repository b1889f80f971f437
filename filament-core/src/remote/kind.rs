//! Component kinds the remote peer understands, and what each sends.

use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::render::{AttrValue, ComponentId};

/// The closed set of remotely renderable component kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RemoteKind {
    /// A window. Created hidden and shown with a follow-up `show` action.
    Dialog,
    /// A push button inside the nearest enclosing dialog.
    Button,
}

impl RemoteKind {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "dialog" => Some(RemoteKind::Dialog),
            "button" => Some(RemoteKind::Button),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RemoteKind::Dialog => "dialog",
            RemoteKind::Button => "button",
        }
    }

    /// The `data` of this kind's create record.
    ///
    /// `dialog` is the id of the nearest enclosing dialog, if any.
    pub fn create_payload(
        self,
        attributes: &IndexMap<String, AttrValue>,
        dialog: Option<ComponentId>,
    ) -> Map<String, Value> {
        let attr = |key: &str| {
            attributes
                .get(key)
                .and_then(AttrValue::to_json)
                .unwrap_or(Value::Null)
        };

        let mut data = Map::new();
        match self {
            RemoteKind::Dialog => {
                let notitlebar = attributes
                    .get("notitlebar")
                    .and_then(AttrValue::as_bool)
                    .unwrap_or(false);
                data.insert("title".into(), attr("title"));
                data.insert("notitlebar".into(), Value::Bool(notitlebar));
            }
            RemoteKind::Button => {
                let dialog_id = dialog.map_or(Value::Null, |id| Value::from(id.get()));
                data.insert("dialogId".into(), dialog_id);
                data.insert("text".into(), attr("text"));
                data.insert("label".into(), attr("label"));
            }
        }
        data
    }

    /// Action sent right after the create record, if the kind needs one.
    pub fn follow_up_action(self) -> Option<&'static str> {
        match self {
            RemoteKind::Dialog => Some("show"),
            RemoteKind::Button => None,
        }
    }

    /// Whether attribute changes after mount are forwarded to the peer.
    pub fn accepts_updates(self) -> bool {
        matches!(self, RemoteKind::Button)
    }

    /// Whether children are placed inside this component on the peer.
    pub fn opens_scope(self) -> bool {
        matches!(self, RemoteKind::Dialog)
    }
}
