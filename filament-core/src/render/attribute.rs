//! Attribute values.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

/// Attribute keys with this prefix hold event listeners, e.g. `on:click`.
pub const EVENT_PREFIX: &str = "on:";

/// A zero-argument event handler.
#[derive(Clone)]
pub struct Callback(Arc<dyn Fn() + Send + Sync>);

impl Callback {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    pub fn call(&self) {
        (self.0)();
    }

    /// Whether two callbacks share the same closure.
    pub fn ptr_eq(&self, other: &Callback) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Callback(..)")
    }
}

/// The value of a component attribute.
#[derive(Debug, Clone)]
pub enum AttrValue {
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Callback(Callback),
}

impl AttrValue {
    pub fn as_callback(&self) -> Option<&Callback> {
        match self {
            AttrValue::Callback(callback) => Some(callback),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            AttrValue::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AttrValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// JSON form of the value. Callbacks have none.
    pub fn to_json(&self) -> Option<Value> {
        match self {
            AttrValue::Text(text) => Some(Value::from(text.as_str())),
            AttrValue::Int(n) => Some(Value::from(*n)),
            AttrValue::Float(n) => Some(Value::from(*n)),
            AttrValue::Bool(b) => Some(Value::from(*b)),
            AttrValue::Callback(_) => None,
        }
    }
}

/// Renders scalars the way the host expects them in string attributes.
impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrValue::Text(text) => f.write_str(text),
            AttrValue::Int(n) => write!(f, "{n}"),
            AttrValue::Float(n) => write!(f, "{n}"),
            AttrValue::Bool(b) => write!(f, "{b}"),
            AttrValue::Callback(_) => f.write_str("[callback]"),
        }
    }
}

/// The callback held by an `on:*` attribute.
///
/// # Panics
///
/// Panics when the value is not a callback: a listener attribute holding
/// anything else is a mistake in how the tree was built.
pub(crate) fn expect_listener(key: &str, value: &AttrValue) -> Callback {
    match value.as_callback() {
        Some(callback) => callback.clone(),
        None => panic!("only callbacks are allowed for event listeners (`{key}` = {value})"),
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        AttrValue::Text(value.to_owned())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        AttrValue::Text(value)
    }
}

macro_rules! int_attr {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for AttrValue {
                fn from(value: $ty) -> Self {
                    AttrValue::Int(i64::from(value))
                }
            }
        )*
    };
}

int_attr!(i8, i16, i32, i64, u8, u16, u32);

impl From<f64> for AttrValue {
    fn from(value: f64) -> Self {
        AttrValue::Float(value)
    }
}

impl From<bool> for AttrValue {
    fn from(value: bool) -> Self {
        AttrValue::Bool(value)
    }
}

impl From<Callback> for AttrValue {
    fn from(value: Callback) -> Self {
        AttrValue::Callback(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn scalars_convert_to_json() {
        assert_eq!(AttrValue::from("hi").to_json(), Some(json!("hi")));
        assert_eq!(AttrValue::from(3_i32).to_json(), Some(json!(3)));
        assert_eq!(AttrValue::from(true).to_json(), Some(json!(true)));
        assert_eq!(AttrValue::from(Callback::new(|| {})).to_json(), None);
    }

    #[test]
    #[should_panic(expected = "only callbacks are allowed")]
    fn non_callback_listener_panics() {
        expect_listener("on:click", &AttrValue::from("click me"));
    }

    #[test]
    fn display_matches_string_attribute_form() {
        assert_eq!(AttrValue::from("text").to_string(), "text");
        assert_eq!(AttrValue::from(-4_i64).to_string(), "-4");
        assert_eq!(AttrValue::from(false).to_string(), "false");
    }
}
