//! Actions recognized and emitted by the storage adapter
//!
//! An [`Action`] pairs an optional namespace with a structured payload. Two
//! adapters configured with different namespaces never interact: an action
//! whose namespace does not match the adapter's is passed through untouched
//! and leaves the adapter's state unchanged.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// The mapping the adapter keeps in sync with the backing store
pub type StorageMap = HashMap<String, String>;

/// An action flowing through the host's dispatch pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    /// Namespace this action belongs to, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    /// What the action does
    #[serde(flatten)]
    pub payload: Payload,
}

/// The payload of an [`Action`]
///
/// On the wire the discriminator serializes as `type`, the prepare seed as
/// `initialValues` and the origin flag as `fromEvent` (absent means locally
/// originated).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Payload {
    /// One-time initialization read seeding state from the store
    #[serde(rename = "STORAGE_PREPARE")]
    Prepare {
        /// Entries read from the store; added by the middleware before the
        /// action is forwarded downstream
        #[serde(
            rename = "initialValues",
            default,
            skip_serializing_if = "Option::is_none"
        )]
        initial_values: Option<StorageMap>,
    },

    /// Set a key to a value
    #[serde(rename = "STORAGE_SET_ITEM")]
    SetItem {
        /// Key to set
        key: String,
        /// Value to store
        value: String,
        /// True when the mutation was replayed from an external change
        /// notification and must not be written back to storage
        #[serde(rename = "fromEvent", default, skip_serializing_if = "is_false")]
        from_event: bool,
    },

    /// Remove a key
    #[serde(rename = "STORAGE_REMOVE_ITEM")]
    RemoveItem {
        /// Key to remove
        key: String,
        /// True when the mutation was replayed from an external change
        /// notification and must not be written back to storage
        #[serde(rename = "fromEvent", default, skip_serializing_if = "is_false")]
        from_event: bool,
    },

    /// Drop every entry
    #[serde(rename = "STORAGE_CLEAR")]
    Clear,

    /// An action the adapter does not recognize; forwarded untouched
    #[serde(rename = "CUSTOM")]
    Custom {
        /// Host-defined action type
        kind: String,
        /// Host-defined payload
        data: serde_json::Value,
    },
}

fn is_false(flag: &bool) -> bool {
    !*flag
}

impl Action {
    /// A `STORAGE_PREPARE` action without initial values
    pub fn prepare(namespace: Option<&str>) -> Self {
        Self {
            namespace: namespace.map(str::to_owned),
            payload: Payload::Prepare {
                initial_values: None,
            },
        }
    }

    /// A `STORAGE_SET_ITEM` action
    pub fn set_item(
        namespace: Option<&str>,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            namespace: namespace.map(str::to_owned),
            payload: Payload::SetItem {
                key: key.into(),
                value: value.into(),
                from_event: false,
            },
        }
    }

    /// A `STORAGE_REMOVE_ITEM` action
    pub fn remove_item(namespace: Option<&str>, key: impl Into<String>) -> Self {
        Self {
            namespace: namespace.map(str::to_owned),
            payload: Payload::RemoveItem {
                key: key.into(),
                from_event: false,
            },
        }
    }

    /// A `STORAGE_CLEAR` action
    pub fn clear(namespace: Option<&str>) -> Self {
        Self {
            namespace: namespace.map(str::to_owned),
            payload: Payload::Clear,
        }
    }

    /// A host-defined action the adapter passes through untouched
    pub fn custom(kind: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            namespace: None,
            payload: Payload::Custom {
                kind: kind.into(),
                data,
            },
        }
    }

    /// Mark a mutating action as originating from an external change event
    ///
    /// Has no effect on payloads that carry no origin flag.
    pub fn from_event(mut self) -> Self {
        match &mut self.payload {
            Payload::SetItem { from_event, .. } | Payload::RemoveItem { from_event, .. } => {
                *from_event = true;
            }
            _ => {}
        }
        self
    }

    /// Attach the entries read during prepare
    ///
    /// Has no effect on payloads other than [`Payload::Prepare`].
    pub fn with_initial_values(mut self, values: StorageMap) -> Self {
        if let Payload::Prepare { initial_values } = &mut self.payload {
            *initial_values = Some(values);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_event_only_touches_mutations() {
        let action = Action::set_item(Some("cake"), "a", "1").from_event();
        assert!(matches!(
            action.payload,
            Payload::SetItem {
                from_event: true,
                ..
            }
        ));

        let action = Action::clear(Some("cake")).from_event();
        assert_eq!(action.payload, Payload::Clear);
    }

    #[test]
    fn test_with_initial_values() {
        let values: StorageMap = [("a".to_owned(), "1".to_owned())].into_iter().collect();
        let action = Action::prepare(None).with_initial_values(values.clone());
        assert_eq!(
            action.payload,
            Payload::Prepare {
                initial_values: Some(values)
            }
        );
    }

    #[test]
    fn test_wire_shape() {
        let action = Action::set_item(Some("cake"), "lemon", "orange").from_event();
        let json = serde_json::to_value(&action).expect("Failed to serialize action");
        assert_eq!(
            json,
            serde_json::json!({
                "namespace": "cake",
                "type": "STORAGE_SET_ITEM",
                "key": "lemon",
                "value": "orange",
                "fromEvent": true
            })
        );

        let clear = serde_json::to_value(Action::clear(None)).expect("Failed to serialize action");
        assert_eq!(clear, serde_json::json!({ "type": "STORAGE_CLEAR" }));
    }

    #[test]
    fn test_from_event_defaults_to_false() {
        let action: Action = serde_json::from_value(serde_json::json!({
            "type": "STORAGE_REMOVE_ITEM",
            "key": "lemon"
        }))
        .expect("Failed to deserialize action");
        assert_eq!(action, Action::remove_item(None, "lemon"));
    }
}
