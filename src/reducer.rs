//! Pure state projection for the storage adapter
//!
//! The reducer derives the mapping-shaped state from the action stream alone.
//! It has no dependency on the backend or the change-event source, and never
//! performs I/O; whether a write succeeded is the middleware's concern (a
//! failed write's action is never forwarded, so the reducer never sees it).

use tracing::trace;

use crate::action::{Action, Payload, StorageMap};

/// Pure reducer computing the adapter's state from dispatched actions
///
/// State is `None` until the first `STORAGE_PREPARE` has been reduced and a
/// mapping from then on; `STORAGE_CLEAR` yields an empty mapping, never
/// `None`.
#[derive(Debug, Clone)]
pub struct StorageReducer {
    namespace: Option<String>,
}

impl StorageReducer {
    /// Create a reducer bound to the given namespace
    pub fn new(namespace: Option<&str>) -> Self {
        Self {
            namespace: namespace.map(str::to_owned),
        }
    }

    /// The namespace this reducer is bound to
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// Compute the next state from the current state and an action
    ///
    /// Actions of a different namespace, and payloads the adapter does not
    /// recognize, are identity.
    pub fn reduce(&self, state: Option<StorageMap>, action: &Action) -> Option<StorageMap> {
        if action.namespace.as_deref() != self.namespace.as_deref() {
            return state;
        }

        match &action.payload {
            Payload::Prepare { initial_values } => {
                trace!(entries = initial_values.as_ref().map_or(0, StorageMap::len), "seeding state");
                Some(initial_values.clone().unwrap_or_default())
            }
            Payload::SetItem { key, value, .. } => {
                let mut map = state.unwrap_or_default();
                map.insert(key.clone(), value.clone());
                Some(map)
            }
            Payload::RemoveItem { key, .. } => {
                let mut map = state.unwrap_or_default();
                map.remove(key);
                Some(map)
            }
            Payload::Clear => Some(StorageMap::new()),
            Payload::Custom { .. } => state,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn map(entries: &[(&str, &str)]) -> StorageMap {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_initial_state_is_none() {
        let reducer = StorageReducer::new(Some("pudding"));
        let state = reducer.reduce(None, &Action::custom("INIT", serde_json::Value::Null));
        assert_eq!(state, None);
    }

    #[test]
    fn test_prepare_replaces_state_with_initial_values() {
        let reducer = StorageReducer::new(Some("pudding"));
        let values = map(&[("chocolate", "cinnamon"), ("vanilla", "blueberry")]);

        let action = Action::prepare(Some("pudding")).with_initial_values(values.clone());
        assert_eq!(reducer.reduce(None, &action), Some(values));
    }

    #[test]
    fn test_set_item_adds_entry() {
        let reducer = StorageReducer::new(Some("pudding"));
        let state = map(&[("chocolate", "cinnamon")]);

        let action = Action::set_item(Some("pudding"), "banana", "caramel");
        assert_eq!(
            reducer.reduce(Some(state), &action),
            Some(map(&[("chocolate", "cinnamon"), ("banana", "caramel")]))
        );
    }

    #[test]
    fn test_remove_item_drops_entry() {
        let reducer = StorageReducer::new(Some("pudding"));
        let state = map(&[("chocolate", "cinnamon"), ("strawberry", "apricot")]);

        let action = Action::remove_item(Some("pudding"), "strawberry");
        assert_eq!(
            reducer.reduce(Some(state), &action),
            Some(map(&[("chocolate", "cinnamon")]))
        );
    }

    #[test]
    fn test_remove_last_entry_yields_empty_map_not_none() {
        let reducer = StorageReducer::new(None);
        let action = Action::remove_item(None, "a");
        assert_eq!(
            reducer.reduce(Some(map(&[("a", "1")])), &action),
            Some(StorageMap::new())
        );
    }

    #[test]
    fn test_clear_yields_empty_map() {
        let reducer = StorageReducer::new(Some("pudding"));
        let state = map(&[("chocolate", "cinnamon"), ("strawberry", "apricot")]);

        assert_eq!(
            reducer.reduce(Some(state), &Action::clear(Some("pudding"))),
            Some(StorageMap::new())
        );
    }

    #[test]
    fn test_unknown_action_is_identity() {
        let reducer = StorageReducer::new(Some("pudding"));
        let state = map(&[("chocolate", "cinnamon")]);

        let action = Action::custom("PIZZA_SET_ITEM", serde_json::json!({ "key": "x" }));
        assert_eq!(reducer.reduce(Some(state.clone()), &action), Some(state));
    }

    #[test]
    fn test_foreign_namespace_is_identity() {
        let reducer = StorageReducer::new(Some("pudding"));
        let state = map(&[("chocolate", "cinnamon")]);

        let action = Action::set_item(Some("donut"), "banana", "caramel");
        assert_eq!(
            reducer.reduce(Some(state.clone()), &action),
            Some(state.clone())
        );

        let unprefixed = Action::set_item(None, "banana", "caramel");
        assert_eq!(reducer.reduce(Some(state.clone()), &unprefixed), Some(state));
    }

    proptest! {
        // Once state is a mapping it never reverts to None, whatever the
        // adapter's own actions do.
        #[test]
        fn prop_state_never_reverts_to_none(
            keys in proptest::collection::vec("[a-z]{1,8}", 0..8),
            key in "[a-z]{1,8}",
            value in "[a-z]{1,8}",
            pick in 0usize..4,
        ) {
            let reducer = StorageReducer::new(None);
            let seed: StorageMap = keys.into_iter().map(|k| (k.clone(), k)).collect();
            let action = match pick {
                0 => Action::prepare(None).with_initial_values(seed.clone()),
                1 => Action::set_item(None, key, value),
                2 => Action::remove_item(None, key),
                _ => Action::clear(None),
            };
            prop_assert!(reducer.reduce(Some(seed), &action).is_some());
        }
    }
}
