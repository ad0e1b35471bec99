//! Active filter state for the dashboard.
//!
//! A [`FilterStore`] holds at most one selected value per dimension
//! (`Sesso`, `TitoloStudio`, ...). UI actions never mutate it directly:
//! they produce a [`FilterEvent`] that the controller applies before
//! starting the next refresh cycle.

pub mod query;

use std::fmt;

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// A filter mutation requested by the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterEvent {
    /// A chart category was clicked: select it, or deselect it if it was
    /// already the active value for that dimension.
    Toggled { dimension: String, value: String },
    /// A filter badge was dismissed.
    Removed { dimension: String },
    /// The reset control was used.
    Cleared,
}

impl fmt::Display for FilterEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Toggled { dimension, value } => write!(f, "toggle {dimension}={value}"),
            Self::Removed { dimension } => write!(f, "remove {dimension}"),
            Self::Cleared => write!(f, "reset"),
        }
    }
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

/// Single-select-per-dimension filter map, kept in insertion order.
///
/// No validation is done on keys or values; the backend decides which
/// dimensions it understands.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterStore {
    entries: Vec<(String, String)>,
}

impl FilterStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select `value` for `key`, or remove `key` if `value` is already the
    /// selected one.
    ///
    /// Replacing the value of an existing key keeps the key's position.
    pub fn toggle(&mut self, key: &str, value: &str) {
        match self.position(key) {
            Some(idx) if self.entries[idx].1 == value => {
                self.entries.remove(idx);
            }
            Some(idx) => self.entries[idx].1 = value.to_string(),
            None => self.entries.push((key.to_string(), value.to_string())),
        }
    }

    /// Remove `key`. Absent keys are ignored.
    pub fn remove(&mut self, key: &str) {
        if let Some(idx) = self.position(key) {
            self.entries.remove(idx);
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Apply a UI event to the store.
    pub fn apply(&mut self, event: &FilterEvent) {
        match event {
            FilterEvent::Toggled { dimension, value } => self.toggle(dimension, value),
            FilterEvent::Removed { dimension } => self.remove(dimension),
            FilterEvent::Cleared => self.clear(),
        }
    }

    /// Current key/value pairs in insertion order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub(crate) fn get(&self, key: &str) -> Option<&str> {
        self.position(key).map(|idx| self.entries[idx].1.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.entries.iter().position(|(k, _)| k == key)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_twice_deselects() {
        let mut store = FilterStore::new();
        store.toggle("Sesso", "M");
        assert_eq!(store.get("Sesso"), Some("M"));
        store.toggle("Sesso", "M");
        assert_eq!(store.get("Sesso"), None);
        assert!(store.is_empty());
    }

    #[test]
    fn toggle_other_value_replaces() {
        let mut store = FilterStore::new();
        store.toggle("Sesso", "M");
        store.toggle("Sesso", "F");
        assert_eq!(store.entries().collect::<Vec<_>>(), vec![("Sesso", "F")]);
    }

    #[test]
    fn replace_keeps_insertion_position() {
        let mut store = FilterStore::new();
        store.toggle("Sesso", "M");
        store.toggle("TitoloStudio", "Laurea");
        store.toggle("Sesso", "F");
        let keys: Vec<_> = store.entries().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["Sesso", "TitoloStudio"]);
    }

    #[test]
    fn remove_absent_key_is_noop() {
        let mut store = FilterStore::new();
        store.toggle("Sesso", "M");
        store.remove("TitoloStudio");
        assert_eq!(store.entries().count(), 1);
        store.remove("Sesso");
        assert!(store.is_empty());
    }

    #[test]
    fn apply_events() {
        let mut store = FilterStore::new();
        store.apply(&FilterEvent::Toggled {
            dimension: "ScopoFinanziamento".into(),
            value: "Medico".into(),
        });
        store.apply(&FilterEvent::Toggled {
            dimension: "Sesso".into(),
            value: "F".into(),
        });
        store.apply(&FilterEvent::Removed {
            dimension: "ScopoFinanziamento".into(),
        });
        assert_eq!(store.entries().collect::<Vec<_>>(), vec![("Sesso", "F")]);

        store.apply(&FilterEvent::Cleared);
        assert!(store.is_empty());
    }

    #[test]
    fn event_display() {
        let event = FilterEvent::Toggled {
            dimension: "Sesso".into(),
            value: "M".into(),
        };
        assert_eq!(event.to_string(), "toggle Sesso=M");
        assert_eq!(FilterEvent::Cleared.to_string(), "reset");
    }
}
