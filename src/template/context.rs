//! Rendering context handed to the expression evaluator.

use super::tracker::PositionTracker;
use std::collections::BTreeMap;
use std::sync::Arc;

/// A value in the rendering context.
#[derive(Debug, Clone)]
pub enum ContextValue {
    /// Plain data
    Data(serde_json::Value),
    /// A position tracker shared with the caller
    Tracker(Arc<PositionTracker>),
}

/// Key → value mapping passed through to the evaluator.
///
/// # Examples
///
/// ```
/// use sheet_stencil::template::Context;
/// use serde_json::json;
///
/// let mut context = Context::new();
/// context.insert("title", json!("Q3 report"));
/// context.insert("rows", json!([{"name": "a", "qty": 2}]));
/// assert!(context.contains_key("rows"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Context {
    entries: BTreeMap<String, ContextValue>,
}

impl Context {
    /// Create an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a data value, returning the previous value under `key`.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Option<ContextValue> {
        self.entries
            .insert(key.into(), ContextValue::Data(value.into()))
    }

    /// Insert a position tracker under `key`.
    ///
    /// Supplying a tracker under the renderer's reserved name replaces the
    /// one the renderer would otherwise create, so the caller can read the
    /// cursor back after rendering.
    pub fn insert_tracker(
        &mut self,
        key: impl Into<String>,
        tracker: Arc<PositionTracker>,
    ) -> Option<ContextValue> {
        self.entries
            .insert(key.into(), ContextValue::Tracker(tracker))
    }

    /// Whether `key` is defined.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Value under `key`.
    pub fn get(&self, key: &str) -> Option<&ContextValue> {
        self.entries.get(key)
    }

    /// Tracker under `key`, if that entry is one.
    pub fn tracker(&self, key: &str) -> Option<&Arc<PositionTracker>> {
        match self.entries.get(key)? {
            ContextValue::Tracker(tracker) => Some(tracker),
            ContextValue::Data(_) => None,
        }
    }

    /// Entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ContextValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the context is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Copy of this context with a fresh tracker under `name`, unless the
    /// caller already defined `name` (with a tracker or anything else).
    pub(crate) fn with_default_tracker(&self, name: &str) -> Context {
        let mut context = self.clone();
        if !context.contains_key(name) {
            context.insert_tracker(name, Arc::new(PositionTracker::new()));
        }
        context
    }
}

impl From<serde_json::Map<String, serde_json::Value>> for Context {
    fn from(map: serde_json::Map<String, serde_json::Value>) -> Self {
        Self {
            entries: map
                .into_iter()
                .map(|(k, v)| (k, ContextValue::Data(v)))
                .collect(),
        }
    }
}
