//! Variable scope for template rendering.
//!
//! A [`VariableScope`] maps names to [`Binding`]s. Three binding modes exist:
//!
//! - [`Binding::Value`]: a private copy of the value, owned by the renderer
//! - [`Binding::Shared`]: an alias of a caller-owned [`SharedValue`]; changes made
//!   by either side are visible to the other
//! - [`Binding::Template`]: a nested [`Renderable`], replaced by its rendered text
//!   the first time the owning renderer renders
//! - [`Binding::Rendered`]: that rendered text, kept apart from plain values so
//!   autoescaping passes it through

use serde_json::Value;
use std::collections::BTreeMap;
use std::collections::btree_map;
use std::sync::{Arc, PoisonError, RwLock};

use super::renderer::Renderable;

/// A reference-counted value cell for by-reference bindings.
///
/// Cloning a `SharedValue` produces another handle to the same cell.
///
/// ```rust
/// use serde_json::json;
/// use stencil::templating::SharedValue;
///
/// let cell = SharedValue::new(json!([1, 2]));
/// let alias = cell.clone();
/// alias.update(|v| v.as_array_mut().map(|items| items.push(json!(3))));
/// assert_eq!(cell.get(), json!([1, 2, 3]));
/// ```
#[derive(Debug, Clone, Default)]
pub struct SharedValue(Arc<RwLock<Value>>);

impl SharedValue {
    pub fn new(value: impl Into<Value>) -> Self {
        Self(Arc::new(RwLock::new(value.into())))
    }

    /// Snapshot of the current value.
    pub fn get(&self) -> Value {
        self.0.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn set(&self, value: impl Into<Value>) {
        *self.0.write().unwrap_or_else(PoisonError::into_inner) = value.into();
    }

    /// Mutate the value in place.
    pub fn update<R>(&self, f: impl FnOnce(&mut Value) -> R) -> R {
        let mut guard = self.0.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut *guard)
    }

    /// Whether both handles point at the same cell.
    pub fn ptr_eq(&self, other: &SharedValue) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

/// One entry of a [`VariableScope`].
#[derive(Debug)]
pub enum Binding {
    Value(Value),
    Shared(SharedValue),
    Template(Box<dyn Renderable>),
    Rendered(String),
}

impl Binding {
    /// Current value of the binding, or `None` for a template that has not
    /// been rendered yet.
    pub fn value(&self) -> Option<Value> {
        match self {
            Binding::Value(value) => Some(value.clone()),
            Binding::Shared(cell) => Some(cell.get()),
            Binding::Template(_) => None,
            Binding::Rendered(text) => Some(Value::String(text.clone())),
        }
    }

    pub fn is_template(&self) -> bool {
        matches!(self, Binding::Template(_))
    }

    /// Whether the binding holds the output of a nested template.
    pub fn is_rendered(&self) -> bool {
        matches!(self, Binding::Rendered(_))
    }
}

impl From<Value> for Binding {
    fn from(value: Value) -> Self {
        Binding::Value(value)
    }
}

impl From<SharedValue> for Binding {
    fn from(cell: SharedValue) -> Self {
        Binding::Shared(cell)
    }
}

/// Named bindings exposed to a template. Keys are unique; the last write wins.
#[derive(Debug, Default)]
pub struct VariableScope {
    bindings: BTreeMap<String, Binding>,
}

impl VariableScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a binding, returning the one it replaced.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        binding: impl Into<Binding>,
    ) -> Option<Binding> {
        self.bindings.insert(key.into(), binding.into())
    }

    pub fn get(&self, key: &str) -> Option<&Binding> {
        self.bindings.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Binding> {
        self.bindings.get_mut(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<Binding> {
        self.bindings.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.bindings.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.bindings.keys().map(String::as_str)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, Binding> {
        self.bindings.iter()
    }

    pub fn iter_mut(&mut self) -> btree_map::IterMut<'_, String, Binding> {
        self.bindings.iter_mut()
    }
}

impl From<serde_json::Map<String, Value>> for VariableScope {
    fn from(map: serde_json::Map<String, Value>) -> Self {
        map.into_iter().collect()
    }
}

impl<K: Into<String>, B: Into<Binding>> FromIterator<(K, B)> for VariableScope {
    fn from_iter<I: IntoIterator<Item = (K, B)>>(iter: I) -> Self {
        Self {
            bindings: iter.into_iter().map(|(k, b)| (k.into(), b.into())).collect(),
        }
    }
}

impl<'a> IntoIterator for &'a VariableScope {
    type Item = (&'a String, &'a Binding);
    type IntoIter = btree_map::Iter<'a, String, Binding>;

    fn into_iter(self) -> Self::IntoIter {
        self.bindings.iter()
    }
}
