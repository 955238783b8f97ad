use std::collections::HashMap;

use crate::foundation::core::Value;

/// Identifier addressing a live native view inside the view system.
#[derive(
    Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct ViewId(pub String);

impl ViewId {
    /// Build an id from anything string-like.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl std::fmt::Display for ViewId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// The fixed property-write surface a worklet result can drive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ViewProperty {
    /// View opacity in `[0, 1]` (the view clamps as it sees fit).
    Opacity,
    /// Uniform scale factor.
    Scale,
    /// Horizontal scale factor.
    ScaleX,
    /// Vertical scale factor.
    ScaleY,
    /// Horizontal translation in points.
    TranslateX,
    /// Vertical translation in points.
    TranslateY,
    /// Rotation about the z axis, radians.
    Rotation,
    /// Rotation about the x axis, radians.
    RotationX,
    /// Rotation about the y axis, radians.
    RotationY,
    /// Text content; only text-bearing views accept it.
    Text,
}

/// A value a view property accepts: numeric for transforms and opacity,
/// textual for text content.
#[derive(Clone, Debug, PartialEq)]
pub enum PropertyValue {
    /// Numeric property payload.
    Number(f64),
    /// Text property payload.
    Text(String),
}

impl PropertyValue {
    /// Convert an interpreter result into a property payload.
    ///
    /// Booleans and lists have no property mapping and yield `None`; the
    /// driver skips the write and warns.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => Some(Self::Number(*n)),
            Value::Str(s) => Some(Self::Text(s.clone())),
            Value::Bool(_) | Value::List(_) => None,
        }
    }
}

/// Non-owning write surface over one live native view.
///
/// The surrounding view system creates, lays out, and destroys views; the
/// worklet runtime only holds a handle long enough to apply one computed
/// value per frame.
pub trait ViewHandle {
    /// Whether this view kind accepts the property at all (e.g. `text` only
    /// on text-bearing views).
    fn accepts(&self, property: ViewProperty) -> bool;

    /// Write one property value. Called only after [`Self::accepts`]
    /// returned true for the property.
    fn set_property(&mut self, property: ViewProperty, value: PropertyValue);
}

/// Apply one computed value to a view property.
///
/// Writing a property the view kind does not support is a no-op, not a
/// failure.
pub fn apply_property(
    handle: &mut dyn ViewHandle,
    property: ViewProperty,
    value: PropertyValue,
) -> bool {
    if !handle.accepts(property) {
        tracing::debug!(?property, "property not supported by view kind, ignoring");
        return false;
    }
    handle.set_property(property, value);
    true
}

/// Plain id-to-handle lookup table, owned by the view system.
///
/// One instance per execution context; there is deliberately no process-wide
/// registry.
#[derive(Default)]
pub struct ViewRegistry {
    views: HashMap<ViewId, Box<dyn ViewHandle>>,
}

impl ViewRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the handle for a view id.
    pub fn insert(&mut self, id: ViewId, handle: Box<dyn ViewHandle>) {
        self.views.insert(id, handle);
    }

    /// Remove a view (on unmount). Safe to call for unknown ids.
    pub fn remove(&mut self, id: &ViewId) -> Option<Box<dyn ViewHandle>> {
        self.views.remove(id)
    }

    /// Look up a view for one property write.
    pub fn get_mut(&mut self, id: &ViewId) -> Option<&mut dyn ViewHandle> {
        match self.views.get_mut(id) {
            Some(handle) => Some(handle.as_mut()),
            None => None,
        }
    }

    /// Number of live views.
    pub fn len(&self) -> usize {
        self.views.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/runtime/view.rs"]
mod tests;
