//! # Part
//!
//! A built solid with the name and parameter record that produced it.

use drumforge_geometry::Solid;
use serde_json::Value;

/// A named, immutable solid and the record it was built from.
#[derive(Debug, Clone, PartialEq)]
pub struct Part {
    name: String,
    kind: &'static str,
    params: Value,
    solid: Solid,
}

impl Part {
    pub(crate) fn new(name: impl Into<String>, kind: &'static str, params: Value, solid: Solid) -> Self {
        Self {
            name: name.into(),
            kind,
            params,
            solid,
        }
    }

    /// Name given to the part in its request or layout.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Tag of the part kind, or `layout` for a composed layout.
    pub fn kind(&self) -> &'static str {
        self.kind
    }

    /// Parameter record as JSON.
    pub fn params(&self) -> &Value {
        &self.params
    }

    /// The built solid.
    ///
    /// ```rust
    /// use drumforge_parts::{Assembler, PartKind};
    /// use drumforge_parts::parts::pill::PillParams;
    ///
    /// let part = Assembler::default().build(&PartKind::Pill(PillParams::default()))?;
    /// assert!(part.solid().volume() > 0.0);
    /// let volume = part.solid().volume();
    /// assert_eq!(part.into_solid().volume(), volume);
    /// # Ok::<(), drumforge_parts::PartError>(())
    /// ```
    pub fn solid(&self) -> &Solid {
        &self.solid
    }

    /// Consumes the part, keeping only its solid.
    pub fn into_solid(self) -> Solid {
        self.solid
    }
}
