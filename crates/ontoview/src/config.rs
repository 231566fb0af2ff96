//! View options for the transform and layout pipeline.
//!
//! These options are consumed from the surrounding application (settings
//! store, CLI flags, config file). All types implement
//! [`serde::Deserialize`] so they can be loaded from external sources, and
//! every field has a sensible default.

use serde::Deserialize;

/// Options controlling what the transform emits and how layout spaces it.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ViewOptions {
    /// Emit placeholder ("ghost") nodes for symbols referenced but not
    /// defined in the current file.
    show_external_classes: bool,

    /// How class attributes are presented on the canvas.
    attribute_display: AttributeDisplay,

    /// Layout spacing and direction.
    layout: LayoutOptions,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            show_external_classes: true,
            attribute_display: AttributeDisplay::default(),
            layout: LayoutOptions::default(),
        }
    }
}

impl ViewOptions {
    pub fn show_external_classes(&self) -> bool {
        self.show_external_classes
    }

    pub fn attribute_display(&self) -> AttributeDisplay {
        self.attribute_display
    }

    pub fn layout(&self) -> &LayoutOptions {
        &self.layout
    }

    /// Returns a copy with ghost-node emission toggled.
    pub fn with_external_classes(mut self, enabled: bool) -> Self {
        self.show_external_classes = enabled;
        self
    }
}

/// Attribute presentation mode.
///
/// Only `Shown` reserves vertical space per attribute during layout; the
/// other two modes render attributes outside the node body.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeDisplay {
    #[default]
    Shown,
    Collapsible,
    Hover,
}

/// Spacing and direction parameters for the layered layout.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LayoutOptions {
    /// Minimum horizontal gap between nodes in the same rank.
    node_separation: f32,

    /// Gap between consecutive ranks.
    rank_separation: f32,

    /// Main axis of the layered layout.
    direction: LayoutDirection,

    /// Include generalization edges in rank computation. Off by default so
    /// backward-pointing "specializes" links do not distort the hierarchy.
    rank_generalizations: bool,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            node_separation: 60.0,
            rank_separation: 110.0,
            direction: LayoutDirection::default(),
            rank_generalizations: false,
        }
    }
}

impl LayoutOptions {
    pub fn node_separation(&self) -> f32 {
        self.node_separation
    }

    pub fn rank_separation(&self) -> f32 {
        self.rank_separation
    }

    pub fn direction(&self) -> LayoutDirection {
        self.direction
    }

    pub fn rank_generalizations(&self) -> bool {
        self.rank_generalizations
    }
}

/// Main axis of the layered layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutDirection {
    #[default]
    TopDown,
    LeftRight,
}
