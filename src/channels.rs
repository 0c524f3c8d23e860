//! Channel descriptors and channel-name normalization.

use serde::{Deserialize, Serialize};

/// Decorations stripped from EDF channel labels by default.
pub const DEFAULT_DECORATIONS: [&str; 2] = ["EEG ", "-REF"];

/// One electrode: 3-D location and canonical name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelDescriptor {
    /// X coordinate
    pub x: f64,
    /// Y coordinate
    pub y: f64,
    /// Z coordinate
    pub z: f64,
    /// Channel name
    pub name: String,
}

impl ChannelDescriptor {
    /// Create a channel descriptor.
    pub fn new(x: f64, y: f64, z: f64, name: impl Into<String>) -> Self {
        Self {
            x,
            y,
            z,
            name: name.into(),
        }
    }

    /// Location as `[x, y, z]`.
    pub fn location(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }
}

/// Remove every occurrence of each decoration from a channel label.
///
/// ```
/// use eegnpz::channels::{strip_decorations, DEFAULT_DECORATIONS};
///
/// assert_eq!(strip_decorations("EEG Fp1-REF", &DEFAULT_DECORATIONS), "Fp1");
/// assert_eq!(strip_decorations("Fp1", &DEFAULT_DECORATIONS), "Fp1");
/// ```
pub fn strip_decorations<S: AsRef<str>>(label: &str, decorations: &[S]) -> String {
    decorations
        .iter()
        .fold(label.to_string(), |name, decoration| {
            let decoration = decoration.as_ref();
            if decoration.is_empty() {
                name
            } else {
                name.replace(decoration, "")
            }
        })
}
