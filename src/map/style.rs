//! Map rendering style: a pure function of the selected layer and the
//! points-of-interest / traffic flags.

use serde::{Deserialize, Serialize};

use crate::prefs::{DisplayPreferences, MapLayer};

/// The rendering style handed to the map surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "style")]
pub enum MapStyle {
    Standard {
        points_of_interest: bool,
        traffic: bool,
    },
    Hybrid {
        points_of_interest: bool,
        traffic: bool,
    },
    /// Satellite imagery; POI and traffic layers do not apply.
    Imagery,
}

/// Resolve the rendering style for a layer selection.
///
/// The `offline` layer selects downloaded tiles drawn by a separate overlay, so
/// its base style resolves to hybrid in every path, whether the layer was already
/// persisted at first display or was just picked in the settings sheet.
pub fn resolve_style(layer: MapLayer, prefs: &DisplayPreferences) -> MapStyle {
    match layer {
        MapLayer::Standard => MapStyle::Standard {
            points_of_interest: prefs.show_points_of_interest,
            traffic: prefs.show_traffic,
        },
        MapLayer::Hybrid | MapLayer::Offline => MapStyle::Hybrid {
            points_of_interest: prefs.show_points_of_interest,
            traffic: prefs.show_traffic,
        },
        MapLayer::Satellite => MapStyle::Imagery,
    }
}
