//! Scene lighting configuration
//!
//! A scene declares every lightmap variant it can be shown in (day, night,
//! ...) together with the tunables the update scheduler runs with.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{Config, ConfigError};
use crate::foundation::color::VertexColor;

/// Frames between two scheduled repaints of the same object
pub const DEFAULT_FRAME_INTERVAL: u32 = 10;

/// Per-channel delta below which a repaint is considered imperceptible
pub const DEFAULT_PROXIMITY_LEVEL: u8 = 50;

/// World units an object must move before a steady object is repainted
pub const DEFAULT_MIN_MOVE_DISTANCE: f32 = 1.0;

/// Fade multiplier units removed per second
pub const DEFAULT_FADE_DECAY_PER_SECOND: f32 = 4.0;

/// Lighting variants a scene can be baked for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeIndex {
    /// Daylight lightmaps
    Day,
    /// Night lightmaps
    Night,
    /// Elite encounter lighting
    Elite,
}

impl fmt::Display for TimeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Day => "Day",
            Self::Night => "Night",
            Self::Elite => "Elite",
        };
        f.write_str(name)
    }
}

/// One baked lighting preset: ambient colour plus the lightmaps that go with it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneVariant {
    /// Time index this variant is selected by
    pub time: TimeIndex,
    /// Colour every lit object starts from before lights are blended in
    pub ambient_color: VertexColor,
    /// Lightmap resources the host binds while this variant is active
    #[serde(default)]
    pub lightmap_paths: Vec<String>,
}

impl SceneVariant {
    /// Create a variant without lightmaps
    pub fn new(time: TimeIndex, ambient_color: VertexColor) -> Self {
        Self {
            time,
            ambient_color,
            lightmap_paths: Vec::new(),
        }
    }

    /// Attach lightmap resource paths
    pub fn with_lightmaps<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.lightmap_paths = paths.into_iter().map(Into::into).collect();
        self
    }
}

/// Per-scene vertex lighting configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Every variant the scene supports; the first match for a time index wins
    pub variants: Vec<SceneVariant>,
    /// Registered objects are checked for a repaint every this many frames
    pub frame_interval_between_updates: u32,
    /// Repaints changing every channel by less than this are skipped
    pub proximity_level: u8,
    /// Steady objects that moved less than this are not repainted
    pub min_move_distance: f32,
    /// How fast the fade multiplier returns to its resting value
    pub fade_decay_per_second: f32,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            variants: Vec::new(),
            frame_interval_between_updates: DEFAULT_FRAME_INTERVAL,
            proximity_level: DEFAULT_PROXIMITY_LEVEL,
            min_move_distance: DEFAULT_MIN_MOVE_DISTANCE,
            fade_decay_per_second: DEFAULT_FADE_DECAY_PER_SECOND,
        }
    }
}

impl Config for SceneConfig {}

impl SceneConfig {
    /// Create a configuration with default tunables and the given variants
    pub fn new(variants: Vec<SceneVariant>) -> Self {
        Self {
            variants,
            ..Self::default()
        }
    }

    /// Add a variant
    pub fn with_variant(mut self, variant: SceneVariant) -> Self {
        self.variants.push(variant);
        self
    }

    /// Set the frame interval between scheduled repaints
    pub fn with_frame_interval(mut self, frames: u32) -> Self {
        self.frame_interval_between_updates = frames;
        self
    }

    /// Set the colour proximity threshold
    pub fn with_proximity_level(mut self, level: u8) -> Self {
        self.proximity_level = level;
        self
    }

    /// Set the minimum move distance
    pub fn with_min_move_distance(mut self, distance: f32) -> Self {
        self.min_move_distance = distance;
        self
    }

    /// First variant configured for `time`
    pub fn find_variant(&self, time: TimeIndex) -> Option<&SceneVariant> {
        self.variants.iter().find(|variant| variant.time == time)
    }

    /// Squared minimum move distance, the form the scheduler compares against
    pub fn min_move_distance_sqr(&self) -> f32 {
        self.min_move_distance * self.min_move_distance
    }

    /// Check the tunables describe a usable scene
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.frame_interval_between_updates == 0 {
            return Err(ConfigError::Invalid {
                field: "frame_interval_between_updates",
                reason: "must be at least 1".to_string(),
            });
        }
        non_negative("min_move_distance", self.min_move_distance)?;
        non_negative("fade_decay_per_second", self.fade_decay_per_second)?;
        if self.variants.is_empty() {
            log::warn!("Scene configuration declares no lighting variants");
        }
        Ok(())
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("must be a non-negative number, got {}", value),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigFormat;
    use approx::assert_relative_eq;

    const SCENE_TOML: &str = r#"
frame_interval_between_updates = 6

[[variants]]
time = "Day"
ambient_color = { r = 180, g = 170, b = 150 }
lightmap_paths = ["Lightmaps/town_day_0", "Lightmaps/town_day_1"]

[[variants]]
time = "Night"
ambient_color = { r = 30, g = 30, b = 60 }
"#;

    #[test]
    fn test_toml_scene_uses_defaults_for_missing_tunables() {
        let config = SceneConfig::parse(ConfigFormat::Toml, SCENE_TOML).unwrap();

        assert_eq!(config.variants.len(), 2);
        assert_eq!(config.frame_interval_between_updates, 6);
        assert_eq!(config.proximity_level, DEFAULT_PROXIMITY_LEVEL);
        assert_relative_eq!(config.min_move_distance, DEFAULT_MIN_MOVE_DISTANCE);
        assert_eq!(config.variants[0].lightmap_paths.len(), 2);
        assert!(config.variants[1].lightmap_paths.is_empty());
        config.validate().unwrap();
    }

    #[test]
    fn test_ron_scene_parses() {
        let source = r#"(
            variants: [
                (time: Elite, ambient_color: (r: 90, g: 10, b: 10), lightmap_paths: []),
            ],
            proximity_level: 20,
        )"#;
        let config = SceneConfig::parse(ConfigFormat::Ron, source).unwrap();

        assert_eq!(config.proximity_level, 20);
        assert_eq!(
            config.find_variant(TimeIndex::Elite).map(|v| v.ambient_color),
            Some(VertexColor::new(90, 10, 10))
        );
        assert!(config.find_variant(TimeIndex::Day).is_none());
    }

    #[test]
    fn test_unknown_extension_is_rejected() {
        let result = SceneConfig::load_from_file("scene.json");
        assert!(matches!(result, Err(ConfigError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_first_matching_variant_wins() {
        let config = SceneConfig::default()
            .with_variant(SceneVariant::new(TimeIndex::Day, VertexColor::splat(10)))
            .with_variant(SceneVariant::new(TimeIndex::Day, VertexColor::splat(20)));

        assert_eq!(
            config.find_variant(TimeIndex::Day).map(|v| v.ambient_color),
            Some(VertexColor::splat(10))
        );
    }

    #[test]
    fn test_zero_frame_interval_is_invalid() {
        let config = SceneConfig::default().with_frame_interval(0);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "frame_interval_between_updates", .. })
        ));
    }

    #[test]
    fn test_negative_move_distance_names_its_field() {
        let mut config = SceneConfig::default();
        config.min_move_distance = -1.0;

        let error = config.validate().unwrap_err();

        assert!(matches!(error, ConfigError::Invalid { field: "min_move_distance", .. }));
        assert_eq!(error.to_string(), "Invalid `min_move_distance`: must be a non-negative number, got -1");
    }

    #[test]
    fn test_nan_fade_decay_is_invalid() {
        let mut config = SceneConfig::default();
        config.fade_decay_per_second = f32::NAN;

        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "fade_decay_per_second", .. })
        ));
    }

    #[test]
    fn test_round_trip_through_file() {
        let path = std::env::temp_dir().join("vertex_lighting_scene_config_test.ron");
        let path = path.to_string_lossy().into_owned();
        let config = SceneConfig::default()
            .with_variant(SceneVariant::new(TimeIndex::Night, VertexColor::new(1, 2, 3)).with_lightmaps(["a"]));

        config.save_to_file(&path).unwrap();
        let loaded = SceneConfig::load_from_file(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(loaded, config);
    }
}
