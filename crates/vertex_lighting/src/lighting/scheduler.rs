//! Update scheduler
//!
//! Repainting every object every frame is what vertex lighting is meant to
//! avoid. Each live object is evaluated at most once every
//! `frame_interval` frames, counted from its own last evaluation, so objects
//! registered on different frames spread naturally across frames. An
//! evaluated object that has settled (fade finished) and has not moved far
//! enough since its last paint is left alone.

use super::blend::{self, BlendParams, PaintMode, PaintOutcome};
use super::error::LightingError;
use super::light::LightSource;
use super::lit_object::{LitObject, LitObjectFlags, FADE_FLOOR};
use super::registry::LitObjectRegistry;
use crate::config::SceneConfig;
use crate::foundation::collections::{HandleMap, LitObjectKey};

/// Frames a forced paint postpones the object's next scheduled evaluation
pub const FORCE_PAINT_LOOKAHEAD: u64 = 10;

/// Scheduler tunables
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SchedulerSettings {
    /// Frames between two evaluations of the same object, at least 1
    pub frame_interval: u64,
    /// Squared distance a settled object must move before it is repainted
    pub min_move_distance_sqr: f32,
    /// Fade multiplier units removed per second
    pub fade_decay_per_second: f32,
}

impl SchedulerSettings {
    /// Derive scheduler settings from a scene configuration
    pub fn from_config(config: &SceneConfig) -> Self {
        Self {
            frame_interval: u64::from(config.frame_interval_between_updates.max(1)),
            min_move_distance_sqr: config.min_move_distance_sqr(),
            fade_decay_per_second: config.fade_decay_per_second,
        }
    }
}

impl Default for SchedulerSettings {
    fn default() -> Self {
        Self::from_config(&SceneConfig::default())
    }
}

/// Per-tick statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Frame the tick ran on
    pub frame: u64,
    /// Objects whose scheduled frame had come up
    pub evaluated: usize,
    /// Objects repainted
    pub painted: usize,
    /// Objects whose new colour was too close to the old one
    pub suppressed: usize,
    /// Settled objects that had not moved enough
    pub steady: usize,
    /// Paused objects
    pub paused: usize,
}

/// Drives repaint scheduling for all live lit objects
#[derive(Debug, Clone)]
pub struct UpdateScheduler {
    frame: u64,
    settings: SchedulerSettings,
    should_update: bool,
}

impl UpdateScheduler {
    /// Create a scheduler that stays idle until [`UpdateScheduler::enable`]
    pub fn new(settings: SchedulerSettings) -> Self {
        Self {
            frame: 0,
            settings,
            should_update: false,
        }
    }

    /// Current frame counter
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Whether ticks do any work
    pub fn should_update(&self) -> bool {
        self.should_update
    }

    /// Start processing ticks
    pub fn enable(&mut self) {
        self.should_update = true;
    }

    /// Active tunables
    pub fn settings(&self) -> &SchedulerSettings {
        &self.settings
    }

    /// Replace the tunables, keeping the frame counter
    pub fn set_settings(&mut self, settings: SchedulerSettings) {
        self.settings = settings;
    }

    /// Run one tick over every live object
    pub fn tick(
        &mut self,
        delta_time: f32,
        registry: &LitObjectRegistry,
        objects: &mut HandleMap<LitObjectKey, LitObject>,
        lights: &[LightSource],
        params: &BlendParams,
        diagnostics: &mut Vec<LightingError>,
    ) -> TickReport {
        let mut report = TickReport {
            frame: self.frame,
            ..TickReport::default()
        };
        if !self.should_update {
            return report;
        }

        for &key in registry.keys() {
            let Some(object) = objects.get_mut(key) else {
                log::warn!("Live lit object {:?} is missing from the arena", key);
                continue;
            };

            object.decay_fade(delta_time, self.settings.fade_decay_per_second);

            if object.is_paused {
                report.paused += 1;
                continue;
            }

            if self.frame < object.frame_to_update {
                continue;
            }

            report.evaluated += 1;
            object.frame_to_update = self.frame + self.settings.frame_interval;

            if self.is_steady(object) {
                report.steady += 1;
                continue;
            }

            match blend::paint(object, lights, params, PaintMode::Scheduled, diagnostics) {
                PaintOutcome::Painted(_) => report.painted += 1,
                PaintOutcome::Suppressed => report.suppressed += 1,
                PaintOutcome::Deferred => {}
            }
            object.last_position = object.position;
        }

        log::trace!(
            "Tick {}: evaluated {}, painted {}, suppressed {}, steady {}, paused {}",
            report.frame,
            report.evaluated,
            report.painted,
            report.suppressed,
            report.steady,
            report.paused
        );

        self.frame += 1;
        report
    }

    /// Paint `object` immediately, bypassing every suppression rule
    pub fn force_paint(
        &self,
        object: &mut LitObject,
        lights: &[LightSource],
        params: &BlendParams,
        diagnostics: &mut Vec<LightingError>,
    ) -> PaintOutcome {
        object.frame_to_update = self.frame + FORCE_PAINT_LOOKAHEAD;
        blend::paint(object, lights, params, PaintMode::Forced, diagnostics)
    }

    fn is_steady(&self, object: &LitObject) -> bool {
        !object.flags().contains(LitObjectFlags::IGNORE_DISTANCE_CHECKS)
            && object.fade_multiplier <= FADE_FLOOR
            && object.moved_sqr_since_paint() < self.settings.min_move_distance_sqr
    }
}

impl Default for UpdateScheduler {
    fn default() -> Self {
        Self::new(SchedulerSettings::default())
    }
}
