//! Lit objects
//!
//! A lit object is anything whose meshes get painted by the session: static
//! props, pooled projectiles, player characters assembled from equipment
//! pieces. It carries its own scheduling state (next frame to update, last
//! painted colour and position) and the fade multiplier that drives the
//! damage flash.

use bitflags::bitflags;

use super::error::{ConfigurationError, LightingError};
use crate::foundation::color::VertexColor;
use crate::foundation::math::{distance_squared, Vec3};
use crate::mesh::{MeshColorTarget, MeshNode};

/// Resting value of the fade multiplier
pub const FADE_FLOOR: f32 = 0.2;

/// Value the fade multiplier starts from and jumps to on a damage flash
pub const FADE_CEILING: f32 = 1.0;

/// A damage flash only restarts once the previous one has faded below this
pub const DAMAGE_RETRIGGER_THRESHOLD: f32 = 0.3;

bitflags! {
    /// Per-object behaviour switches
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct LitObjectFlags: u8 {
        /// Repaint on schedule even if the object has not moved
        const IGNORE_DISTANCE_CHECKS = 1 << 0;
        /// Repaint even when the new colour is close to the previous one
        const IGNORE_COLOR_PROXIMITY_CHECKS = 1 << 1;
        /// Object flashes when it takes damage
        const HAS_DAMAGE_EFFECT = 1 << 2;
        /// Meshes are discovered at runtime instead of being baked
        const CHECK_FOR_DYNAMIC_MESHES = 1 << 3;
    }
}

/// An object painted by the vertex lighting session
#[derive(Debug, Clone)]
pub struct LitObject {
    name: String,
    flags: LitObjectFlags,
    ignored_meshes: Vec<String>,
    targets: Vec<MeshColorTarget>,
    is_setup: bool,
    is_registered: bool,
    pub(crate) is_paused: bool,
    pub(crate) is_visible: bool,
    pub(crate) abnormal_color: Option<VertexColor>,
    pub(crate) fade_multiplier: f32,
    pub(crate) last_color: VertexColor,
    pub(crate) position: Vec3,
    pub(crate) last_position: Vec3,
    pub(crate) last_updated_position: Vec3,
    pub(crate) frame_to_update: u64,
    paint_count: u64,
}

impl LitObject {
    /// Create an object that has not been set up yet
    pub fn new(name: impl Into<String>, flags: LitObjectFlags) -> Self {
        Self {
            name: name.into(),
            flags,
            ignored_meshes: Vec::new(),
            targets: Vec::new(),
            is_setup: false,
            is_registered: false,
            is_paused: false,
            is_visible: true,
            abnormal_color: None,
            fade_multiplier: FADE_CEILING,
            last_color: VertexColor::BLACK,
            position: Vec3::zeros(),
            last_position: Vec3::zeros(),
            last_updated_position: Vec3::zeros(),
            frame_to_update: 0,
            paint_count: 0,
        }
    }

    /// Exclude a mesh from painting by name
    pub fn with_ignored_mesh(mut self, mesh_name: impl Into<String>) -> Self {
        self.ignored_meshes.push(mesh_name.into());
        self
    }

    /// Place the object before it is first painted
    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    /// Bake colour targets ahead of time from the object's meshes
    ///
    /// Only objects with a fixed set of meshes can be baked.
    pub fn bake(&mut self, meshes: &[MeshNode]) -> Result<(), LightingError> {
        if self.flags.contains(LitObjectFlags::CHECK_FOR_DYNAMIC_MESHES) {
            return Err(ConfigurationError::CannotBakeDynamic(self.name.clone()).into());
        }

        self.targets = self.build_targets(meshes, false)?;
        self.is_setup = true;
        log::debug!("Baked lit object '{}' with {} mesh targets", self.name, self.targets.len());
        Ok(())
    }

    /// Build colour targets at runtime
    ///
    /// Objects that do not look for dynamic meshes must have been baked; for
    /// them this only verifies the bake unless `forced`. Forcing rebuilds the
    /// targets, which is what a model does after swapping equipment pieces.
    pub fn setup(&mut self, meshes: &[MeshNode], forced: bool) -> Result<(), LightingError> {
        if self.is_setup && !forced {
            return Ok(());
        }

        if !self.flags.contains(LitObjectFlags::CHECK_FOR_DYNAMIC_MESHES) && !forced {
            if self.targets.is_empty() {
                return Err(ConfigurationError::NotBaked(self.name.clone()).into());
            }
            return Ok(());
        }

        self.targets = self.build_targets(meshes, true)?;
        self.is_setup = true;
        log::debug!("Set up lit object '{}' with {} mesh targets", self.name, self.targets.len());
        Ok(())
    }

    fn build_targets(&self, meshes: &[MeshNode], skip_unlit: bool) -> Result<Vec<MeshColorTarget>, LightingError> {
        let mut targets = Vec::with_capacity(meshes.len());
        for node in meshes {
            if skip_unlit && node.unlit {
                continue;
            }
            let target = MeshColorTarget::for_mesh(&node.mesh)?;
            if self.ignored_meshes.iter().any(|name| name == target.mesh_name()) {
                continue;
            }
            targets.push(target);
        }
        Ok(targets)
    }

    /// Fill every colour target with `color` and record it as the last paint
    ///
    /// A target that fails to upload does not stop the others; its error is
    /// returned alongside the rest.
    pub(crate) fn write_color(&mut self, color: VertexColor) -> Vec<LightingError> {
        self.last_color = color;
        self.last_updated_position = self.position;
        self.paint_count += 1;

        self.targets
            .iter_mut()
            .filter_map(|target| target.fill(color).err())
            .collect()
    }

    /// Let the fade multiplier decay towards its resting value
    pub(crate) fn decay_fade(&mut self, delta_time: f32, decay_per_second: f32) {
        if self.fade_multiplier > FADE_FLOOR {
            self.fade_multiplier = (self.fade_multiplier - delta_time * decay_per_second).max(FADE_FLOOR);
        }
    }

    /// Start a damage flash unless one is already strongly in progress
    ///
    /// Returns whether the flash was (re)started.
    pub fn trigger_damage_effect(&mut self) -> bool {
        if !self.flags.contains(LitObjectFlags::HAS_DAMAGE_EFFECT) {
            return false;
        }
        if self.fade_multiplier < DAMAGE_RETRIGGER_THRESHOLD {
            self.fade_multiplier = FADE_CEILING;
            return true;
        }
        false
    }

    /// Whether the fade multiplier is still above its resting value
    pub fn is_fading(&self) -> bool {
        self.fade_multiplier > FADE_FLOOR
    }

    /// Squared distance moved since the last repaint
    pub fn moved_sqr_since_paint(&self) -> f32 {
        distance_squared(&self.position, &self.last_updated_position)
    }

    /// Object name used in diagnostics
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Behaviour flags
    pub fn flags(&self) -> LitObjectFlags {
        self.flags
    }

    /// Colour targets, one per painted mesh
    pub fn targets(&self) -> &[MeshColorTarget] {
        &self.targets
    }

    /// Whether colour targets have been built
    pub fn is_setup(&self) -> bool {
        self.is_setup
    }

    /// Whether the object is registered with its session (live or pending)
    pub fn is_registered(&self) -> bool {
        self.is_registered
    }

    pub(crate) fn set_registered(&mut self, registered: bool) {
        self.is_registered = registered;
    }

    /// Whether repaint evaluation is paused
    pub fn is_paused(&self) -> bool {
        self.is_paused
    }

    /// Visibility as last reported by the host
    pub fn is_visible(&self) -> bool {
        self.is_visible
    }

    /// Abnormal-effect override colour, if one is set
    pub fn abnormal_effect_color(&self) -> Option<VertexColor> {
        self.abnormal_color
    }

    /// Current fade multiplier, in `[0.2, 1.0]`
    pub fn fade_multiplier(&self) -> f32 {
        self.fade_multiplier
    }

    /// Colour written by the last paint
    pub fn last_color(&self) -> VertexColor {
        self.last_color
    }

    /// Current world position
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Position at the last scheduled evaluation that repainted the object
    pub fn last_position(&self) -> Vec3 {
        self.last_position
    }

    /// Position at the last paint
    pub fn last_updated_position(&self) -> Vec3 {
        self.last_updated_position
    }

    /// Frame at which the object is next due for evaluation
    pub fn frame_to_update(&self) -> u64 {
        self.frame_to_update
    }

    /// Number of times a colour has been written to the object
    pub fn paint_count(&self) -> u64 {
        self.paint_count
    }
}
