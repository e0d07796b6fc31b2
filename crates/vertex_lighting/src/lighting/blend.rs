//! Colour blending
//!
//! Vertex colour for an object is the base colour (scene ambient, or the
//! object's abnormal-effect colour) with every light in range lerped on top
//! of it, weighted by how close the object is to the light's centre, and
//! finally scaled by the object's fade multiplier.

use super::error::LightingError;
use super::light::LightSource;
use super::lit_object::{LitObject, LitObjectFlags, FADE_FLOOR};
use crate::foundation::color::VertexColor;
use crate::foundation::math::{distance_squared, Vec3};

/// Whether a paint may be suppressed when it would change little
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaintMode {
    /// Regular scheduled repaint, subject to colour proximity suppression
    Scheduled,
    /// Unconditional repaint
    Forced,
}

/// Result of a paint request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaintOutcome {
    /// Colour was written to the object's meshes
    Painted(VertexColor),
    /// Colour was too close to the previous paint to be worth writing
    Suppressed,
    /// No variant is active yet; the object is painted once it is admitted
    Deferred,
}

/// Scene-wide inputs to a paint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlendParams {
    /// Ambient colour of the active variant
    pub ambient: VertexColor,
    /// Per-channel delta below which a repaint is suppressed
    pub proximity_level: u8,
}

/// Blend every light in range over `base`
///
/// Lights are applied in order, each one lerping the running colour towards
/// its own. Lights strictly further away than their radius are skipped.
pub fn blend_lights<'a, I>(base: VertexColor, lights: I, position: &Vec3) -> VertexColor
where
    I: IntoIterator<Item = &'a LightSource>,
{
    lights.into_iter().fold(base, |color, light| {
        match light.weight_at(distance_squared(position, &light.position)) {
            Some(weight) => color.lerp(light.color, weight),
            None => color,
        }
    })
}

/// Full colour computation: blend lights, then apply the fade multiplier
pub fn compute_color<'a, I>(base: VertexColor, lights: I, position: &Vec3, fade_multiplier: f32) -> VertexColor
where
    I: IntoIterator<Item = &'a LightSource>,
{
    blend_lights(base, lights, position).scale(fade_multiplier)
}

/// Whether a freshly blended colour is indistinguishable from the last paint
///
/// Objects that are still fading always repaint.
pub fn is_imperceptible(color: VertexColor, last_color: VertexColor, proximity_level: u8, fade_multiplier: f32) -> bool {
    color.within(last_color, proximity_level) && fade_multiplier <= FADE_FLOOR
}

/// Paint `object` with the current lights
///
/// Upload failures for individual meshes are pushed onto `diagnostics`; the
/// remaining meshes are still painted.
pub fn paint(
    object: &mut LitObject,
    lights: &[LightSource],
    params: &BlendParams,
    mode: PaintMode,
    diagnostics: &mut Vec<LightingError>,
) -> PaintOutcome {
    let base = object.abnormal_color.unwrap_or(params.ambient);
    let color = blend_lights(base, lights, &object.position);

    let may_suppress = mode == PaintMode::Scheduled
        && !object.flags().contains(LitObjectFlags::IGNORE_COLOR_PROXIMITY_CHECKS);
    if may_suppress && is_imperceptible(color, object.last_color, params.proximity_level, object.fade_multiplier) {
        return PaintOutcome::Suppressed;
    }

    let color = color.scale(object.fade_multiplier);
    let errors = object.write_color(color);
    for error in errors {
        log::error!("Painting '{}' failed for one mesh: {}", object.name(), error);
        diagnostics.push(error);
    }

    PaintOutcome::Painted(color)
}
