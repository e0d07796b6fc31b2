//! Vertex lighting
//!
//! Paints per-vertex colours onto dynamic objects from a set of static point
//! lights and the ambient colour of the active lighting variant.

pub mod blend;
pub mod error;
pub mod light;
pub mod lit_object;
pub mod registry;
pub mod scheduler;
pub mod session;
pub mod variant;

#[cfg(test)]
mod tests;

pub use blend::{BlendParams, PaintMode, PaintOutcome};
pub use error::{ConfigurationError, LightingError, LightingResult};
pub use light::{LightSource, VertexLight};
pub use lit_object::{LitObject, LitObjectFlags};
pub use scheduler::{SchedulerSettings, TickReport, UpdateScheduler};
pub use session::{LightingSession, RegisterOutcome, SharedLightingSession};
pub use variant::{VariantChange, VariantDependentObject, VariantSwitch};
