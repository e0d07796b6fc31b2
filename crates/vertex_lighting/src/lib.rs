//! # Vertex Lighting
//!
//! Cheap dynamic lighting for moving objects in scenes lit with baked
//! lightmaps. Instead of running per-pixel lights, every lit object gets a
//! single colour blended from the scene's ambient colour and the static
//! point lights around it, written into the vertex colours of its meshes.
//!
//! ## Features
//!
//! - **Lighting variants**: Day, night and elite presets, switchable at runtime
//! - **Staggered repaints**: Each object is re-evaluated every N frames
//! - **Change suppression**: Steady objects and imperceptible changes skip the upload
//! - **Damage flash**: A fade multiplier that decays back to its resting value
//! - **File configuration**: Scene tunables in TOML or RON
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use vertex_lighting::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = SceneConfig::load_from_file("assets/scene.toml")?;
//!     let mut session = LightingSession::with_config(config)?;
//!
//!     let body = VertexMesh::new("body", 24).shared();
//!     let mut hero = LitObject::new("hero", LitObjectFlags::HAS_DAMAGE_EFFECT);
//!     hero.bake(&[MeshNode::lit(body)])?;
//!     let hero = session.add_lit_object(hero)?;
//!     session.register_lit_object(hero);
//!
//!     session.set_variant(TimeIndex::Day)?;
//!     loop {
//!         session.set_position(hero, Vec3::new(1.0, 0.0, 3.0))?;
//!         session.tick(1.0 / 60.0);
//!     }
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod foundation;
pub mod config;
pub mod mesh;
pub mod lighting;

/// Common imports for crate users
pub mod prelude {
    pub use crate::{
        foundation::{
            math::Vec3,
            color::VertexColor,
            collections::{LightKey, LitObjectKey, DependentObjectKey},
        },
        config::{Config, ConfigError, SceneConfig, SceneVariant, TimeIndex},
        mesh::{MeshNode, SharedMesh, VertexMesh},
        lighting::{
            LightingError, LightingSession, LitObject, LitObjectFlags, PaintOutcome,
            RegisterOutcome, SharedLightingSession, TickReport, VariantDependentObject, VertexLight,
        },
    };
}
