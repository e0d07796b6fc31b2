//! Lighting session
//!
//! The session owns every piece of vertex lighting state for one scene:
//! the arenas holding lights, lit objects and variant-dependent objects, the
//! live registries, the update scheduler and the active variant. Owners add
//! their objects, keep the returned keys, and register/unregister them as
//! their scene objects are enabled and disabled.
//!
//! # Admission
//!
//! Until a variant has been selected the session is *unconfigured*: there is
//! no ambient colour to paint with, so registrations are queued. The first
//! successful [`LightingSession::set_variant`] admits everything that was
//! queued and every later registration goes live immediately.
//!
//! # Teardown
//!
//! [`LightingSession::release`] drops all state. Keys held by owners stop
//! resolving; unregistering them afterwards is a silent no-op, which lets
//! owners that are destroyed after the scene was unloaded clean up normally.
//!
//! ```rust
//! use vertex_lighting::prelude::*;
//!
//! let config = SceneConfig::default()
//!     .with_variant(SceneVariant::new(TimeIndex::Day, VertexColor::splat(120)));
//! let mut session = LightingSession::with_config(config).unwrap();
//!
//! let lamp = session
//!     .add_light(VertexLight::new(Vec3::new(0.0, 2.0, 0.0), VertexColor::new(255, 200, 120), 6.0))
//!     .unwrap();
//! session.register_light(lamp);
//! session.set_variant(TimeIndex::Day).unwrap();
//!
//! session.tick(1.0 / 60.0);
//! session.release();
//! session.unregister_light(lamp);
//! ```

use std::sync::{Arc, Mutex};

use super::blend::{BlendParams, PaintOutcome};
use super::error::{ConfigurationError, LightingError, LightingResult};
use super::light::{LightSource, VertexLight};
use super::lit_object::{LitObject, LitObjectFlags};
use super::registry::{LightRegistry, LitObjectRegistry};
use super::scheduler::{SchedulerSettings, TickReport, UpdateScheduler};
use super::variant::{VariantChange, VariantDependentObject, VariantSwitch};
use crate::config::{SceneConfig, TimeIndex};
use crate::foundation::collections::{DependentObjectKey, HandleMap, LightKey, LitObjectKey};
use crate::foundation::color::VertexColor;
use crate::foundation::math::Vec3;
use crate::mesh::MeshNode;

/// Session shared between threads; the whole session is one lock domain
pub type SharedLightingSession = Arc<Mutex<LightingSession>>;

/// What a register call did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterOutcome {
    /// Entry is now live
    Live,
    /// No variant is active yet; the entry is queued
    Deferred,
    /// Entry was already registered; nothing changed
    AlreadyRegistered,
    /// Key does not name an entry in this session
    Unknown,
    /// Session has been released
    Released,
}

/// Registration gate; queues only exist while no variant is active
#[derive(Debug)]
enum Admission {
    Unconfigured {
        pending_lights: Vec<LightKey>,
        pending_lit_objects: Vec<LitObjectKey>,
    },
    Configured,
}

impl Default for Admission {
    fn default() -> Self {
        Self::Unconfigured {
            pending_lights: Vec::with_capacity(50),
            pending_lit_objects: Vec::with_capacity(50),
        }
    }
}

#[derive(Debug, Default)]
struct SessionState {
    config: Option<SceneConfig>,
    proximity_level: u8,
    admission: Admission,
    variants: VariantSwitch,
    scheduler: UpdateScheduler,
    lights: HandleMap<LightKey, VertexLight>,
    lit_objects: HandleMap<LitObjectKey, LitObject>,
    light_registry: LightRegistry,
    lit_registry: LitObjectRegistry,
    diagnostics: Vec<LightingError>,
}

impl SessionState {
    fn new() -> Self {
        Self {
            proximity_level: crate::config::scene::DEFAULT_PROXIMITY_LEVEL,
            ..Self::default()
        }
    }

    fn blend_params(&self) -> BlendParams {
        BlendParams {
            ambient: self.variants.ambient(),
            proximity_level: self.proximity_level,
        }
    }

    fn report(&mut self, error: LightingError) -> LightingError {
        log::error!("Vertex lighting: {}", error);
        self.diagnostics.push(error.clone());
        error
    }

    fn admit_light(&mut self, key: LightKey) {
        let Some(light) = self.lights.get(key) else {
            return;
        };
        if self.light_registry.insert(light.cache(key)) {
            log::debug!("Light {:?} live (radius {}, {} lights)", key, light.radius, self.light_registry.len());
        }
    }

    fn admit_lit_object(&mut self, key: LitObjectKey) {
        if !self.lit_objects.contains_key(key) || !self.lit_registry.insert(key) {
            return;
        }
        log::debug!("Lit object {:?} live ({} objects)", key, self.lit_registry.len());
        self.force_paint(key);
    }

    fn force_paint(&mut self, key: LitObjectKey) -> PaintOutcome {
        if matches!(self.admission, Admission::Unconfigured { .. }) {
            return PaintOutcome::Deferred;
        }
        let params = self.blend_params();
        let Some(object) = self.lit_objects.get_mut(key) else {
            return PaintOutcome::Deferred;
        };
        self.scheduler
            .force_paint(object, self.light_registry.sources(), &params, &mut self.diagnostics)
    }
}

/// Vertex lighting state for one scene
#[derive(Debug)]
pub struct LightingSession {
    state: Option<SessionState>,
}

impl LightingSession {
    /// Create an unconfigured session
    pub fn new() -> Self {
        Self {
            state: Some(SessionState::new()),
        }
    }

    /// Create a session and install `config`
    pub fn with_config(config: SceneConfig) -> LightingResult<Self> {
        let mut session = Self::new();
        session.setup(config)?;
        Ok(session)
    }

    /// Wrap the session in a mutex for multi-threaded hosts
    pub fn into_shared(self) -> SharedLightingSession {
        Arc::new(Mutex::new(self))
    }

    /// Install or replace the scene configuration
    ///
    /// Registrations made so far are kept. A released session is started
    /// afresh.
    pub fn setup(&mut self, config: SceneConfig) -> LightingResult<()> {
        let state = self.state.get_or_insert_with(SessionState::new);
        if let Err(error) = config.validate() {
            return Err(state.report(error.into()));
        }

        state.scheduler.set_settings(SchedulerSettings::from_config(&config));
        state.proximity_level = config.proximity_level;
        log::info!(
            "Vertex lighting set up: {} variants, repaint every {} frames",
            config.variants.len(),
            config.frame_interval_between_updates
        );
        state.config = Some(config);
        Ok(())
    }

    /// Tear the session down
    ///
    /// Safe to call more than once.
    pub fn release(&mut self) {
        if let Some(state) = self.state.take() {
            log::info!(
                "Vertex lighting released ({} lights, {} lit objects live)",
                state.light_registry.len(),
                state.lit_registry.len()
            );
        }
    }

    /// Whether [`LightingSession::release`] has been called
    pub fn is_released(&self) -> bool {
        self.state.is_none()
    }

    /// Select the active lighting variant
    ///
    /// Admits every queued light and lit object on the first call. Calling
    /// again switches variant without re-registering anything.
    pub fn set_variant(&mut self, time: TimeIndex) -> LightingResult<VariantChange> {
        let state = self.state.as_mut().ok_or(LightingError::Released)?;

        let Some(config) = state.config.as_ref() else {
            return Err(state.report(ConfigurationError::NoConfiguration.into()));
        };
        let mut change = match state.variants.switch(config, time) {
            Ok(change) => change,
            Err(error) => return Err(state.report(error.into())),
        };

        if let Admission::Unconfigured {
            pending_lights,
            pending_lit_objects,
        } = std::mem::replace(&mut state.admission, Admission::Configured)
        {
            change.admitted_lights = pending_lights.len();
            change.admitted_lit_objects = pending_lit_objects.len();
            for key in pending_lights {
                state.admit_light(key);
            }
            for key in pending_lit_objects {
                state.admit_lit_object(key);
            }
        }

        state.scheduler.enable();
        log::info!(
            "Lighting variant {} active: ambient {:?}, {} lightmaps, admitted {} lights and {} lit objects",
            change.time,
            change.ambient_color,
            change.lightmap_paths.len(),
            change.admitted_lights,
            change.admitted_lit_objects
        );
        Ok(change)
    }

    /// Advance the scheduler one frame
    pub fn tick(&mut self, delta_time: f32) -> TickReport {
        let Some(state) = self.state.as_mut() else {
            return TickReport::default();
        };
        let params = state.blend_params();
        state.scheduler.tick(
            delta_time,
            &state.lit_registry,
            &mut state.lit_objects,
            state.light_registry.sources(),
            &params,
            &mut state.diagnostics,
        )
    }

    // Lights

    /// Hand a light to the session; it is not registered yet
    pub fn add_light(&mut self, light: VertexLight) -> LightingResult<LightKey> {
        let state = self.state.as_mut().ok_or(LightingError::Released)?;
        Ok(state.lights.insert(light))
    }

    /// Register a light for blending
    pub fn register_light(&mut self, key: LightKey) -> RegisterOutcome {
        let Some(state) = self.state.as_mut() else {
            return RegisterOutcome::Released;
        };
        let Some(light) = state.lights.get_mut(key) else {
            return RegisterOutcome::Unknown;
        };
        if light.is_registered() {
            return RegisterOutcome::AlreadyRegistered;
        }
        light.set_registered(true);

        match &mut state.admission {
            Admission::Unconfigured { pending_lights, .. } => {
                pending_lights.push(key);
                log::debug!("Light {:?} queued until a variant is active", key);
                RegisterOutcome::Deferred
            }
            Admission::Configured => {
                state.admit_light(key);
                RegisterOutcome::Live
            }
        }
    }

    /// Stop blending a light; no-op if it is not registered or the session is released
    pub fn unregister_light(&mut self, key: LightKey) {
        let Some(state) = self.state.as_mut() else {
            return;
        };
        let Some(light) = state.lights.get_mut(key) else {
            return;
        };
        if !light.is_registered() {
            return;
        }
        light.set_registered(false);

        if let Admission::Unconfigured { pending_lights, .. } = &mut state.admission {
            pending_lights.retain(|pending| *pending != key);
        }
        if state.light_registry.remove(key).is_some() {
            log::debug!("Light {:?} unregistered ({} lights)", key, state.light_registry.len());
        }
    }

    /// Unregister a light and take it back from the session
    pub fn remove_light(&mut self, key: LightKey) -> Option<VertexLight> {
        self.unregister_light(key);
        self.state.as_mut()?.lights.remove(key)
    }

    /// Look up a light
    pub fn light(&self, key: LightKey) -> Option<&VertexLight> {
        self.state.as_ref()?.lights.get(key)
    }

    /// Mutable access to a light
    ///
    /// Registered lights keep the values cached at registration; changes
    /// take effect the next time the light is registered.
    pub fn light_mut(&mut self, key: LightKey) -> Option<&mut VertexLight> {
        self.state.as_mut()?.lights.get_mut(key)
    }

    /// Cached parameters of every live light
    pub fn live_lights(&self) -> &[LightSource] {
        match &self.state {
            Some(state) => state.light_registry.sources(),
            None => &[],
        }
    }

    /// Whether the light is live
    pub fn is_light_live(&self, key: LightKey) -> bool {
        self.state
            .as_ref()
            .is_some_and(|state| state.light_registry.contains(key))
    }

    // Lit objects

    /// Hand a lit object to the session; it is not registered yet
    pub fn add_lit_object(&mut self, object: LitObject) -> LightingResult<LitObjectKey> {
        let state = self.state.as_mut().ok_or(LightingError::Released)?;
        Ok(state.lit_objects.insert(object))
    }

    /// Set up a lit object's colour targets from its meshes
    ///
    /// Failures are also recorded as diagnostics.
    pub fn setup_lit_object(&mut self, key: LitObjectKey, meshes: &[MeshNode], forced: bool) -> LightingResult<()> {
        let state = self.state.as_mut().ok_or(LightingError::Released)?;
        let object = state.lit_objects.get_mut(key).ok_or(LightingError::UnknownLitObject)?;
        match object.setup(meshes, forced) {
            Ok(()) => Ok(()),
            Err(error) => Err(state.report(error)),
        }
    }

    /// Register a lit object for painting
    ///
    /// A live admission paints the object straight away.
    pub fn register_lit_object(&mut self, key: LitObjectKey) -> RegisterOutcome {
        let Some(state) = self.state.as_mut() else {
            return RegisterOutcome::Released;
        };
        let Some(object) = state.lit_objects.get_mut(key) else {
            return RegisterOutcome::Unknown;
        };
        if object.is_registered() {
            return RegisterOutcome::AlreadyRegistered;
        }
        object.set_registered(true);

        // Fixed-mesh objects must arrive baked; dynamic ones may still be set up later
        if object.targets().is_empty() {
            if object.flags().contains(LitObjectFlags::CHECK_FOR_DYNAMIC_MESHES) {
                log::debug!("Lit object '{}' registered before setup; it has nothing to paint", object.name());
            } else {
                let name = object.name().to_string();
                state.report(ConfigurationError::NotBaked(name).into());
            }
        }

        match &mut state.admission {
            Admission::Unconfigured {
                pending_lit_objects, ..
            } => {
                pending_lit_objects.push(key);
                log::debug!("Lit object {:?} queued until a variant is active", key);
                RegisterOutcome::Deferred
            }
            Admission::Configured => {
                state.admit_lit_object(key);
                RegisterOutcome::Live
            }
        }
    }

    /// Stop painting a lit object; no-op if it is not registered or the session is released
    pub fn unregister_lit_object(&mut self, key: LitObjectKey) {
        let Some(state) = self.state.as_mut() else {
            return;
        };
        let Some(object) = state.lit_objects.get_mut(key) else {
            return;
        };
        if !object.is_registered() {
            return;
        }
        object.set_registered(false);

        if let Admission::Unconfigured {
            pending_lit_objects, ..
        } = &mut state.admission
        {
            pending_lit_objects.retain(|pending| *pending != key);
        }
        if state.lit_registry.remove(key) {
            log::debug!("Lit object {:?} unregistered ({} objects)", key, state.lit_registry.len());
        }
    }

    /// Unregister a lit object and take it back from the session
    pub fn remove_lit_object(&mut self, key: LitObjectKey) -> Option<LitObject> {
        self.unregister_lit_object(key);
        self.state.as_mut()?.lit_objects.remove(key)
    }

    /// Look up a lit object
    pub fn lit_object(&self, key: LitObjectKey) -> Option<&LitObject> {
        self.state.as_ref()?.lit_objects.get(key)
    }

    /// Whether the lit object is live
    pub fn is_lit_object_live(&self, key: LitObjectKey) -> bool {
        self.state
            .as_ref()
            .is_some_and(|state| state.lit_registry.contains(key))
    }

    /// Report the object's current world position
    pub fn set_position(&mut self, key: LitObjectKey, position: Vec3) -> LightingResult<()> {
        self.lit_object_mut(key)?.position = position;
        Ok(())
    }

    /// Pause or resume repaint evaluation; the fade keeps decaying while paused
    pub fn set_paused(&mut self, key: LitObjectKey, paused: bool) -> LightingResult<()> {
        self.lit_object_mut(key)?.is_paused = paused;
        Ok(())
    }

    /// Record the object's visibility as seen by the host
    pub fn set_visible(&mut self, key: LitObjectKey, visible: bool) -> LightingResult<()> {
        self.lit_object_mut(key)?.is_visible = visible;
        Ok(())
    }

    /// Repaint an object right away, ignoring schedule and suppression
    pub fn force_paint(&mut self, key: LitObjectKey) -> LightingResult<PaintOutcome> {
        let state = self.state.as_mut().ok_or(LightingError::Released)?;
        if !state.lit_objects.contains_key(key) {
            return Err(LightingError::UnknownLitObject);
        }
        Ok(state.force_paint(key))
    }

    /// Paint the object from `color` instead of the ambient colour
    ///
    /// Used for abnormal effects such as poison; lights and fade still apply.
    pub fn set_abnormal_effect_color(&mut self, key: LitObjectKey, color: VertexColor) -> LightingResult<PaintOutcome> {
        self.lit_object_mut(key)?.abnormal_color = Some(color);
        self.force_paint(key)
    }

    /// Return the object to painting from the ambient colour
    pub fn clear_abnormal_effect_color(&mut self, key: LitObjectKey) -> LightingResult<PaintOutcome> {
        self.lit_object_mut(key)?.abnormal_color = None;
        self.force_paint(key)
    }

    /// Flash the object, unless a strong flash is already in progress
    pub fn trigger_damage_effect(&mut self, key: LitObjectKey) -> LightingResult<bool> {
        Ok(self.lit_object_mut(key)?.trigger_damage_effect())
    }

    fn lit_object_mut(&mut self, key: LitObjectKey) -> LightingResult<&mut LitObject> {
        self.state
            .as_mut()
            .ok_or(LightingError::Released)?
            .lit_objects
            .get_mut(key)
            .ok_or(LightingError::UnknownLitObject)
    }

    // Variant-dependent objects

    /// Track an object whose existence depends on the active variant
    pub fn register_variant_dependent_object(
        &mut self,
        object: VariantDependentObject,
    ) -> LightingResult<DependentObjectKey> {
        let state = self.state.as_mut().ok_or(LightingError::Released)?;
        Ok(state.variants.register_dependent(object))
    }

    /// Stop tracking a variant-dependent object
    pub fn remove_variant_dependent_object(&mut self, key: DependentObjectKey) -> Option<VariantDependentObject> {
        self.state.as_mut()?.variants.remove_dependent(key)
    }

    /// Look up a variant-dependent object
    pub fn variant_dependent_object(&self, key: DependentObjectKey) -> Option<&VariantDependentObject> {
        self.state.as_ref()?.variants.dependent(key)
    }

    // Session state

    /// Installed scene configuration
    pub fn config(&self) -> Option<&SceneConfig> {
        self.state.as_ref()?.config.as_ref()
    }

    /// Active variant
    pub fn current_variant(&self) -> Option<TimeIndex> {
        self.state.as_ref()?.variants.current()
    }

    /// Ambient colour of the active variant
    pub fn ambient_color(&self) -> Option<VertexColor> {
        let state = self.state.as_ref()?;
        state.variants.current().map(|_| state.variants.ambient())
    }

    /// Whether a variant has been selected and registrations go live
    pub fn is_configured(&self) -> bool {
        self.state
            .as_ref()
            .is_some_and(|state| matches!(state.admission, Admission::Configured))
    }

    /// Whether ticks do any work
    pub fn should_update(&self) -> bool {
        self.state
            .as_ref()
            .is_some_and(|state| state.scheduler.should_update())
    }

    /// Current frame counter
    pub fn frame(&self) -> u64 {
        self.state.as_ref().map_or(0, |state| state.scheduler.frame())
    }

    /// Number of live lights
    pub fn light_count(&self) -> usize {
        self.state.as_ref().map_or(0, |state| state.light_registry.len())
    }

    /// Number of live lit objects
    pub fn lit_object_count(&self) -> usize {
        self.state.as_ref().map_or(0, |state| state.lit_registry.len())
    }

    /// Lights queued until the first variant is selected
    pub fn pending_light_count(&self) -> usize {
        match self.state.as_ref().map(|state| &state.admission) {
            Some(Admission::Unconfigured { pending_lights, .. }) => pending_lights.len(),
            _ => 0,
        }
    }

    /// Lit objects queued until the first variant is selected
    pub fn pending_lit_object_count(&self) -> usize {
        match self.state.as_ref().map(|state| &state.admission) {
            Some(Admission::Unconfigured {
                pending_lit_objects, ..
            }) => pending_lit_objects.len(),
            _ => 0,
        }
    }

    /// Drain the errors reported since the last call
    pub fn take_diagnostics(&mut self) -> Vec<LightingError> {
        self.state
            .as_mut()
            .map(|state| std::mem::take(&mut state.diagnostics))
            .unwrap_or_default()
    }
}

impl Default for LightingSession {
    fn default() -> Self {
        Self::new()
    }
}
