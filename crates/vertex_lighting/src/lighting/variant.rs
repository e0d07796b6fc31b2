//! Lighting variant switching
//!
//! A scene is baked for one or more variants (day, night, ...). Selecting a
//! variant sets the ambient colour every lit object starts from and decides
//! which variant-dependent objects exist: a torch that is only lit at night
//! is deactivated during the day.

use super::error::ConfigurationError;
use crate::config::{SceneConfig, TimeIndex};
use crate::foundation::collections::{DependentObjectKey, HandleMap};
use crate::foundation::color::VertexColor;

/// Scene object that only exists under some lighting variants
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantDependentObject {
    supported_times: Vec<TimeIndex>,
    active: bool,
}

impl VariantDependentObject {
    /// Object that exists under the given variants
    pub fn new(supported_times: impl Into<Vec<TimeIndex>>) -> Self {
        Self {
            supported_times: supported_times.into(),
            active: true,
        }
    }

    /// Variants the object exists under
    pub fn supported_times(&self) -> &[TimeIndex] {
        &self.supported_times
    }

    /// Whether the host should keep the object active
    pub fn is_active(&self) -> bool {
        self.active
    }

    fn apply(&mut self, time: TimeIndex) {
        self.active = self.supported_times.contains(&time);
    }
}

/// Summary of a completed variant switch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantChange {
    /// Variant now active
    pub time: TimeIndex,
    /// Ambient colour now used as the paint base
    pub ambient_color: VertexColor,
    /// Lightmaps the host should bind for the variant
    pub lightmap_paths: Vec<String>,
    /// Dependent objects whose activation was re-evaluated
    pub dependents_checked: usize,
    /// Lights admitted from the pending queue
    pub admitted_lights: usize,
    /// Lit objects admitted from the pending queue
    pub admitted_lit_objects: usize,
}

/// Active variant and the objects that depend on it
#[derive(Debug, Clone, Default)]
pub struct VariantSwitch {
    current: Option<TimeIndex>,
    ambient: VertexColor,
    dependents: HandleMap<DependentObjectKey, VariantDependentObject>,
    pending: Vec<DependentObjectKey>,
    tracked: Vec<DependentObjectKey>,
}

impl VariantSwitch {
    /// Create a switch with no active variant
    pub fn new() -> Self {
        Self::default()
    }

    /// Active variant, if any
    pub fn current(&self) -> Option<TimeIndex> {
        self.current
    }

    /// Ambient colour of the active variant; black before any switch
    pub fn ambient(&self) -> VertexColor {
        self.ambient
    }

    /// Track a dependent object
    ///
    /// Objects without supported times are kept but never toggled. Before
    /// any variant is active the object waits on a stack; afterwards it is
    /// checked immediately.
    pub fn register_dependent(&mut self, object: VariantDependentObject) -> DependentObjectKey {
        let checks = !object.supported_times.is_empty();
        let key = self.dependents.insert(object);
        if !checks {
            log::debug!("Dependent object {:?} supports no variants; ignoring", key);
            return key;
        }

        match self.current {
            None => self.pending.push(key),
            Some(time) => {
                self.dependents[key].apply(time);
                self.tracked.push(key);
            }
        }
        key
    }

    /// Stop tracking a dependent object
    pub fn remove_dependent(&mut self, key: DependentObjectKey) -> Option<VariantDependentObject> {
        self.pending.retain(|pending| *pending != key);
        self.tracked.retain(|tracked| *tracked != key);
        self.dependents.remove(key)
    }

    /// Look up a dependent object
    pub fn dependent(&self, key: DependentObjectKey) -> Option<&VariantDependentObject> {
        self.dependents.get(key)
    }

    /// Number of dependent objects waiting for the first variant
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Select the variant for `time` and re-evaluate dependent objects
    ///
    /// Nothing changes when no variant matches.
    pub fn switch(&mut self, config: &SceneConfig, time: TimeIndex) -> Result<VariantChange, ConfigurationError> {
        let variant = config
            .find_variant(time)
            .ok_or(ConfigurationError::UnknownVariant(time))?;

        self.current = Some(time);
        self.ambient = variant.ambient_color;

        while let Some(key) = self.pending.pop() {
            self.tracked.push(key);
        }
        for key in &self.tracked {
            if let Some(object) = self.dependents.get_mut(*key) {
                object.apply(time);
            }
        }

        Ok(VariantChange {
            time,
            ambient_color: variant.ambient_color,
            lightmap_paths: variant.lightmap_paths.clone(),
            dependents_checked: self.tracked.len(),
            admitted_lights: 0,
            admitted_lit_objects: 0,
        })
    }
}
