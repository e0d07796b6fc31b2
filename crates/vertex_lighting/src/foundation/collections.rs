//! Handle types for the session arenas
//!
//! Every light, lit object and variant-dependent object known to a session
//! lives in a slot map. Owners keep the key; the key stays a plain `Copy`
//! value after the session is released and simply stops resolving.

pub use slotmap::SlotMap;

slotmap::new_key_type! {
    /// Stable identity of a vertex light inside a session
    pub struct LightKey;

    /// Stable identity of a lit object inside a session
    pub struct LitObjectKey;

    /// Stable identity of a variant-dependent object inside a session
    pub struct DependentObjectKey;
}

/// Handle-based map using slot map for stable references
pub type HandleMap<K, T> = SlotMap<K, T>;
