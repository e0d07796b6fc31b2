//! Session-level tests driving the public lighting API end to end

mod admission;

use crate::config::{SceneConfig, SceneVariant, TimeIndex};
use crate::foundation::color::VertexColor;
use crate::foundation::logging;
use crate::foundation::math::Vec3;
use crate::lighting::{LightingSession, LitObject, LitObjectFlags};
use crate::foundation::collections::LitObjectKey;
use crate::mesh::{MeshNode, SharedMesh, VertexMesh};

const AMBIENT: VertexColor = VertexColor::new(100, 100, 100);

fn scene() -> SceneConfig {
    SceneConfig::default()
        .with_variant(SceneVariant::new(TimeIndex::Day, AMBIENT).with_lightmaps(["lightmaps/day_0"]))
        .with_variant(SceneVariant::new(TimeIndex::Night, VertexColor::splat(40)))
}

fn session() -> LightingSession {
    logging::init_for_tests();
    LightingSession::with_config(scene()).unwrap()
}

/// Bake a single-mesh object at `position` and hand it to the session
fn add_object(session: &mut LightingSession, flags: LitObjectFlags, position: Vec3) -> (LitObjectKey, SharedMesh) {
    let mesh = VertexMesh::new("body", 6).shared();
    let mut object = LitObject::new("npc", flags).with_position(position);
    object.bake(&[MeshNode::lit(mesh.clone())]).unwrap();
    (session.add_lit_object(object).unwrap(), mesh)
}

fn mesh_is(mesh: &SharedMesh, color: VertexColor) -> bool {
    mesh.read().unwrap().colors().iter().all(|c| *c == color)
}
