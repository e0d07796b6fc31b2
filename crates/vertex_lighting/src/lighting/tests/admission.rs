//! Registration, deferred admission and teardown

use super::*;
use crate::lighting::{ConfigurationError, LightingError, PaintOutcome, RegisterOutcome, TickReport, VertexLight};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registering_twice_is_a_no_op() {
        let mut session = session();
        session.set_variant(TimeIndex::Day).unwrap();
        let (key, _mesh) = add_object(&mut session, LitObjectFlags::empty(), Vec3::zeros());
        let lamp = session
            .add_light(VertexLight::new(Vec3::zeros(), VertexColor::WHITE, 3.0))
            .unwrap();

        assert_eq!(session.register_lit_object(key), RegisterOutcome::Live);
        assert_eq!(session.register_lit_object(key), RegisterOutcome::AlreadyRegistered);
        assert_eq!(session.register_light(lamp), RegisterOutcome::Live);
        assert_eq!(session.register_light(lamp), RegisterOutcome::AlreadyRegistered);

        assert_eq!(session.lit_object_count(), 1);
        assert_eq!(session.light_count(), 1);
        assert_eq!(session.lit_object(key).unwrap().paint_count(), 1);
    }

    #[test]
    fn test_registering_twice_before_configuration_queues_once() {
        let mut session = session();
        let (key, _mesh) = add_object(&mut session, LitObjectFlags::empty(), Vec3::zeros());

        assert_eq!(session.register_lit_object(key), RegisterOutcome::Deferred);
        assert_eq!(session.register_lit_object(key), RegisterOutcome::AlreadyRegistered);
        assert_eq!(session.pending_lit_object_count(), 1);

        session.set_variant(TimeIndex::Day).unwrap();
        assert_eq!(session.lit_object(key).unwrap().paint_count(), 1);
    }

    #[test]
    fn test_pending_entries_are_admitted_with_one_forced_paint() {
        let mut session = session();
        let (key, mesh) = add_object(&mut session, LitObjectFlags::empty(), Vec3::zeros());
        let lamp = session
            .add_light(VertexLight::new(Vec3::new(0.0, 50.0, 0.0), VertexColor::WHITE, 3.0))
            .unwrap();

        session.register_light(lamp);
        session.register_lit_object(key);

        assert!(!session.is_configured());
        assert_eq!(session.pending_light_count(), 1);
        assert_eq!(session.pending_lit_object_count(), 1);
        assert_eq!(session.light_count(), 0);
        assert_eq!(session.lit_object_count(), 0);
        assert_eq!(session.lit_object(key).unwrap().paint_count(), 0);

        let change = session.set_variant(TimeIndex::Day).unwrap();

        assert_eq!(change.admitted_lights, 1);
        assert_eq!(change.admitted_lit_objects, 1);
        assert!(session.is_configured());
        assert!(session.should_update());
        assert_eq!(session.pending_light_count(), 0);
        assert_eq!(session.pending_lit_object_count(), 0);
        assert!(session.is_light_live(lamp));
        assert!(session.is_lit_object_live(key));
        assert_eq!(session.lit_object(key).unwrap().paint_count(), 1);
        assert!(mesh_is(&mesh, AMBIENT));

        // Next scheduled evaluation is a lookahead away; nothing repaints before it
        for _ in 0..5 {
            session.tick(0.0);
        }
        assert_eq!(session.lit_object(key).unwrap().paint_count(), 1);
    }

    #[test]
    fn test_unregistering_a_pending_entry_drops_it_from_the_queue() {
        let mut session = session();
        let (key, _mesh) = add_object(&mut session, LitObjectFlags::empty(), Vec3::zeros());
        session.register_lit_object(key);

        session.unregister_lit_object(key);
        let change = session.set_variant(TimeIndex::Day).unwrap();

        assert_eq!(change.admitted_lit_objects, 0);
        assert!(!session.is_lit_object_live(key));
        assert!(!session.lit_object(key).unwrap().is_registered());
        assert_eq!(session.lit_object(key).unwrap().paint_count(), 0);
    }

    #[test]
    fn test_unknown_variant_is_reported_and_admits_nothing() {
        let mut session = session();
        let (key, _mesh) = add_object(&mut session, LitObjectFlags::empty(), Vec3::zeros());
        session.register_lit_object(key);

        let expected = LightingError::Configuration(ConfigurationError::UnknownVariant(TimeIndex::Elite));
        assert_eq!(session.set_variant(TimeIndex::Elite), Err(expected.clone()));

        assert_eq!(session.take_diagnostics(), vec![expected]);
        assert!(session.take_diagnostics().is_empty());
        assert!(!session.is_configured());
        assert!(!session.should_update());
        assert_eq!(session.current_variant(), None);
        assert_eq!(session.pending_lit_object_count(), 1);
        assert_eq!(session.lit_object(key).unwrap().paint_count(), 0);
    }

    #[test]
    fn test_variant_without_configuration_is_reported() {
        let mut session = LightingSession::new();

        let result = session.set_variant(TimeIndex::Day);

        assert_eq!(
            result,
            Err(LightingError::Configuration(ConfigurationError::NoConfiguration))
        );
        assert_eq!(session.take_diagnostics().len(), 1);
    }

    #[test]
    fn test_invalid_configuration_is_rejected() {
        let mut session = LightingSession::new();

        let result = session.setup(scene().with_frame_interval(0));

        assert!(matches!(
            result,
            Err(LightingError::Configuration(ConfigurationError::InvalidScene(_)))
        ));
        assert!(session.config().is_none());
    }

    #[test]
    fn test_force_paint_before_configuration_is_deferred() {
        let mut session = session();
        let (key, _mesh) = add_object(&mut session, LitObjectFlags::empty(), Vec3::zeros());

        assert_eq!(session.force_paint(key), Ok(PaintOutcome::Deferred));
        assert_eq!(session.lit_object(key).unwrap().paint_count(), 0);
    }

    #[test]
    fn test_unregister_after_release_is_silent() {
        let mut session = session();
        let (key, _mesh) = add_object(&mut session, LitObjectFlags::empty(), Vec3::zeros());
        let lamp = session
            .add_light(VertexLight::new(Vec3::zeros(), VertexColor::WHITE, 3.0))
            .unwrap();
        session.register_lit_object(key);
        session.register_light(lamp);
        session.set_variant(TimeIndex::Day).unwrap();

        session.release();
        session.release();
        session.unregister_light(lamp);
        session.unregister_lit_object(key);

        assert!(session.is_released());
        assert_eq!(session.register_light(lamp), RegisterOutcome::Released);
        assert_eq!(session.register_lit_object(key), RegisterOutcome::Released);
        assert_eq!(session.tick(0.016), TickReport::default());
        assert_eq!(session.force_paint(key), Err(LightingError::Released));
        assert!(session.lit_object(key).is_none());
        assert!(session.remove_light(lamp).is_none());
        assert!(session.take_diagnostics().is_empty());
    }

    #[test]
    fn test_setup_after_release_starts_a_fresh_session() {
        let mut session = session();
        let (key, _mesh) = add_object(&mut session, LitObjectFlags::empty(), Vec3::zeros());
        session.register_lit_object(key);
        session.set_variant(TimeIndex::Day).unwrap();
        session.release();

        session.setup(scene()).unwrap();

        assert!(!session.is_released());
        assert!(!session.is_configured());
        assert_eq!(session.lit_object_count(), 0);
        assert_eq!(session.frame(), 0);
        assert!(session.lit_object(key).is_none());
    }

    #[test]
    fn test_removed_objects_stop_resolving() {
        let mut session = session();
        session.set_variant(TimeIndex::Day).unwrap();
        let (key, _mesh) = add_object(&mut session, LitObjectFlags::empty(), Vec3::zeros());
        session.register_lit_object(key);

        let object = session.remove_lit_object(key).unwrap();

        assert!(!object.is_registered());
        assert_eq!(session.lit_object_count(), 0);
        assert_eq!(session.force_paint(key), Err(LightingError::UnknownLitObject));
        assert_eq!(session.register_lit_object(key), RegisterOutcome::Unknown);
        assert_eq!(session.set_position(key, Vec3::zeros()), Err(LightingError::UnknownLitObject));
    }

    #[test]
    fn test_shared_session_ticks_from_another_thread() {
        let mut session = session();
        session.set_variant(TimeIndex::Day).unwrap();
        let (key, _mesh) = add_object(&mut session, LitObjectFlags::empty(), Vec3::zeros());
        let shared = session.into_shared();

        let worker = {
            let shared = shared.clone();
            std::thread::spawn(move || {
                let mut session = shared.lock().unwrap();
                session.register_lit_object(key);
                session.tick(0.016);
            })
        };
        worker.join().unwrap();

        let session = shared.lock().unwrap();
        assert!(session.is_lit_object_live(key));
        assert_eq!(session.frame(), 1);
    }

    #[test]
    fn test_registering_an_unbaked_object_is_reported() {
        let mut session = session();
        session.set_variant(TimeIndex::Day).unwrap();
        let barrel = session
            .add_lit_object(LitObject::new("barrel", LitObjectFlags::empty()))
            .unwrap();

        assert_eq!(session.register_lit_object(barrel), RegisterOutcome::Live);

        assert_eq!(
            session.take_diagnostics(),
            vec![LightingError::Configuration(ConfigurationError::NotBaked("barrel".to_string()))]
        );
        assert!(session.is_lit_object_live(barrel));
    }

    #[test]
    fn test_registering_a_dynamic_object_before_setup_is_not_reported() {
        let mut session = session();
        let player = session
            .add_lit_object(LitObject::new("player", LitObjectFlags::CHECK_FOR_DYNAMIC_MESHES))
            .unwrap();

        assert_eq!(session.register_lit_object(player), RegisterOutcome::Deferred);
        session.set_variant(TimeIndex::Day).unwrap();

        assert!(session.take_diagnostics().is_empty());
        assert!(session.is_lit_object_live(player));
    }
}
