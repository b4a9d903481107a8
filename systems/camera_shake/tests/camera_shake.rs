use std::time::Duration;

use raft_runner_core::collaborators::CameraShake;
use raft_runner_system_camera_shake::{CameraShaker, Config, ShakeOffset};

const FRAME: Duration = Duration::from_millis(16);

#[test]
fn shaker_at_rest_produces_no_offset() {
    let mut shaker = CameraShaker::new(Config::default());
    for _ in 0..10 {
        assert_eq!(shaker.advance(FRAME), ShakeOffset::ZERO);
    }
}

#[test]
fn trauma_accumulates_and_saturates() {
    let mut shaker = CameraShaker::default();
    shaker.shake(0.35);
    shaker.shake(0.35);
    assert!((shaker.trauma() - 0.7).abs() < 1e-6);

    shaker.shake(2.0);
    assert_eq!(shaker.trauma(), 1.0);

    shaker.shake(-5.0);
    assert_eq!(shaker.trauma(), 0.0);
}

#[test]
fn offsets_scale_with_squared_trauma() {
    let config = Config::default();
    let mut shaker = CameraShaker::new(config);
    shaker.shake(0.5);

    let limit_position = config.position_amplitude * 0.25;
    let limit_rotation = config.rotation_amplitude * 0.25;
    let offset = shaker.advance(FRAME);

    assert!(offset.position.abs().max_element() <= limit_position + 1e-6);
    assert!(offset.rotation_degrees.abs().max_element() <= limit_rotation + 1e-6);
}

#[test]
fn shake_stays_in_the_view_plane_and_rotation_mirrors_position() {
    let config = Config {
        trauma_decay: 0.0,
        ..Config::default()
    };
    let mut shaker = CameraShaker::new(config);
    shaker.shake(1.0);

    let mut moved = false;
    for _ in 0..300 {
        let offset = shaker.advance(FRAME);
        assert_eq!(offset.position.z, 0.0);

        let position = offset.position / config.position_amplitude;
        let rotation = offset.rotation_degrees / config.rotation_amplitude;
        assert!((rotation.x - position.y).abs() < 1e-4);
        assert!((rotation.y - position.x).abs() < 1e-4);
        moved |= position.x.abs() > 1e-3;
    }
    assert!(moved);
}

#[test]
fn trauma_decays_back_to_rest() {
    let mut shaker = CameraShaker::new(Config::default());
    shaker.shake(1.0);

    let _ = shaker.advance(Duration::from_millis(200));
    assert!((shaker.trauma() - 0.5).abs() < 1e-5);

    let _ = shaker.advance(Duration::from_millis(200));
    let _ = shaker.advance(Duration::from_millis(200));
    assert_eq!(shaker.trauma(), 0.0);
    assert_eq!(shaker.advance(FRAME), ShakeOffset::ZERO);
}

#[test]
fn reset_stops_shaking_immediately() {
    let mut shaker = CameraShaker::default();
    shaker.shake(0.9);
    shaker.reset();
    assert_eq!(shaker.advance(FRAME), ShakeOffset::ZERO);
}
