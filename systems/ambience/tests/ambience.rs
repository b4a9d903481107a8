use std::time::Duration;

use raft_runner_system_ambience::{
    FlickerMode, LampConfig, LampFlicker, Stoplight, StoplightConfig,
};

const FRAME: Duration = Duration::from_millis(50);

#[test]
fn stoplight_changes_once_per_interval() {
    let mut light = Stoplight::new(StoplightConfig::default(), 3);
    assert_eq!(light.lamps(), [false; 3]);

    let changes = (0..100).filter_map(|_| light.advance(FRAME)).count();
    assert_eq!(changes, 5);
}

#[test]
fn stoplight_patterns_are_reproducible() {
    let mut first = Stoplight::new(StoplightConfig::default(), 77);
    let mut second = Stoplight::new(StoplightConfig::default(), 77);
    for _ in 0..50 {
        assert_eq!(
            first.advance(Duration::from_secs(1)),
            second.advance(Duration::from_secs(1))
        );
    }
}

#[test]
fn stoplight_honours_forced_odds() {
    let all_on = StoplightConfig {
        chance_all_off: 0.0,
        chance_all_on: 1.0,
        chance_two_on: 0.0,
        ..StoplightConfig::default()
    };
    let mut light = Stoplight::new(all_on, 5);
    for _ in 0..20 {
        assert_eq!(light.advance(Duration::from_secs(1)), Some([true; 3]));
    }

    let single = StoplightConfig {
        chance_all_off: 0.0,
        chance_all_on: 0.0,
        chance_two_on: 0.0,
        ..StoplightConfig::default()
    };
    let mut light = Stoplight::new(single, 5);
    for _ in 0..20 {
        let lamps = light.advance(Duration::from_secs(1)).unwrap_or_default();
        assert_eq!(lamps.iter().filter(|lit| **lit).count(), 1);
    }
}

#[test]
fn stoplight_two_lamp_share_is_rolled_after_the_full_patterns() {
    let config = StoplightConfig::default();
    let mut light = Stoplight::new(config, 2024);
    let rolls = 50_000;
    let two_lit = (0..rolls)
        .filter_map(|_| light.advance(Duration::from_secs(1)))
        .filter(|lamps| lamps.iter().filter(|lit| **lit).count() == 2)
        .count();

    let expected = (1.0 - config.chance_all_off - config.chance_all_on) * config.chance_two_on;
    let share = two_lit as f64 / f64::from(rolls);
    assert!((share - expected).abs() < 0.015, "two-lamp share {share}");
}

#[test]
fn lamps_fade_intensity_unless_told_to_toggle() {
    assert_eq!(LampConfig::default().mode, FlickerMode::Intensity);

    let mut lamp = LampFlicker::new(LampConfig::default(), 1.0, 4);
    assert!((0..100).all(|_| lamp.advance(FRAME).enabled));
}

#[test]
fn toggle_lamp_goes_dark_only_when_odds_allow() {
    let never_on = LampConfig {
        mode: FlickerMode::Toggle,
        on_chance: 0.0,
        ..LampConfig::default()
    };
    let mut lamp = LampFlicker::new(never_on, 1.0, 11);
    assert!(lamp.state().enabled);
    let state = (0..40).map(|_| lamp.advance(FRAME)).last();
    assert_eq!(state.map(|state| state.enabled), Some(false));

    let always_on = LampConfig {
        mode: FlickerMode::Toggle,
        on_chance: 1.0,
        ..LampConfig::default()
    };
    let mut lamp = LampFlicker::new(always_on, 1.0, 11);
    assert!((0..40).all(|_| lamp.advance(FRAME).enabled));
}

#[test]
fn intensity_lamp_fades_within_bounds() {
    let config = LampConfig {
        mode: FlickerMode::Intensity,
        ..LampConfig::default()
    };
    let mut lamp = LampFlicker::new(config, 1.0, 21);
    let mut changed = false;
    for _ in 0..400 {
        let state = lamp.advance(Duration::from_millis(10));
        assert!(state.enabled);
        assert!(state.intensity >= 0.2 - 1e-5 && state.intensity <= 1.2 + 1e-5);
        changed |= (state.intensity - 1.0).abs() > 1e-3;
    }
    assert!(changed);
}

#[test]
fn snapping_lamp_jumps_straight_to_target() {
    let config = LampConfig {
        mode: FlickerMode::Intensity,
        fade: Duration::ZERO,
        min_intensity: 0.4,
        max_intensity: 0.4,
        ..LampConfig::default()
    };
    let mut lamp = LampFlicker::new(config, 1.0, 2);
    let state = (0..20).map(|_| lamp.advance(FRAME)).last();
    assert_eq!(state.map(|state| state.intensity), Some(0.4));
}

#[test]
fn undefined_on_chance_keeps_the_lamp_dark() {
    let config = LampConfig {
        mode: FlickerMode::Toggle,
        on_chance: f64::NAN,
        ..LampConfig::default()
    };
    let mut lamp = LampFlicker::new(config, 1.0, 8);
    let state = (0..40).map(|_| lamp.advance(FRAME)).last();
    assert_eq!(state.map(|state| state.enabled), Some(false));
}

#[test]
fn desynced_lamps_wait_longer_for_their_first_change() {
    let steady = LampConfig {
        mode: FlickerMode::Toggle,
        on_chance: 0.0,
        min_interval: Duration::from_millis(300),
        max_interval: Duration::from_millis(300),
        ..LampConfig::default()
    };
    let desynced = LampConfig {
        desync_start: true,
        ..steady
    };
    let frame = Duration::from_millis(10);
    let frames_until_dark = |config: LampConfig, seed: u64| {
        let mut lamp = LampFlicker::new(config, 1.0, seed);
        (1..=200).find(|_| !lamp.advance(frame).enabled)
    };

    let mut delayed = 0;
    for seed in 0..8 {
        let plain = frames_until_dark(steady, seed).unwrap_or(0);
        let shifted = frames_until_dark(desynced, seed).unwrap_or(0);
        assert!((30..=31).contains(&plain));
        assert!(shifted >= plain && shifted <= plain + 46);
        delayed += usize::from(shifted > plain + 1);
    }
    assert!(delayed > 0);
}

#[test]
fn street_lamp_breaks_up_repeated_states() {
    let config = LampConfig {
        on_chance: 1.0,
        ..LampConfig::street_lamp()
    };
    assert_eq!(config.mode, FlickerMode::Toggle);
    assert!(config.desync_start);

    let mut lamp = LampFlicker::new(config, 1.0, 13);
    let states: Vec<bool> = (0..2_000)
        .map(|_| lamp.advance(Duration::from_millis(100)).enabled)
        .collect();
    assert!(states.iter().any(|enabled| !enabled));
    assert!(states.iter().filter(|enabled| **enabled).count() > states.len() / 2);
}
