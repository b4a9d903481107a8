use std::time::Duration;

use raft_runner_core::{
    collaborators::{Animation, MemoryNarrative, NarrativeStore, Variable},
    Command, Event,
};
use raft_runner_system_narrative::{
    ConditionBroadcast, PickupConfig, ShellCounter, ShellPickup, CONDITION_FRACTION_VARIABLE,
    CONDITION_PERCENT_VARIABLE,
};
use raft_runner_world::{apply, query, World};

#[derive(Default)]
struct RecordingAnimator {
    triggers: Vec<String>,
}

impl Animation for RecordingAnimator {
    fn set_trigger(&mut self, name: &str) {
        self.triggers.push(name.to_owned());
    }

    fn set_bool(&mut self, _name: &str, _value: bool) {}

    fn set_float(&mut self, _name: &str, _value: f32) {}
}

#[test]
fn condition_changes_reach_narrative_variables() {
    let mut world = World::default();
    let mut narrative = MemoryNarrative::new();
    let broadcast = ConditionBroadcast;
    broadcast.publish(query::condition(&world).normalized(), &mut narrative);
    assert_eq!(
        narrative.get_variable(CONDITION_PERCENT_VARIABLE),
        Some(Variable::Int(100))
    );

    let mut events = Vec::new();
    apply(&mut world, Command::DamageCondition { amount: 12.4 }, &mut events);
    apply(&mut world, Command::DamageCondition { amount: 10.0 }, &mut events);
    broadcast.handle(&events, &mut narrative);

    assert_eq!(
        narrative.get_variable(CONDITION_PERCENT_VARIABLE),
        Some(Variable::Int(78))
    );
    match narrative.get_variable(CONDITION_FRACTION_VARIABLE) {
        Some(Variable::Float(value)) => assert!((value - 0.776).abs() < 1e-4),
        other => panic!("unexpected fraction variable {other:?}"),
    }
}

#[test]
fn unrelated_events_leave_variables_untouched() {
    let mut narrative = MemoryNarrative::new();
    ConditionBroadcast.handle(&[Event::ConditionDepleted], &mut narrative);
    assert!(narrative.get_variable(CONDITION_PERCENT_VARIABLE).is_none());
}

#[test]
fn shell_is_collected_once_and_vanishes_later() {
    let mut shell = ShellPickup::default();
    let mut animator = RecordingAnimator::default();
    let mut narrative = MemoryNarrative::new();

    assert!(shell.use_pickup(Some(&mut animator), Some(&mut narrative)));
    assert!(!shell.use_pickup(Some(&mut animator), Some(&mut narrative)));

    assert_eq!(animator.triggers, vec!["Pickup".to_owned()]);
    assert_eq!(
        narrative.get_variable("ShellsCollected"),
        Some(Variable::Int(1))
    );
    assert!(!shell.is_collectable());
    assert!(shell.is_visible());

    assert!(!shell.advance(Duration::from_millis(500)));
    assert!(shell.advance(Duration::from_millis(250)));
    assert!(shell.has_vanished());
    assert!(!shell.is_visible());
    assert!(!shell.advance(Duration::from_secs(1)));
}

#[test]
fn shells_accumulate_into_counter_label() {
    let mut narrative = MemoryNarrative::new();
    let counter = ShellCounter::new("ShellsCollected", "Shells: {0}");
    assert_eq!(counter.label(&narrative), "Shells: 0");

    for _ in 0..3 {
        let mut shell = ShellPickup::default();
        assert!(shell.use_pickup(None, Some(&mut narrative)));
    }
    assert_eq!(counter.label(&narrative), "Shells: 3");
    assert_eq!(ShellCounter::default().label(&narrative), "3");
}

#[test]
fn hidden_shell_disappears_at_pickup() {
    let mut shell = ShellPickup::new(PickupConfig {
        hide_immediately: true,
        increment_by: 5,
        ..PickupConfig::default()
    });
    let mut narrative = MemoryNarrative::new();

    assert!(shell.use_pickup(None, Some(&mut narrative)));
    assert!(!shell.is_visible());
    assert!(!shell.has_vanished());
    assert_eq!(
        narrative.get_variable("ShellsCollected"),
        Some(Variable::Int(5))
    );
}
