use std::time::Duration;

use raft_runner_core::{
    BodyTag, Command, ContactBody, DespawnReason, Event, LaneIndex, ObstacleId, ResponderId,
    Slowdown, TemplateId, Vec3,
};
use raft_runner_world::{
    self as world, query, ConditionConfig, ObstacleTemplate, SpeedConfig, World, WorldConfig,
};

fn spawn(world: &mut World, template: TemplateId, lane: LaneIndex) -> Vec<Event> {
    let mut events = Vec::new();
    world::apply(world, Command::SpawnObstacle { template, lane }, &mut events);
    events
}

fn spawned_id(events: &[Event]) -> ObstacleId {
    events
        .iter()
        .find_map(|event| match event {
            Event::ObstacleSpawned { obstacle, .. } => Some(*obstacle),
            _ => None,
        })
        .expect("expected obstacle to spawn")
}

#[test]
fn pool_reuses_preallocated_instances_before_growing() {
    let mut world = World::new(WorldConfig {
        templates: vec![ObstacleTemplate::new(TemplateId::new(0))],
        pool_per_template: 8,
        ..WorldConfig::default()
    });
    assert_eq!(query::instance_count(&world), 8);

    let mut reused = 0;
    let mut created = 0;
    for _ in 0..10 {
        for event in spawn(&mut world, TemplateId::new(0), LaneIndex::CENTER) {
            if let Event::ObstacleSpawned { reused: was_reused, .. } = event {
                if was_reused {
                    reused += 1;
                } else {
                    created += 1;
                }
            }
        }
    }

    assert_eq!((reused, created), (8, 2));
    assert_eq!(query::instance_count(&world), 10);
    assert_eq!(query::idle_in_pool(&world, TemplateId::new(0)), 0);
    assert_eq!(query::obstacle_view(&world).len(), 10);

    let mut events = Vec::new();
    world::apply(&mut world, Command::tick(Duration::from_secs(20)), &mut events);
    let despawned = events
        .iter()
        .filter(|event| {
            matches!(
                event,
                Event::ObstacleDespawned {
                    reason: DespawnReason::PassedKillBoundary,
                    ..
                }
            )
        })
        .count();
    assert_eq!(despawned, 10);
    assert_eq!(query::idle_in_pool(&world, TemplateId::new(0)), 10);
    assert!(query::obstacle_view(&world).is_empty());
}

#[test]
fn recycled_obstacles_return_to_their_own_template() {
    let mut world = World::new(WorldConfig {
        templates: vec![
            ObstacleTemplate::new(TemplateId::new(1)),
            ObstacleTemplate::new(TemplateId::new(2)),
        ],
        pool_per_template: 1,
        ..WorldConfig::default()
    });

    let events = spawn(&mut world, TemplateId::new(2), LaneIndex::CENTER);
    let obstacle = spawned_id(&events);
    assert_eq!(query::idle_in_pool(&world, TemplateId::new(2)), 0);

    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::ReportContact {
            obstacle,
            body: ContactBody::player(ResponderId::new(0)),
        },
        &mut events,
    );

    assert_eq!(query::idle_in_pool(&world, TemplateId::new(1)), 1);
    assert_eq!(query::idle_in_pool(&world, TemplateId::new(2)), 1);
}

#[test]
fn spawn_places_obstacle_in_lane_at_spawn_distance() {
    let mut world = World::new(WorldConfig {
        templates: vec![ObstacleTemplate {
            id: TemplateId::new(4),
            speed_multiplier: 1.0,
            height_offset: 0.25,
        }],
        ..WorldConfig::default()
    });

    let events = spawn(&mut world, TemplateId::new(4), LaneIndex::new(-1));
    let position = events
        .iter()
        .find_map(|event| match event {
            Event::ObstacleSpawned { position, .. } => Some(*position),
            _ => None,
        })
        .expect("spawned");
    assert_eq!(position, Vec3::new(-2.0, 0.75, 60.0));

    let clamped = spawn(&mut world, TemplateId::new(4), LaneIndex::new(9));
    let position = clamped
        .iter()
        .find_map(|event| match event {
            Event::ObstacleSpawned { position, .. } => Some(*position),
            _ => None,
        })
        .expect("spawned");
    assert_eq!(position.x, 4.0);
}

#[test]
fn unknown_template_spawns_nothing() {
    let mut world = World::default();
    let events = spawn(&mut world, TemplateId::new(99), LaneIndex::CENTER);
    assert!(events.is_empty());
}

#[test]
fn obstacles_scroll_with_speed_snapshot_and_multiplier() {
    let mut world = World::new(WorldConfig {
        speed: SpeedConfig {
            start: 10.0,
            cruise: 10.0,
            ramp_per_second: 0.0,
            running: true,
        },
        templates: vec![
            ObstacleTemplate::new(TemplateId::new(0)),
            ObstacleTemplate {
                id: TemplateId::new(1),
                speed_multiplier: 2.0,
                height_offset: 0.0,
            },
        ],
        ..WorldConfig::default()
    });

    let slow = spawned_id(&spawn(&mut world, TemplateId::new(0), LaneIndex::CENTER));
    let fast = spawned_id(&spawn(&mut world, TemplateId::new(1), LaneIndex::CENTER));

    let mut events = Vec::new();
    world::apply(&mut world, Command::tick(Duration::from_secs(1)), &mut events);

    let view = query::obstacle_view(&world);
    let z_of = |id| {
        view.iter()
            .find(|snapshot| snapshot.id == id)
            .map(|snapshot| snapshot.position.z)
            .expect("active obstacle")
    };
    assert_eq!(z_of(slow), 50.0);
    assert_eq!(z_of(fast), 40.0);
}

#[test]
fn player_contact_reports_hit_and_despawns_once() {
    let mut world = World::default();
    let obstacle = spawned_id(&spawn(&mut world, TemplateId::new(0), LaneIndex::CENTER));

    let mut events = Vec::new();
    let body = ContactBody::player(ResponderId::new(3));
    world::apply(&mut world, Command::ReportContact { obstacle, body }, &mut events);
    world::apply(&mut world, Command::ReportContact { obstacle, body }, &mut events);

    assert_eq!(
        events,
        vec![
            Event::ObstacleStruck {
                obstacle,
                responder: ResponderId::new(3),
                position: Vec3::new(0.0, 0.5, 60.0),
            },
            Event::ObstacleDespawned {
                obstacle,
                template: TemplateId::new(0),
                reason: DespawnReason::Contact,
            },
        ]
    );
}

#[test]
fn contact_without_responder_still_despawns() {
    let mut world = World::default();
    let obstacle = spawned_id(&spawn(&mut world, TemplateId::new(0), LaneIndex::CENTER));

    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::ReportContact {
            obstacle,
            body: ContactBody {
                tag: BodyTag::Player,
                responder: None,
            },
        },
        &mut events,
    );

    assert!(matches!(
        events.as_slice(),
        [Event::ObstacleDespawned {
            reason: DespawnReason::Contact,
            ..
        }]
    ));
}

#[test]
fn non_player_contact_is_ignored() {
    let mut world = World::default();
    let obstacle = spawned_id(&spawn(&mut world, TemplateId::new(0), LaneIndex::CENTER));

    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::ReportContact {
            obstacle,
            body: ContactBody {
                tag: BodyTag::Other,
                responder: Some(ResponderId::new(0)),
            },
        },
        &mut events,
    );

    assert!(events.is_empty());
    assert_eq!(query::obstacle_view(&world).len(), 1);
}

#[test]
fn placed_obstacles_deactivate_without_joining_a_pool() {
    let mut world = World::new(WorldConfig {
        templates: vec![ObstacleTemplate::new(TemplateId::new(0))],
        pool_per_template: 2,
        ..WorldConfig::default()
    });

    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::PlaceObstacle {
            template: TemplateId::new(0),
            position: Vec3::new(0.0, 0.5, 5.0),
        },
        &mut events,
    );
    let obstacle = spawned_id(&events);
    let snapshot = query::obstacle_view(&world)
        .iter()
        .copied()
        .find(|snapshot| snapshot.id == obstacle)
        .expect("placed obstacle");
    assert!(!snapshot.pooled);

    world::apply(&mut world, Command::tick(Duration::from_secs(10)), &mut events);
    assert!(query::obstacle_view(&world).is_empty());
    assert_eq!(query::idle_in_pool(&world, TemplateId::new(0)), 2);
}

#[test]
fn condition_depletion_is_published_once() {
    let mut world = World::new(WorldConfig {
        condition: ConditionConfig {
            max: 100.0,
            start: 20.0,
            regen_per_second: 0.0,
        },
        ..WorldConfig::default()
    });

    let mut events = Vec::new();
    for _ in 0..4 {
        world::apply(&mut world, Command::DamageCondition { amount: 12.0 }, &mut events);
    }

    assert_eq!(
        events,
        vec![
            Event::ConditionChanged {
                current: 8.0,
                normalized: 0.08,
            },
            Event::ConditionChanged {
                current: 0.0,
                normalized: 0.0,
            },
            Event::ConditionDepleted,
        ]
    );

    events.clear();
    world::apply(&mut world, Command::HealCondition { amount: 20.0 }, &mut events);
    assert!(events.is_empty());
    assert_eq!(query::condition(&world).current(), 0.0);
}

#[test]
fn slowdown_command_reports_speeds() {
    let mut world = World::new(WorldConfig {
        speed: SpeedConfig {
            start: 10.0,
            ..SpeedConfig::default()
        },
        ..WorldConfig::default()
    });

    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::ApplySlowdown {
            slowdown: Slowdown::new(0.5, 2.0, Duration::from_secs(1)),
        },
        &mut events,
    );
    assert_eq!(events, vec![Event::SlowdownApplied { from: 10.0, to: 5.0 }]);
    assert_eq!(query::speed(&world), 5.0);

    for _ in 0..10 {
        world::apply(
            &mut world,
            Command::tick(Duration::from_millis(100)),
            &mut events,
        );
    }
    assert!((query::speed(&world) - 10.0).abs() < 1e-4);
}

#[test]
fn lanes_are_centred_on_zero() {
    let world = World::default();
    let lanes: Vec<i32> = query::lanes(&world).iter().map(LaneIndex::get).collect();
    assert_eq!(lanes, vec![-2, -1, 0, 1, 2]);
}
