//! Obstacle instances and the per-template pools that recycle them.

use std::{
    collections::{HashMap, VecDeque},
    time::Duration,
};

use raft_runner_core::{DespawnReason, Event, ObstacleId, TemplateId, Vec3};

/// Blueprint obstacles are created from.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ObstacleTemplate {
    /// Identifier used to key the template's pool.
    pub id: TemplateId,
    /// Multiplier applied to the scroll speed for obstacles of this template.
    pub speed_multiplier: f32,
    /// Vertical offset added to the lane height when spawning.
    pub height_offset: f32,
}

impl ObstacleTemplate {
    /// Creates a template that scrolls at the world speed with no height offset.
    #[must_use]
    pub const fn new(id: TemplateId) -> Self {
        Self {
            id,
            speed_multiplier: 1.0,
            height_offset: 0.0,
        }
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Obstacle {
    pub(crate) id: ObstacleId,
    pub(crate) template: TemplateId,
    pub(crate) position: Vec3,
    pub(crate) speed_multiplier: f32,
    pub(crate) kill_boundary: f32,
    pub(crate) active: bool,
    /// Pool the obstacle returns to on despawn. `None` for placed obstacles.
    pub(crate) home: Option<TemplateId>,
}

/// Dense obstacle storage. Obstacle ids index directly into `obstacles`.
#[derive(Debug)]
pub(crate) struct ObstacleStore {
    templates: Vec<ObstacleTemplate>,
    obstacles: Vec<Obstacle>,
    pools: HashMap<TemplateId, VecDeque<ObstacleId>>,
}

impl ObstacleStore {
    pub(crate) fn new(templates: &[ObstacleTemplate], pool_per_template: usize) -> Self {
        let mut store = Self {
            templates: Vec::new(),
            obstacles: Vec::new(),
            pools: HashMap::new(),
        };
        for template in templates {
            if store.template(template.id).is_some() {
                log::debug!("duplicate obstacle template {:?} ignored", template.id);
                continue;
            }
            store.templates.push(*template);
            let mut queue = VecDeque::with_capacity(pool_per_template);
            for _ in 0..pool_per_template {
                let id = store.create(*template, Some(template.id));
                queue.push_back(id);
            }
            let _ = store.pools.insert(template.id, queue);
        }
        store
    }

    pub(crate) fn templates(&self) -> &[ObstacleTemplate] {
        &self.templates
    }

    pub(crate) fn template(&self, id: TemplateId) -> Option<&ObstacleTemplate> {
        self.templates.iter().find(|template| template.id == id)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Obstacle> {
        self.obstacles.iter()
    }

    pub(crate) fn len(&self) -> usize {
        self.obstacles.len()
    }

    pub(crate) fn idle_in_pool(&self, template: TemplateId) -> usize {
        self.pools.get(&template).map_or(0, VecDeque::len)
    }

    pub(crate) fn get(&self, id: ObstacleId) -> Option<&Obstacle> {
        usize::try_from(id.get())
            .ok()
            .and_then(|index| self.obstacles.get(index))
    }

    fn get_mut(&mut self, id: ObstacleId) -> Option<&mut Obstacle> {
        usize::try_from(id.get())
            .ok()
            .and_then(|index| self.obstacles.get_mut(index))
    }

    fn create(&mut self, template: ObstacleTemplate, home: Option<TemplateId>) -> ObstacleId {
        let id = ObstacleId::new(u32::try_from(self.obstacles.len()).unwrap_or(u32::MAX));
        self.obstacles.push(Obstacle {
            id,
            template: template.id,
            position: Vec3::ZERO,
            speed_multiplier: template.speed_multiplier,
            kill_boundary: 0.0,
            active: false,
            home,
        });
        id
    }

    /// Draws an inactive obstacle from the template's pool, creating one when
    /// the pool is empty. Returns whether an existing instance was reused.
    pub(crate) fn acquire(&mut self, template: TemplateId) -> Option<(ObstacleId, bool)> {
        let blueprint = *self.template(template)?;
        let reused = self
            .pools
            .get_mut(&template)
            .and_then(VecDeque::pop_front);
        match reused {
            Some(id) => Some((id, true)),
            None => Some((self.create(blueprint, Some(template)), false)),
        }
    }

    /// Creates an obstacle that belongs to no pool.
    pub(crate) fn create_standalone(&mut self, template: TemplateId) -> Option<ObstacleId> {
        let blueprint = *self.template(template)?;
        Some(self.create(blueprint, None))
    }

    pub(crate) fn activate(&mut self, id: ObstacleId, position: Vec3, kill_boundary: f32) {
        if let Some(obstacle) = self.get_mut(id) {
            obstacle.position = position;
            obstacle.kill_boundary = kill_boundary;
            obstacle.active = true;
        }
    }

    /// Deactivates an obstacle and returns it to the pool it came from.
    pub(crate) fn despawn(
        &mut self,
        id: ObstacleId,
        reason: DespawnReason,
        out_events: &mut Vec<Event>,
    ) {
        let Some(obstacle) = self.get_mut(id) else {
            return;
        };
        if !obstacle.active {
            return;
        }
        obstacle.active = false;
        let template = obstacle.template;
        if let Some(home) = obstacle.home {
            if let Some(queue) = self.pools.get_mut(&home) {
                queue.push_back(id);
            }
        }
        out_events.push(Event::ObstacleDespawned {
            obstacle: id,
            template,
            reason,
        });
    }

    /// Scrolls every active obstacle backward and despawns those past their boundary.
    pub(crate) fn advance(&mut self, speed: f32, dt: Duration, out_events: &mut Vec<Event>) {
        let seconds = dt.as_secs_f32();
        let mut expired = Vec::new();
        for obstacle in self.obstacles.iter_mut().filter(|obstacle| obstacle.active) {
            obstacle.position.z -= speed * obstacle.speed_multiplier * seconds;
            if obstacle.position.z < obstacle.kill_boundary {
                expired.push(obstacle.id);
            }
        }
        for id in expired {
            self.despawn(id, DespawnReason::PassedKillBoundary, out_events);
        }
    }
}
