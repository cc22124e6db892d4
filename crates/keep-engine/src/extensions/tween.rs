use glam::Vec2;

use super::easing::Easing;
use crate::api::types::EntityId;
use crate::components::entity::Entity;
use crate::core::scene::Scene;

/// The property a tween writes, with its endpoints.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TweenTarget {
    Position { from: Vec2, to: Vec2 },
    /// Vertical position only; leaves x to whoever else is moving the entity.
    PositionY { from: f32, to: f32 },
    /// Square size in px.
    Size { from: f32, to: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TweenLoop {
    #[default]
    Once,
    /// Run forward, then backward, forever. `duration` is one direction.
    PingPong,
}

#[derive(Debug, Clone)]
pub struct Tween {
    pub target: TweenTarget,
    /// Seconds.
    pub duration: f32,
    pub elapsed: f32,
    pub easing: Easing,
    pub loop_mode: TweenLoop,
    pub on_complete: Option<u32>,
    backward: bool,
}

impl Tween {
    pub fn new(target: TweenTarget, duration: f32, easing: Easing) -> Self {
        Self {
            target,
            duration,
            elapsed: 0.0,
            easing,
            loop_mode: TweenLoop::Once,
            on_complete: None,
            backward: false,
        }
    }

    pub fn position(from: Vec2, to: Vec2, duration: f32, easing: Easing) -> Self {
        Self::new(TweenTarget::Position { from, to }, duration, easing)
    }

    pub fn position_y(from: f32, to: f32, duration: f32, easing: Easing) -> Self {
        Self::new(TweenTarget::PositionY { from, to }, duration, easing)
    }

    pub fn size(from: f32, to: f32, duration: f32, easing: Easing) -> Self {
        Self::new(TweenTarget::Size { from, to }, duration, easing)
    }

    pub fn with_loop(mut self, mode: TweenLoop) -> Self {
        self.loop_mode = mode;
        self
    }

    /// Report `id` from `drain_completed` when this tween ends. Ignored for loops.
    pub fn with_on_complete(mut self, id: u32) -> Self {
        self.on_complete = Some(id);
        self
    }

    /// Progress through the current direction, in [0, 1].
    pub fn progress(&self) -> f32 {
        if self.duration > 0.0 {
            (self.elapsed / self.duration).min(1.0)
        } else {
            1.0
        }
    }

    pub fn is_complete(&self) -> bool {
        self.loop_mode == TweenLoop::Once && self.elapsed >= self.duration
    }

    fn write(&self, entity: &mut Entity) {
        let t = if self.backward {
            1.0 - self.progress()
        } else {
            self.progress()
        };
        match self.target {
            TweenTarget::Position { from, to } => {
                entity.pos = self.easing.interpolate(from, to, t);
            }
            TweenTarget::PositionY { from, to } => {
                entity.pos.y = self.easing.interpolate(from, to, t);
            }
            TweenTarget::Size { from, to } => {
                entity.size = Vec2::splat(self.easing.interpolate(from, to, t));
            }
        }
    }
}

/// Handle returned by `TweenState::add`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TweenId(pub u32);

/// Running tweens, ticked in the order they were added.
#[derive(Debug, Default)]
pub struct TweenState {
    running: Vec<(TweenId, EntityId, Tween)>,
    next_id: u32,
    completed: Vec<u32>,
}

impl TweenState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, entity: EntityId, tween: Tween) -> TweenId {
        let id = TweenId(self.next_id);
        self.next_id += 1;
        self.running.push((id, entity, tween));
        id
    }

    pub fn remove(&mut self, id: TweenId) -> bool {
        let before = self.running.len();
        self.running.retain(|(t, _, _)| *t != id);
        self.running.len() != before
    }

    /// Stop every tween on `entity`. Their completion ids are never reported.
    pub fn remove_entity(&mut self, entity: EntityId) {
        self.running.retain(|(_, e, _)| *e != entity);
    }

    pub fn get(&self, id: TweenId) -> Option<&Tween> {
        self.running
            .iter()
            .find(|(t, _, _)| *t == id)
            .map(|(_, _, tween)| tween)
    }

    /// Advance every tween by `dt` and write it to its entity. Tweens whose
    /// entity is gone still run out their clock. Returns how many finished.
    pub fn tick(&mut self, dt: f32, scene: &mut Scene) -> usize {
        let completed = &mut self.completed;
        let mut finished = 0;

        self.running.retain_mut(|(_, entity, tween)| {
            tween.elapsed += dt;
            if let Some(e) = scene.get_mut(*entity) {
                tween.write(e);
            }
            if tween.elapsed < tween.duration {
                return true;
            }
            match tween.loop_mode {
                TweenLoop::PingPong => {
                    tween.elapsed = 0.0;
                    tween.backward = !tween.backward;
                    true
                }
                TweenLoop::Once => {
                    completed.extend(tween.on_complete);
                    finished += 1;
                    false
                }
            }
        });

        finished
    }

    /// Completion ids reported since the last drain.
    pub fn drain_completed(&mut self) -> impl Iterator<Item = u32> + '_ {
        self.completed.drain(..)
    }

    pub fn len(&self) -> usize {
        self.running.len()
    }

    pub fn is_empty(&self) -> bool {
        self.running.is_empty()
    }

    pub fn clear(&mut self) {
        self.running.clear();
        self.completed.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scene_with(id: EntityId, pos: Vec2) -> Scene {
        let mut scene = Scene::new();
        scene.spawn(Entity::new(id).with_pos(pos));
        scene
    }

    #[test]
    fn flight_reports_completion_once() {
        let id = EntityId(1);
        let mut scene = scene_with(id, Vec2::new(-200.0, 100.0));
        let mut tweens = TweenState::new();
        tweens.add(
            id,
            Tween::position(Vec2::new(-200.0, 100.0), Vec2::new(300.0, 160.0), 1.0, Easing::Linear)
                .with_on_complete(7),
        );

        tweens.tick(0.5, &mut scene);
        assert!((scene.get(id).unwrap().pos.x - 50.0).abs() < 0.01);
        assert_eq!(tweens.drain_completed().count(), 0);

        assert_eq!(tweens.tick(0.5, &mut scene), 1);
        assert_eq!(scene.get(id).unwrap().pos, Vec2::new(300.0, 160.0));
        assert_eq!(tweens.drain_completed().collect::<Vec<_>>(), vec![7]);
        assert!(tweens.is_empty());
    }

    #[test]
    fn completions_arrive_in_finish_order() {
        let id = EntityId(1);
        let mut scene = scene_with(id, Vec2::ZERO);
        let mut tweens = TweenState::new();
        tweens.add(id, Tween::size(0.0, 1.0, 2.0, Easing::Linear).with_on_complete(1));
        tweens.add(id, Tween::position_y(0.0, 1.0, 1.0, Easing::Linear).with_on_complete(2));
        tweens.tick(1.0, &mut scene);
        tweens.tick(1.0, &mut scene);
        assert_eq!(tweens.drain_completed().collect::<Vec<_>>(), vec![2, 1]);
    }

    #[test]
    fn ping_pong_hovers() {
        let id = EntityId(1);
        let mut scene = scene_with(id, Vec2::new(0.0, 160.0));
        let mut tweens = TweenState::new();
        let bob = tweens.add(
            id,
            Tween::position_y(160.0, 176.0, 1.0, Easing::SineInOut)
                .with_loop(TweenLoop::PingPong)
                .with_on_complete(9),
        );

        tweens.tick(1.0, &mut scene);
        assert!((scene.get(id).unwrap().pos.y - 176.0).abs() < 0.01);
        tweens.tick(1.0, &mut scene);
        assert!((scene.get(id).unwrap().pos.y - 160.0).abs() < 0.01);
        assert!(!tweens.get(bob).unwrap().is_complete());
        assert_eq!(tweens.drain_completed().count(), 0);
    }

    #[test]
    fn zero_duration_snaps() {
        let id = EntityId(1);
        let mut scene = scene_with(id, Vec2::ZERO);
        let mut tweens = TweenState::new();
        tweens.add(id, Tween::size(150.0, 300.0, 0.0, Easing::CubicInOut));
        assert_eq!(tweens.tick(0.0, &mut scene), 1);
        assert_eq!(scene.get(id).unwrap().size, Vec2::splat(300.0));
    }

    #[test]
    fn removing_an_entity_cancels_its_completions() {
        let id = EntityId(1);
        let mut scene = scene_with(id, Vec2::ZERO);
        let mut tweens = TweenState::new();
        tweens.add(id, Tween::position_y(0.0, 1.0, 1.0, Easing::Linear).with_on_complete(3));
        let other = tweens.add(EntityId(2), Tween::position_y(0.0, 1.0, 1.0, Easing::Linear));

        tweens.remove_entity(id);
        assert_eq!(tweens.len(), 1);
        tweens.tick(2.0, &mut scene);
        assert_eq!(tweens.drain_completed().count(), 0);
        assert!(!tweens.remove(other));
    }
}
