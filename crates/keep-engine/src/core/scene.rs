use std::collections::BTreeMap;

use crate::api::types::EntityId;
use crate::components::entity::Entity;

/// Entity storage keyed by id. Iteration runs in id order, so draw order is
/// spawn order and stays stable across despawns.
#[derive(Debug, Default)]
pub struct Scene {
    entities: BTreeMap<EntityId, Entity>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entity, replacing any previous one with the same id.
    pub fn spawn(&mut self, entity: Entity) -> EntityId {
        let id = entity.id;
        if self.entities.insert(id, entity).is_some() {
            log::warn!("entity {:?} spawned twice, replaced", id);
        }
        id
    }

    pub fn despawn(&mut self, id: EntityId) -> Option<Entity> {
        self.entities.remove(&id)
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    pub fn find_by_tag(&self, tag: &str) -> Option<&Entity> {
        self.iter().find(|e| e.tag == tag)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    #[test]
    fn iterates_in_id_order() {
        let mut scene = Scene::new();
        scene.spawn(Entity::new(EntityId(3)).with_tag("bubble"));
        scene.spawn(Entity::new(EntityId(1)).with_tag("dragon"));
        let tags: Vec<&str> = scene.iter().map(|e| e.tag.as_str()).collect();
        assert_eq!(tags, ["dragon", "bubble"]);
        assert_eq!(scene.find_by_tag("bubble").map(|e| e.id), Some(EntityId(3)));
    }

    #[test]
    fn respawn_replaces() {
        let mut scene = Scene::new();
        scene.spawn(Entity::new(EntityId(1)).with_pos(Vec2::new(-200.0, 100.0)));
        scene.spawn(Entity::new(EntityId(1)).with_pos(Vec2::new(5.0, 5.0)));
        assert_eq!(scene.len(), 1);
        assert_eq!(scene.get(EntityId(1)).unwrap().pos, Vec2::new(5.0, 5.0));
    }

    #[test]
    fn despawn_unknown_is_none() {
        let mut scene = Scene::new();
        scene.spawn(Entity::new(EntityId(1)));
        assert!(scene.despawn(EntityId(9)).is_none());
        assert!(scene.despawn(EntityId(1)).is_some());
        assert!(scene.is_empty());
    }
}
