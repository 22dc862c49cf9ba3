//! In-memory world backend
//!
//! Holds entities in a map, records every command it receives and owns a
//! [`TimerQueue`]. No physics runs here: positions only change when a caller
//! moves an entity explicitly. Ids are minted from a seeded RNG so runs are
//! reproducible.

use std::collections::BTreeMap;

use glam::{Quat, Vec3};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::{AudioOptions, EntityId, NewEntity, SoundHandle, World};
use crate::scheduler::{ScheduledTask, TimerQueue};

/// A sound played through the backend
#[derive(Debug, Clone, PartialEq)]
pub struct PlayedSound {
    pub sound: SoundHandle,
    pub url: String,
    pub options: AudioOptions,
}

/// In-process [`World`] implementation
#[derive(Debug, Clone)]
pub struct MemoryWorld {
    rng: Pcg32,
    entities: BTreeMap<EntityId, NewEntity>,
    observer: Vec3,
    sounds: Vec<String>,
    /// Every sound played, oldest first
    pub played: Vec<PlayedSound>,
    /// Every entity created through [`World::add_entity`], oldest first
    pub created: Vec<EntityId>,
    /// Every entity deleted through [`World::delete_entity`], oldest first
    pub deleted: Vec<EntityId>,
    timers: TimerQueue,
}

impl Default for MemoryWorld {
    fn default() -> Self {
        Self::new(0)
    }
}

impl MemoryWorld {
    /// Create an empty world; `seed` drives id generation
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            entities: BTreeMap::new(),
            observer: Vec3::ZERO,
            sounds: Vec::new(),
            played: Vec::new(),
            created: Vec::new(),
            deleted: Vec::new(),
            timers: TimerQueue::new(),
        }
    }

    /// Insert an entity without recording it as a command (scene setup)
    pub fn insert(&mut self, entity: NewEntity) -> EntityId {
        let id = self.mint_id();
        self.entities.insert(id.clone(), entity);
        id
    }

    /// Whether `id` is a live entity
    pub fn contains(&self, id: &EntityId) -> bool {
        self.entities.contains_key(id)
    }

    /// Number of live entities
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Live entities whose name contains `tag`
    pub fn entities_tagged(&self, tag: &str) -> Vec<EntityId> {
        self.entities
            .iter()
            .filter(|(_, e)| e.name.contains(tag))
            .map(|(id, _)| id.clone())
            .collect()
    }

    /// Full properties of a live entity
    pub fn entity(&self, id: &EntityId) -> Option<&NewEntity> {
        self.entities.get(id)
    }

    /// Move an entity (stands in for the physics engine). Returns false if missing.
    pub fn set_position(&mut self, id: &EntityId, position: Vec3) -> bool {
        match self.entities.get_mut(id) {
            Some(e) => {
                e.position = position;
                true
            }
            None => false,
        }
    }

    pub fn set_rotation(&mut self, id: &EntityId, rotation: Quat) -> bool {
        match self.entities.get_mut(id) {
            Some(e) => {
                e.rotation = rotation;
                true
            }
            None => false,
        }
    }

    /// Replace an entity's metadata blob (external edit)
    pub fn set_user_data(&mut self, id: &EntityId, user_data: Option<String>) -> bool {
        match self.entities.get_mut(id) {
            Some(e) => {
                e.user_data = user_data;
                true
            }
            None => false,
        }
    }

    pub fn set_observer_position(&mut self, position: Vec3) {
        self.observer = position;
    }

    /// Pending timers
    pub fn timers(&self) -> &TimerQueue {
        &self.timers
    }

    /// Advance the timer clock and return tasks that became due
    pub fn advance(&mut self, elapsed_ms: u64) -> Vec<ScheduledTask> {
        self.timers.advance(elapsed_ms)
    }

    /// Uuid-shaped id from the seeded RNG
    fn mint_id(&mut self) -> EntityId {
        loop {
            let hi: u64 = self.rng.random();
            let lo: u64 = self.rng.random();
            let id = EntityId::new(format!(
                "{{{:08x}-{:04x}-{:04x}-{:04x}-{:012x}}}",
                hi >> 32,
                (hi >> 16) & 0xffff,
                hi & 0xffff,
                lo >> 48,
                lo & 0xffff_ffff_ffff
            ));
            if !self.entities.contains_key(&id) {
                return id;
            }
        }
    }
}

impl World for MemoryWorld {
    fn position(&self, id: &EntityId) -> Option<Vec3> {
        self.entities.get(id).map(|e| e.position)
    }

    fn rotation(&self, id: &EntityId) -> Option<Quat> {
        self.entities.get(id).map(|e| e.rotation)
    }

    fn name(&self, id: &EntityId) -> Option<String> {
        self.entities.get(id).map(|e| e.name.clone())
    }

    fn user_data(&self, id: &EntityId) -> Option<String> {
        self.entities.get(id).and_then(|e| e.user_data.clone())
    }

    fn add_entity(&mut self, entity: NewEntity) -> EntityId {
        let id = self.insert(entity);
        self.created.push(id.clone());
        id
    }

    fn delete_entity(&mut self, id: &EntityId) {
        if self.entities.remove(id).is_some() {
            self.deleted.push(id.clone());
        }
    }

    fn find_entities(&self, center: Vec3, radius: f32) -> Vec<EntityId> {
        self.entities
            .iter()
            .filter(|(_, e)| e.position.distance(center) <= radius)
            .map(|(id, _)| id.clone())
            .collect()
    }

    fn observer_position(&self) -> Vec3 {
        self.observer
    }

    fn load_sound(&mut self, url: &str) -> SoundHandle {
        if let Some(idx) = self.sounds.iter().position(|s| s == url) {
            return SoundHandle(idx as u32);
        }
        self.sounds.push(url.to_string());
        SoundHandle((self.sounds.len() - 1) as u32)
    }

    fn play_sound(&mut self, sound: SoundHandle, options: AudioOptions) {
        let url = self
            .sounds
            .get(sound.0 as usize)
            .cloned()
            .unwrap_or_default();
        self.played.push(PlayedSound {
            sound,
            url,
            options,
        });
    }

    fn schedule_after(&mut self, delay_ms: u64, task: ScheduledTask) {
        self.timers.schedule(delay_ms, task);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(name: &str, position: Vec3) -> NewEntity {
        NewEntity {
            name: name.to_string(),
            position,
            ..Default::default()
        }
    }

    #[test]
    fn test_ids_are_deterministic_per_seed() {
        let mut a = MemoryWorld::new(7);
        let mut b = MemoryWorld::new(7);
        let ida = a.insert(named("x", Vec3::ZERO));
        let idb = b.insert(named("x", Vec3::ZERO));
        assert_eq!(ida, idb);
        assert!(ida.as_str().starts_with('{') && ida.as_str().ends_with('}'));
        assert_eq!(ida.as_str().len(), 38);
    }

    #[test]
    fn test_find_entities_radius_inclusive() {
        let mut world = MemoryWorld::new(1);
        let near = world.insert(named("near", Vec3::new(10.0, 0.0, 0.0)));
        let _far = world.insert(named("far", Vec3::new(10.5, 0.0, 0.0)));

        let found = world.find_entities(Vec3::ZERO, 10.0);
        assert_eq!(found, vec![near]);
    }

    #[test]
    fn test_commands_are_recorded() {
        let mut world = MemoryWorld::new(1);
        let id = world.add_entity(named("Hifi Tilt Maze Ball", Vec3::ZERO));
        assert_eq!(world.created, vec![id.clone()]);
        assert_eq!(world.entities_tagged("Maze Ball"), vec![id.clone()]);

        world.delete_entity(&id);
        world.delete_entity(&id);
        assert_eq!(world.deleted, vec![id.clone()]);
        assert!(!world.contains(&id));
        assert_eq!(world.position(&id), None);
    }

    #[test]
    fn test_sounds_load_once_and_play() {
        let mut world = MemoryWorld::new(1);
        let a = world.load_sound("a.wav");
        let again = world.load_sound("a.wav");
        assert_eq!(a, again);

        let options = AudioOptions {
            position: Vec3::ONE,
            volume: 0.25,
        };
        world.play_sound(a, options);
        assert_eq!(world.played.len(), 1);
        assert_eq!(world.played[0].url, "a.wav");
        assert_eq!(world.played[0].options, options);
    }
}
