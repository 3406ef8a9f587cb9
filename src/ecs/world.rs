//! Game world - owns the thing pool and all per-level state
//!
//! Corpse and capture code receive the world by `&mut` instead of reaching
//! for globals; counters that used to be process-wide live on the records
//! that own them.

use ahash::AHashMap;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::core::config::{CreatureModelConfig, GameConfig};
use crate::core::error::{KeeperError, Result};
use crate::core::types::{Coord3d, CreatureModel, PlayerId, RoomId, Tick};
use crate::creature::creature_score;
use crate::simulation::events::SimulationEvent;
use crate::things::{
    AllocFlags, CreatureControl, EffectData, EffectKind, Thing, ThingData, ThingId, ThingPool,
};
use crate::world::{Dungeon, GameMap, PlayerInfo, Room, RoomKind};

/// The game world containing all things and level records
pub struct World {
    pub config: GameConfig,
    pub current_turn: Tick,
    pub things: ThingPool,
    pub map: GameMap,
    rooms: AHashMap<RoomId, Room>,
    dungeons: AHashMap<PlayerId, Dungeon>,
    players: AHashMap<PlayerId, PlayerInfo>,
    rng: ChaCha8Rng,
    next_room_id: u32,
    events: Vec<SimulationEvent>,
}

impl World {
    pub fn new(config: GameConfig) -> Self {
        let things = ThingPool::with_capacity(config.thing_pool_capacity);
        let map = GameMap::new(config.map_width, config.map_height);
        let rng = ChaCha8Rng::seed_from_u64(config.rng_seed);

        Self {
            config,
            current_turn: 0,
            things,
            map,
            rooms: AHashMap::new(),
            dungeons: AHashMap::new(),
            players: AHashMap::new(),
            rng,
            next_room_id: 1,
            events: Vec::new(),
        }
    }

    pub fn tick(&mut self) {
        self.current_turn += 1;
    }

    pub fn rng_mut(&mut self) -> &mut ChaCha8Rng {
        &mut self.rng
    }

    pub fn model_config(&self, model: CreatureModel) -> Option<&CreatureModelConfig> {
        self.config.creature_model(model)
    }

    pub fn is_neutral(&self, owner: PlayerId) -> bool {
        owner == self.config.neutral_player
    }

    // === DUNGEONS AND PLAYERS ===

    pub fn dungeon(&self, owner: PlayerId) -> Option<&Dungeon> {
        self.dungeons.get(&owner)
    }

    /// Dungeon record of a player, created empty on first use
    pub fn dungeon_mut(&mut self, owner: PlayerId) -> &mut Dungeon {
        self.dungeons
            .entry(owner)
            .or_insert_with(|| Dungeon::new(owner))
    }

    pub fn player(&self, id: PlayerId) -> Option<&PlayerInfo> {
        self.players.get(&id)
    }

    pub fn player_mut(&mut self, id: PlayerId) -> &mut PlayerInfo {
        self.players
            .entry(id)
            .or_insert_with(|| PlayerInfo::new(id))
    }

    /// Player currently possessing the given thing
    pub fn player_controlling(&self, thing: ThingId) -> Option<PlayerId> {
        self.players
            .values()
            .find(|player| player.controls(thing))
            .map(|player| player.id)
    }

    // === ROOMS ===

    /// Create a room over the inclusive subtile rectangle `from..=to`
    pub fn add_room(
        &mut self,
        kind: RoomKind,
        owner: PlayerId,
        from: (i32, i32),
        to: (i32, i32),
        capacity: u32,
    ) -> RoomId {
        let id = RoomId(self.next_room_id);
        self.next_room_id += 1;

        let mut room = Room::new(id, kind, owner, capacity);
        for stl_y in from.1.min(to.1)..=from.1.max(to.1) {
            for stl_x in from.0.min(to.0)..=from.0.max(to.0) {
                if let Some(block) = self.map.block_mut(stl_x, stl_y) {
                    block.room = Some(id);
                    room.subtiles.push((stl_x, stl_y));
                }
            }
        }
        self.rooms.insert(id, room);
        id
    }

    pub fn room(&self, id: RoomId) -> Option<&Room> {
        self.rooms.get(&id)
    }

    pub fn room_mut(&mut self, id: RoomId) -> Option<&mut Room> {
        self.rooms.get_mut(&id)
    }

    pub fn rooms(&self) -> impl Iterator<Item = &Room> + '_ {
        self.rooms.values()
    }

    /// Room under the thing's position
    pub fn room_thing_is_on(&self, thing: ThingId) -> Option<RoomId> {
        let thing = self.things.get(thing)?;
        self.map.room_at(&thing.mappos)
    }

    // === THINGS ===

    /// Spawn a living creature and add its score to the owner
    pub fn create_creature(
        &mut self,
        pos: Coord3d,
        model: CreatureModel,
        owner: PlayerId,
    ) -> Result<ThingId> {
        let score = self
            .model_config(model)
            .map(|cfg| creature_score(cfg, 0))
            .ok_or_else(|| KeeperError::Config(format!("unknown creature model {}", model.0)))?;
        let turn = self.current_turn;
        let height = self.map.ground_height_at(&pos);
        let id = self
            .things
            .allocate(AllocFlags::FREE_EFFECT_IF_NO_SLOTS, |id| {
                let mut thing = Thing::new(
                    id,
                    model,
                    owner,
                    ThingData::Creature(CreatureControl::default()),
                );
                thing.mappos = Coord3d { z: height, ..pos };
                thing.creation_turn = turn;
                thing
            })
            .ok_or(KeeperError::PoolExhausted { model, owner })?;
        self.dungeon_mut(owner).creature_score += score;
        Ok(id)
    }

    /// Change a creature's experience level, keeping the owner score in step
    pub fn set_creature_level(&mut self, id: ThingId, exp_level: u8) -> Result<()> {
        self.remove_creature_score_from_owner(id)?;
        if let Some(thing) = self.things.get_mut(id) {
            if let ThingData::Creature(cctrl) = &mut thing.data {
                cctrl.exp_level = exp_level;
            }
        }
        self.add_creature_score_to_owner(id)
    }

    fn owner_score_of(&self, id: ThingId) -> Result<(PlayerId, i64)> {
        let thing = self.things.get(id).ok_or(KeeperError::ThingNotFound(id))?;
        let cctrl = thing.creature().ok_or(KeeperError::ThingNotFound(id))?;
        let score = self
            .model_config(thing.model)
            .map(|cfg| creature_score(cfg, cctrl.exp_level))
            .unwrap_or(0);
        Ok((thing.owner, score))
    }

    pub fn add_creature_score_to_owner(&mut self, id: ThingId) -> Result<()> {
        let (owner, score) = self.owner_score_of(id)?;
        self.dungeon_mut(owner).creature_score += score;
        Ok(())
    }

    pub fn remove_creature_score_from_owner(&mut self, id: ThingId) -> Result<()> {
        let (owner, score) = self.owner_score_of(id)?;
        self.dungeon_mut(owner).creature_score -= score;
        Ok(())
    }

    /// Place a thing at a new position
    pub fn move_thing_in_map(&mut self, id: ThingId, pos: Coord3d) {
        if let Some(thing) = self.things.get_mut(id) {
            thing.mappos = pos;
        }
    }

    /// Spawn a visual effect. Effects never evict other things, so a full
    /// pool just means no effect.
    pub fn create_effect(
        &mut self,
        pos: Coord3d,
        kind: EffectKind,
        owner: PlayerId,
    ) -> Option<ThingId> {
        let turn = self.current_turn;
        let id = self.things.allocate(AllocFlags::empty(), |id| {
            let mut thing = Thing::new(
                id,
                CreatureModel(0),
                owner,
                ThingData::Effect(EffectData::new(kind)),
            );
            thing.mappos = pos;
            thing.creation_turn = turn;
            thing
        });
        match id {
            Some(_) => self.push_event(SimulationEvent::EffectCreated { kind, pos, owner }),
            None => tracing::debug!("No slot for {:?} effect at {}", kind, pos),
        }
        id
    }

    // === EVENTS ===

    pub fn push_event(&mut self, event: SimulationEvent) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[SimulationEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<SimulationEvent> {
        std::mem::take(&mut self.events)
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new(GameConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::things::ThingClass;

    fn small_world() -> World {
        World::new(GameConfig {
            map_width: 16,
            map_height: 16,
            thing_pool_capacity: 8,
            ..GameConfig::default()
        })
    }

    #[test]
    fn test_create_creature_adds_score() {
        let mut world = small_world();
        let troll = world.config.model_by_name("TROLL").unwrap();
        let id = world
            .create_creature(Coord3d::at_subtile(3, 3), troll, PlayerId(0))
            .unwrap();
        assert_eq!(world.things.get(id).unwrap().class(), ThingClass::Creature);
        assert_eq!(world.dungeon(PlayerId(0)).unwrap().creature_score, 60);

        world.set_creature_level(id, 2).unwrap();
        assert_eq!(world.dungeon(PlayerId(0)).unwrap().creature_score, 180);

        world.remove_creature_score_from_owner(id).unwrap();
        assert_eq!(world.dungeon(PlayerId(0)).unwrap().creature_score, 0);
    }

    #[test]
    fn test_creature_rests_on_ground() {
        let mut world = small_world();
        let id = world
            .create_creature(Coord3d::at_subtile(2, 2), CreatureModel(0), PlayerId(1))
            .unwrap();
        assert_eq!(
            world.things.get(id).unwrap().mappos.z,
            crate::world::FLOOR_HEIGHT
        );
    }

    #[test]
    fn test_unknown_model_rejected() {
        let mut world = small_world();
        let result = world.create_creature(Coord3d::ZERO, CreatureModel(99), PlayerId(0));
        assert!(matches!(result, Err(KeeperError::Config(_))));
    }

    #[test]
    fn test_add_room_marks_map() {
        let mut world = small_world();
        let id = world.add_room(RoomKind::Graveyard, PlayerId(0), (2, 2), (4, 3), 5);
        let room = world.room(id).unwrap();
        assert_eq!(room.subtiles.len(), 6);
        assert_eq!(world.map.room_at(&Coord3d::at_subtile(4, 3)), Some(id));
        assert_eq!(world.map.room_at(&Coord3d::at_subtile(5, 3)), None);
    }

    #[test]
    fn test_effect_creation_reports_event() {
        let mut world = small_world();
        let id = world.create_effect(Coord3d::at_subtile(1, 1), EffectKind::Blood, PlayerId(0));
        assert!(id.is_some());
        assert!(matches!(
            world.events()[0],
            SimulationEvent::EffectCreated { kind: EffectKind::Blood, .. }
        ));
    }

    #[test]
    fn test_player_controlling() {
        let mut world = small_world();
        let id = world
            .create_creature(Coord3d::at_subtile(2, 2), CreatureModel(0), PlayerId(0))
            .unwrap();
        assert_eq!(world.player_controlling(id), None);
        world.player_mut(PlayerId(0)).controlled_thing = Some(id);
        assert_eq!(world.player_controlling(id), Some(PlayerId(0)));
    }
}
