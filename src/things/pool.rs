//! Fixed-capacity thing arena with index recycling
//!
//! Deleting a thing bumps its slot generation at once, so outstanding
//! handles go stale immediately. The slot itself is only handed out again
//! after `reclaim()`, which the tick driver calls once the thing that
//! caused the deletion has finished its update. `delete_for_reuse()` is
//! the exception: the slot goes straight back for an immediate replacement.

use std::collections::VecDeque;

use crate::things::{AllocFlags, Thing, ThingClass, ThingId};

#[derive(Debug, Default)]
struct Slot {
    generation: u32,
    thing: Option<Thing>,
}

#[derive(Debug)]
pub struct ThingPool {
    slots: Vec<Slot>,
    free: VecDeque<u32>,
    pending: Vec<u32>,
    live: usize,
}

impl ThingPool {
    pub fn with_capacity(capacity: usize) -> Self {
        let mut slots = Vec::with_capacity(capacity);
        slots.resize_with(capacity, Slot::default);
        Self {
            slots,
            free: (0..capacity as u32).collect(),
            pending: Vec::new(),
            live: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of live things
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Slots ready for allocation right now
    pub fn free_slots(&self) -> usize {
        self.free.len()
    }

    /// Whether `allocate` would succeed with these flags
    pub fn can_allocate(&self, flags: AllocFlags) -> bool {
        if !self.free.is_empty() {
            return true;
        }
        flags.contains(AllocFlags::FREE_EFFECT_IF_NO_SLOTS) && self.oldest_effect().is_some()
    }

    /// Allocate a slot and store the thing `build` makes for it.
    ///
    /// Returns `None` when the pool is exhausted.
    pub fn allocate<F>(&mut self, flags: AllocFlags, build: F) -> Option<ThingId>
    where
        F: FnOnce(ThingId) -> Thing,
    {
        let index = match self.free.pop_front() {
            Some(index) => index,
            None if flags.contains(AllocFlags::FREE_EFFECT_IF_NO_SLOTS) => self.evict_oldest_effect()?,
            None => return None,
        };
        let slot = &mut self.slots[index as usize];
        let id = ThingId {
            index,
            generation: slot.generation,
        };
        slot.thing = Some(build(id));
        self.live += 1;
        Some(id)
    }

    /// Remove a thing. Its handle is stale from now on; the slot becomes
    /// reusable at the next `reclaim()`.
    pub fn delete(&mut self, id: ThingId) -> Option<Thing> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        let thing = slot.thing.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.pending.push(id.index);
        self.live -= 1;
        Some(thing)
    }

    /// Remove a thing and make its slot the next one handed out.
    ///
    /// For a thing that is replaced on the spot (a creature by its corpse,
    /// a corpse by its recreated body): the replacement gets the same slot
    /// under a new generation even when the pool is full.
    pub fn delete_for_reuse(&mut self, id: ThingId) -> Option<Thing> {
        let thing = self.delete(id)?;
        if let Some(pos) = self.pending.iter().rposition(|&index| index == id.index) {
            self.pending.swap_remove(pos);
        }
        self.free.push_front(id.index);
        Some(thing)
    }

    /// Return slots of deleted things to the free list
    pub fn reclaim(&mut self) {
        self.free.extend(self.pending.drain(..));
    }

    pub fn get(&self, id: ThingId) -> Option<&Thing> {
        let slot = self.slots.get(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.thing.as_ref()
    }

    pub fn get_mut(&mut self, id: ThingId) -> Option<&mut Thing> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.thing.as_mut()
    }

    pub fn contains(&self, id: ThingId) -> bool {
        self.get(id).is_some()
    }

    /// Snapshot of the handles of every live thing of a class, in slot order
    pub fn ids_of_class(&self, class: ThingClass) -> Vec<ThingId> {
        self.iter()
            .filter(|thing| thing.class() == class)
            .map(|thing| thing.id)
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Thing> + '_ {
        self.slots.iter().filter_map(|slot| slot.thing.as_ref())
    }

    pub fn count_of_class(&self, class: ThingClass) -> usize {
        self.iter().filter(|thing| thing.class() == class).count()
    }

    fn oldest_effect(&self) -> Option<ThingId> {
        self.iter()
            .filter(|thing| thing.class() == ThingClass::Effect)
            .min_by_key(|thing| (thing.creation_turn, thing.id.index))
            .map(|thing| thing.id)
    }

    /// Drop the oldest effect and hand its slot straight back. Effects are
    /// never the thing being updated, so the slot is safe to reuse at once.
    fn evict_oldest_effect(&mut self) -> Option<u32> {
        let victim = self.oldest_effect()?;
        let slot = &mut self.slots[victim.index as usize];
        slot.thing = None;
        slot.generation = slot.generation.wrapping_add(1);
        self.live -= 1;
        tracing::debug!("Freed effect slot {} to make room", victim.index);
        Some(victim.index)
    }
}
