//! Registry: generational arena that owns every live actor.
//!
//! Slots are reused; each reuse bumps the slot generation so a stale
//! `ActorId` held by a player record or an AI target resolves to `None`.
//!
//! Iteration order is reverse spawn order (newest first). Callers that
//! mutate while iterating take an id snapshot with `ids()` first.

use crate::domain::actor::{Actor, ActorId};

#[derive(Clone, Debug)]
struct Slot {
    generation: u32,
    actor: Option<Actor>,
}

#[derive(Clone, Debug, Default)]
pub struct Registry {
    slots: Vec<Slot>,
    free: Vec<u32>,
    /// Live ids, oldest first.
    order: Vec<ActorId>,
}

impl Registry {
    pub fn new() -> Self {
        Registry::default()
    }

    /// Allocate an id and store the actor `build` makes for it.
    pub fn insert_with(&mut self, build: impl FnOnce(ActorId) -> Actor) -> ActorId {
        let id = match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.generation += 1;
                ActorId { index, generation: slot.generation }
            }
            None => {
                self.slots.push(Slot { generation: 0, actor: None });
                ActorId { index: (self.slots.len() - 1) as u32, generation: 0 }
            }
        };
        self.slots[id.index as usize].actor = Some(build(id));
        self.order.push(id);
        id
    }

    pub fn get(&self, id: ActorId) -> Option<&Actor> {
        let slot = self.slots.get(id.index as usize)?;
        if slot.generation != id.generation { return None; }
        slot.actor.as_ref()
    }

    pub fn get_mut(&mut self, id: ActorId) -> Option<&mut Actor> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation { return None; }
        slot.actor.as_mut()
    }

    pub fn contains(&self, id: ActorId) -> bool {
        self.get(id).is_some()
    }

    /// Unlink and return the actor. Stale ids are ignored.
    pub fn remove(&mut self, id: ActorId) -> Option<Actor> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation { return None; }
        let actor = slot.actor.take()?;
        self.free.push(id.index);
        self.order.retain(|&o| o != id);
        Some(actor)
    }

    /// Snapshot of live ids, newest first.
    pub fn ids(&self) -> Vec<ActorId> {
        self.order.iter().rev().copied().collect()
    }

    /// Live actors, newest first.
    pub fn iter(&self) -> impl Iterator<Item = &Actor> + '_ {
        self.order.iter().rev().filter_map(move |&id| self.get(id))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Two distinct actors mutably at once.
    pub fn pair_mut(&mut self, a: ActorId, b: ActorId) -> Option<(&mut Actor, &mut Actor)> {
        if a.index == b.index { return None; }
        if !self.contains(a) || !self.contains(b) { return None; }
        let (lo, hi, swapped) = if a.index < b.index { (a, b, false) } else { (b, a, true) };
        let (left, right) = self.slots.split_at_mut(hi.index as usize);
        let first = left[lo.index as usize].actor.as_mut()?;
        let second = right[0].actor.as_mut()?;
        if swapped { Some((second, first)) } else { Some((first, second)) }
    }
}
