//! Slot storage for element states.

use core::fmt;

/// A handle on an [`ElementState`](super::ElementState).
///
/// Handles are generational: once a state is torn down its handle never
/// resolves again, even if the slot is reused for a new state.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct StateId {
    index: u32,
    generation: u32,
}

impl StateId {
    const fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    /// The slot index.
    #[must_use]
    pub const fn index(self) -> u32 {
        self.index
    }

    /// The slot generation this handle was issued for.
    #[must_use]
    pub const fn generation(self) -> u32 {
        self.generation
    }

    const fn slot(self) -> usize {
        self.index as usize
    }
}

impl fmt::Debug for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StateId({}v{})", self.index, self.generation)
    }
}

struct Slot<T> {
    generation: u32,
    value: T,
}

/// Generational storage with slot reuse.
pub(crate) struct Arena<T> {
    slots: Vec<Option<Slot<T>>>,
    generations: Vec<u32>,
    free_list: Vec<usize>,
    len: usize,
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            len: 0,
        }
    }
}

impl<T> Arena<T> {
    pub(crate) fn insert(&mut self, value: T) -> StateId {
        self.len += 1;
        if let Some(slot) = self.free_list.pop() {
            let generation = self.generations[slot].saturating_add(1);
            self.generations[slot] = generation;
            self.slots[slot] = Some(Slot { generation, value });
            return StateId::new(index_of(slot), generation);
        }

        let generation = 1;
        self.slots.push(Some(Slot { generation, value }));
        self.generations.push(generation);
        StateId::new(index_of(self.slots.len() - 1), generation)
    }

    pub(crate) fn remove(&mut self, id: StateId) -> Option<T> {
        let slot = self.slots.get_mut(id.slot())?;
        if slot.as_ref().is_none_or(|slot| slot.generation != id.generation) {
            return None;
        }
        let removed = slot.take().map(|slot| slot.value);
        self.free_list.push(id.slot());
        self.len -= 1;
        removed
    }

    pub(crate) fn get(&self, id: StateId) -> Option<&T> {
        match self.slots.get(id.slot())? {
            Some(slot) if slot.generation == id.generation => Some(&slot.value),
            _ => None,
        }
    }

    pub(crate) fn get_mut(&mut self, id: StateId) -> Option<&mut T> {
        match self.slots.get_mut(id.slot())? {
            Some(slot) if slot.generation == id.generation => Some(&mut slot.value),
            _ => None,
        }
    }

    pub(crate) fn contains(&self, id: StateId) -> bool {
        self.get(id).is_some()
    }

    pub(crate) const fn len(&self) -> usize {
        self.len
    }

    pub(crate) fn clear(&mut self) {
        for (slot, entry) in self.slots.iter_mut().enumerate() {
            if entry.take().is_some() {
                self.free_list.push(slot);
            }
        }
        self.len = 0;
    }
}

fn index_of(slot: usize) -> u32 {
    u32::try_from(slot).unwrap_or_else(|_| panic!("state arena exceeded {} slots", u32::MAX))
}
