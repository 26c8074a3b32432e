use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tracing::debug;

use crate::code::CodeGenerator;
use crate::room::Room;

/// All open rooms, keyed by code.
///
/// Backed by a sharded map so mutations on unrelated rooms never contend
/// on one global lock, while insert and remove stay atomic for a given
/// code. `update` scopes each mutation to a closure; callers stage any
/// outbound messages inside it and send them after the guard is gone.
pub struct RoomRegistry {
    rooms: DashMap<String, Room>,
    codes: Box<dyn CodeGenerator>,
}

impl RoomRegistry {
    pub fn new(codes: Box<dyn CodeGenerator>) -> Self {
        Self {
            rooms: DashMap::new(),
            codes,
        }
    }

    /// Allocate an unused code and insert the room built for it. Candidate
    /// codes are drawn until one is free, so no two open rooms ever share
    /// a code.
    pub fn create(&self, build: impl FnOnce(&str) -> Room) -> String {
        loop {
            let candidate = self.codes.generate();
            match self.rooms.entry(candidate.clone()) {
                Entry::Occupied(_) => continue,
                Entry::Vacant(slot) => {
                    slot.insert(build(&candidate));
                    debug!("Registered room {}", candidate);
                    break candidate;
                }
            }
        }
    }

    /// Run `f` against the room under its shard lock.
    pub fn update<T>(&self, code: &str, f: impl FnOnce(&mut Room) -> T) -> Option<T> {
        self.rooms.get_mut(code).map(|mut room| f(&mut room))
    }

    /// Read-only variant of [`RoomRegistry::update`].
    pub fn read<T>(&self, code: &str, f: impl FnOnce(&Room) -> T) -> Option<T> {
        self.rooms.get(code).map(|room| f(&room))
    }

    /// Visit every room; used to sweep a dropped connection's memberships.
    pub fn for_each_mut(&self, mut f: impl FnMut(&mut Room)) {
        for mut entry in self.rooms.iter_mut() {
            f(entry.value_mut());
        }
    }

    pub fn remove(&self, code: &str) {
        if self.rooms.remove(code).is_some() {
            debug!("Removed room {}", code);
        }
    }

    pub fn contains(&self, code: &str) -> bool {
        self.rooms.contains_key(code)
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }
}
