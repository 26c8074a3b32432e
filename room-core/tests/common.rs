use std::sync::Mutex;

use room_core::{CodeGenerator, MemberId, Room, RoomRegistry, WordSource};
use uuid::Uuid;

/// Word source that always hands out the same word.
pub struct FixedWord(pub &'static str);

impl WordSource for FixedWord {
    fn pick(&self) -> String {
        self.0.to_string()
    }
}

/// Code generator that replays a scripted sequence.
pub struct CannedCodes(Mutex<Vec<&'static str>>);

impl CannedCodes {
    pub fn new(codes: &[&'static str]) -> Box<Self> {
        Box::new(Self(Mutex::new(codes.to_vec())))
    }
}

impl CodeGenerator for CannedCodes {
    fn generate(&self) -> String {
        self.0.lock().unwrap().remove(0).to_string()
    }
}

pub fn member() -> MemberId {
    Uuid::new_v4()
}

/// Registry holding one room with the given members; the first id is host.
pub fn registry_with_room(ids: &[MemberId]) -> (RoomRegistry, String) {
    let registry = RoomRegistry::new(CannedCodes::new(&["AAAAA"]));
    let code = registry.create(|code| {
        Room::create(code.to_string(), ids[0], Some("Host".to_string()), None)
    });
    for (i, &id) in ids.iter().enumerate().skip(1) {
        registry
            .update(&code, |room| room.join(id, Some(format!("Guest{}", i))))
            .expect("room exists")
            .expect("room is open");
    }
    (registry, code)
}
