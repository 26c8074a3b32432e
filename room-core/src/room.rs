use chrono::{DateTime, Utc};
use room_types::{
    GuessRecord, LetterMark, PlayerDetail, PlayerSummary, RoomError, RoomSnapshot, WinnerEntry,
};
use uuid::Uuid;

use crate::evaluate::evaluate;
use crate::words::WordSource;

/// Opaque handle for a room member; the gateway derives it from the
/// underlying connection.
pub type MemberId = Uuid;

#[derive(Debug, Clone)]
pub struct Guess {
    pub text: String,
    pub feedback: Vec<LetterMark>,
    pub at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct Player {
    pub id: MemberId,
    pub name: String,
    pub guesses: Vec<Guess>,
    pub solved_at: Option<DateTime<Utc>>,
    pub connected: bool,
}

impl Player {
    fn new(id: MemberId, name: Option<String>, fallback: &str) -> Self {
        let name = name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| fallback.to_string());

        Self {
            id,
            name,
            guesses: Vec::new(),
            solved_at: None,
            connected: true,
        }
    }
}

/// What `Room::remove_player` observed, so the caller can destroy an
/// emptied room and announce a host handover.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Departure {
    pub removed: bool,
    pub room_empty: bool,
    pub new_host: Option<MemberId>,
}

/// One game session: members in join order, the current host, and the
/// active round's secret.
///
/// Rooms cycle between open and started. While members exist the host is
/// always one of them; the first remaining member inherits the seat when
/// the host leaves. Disconnects only flip `connected` so a player's
/// history survives a dropped socket.
#[derive(Debug)]
pub struct Room {
    pub code: String,
    pub host: MemberId,
    pub secret: Option<String>,
    pub started: bool,
    pub created_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub players: Vec<Player>,
}

impl Room {
    /// Open a room with the requester as sole member and host.
    pub fn create(
        code: String,
        host: MemberId,
        name: Option<String>,
        word: Option<String>,
    ) -> Self {
        Self {
            code,
            host,
            secret: word
                .filter(|w| !w.trim().is_empty())
                .map(|w| w.to_lowercase()),
            started: false,
            created_at: Utc::now(),
            started_at: None,
            players: vec![Player::new(host, name, "Host")],
        }
    }

    /// Add a member. Joining a room mid-round is rejected; a member
    /// rejoining replaces their record in place.
    pub fn join(&mut self, id: MemberId, name: Option<String>) -> Result<(), RoomError> {
        if self.started {
            return Err(RoomError::GameAlreadyStarted);
        }

        let player = Player::new(id, name, "Player");
        match self.players.iter_mut().find(|p| p.id == id) {
            Some(existing) => *existing = player,
            None => self.players.push(player),
        }
        Ok(())
    }

    /// Begin a round: assign the secret (host's choice lowercased, or a
    /// pick from the word source) and wipe every member's per-round state
    /// so stale solves cannot decide the new round.
    pub fn start(
        &mut self,
        requester: MemberId,
        chosen: Option<String>,
        words: &dyn WordSource,
    ) -> Result<(), RoomError> {
        if requester != self.host {
            return Err(RoomError::NotHost);
        }
        if self.started {
            return Err(RoomError::AlreadyStarted);
        }

        let secret = chosen
            .filter(|w| !w.trim().is_empty())
            .map(|w| w.trim().to_lowercase())
            .unwrap_or_else(|| words.pick());

        self.secret = Some(secret);
        self.started = true;
        self.started_at = Some(Utc::now());

        for player in &mut self.players {
            player.guesses.clear();
            player.solved_at = None;
        }

        Ok(())
    }

    /// Record a guess and return its feedback. An all-correct result
    /// stamps the player's solve time.
    pub fn submit_guess(
        &mut self,
        requester: MemberId,
        text: &str,
    ) -> Result<Vec<LetterMark>, RoomError> {
        if !self.started {
            return Err(RoomError::NotStarted);
        }
        let secret = self.secret.clone().ok_or(RoomError::NotStarted)?;

        let guess = text.trim().to_lowercase();
        if guess.is_empty() || guess.chars().count() != secret.chars().count() {
            return Err(RoomError::InvalidLength);
        }

        let player = self
            .players
            .iter_mut()
            .find(|p| p.id == requester)
            .ok_or(RoomError::NotAMember)?;

        let feedback = evaluate(&secret, &guess);
        let solved = feedback.iter().all(|&m| m == LetterMark::Correct);
        let now = Utc::now();

        player.guesses.push(Guess {
            text: guess,
            feedback: feedback.clone(),
            at: now,
        });
        if solved {
            player.solved_at = Some(now);
        }

        Ok(feedback)
    }

    /// All players who have solved the current secret, earliest solve
    /// first, ties broken by fewest guesses. Equal on both is left as an
    /// unordered tie.
    pub fn solved_ranking(&self) -> Vec<WinnerEntry> {
        let mut solved: Vec<(DateTime<Utc>, usize, &Player)> = self
            .players
            .iter()
            .filter_map(|p| p.solved_at.map(|at| (at, p.guesses.len(), p)))
            .collect();
        solved.sort_by_key(|&(at, guess_count, _)| (at, guess_count));

        solved
            .into_iter()
            .map(|(at, guess_count, p)| WinnerEntry {
                id: p.id,
                name: p.name.clone(),
                solved_at: at.to_rfc3339(),
                guess_count,
            })
            .collect()
    }

    /// Close the round and reveal the secret. The room is open again but
    /// `start` must assign a fresh secret before the next round.
    pub fn finish_round(&mut self) -> Option<String> {
        self.started = false;
        self.secret.clone()
    }

    /// Remove a member entirely (unlike a disconnect). Promotes the
    /// earliest remaining member when the host departs.
    pub fn remove_player(&mut self, id: MemberId) -> Departure {
        let before = self.players.len();
        self.players.retain(|p| p.id != id);
        let removed = self.players.len() != before;

        if !removed {
            return Departure {
                removed: false,
                room_empty: self.players.is_empty(),
                new_host: None,
            };
        }

        if self.players.is_empty() {
            return Departure {
                removed: true,
                room_empty: true,
                new_host: None,
            };
        }

        let mut new_host = None;
        if self.host == id {
            self.host = self.players[0].id;
            new_host = Some(self.host);
        }

        Departure {
            removed: true,
            room_empty: false,
            new_host,
        }
    }

    /// Flip the member's connectivity flag. Their record, the host seat,
    /// and the room itself are all left alone.
    pub fn mark_disconnected(&mut self, id: MemberId) -> bool {
        match self.players.iter_mut().find(|p| p.id == id) {
            Some(player) => {
                player.connected = false;
                true
            }
            None => false,
        }
    }

    pub fn is_member(&self, id: MemberId) -> bool {
        self.players.iter().any(|p| p.id == id)
    }

    /// The broadcast projection: guess counts only, no secret.
    pub fn snapshot(&self) -> RoomSnapshot {
        RoomSnapshot {
            code: self.code.clone(),
            host: self.host,
            started: self.started,
            player_count: self.players.len(),
            players: self
                .players
                .iter()
                .map(|p| PlayerSummary {
                    id: p.id,
                    name: p.name.clone(),
                    guess_count: p.guesses.len(),
                    solved_at: p.solved_at.map(|t| t.to_rfc3339()),
                    connected: p.connected,
                })
                .collect(),
            created_at: self.created_at.to_rfc3339(),
            started_at: self.started_at.map(|t| t.to_rfc3339()),
        }
    }

    /// Full record for one member, including guess contents.
    pub fn player_detail(&self, id: MemberId) -> Option<PlayerDetail> {
        self.players.iter().find(|p| p.id == id).map(|p| PlayerDetail {
            id: p.id,
            name: p.name.clone(),
            guesses: p
                .guesses
                .iter()
                .map(|g| GuessRecord {
                    text: g.text.clone(),
                    feedback: g.feedback.clone(),
                    at: g.at.to_rfc3339(),
                })
                .collect(),
            solved_at: p.solved_at.map(|t| t.to_rfc3339()),
            connected: p.connected,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    struct FixedWord(&'static str);

    impl WordSource for FixedWord {
        fn pick(&self) -> String {
            self.0.to_string()
        }
    }

    fn room_with_members(count: usize) -> (Room, Vec<MemberId>) {
        let ids: Vec<MemberId> = (0..count).map(|_| Uuid::new_v4()).collect();
        let mut room = Room::create(
            "ABCDE".to_string(),
            ids[0],
            Some("Alice".to_string()),
            None,
        );
        for (i, &id) in ids.iter().enumerate().skip(1) {
            room.join(id, Some(format!("Player{}", i + 1))).unwrap();
        }
        (room, ids)
    }

    fn ts(seconds: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(seconds, 0).unwrap()
    }

    #[test]
    fn creator_is_sole_member_and_host() {
        let id = Uuid::new_v4();
        let room = Room::create("ABCDE".to_string(), id, None, None);
        assert_eq!(room.host, id);
        assert_eq!(room.players.len(), 1);
        assert_eq!(room.players[0].name, "Host");
        assert!(!room.started);
        assert!(room.started_at.is_none());
    }

    #[test]
    fn create_word_is_stored_lowercased() {
        let room = Room::create(
            "ABCDE".to_string(),
            Uuid::new_v4(),
            None,
            Some("CRANE".to_string()),
        );
        assert_eq!(room.secret.as_deref(), Some("crane"));
        assert!(!room.started);
    }

    #[test]
    fn join_defaults_the_display_name() {
        let (mut room, _) = room_with_members(1);
        let id = Uuid::new_v4();
        room.join(id, None).unwrap();
        assert_eq!(room.players[1].name, "Player");

        let id2 = Uuid::new_v4();
        room.join(id2, Some("   ".to_string())).unwrap();
        assert_eq!(room.players[2].name, "Player");
    }

    #[test]
    fn join_is_rejected_mid_round() {
        let (mut room, ids) = room_with_members(2);
        room.start(ids[0], Some("crane".to_string()), &FixedWord("sheep"))
            .unwrap();
        assert_eq!(
            room.join(Uuid::new_v4(), None),
            Err(RoomError::GameAlreadyStarted)
        );
    }

    #[test]
    fn only_the_host_starts() {
        let (mut room, ids) = room_with_members(2);
        assert_eq!(
            room.start(ids[1], None, &FixedWord("crane")),
            Err(RoomError::NotHost)
        );
        assert!(room.start(ids[0], None, &FixedWord("crane")).is_ok());
        assert_eq!(room.secret.as_deref(), Some("crane"));
        assert!(room.started);
        assert!(room.started_at.is_some());
    }

    #[test]
    fn start_twice_is_rejected() {
        let (mut room, ids) = room_with_members(1);
        room.start(ids[0], Some("crane".to_string()), &FixedWord("sheep"))
            .unwrap();
        assert_eq!(
            room.start(ids[0], Some("sheep".to_string()), &FixedWord("sheep")),
            Err(RoomError::AlreadyStarted)
        );
    }

    #[test]
    fn start_lowercases_the_chosen_word() {
        let (mut room, ids) = room_with_members(1);
        room.start(ids[0], Some("  CrAnE ".to_string()), &FixedWord("sheep"))
            .unwrap();
        assert_eq!(room.secret.as_deref(), Some("crane"));
    }

    #[test]
    fn blank_chosen_word_falls_back_to_the_source() {
        let (mut room, ids) = room_with_members(1);
        room.start(ids[0], Some("  ".to_string()), &FixedWord("sheep"))
            .unwrap();
        assert_eq!(room.secret.as_deref(), Some("sheep"));
    }

    #[test]
    fn start_resets_guess_history_and_solves() {
        let (mut room, ids) = room_with_members(2);
        room.start(ids[0], Some("crane".to_string()), &FixedWord("sheep"))
            .unwrap();
        room.submit_guess(ids[1], "crane").unwrap();
        assert!(room.players[1].solved_at.is_some());
        room.finish_round();

        room.start(ids[0], Some("sheep".to_string()), &FixedWord("crane"))
            .unwrap();
        assert!(room.players[1].guesses.is_empty());
        assert!(room.players[1].solved_at.is_none());
    }

    #[test]
    fn guess_requires_a_running_round() {
        let (mut room, ids) = room_with_members(1);
        assert_eq!(
            room.submit_guess(ids[0], "crane"),
            Err(RoomError::NotStarted)
        );
    }

    #[test]
    fn guess_length_must_match_the_secret() {
        let (mut room, ids) = room_with_members(1);
        room.start(ids[0], Some("crane".to_string()), &FixedWord("sheep"))
            .unwrap();
        assert_eq!(
            room.submit_guess(ids[0], "cranes"),
            Err(RoomError::InvalidLength)
        );
        assert_eq!(room.submit_guess(ids[0], "   "), Err(RoomError::InvalidLength));
        assert!(room.players[0].guesses.is_empty());
    }

    #[test]
    fn guess_from_a_stranger_is_rejected() {
        let (mut room, ids) = room_with_members(1);
        room.start(ids[0], Some("crane".to_string()), &FixedWord("sheep"))
            .unwrap();
        assert_eq!(
            room.submit_guess(Uuid::new_v4(), "crane"),
            Err(RoomError::NotAMember)
        );
    }

    #[test]
    fn guesses_are_normalized_and_recorded() {
        let (mut room, ids) = room_with_members(1);
        room.start(ids[0], Some("crane".to_string()), &FixedWord("sheep"))
            .unwrap();

        let feedback = room.submit_guess(ids[0], "  CRATE ").unwrap();
        assert_eq!(feedback.len(), 5);
        assert_eq!(room.players[0].guesses.len(), 1);
        assert_eq!(room.players[0].guesses[0].text, "crate");
        assert!(room.players[0].solved_at.is_none());
    }

    #[test]
    fn solving_stamps_the_player() {
        let (mut room, ids) = room_with_members(2);
        room.start(ids[0], Some("crane".to_string()), &FixedWord("sheep"))
            .unwrap();

        let feedback = room.submit_guess(ids[1], "crane").unwrap();
        assert!(feedback.iter().all(|&m| m == LetterMark::Correct));
        assert!(room.players[1].solved_at.is_some());
        assert!(room.players[0].solved_at.is_none());
    }

    #[test]
    fn ranking_orders_by_solve_time_then_guess_count() {
        let (mut room, ids) = room_with_members(3);
        room.start(ids[0], Some("crane".to_string()), &FixedWord("sheep"))
            .unwrap();

        // earliest solve wins regardless of how many guesses it took
        room.players[0].solved_at = Some(ts(30));
        room.players[0].guesses = vec![];
        room.players[1].solved_at = Some(ts(10));
        room.players[1].guesses.push(Guess {
            text: "wrong".into(),
            feedback: evaluate("crane", "wrong"),
            at: ts(5),
        });
        room.players[2].solved_at = Some(ts(20));

        let ranked = room.solved_ranking();
        assert_eq!(
            ranked.iter().map(|w| w.id).collect::<Vec<_>>(),
            vec![ids[1], ids[2], ids[0]]
        );
    }

    #[test]
    fn ranking_ties_break_on_fewer_guesses() {
        let (mut room, ids) = room_with_members(2);
        room.start(ids[0], Some("crane".to_string()), &FixedWord("sheep"))
            .unwrap();

        let same_instant = ts(42);
        for _ in 0..3 {
            room.players[0].guesses.push(Guess {
                text: "crate".into(),
                feedback: evaluate("crane", "crate"),
                at: same_instant,
            });
        }
        room.players[0].solved_at = Some(same_instant);
        room.players[1].guesses.push(Guess {
            text: "crane".into(),
            feedback: evaluate("crane", "crane"),
            at: same_instant,
        });
        room.players[1].solved_at = Some(same_instant);

        let ranked = room.solved_ranking();
        assert_eq!(ranked[0].id, ids[1]);
        assert_eq!(ranked[0].guess_count, 1);
        assert_eq!(ranked[1].id, ids[0]);
    }

    #[test]
    fn finish_round_reopens_and_reveals() {
        let (mut room, ids) = room_with_members(1);
        room.start(ids[0], Some("crane".to_string()), &FixedWord("sheep"))
            .unwrap();

        assert_eq!(room.finish_round().as_deref(), Some("crane"));
        assert!(!room.started);
        // reopened, so the next round can begin with a fresh secret
        assert!(room.start(ids[0], Some("sheep".to_string()), &FixedWord("crane")).is_ok());
        assert_eq!(room.secret.as_deref(), Some("sheep"));
    }

    #[test]
    fn host_departure_promotes_the_earliest_member() {
        let (mut room, ids) = room_with_members(3);
        let departure = room.remove_player(ids[0]);
        assert!(departure.removed);
        assert!(!departure.room_empty);
        assert_eq!(departure.new_host, Some(ids[1]));
        assert_eq!(room.host, ids[1]);
        assert!(room.is_member(room.host));
    }

    #[test]
    fn non_host_departure_keeps_the_host() {
        let (mut room, ids) = room_with_members(3);
        let departure = room.remove_player(ids[2]);
        assert!(departure.removed);
        assert_eq!(departure.new_host, None);
        assert_eq!(room.host, ids[0]);
    }

    #[test]
    fn last_departure_empties_the_room() {
        let (mut room, ids) = room_with_members(1);
        let departure = room.remove_player(ids[0]);
        assert!(departure.removed);
        assert!(departure.room_empty);
        assert!(room.players.is_empty());
    }

    #[test]
    fn removing_a_stranger_changes_nothing() {
        let (mut room, ids) = room_with_members(2);
        let departure = room.remove_player(Uuid::new_v4());
        assert!(!departure.removed);
        assert!(!departure.room_empty);
        assert_eq!(room.players.len(), 2);
        assert_eq!(room.host, ids[0]);
    }

    #[test]
    fn disconnect_only_flips_the_flag() {
        let (mut room, ids) = room_with_members(2);
        assert!(room.mark_disconnected(ids[0]));
        assert_eq!(room.players.len(), 2);
        assert!(!room.players[0].connected);
        assert_eq!(room.host, ids[0]);
        assert!(!room.mark_disconnected(Uuid::new_v4()));
    }

    #[test]
    fn snapshot_never_carries_the_secret() {
        let (mut room, ids) = room_with_members(2);
        room.start(ids[0], Some("crane".to_string()), &FixedWord("sheep"))
            .unwrap();
        room.submit_guess(ids[1], "crate").unwrap();

        let snapshot = room.snapshot();
        assert_eq!(snapshot.code, "ABCDE");
        assert_eq!(snapshot.host, ids[0]);
        assert!(snapshot.started);
        assert_eq!(snapshot.player_count, 2);
        assert_eq!(snapshot.players[1].guess_count, 1);
        assert!(snapshot.started_at.is_some());
        // the snapshot exposes counts, not contents
        let encoded = format!("{:?}", snapshot);
        assert!(!encoded.contains("crane"));
        assert!(!encoded.contains("crate"));
    }

    #[test]
    fn player_detail_includes_guess_contents() {
        let (mut room, ids) = room_with_members(1);
        room.start(ids[0], Some("crane".to_string()), &FixedWord("sheep"))
            .unwrap();
        room.submit_guess(ids[0], "crate").unwrap();

        let detail = room.player_detail(ids[0]).unwrap();
        assert_eq!(detail.guesses.len(), 1);
        assert_eq!(detail.guesses[0].text, "crate");
        assert_eq!(detail.guesses[0].feedback.len(), 5);
        assert!(room.player_detail(Uuid::new_v4()).is_none());
    }

    #[test]
    fn feedback_length_matches_guess_and_secret() {
        let (mut room, ids) = room_with_members(1);
        room.start(ids[0], Some("sheep".to_string()), &FixedWord("crane"))
            .unwrap();
        let feedback = room.submit_guess(ids[0], "speed").unwrap();
        assert_eq!(feedback.len(), 5);
        assert_eq!(room.players[0].guesses[0].feedback.len(), 5);
    }
}
