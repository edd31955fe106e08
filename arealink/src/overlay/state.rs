//! Decoded `game:update_state` payload.
//!
//! Only the fields the scoreboard reads are modelled; everything else in the
//! payload is ignored.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};

/// Top-level `game:update_state` payload.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GameUpdate {
    pub game: GameInfo,
    /// `(player id, player)` in payload order. Slot assignment depends on it.
    #[serde(default, deserialize_with = "players_in_payload_order")]
    pub players: Vec<(String, PlayerInfo)>,
}

impl GameUpdate {
    /// Look up a player by id.
    pub fn player(&self, id: &str) -> Option<&PlayerInfo> {
        self.players
            .iter()
            .find(|(player_id, _)| player_id == id)
            .map(|(_, player)| player)
    }
}

fn players_in_payload_order<'de, D>(deserializer: D) -> Result<Vec<(String, PlayerInfo)>, D::Error>
where
    D: Deserializer<'de>,
{
    struct PlayersVisitor;

    impl<'de> Visitor<'de> for PlayersVisitor {
        type Value = Vec<(String, PlayerInfo)>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a map of player id to player")
        }

        fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
            let mut players = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some(entry) = map.next_entry::<String, PlayerInfo>()? {
                players.push(entry);
            }
            Ok(players)
        }
    }

    deserializer.deserialize_map(PlayersVisitor)
}

/// Match-wide state.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GameInfo {
    pub teams: Vec<TeamInfo>,
    #[serde(default)]
    pub time_seconds: u32,
    #[serde(rename = "isOT", default)]
    pub is_overtime: bool,
    /// Id of the spectated player; empty when the camera is free.
    #[serde(default)]
    pub target: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TeamInfo {
    pub name: String,
    #[serde(default)]
    pub score: u32,
    #[serde(default)]
    pub color_primary: Option<String>,
}

/// Per-player state, paired with its id in [`GameUpdate::players`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PlayerInfo {
    pub id: String,
    pub name: String,
    /// 0 = blue, 1 = orange
    pub team: u8,
    #[serde(default)]
    pub boost: u32,
    #[serde(default)]
    pub shots: u32,
    #[serde(default)]
    pub goals: u32,
    #[serde(default)]
    pub assists: u32,
    #[serde(default)]
    pub saves: u32,
    #[serde(default)]
    pub score: u32,
    #[serde(default)]
    pub demos: u32,
}
