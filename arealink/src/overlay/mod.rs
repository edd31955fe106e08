//! Spectator scoreboard model.
//!
//! Turns `game:update_state` relay payloads into a [`Scoreboard`]: team
//! names and scores, the match clock, the spectated player's stat line and
//! six boost rows. Presentation is left to the caller; `Scoreboard`
//! implements `Display` for plain-text output.

mod scoreboard;
mod state;

pub use scoreboard::{
    display_name, format_clock, PlayerSlot, Scoreboard, TargetStats, Team, TeamLine,
    BOOST_BAR_PX_PER_UNIT, MAX_PLAYERS_SCANNED, SLOTS_PER_TEAM,
};
pub use state::{GameInfo, GameUpdate, PlayerInfo, TeamInfo};

use thiserror::Error;

/// Channel and event carrying game state snapshots.
pub const GAME_CHANNEL: &str = "game";
pub const UPDATE_STATE_EVENT: &str = "update_state";

/// Errors decoding a game state update.
#[derive(Debug, Error)]
pub enum OverlayError {
    /// The payload did not match the expected shape.
    #[error("Malformed game state: {0}")]
    Decode(#[from] serde_json::Error),

    /// `game.teams` has no entry at this index.
    #[error("Game state has no team {0}")]
    MissingTeam(usize),
}
