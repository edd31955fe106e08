//! Scoreboard view model derived from game state updates.

use std::fmt;

use serde_json::Value;

use super::state::{GameUpdate, PlayerInfo, TeamInfo};
use super::OverlayError;

/// Players scanned from the update, matching the overlay's fixed layout.
pub const MAX_PLAYERS_SCANNED: usize = 7;

/// Player slots shown per team.
pub const SLOTS_PER_TEAM: usize = 3;

/// Boost bar width in pixels per boost unit.
pub const BOOST_BAR_PX_PER_UNIT: u32 = 3;

/// Team side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Team {
    Blue,
    Orange,
}

impl Team {
    /// Map the payload's team index.
    pub fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(Self::Blue),
            1 => Some(Self::Orange),
            _ => None,
        }
    }

    /// Accent colour as a CSS hex string.
    pub fn accent(&self) -> &'static str {
        match self {
            Self::Blue => "#1873ff",
            Self::Orange => "#ff7200",
        }
    }
}

/// Name and score of one team.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamLine {
    pub name: String,
    pub score: u32,
}

impl From<&TeamInfo> for TeamLine {
    fn from(team: &TeamInfo) -> Self {
        Self {
            name: team.name.clone(),
            score: team.score,
        }
    }
}

/// Stat line of the spectated player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetStats {
    pub display_name: String,
    pub shots: u32,
    pub goals: u32,
    pub assists: u32,
    pub saves: u32,
    pub score: u32,
    pub demos: u32,
}

/// One player row of the overlay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerSlot {
    pub id: String,
    pub name: String,
    pub team: Team,
    pub boost: u32,
    pub bar_width_px: u32,
    /// Spectated player; drawn in the team colour with white text.
    pub highlighted: bool,
}

/// Everything the overlay shows for one state update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scoreboard {
    pub left: TeamLine,
    pub right: TeamLine,
    pub clock: String,
    /// `None` when no player is spectated.
    pub target: Option<TargetStats>,
    /// Blue players first, then orange, each in payload order.
    pub slots: Vec<PlayerSlot>,
}

impl Scoreboard {
    /// Decode a raw `game:update_state` payload.
    pub fn from_value(data: &Value) -> Result<Self, OverlayError> {
        let update: GameUpdate = serde_json::from_value(data.clone())?;
        Self::from_update(&update)
    }

    /// Build the view model from a decoded update.
    pub fn from_update(update: &GameUpdate) -> Result<Self, OverlayError> {
        let left = update.game.teams.first().ok_or(OverlayError::MissingTeam(0))?;
        let right = update.game.teams.get(1).ok_or(OverlayError::MissingTeam(1))?;

        let target_id = update.game.target.as_str();
        let target = if target_id.is_empty() {
            None
        } else {
            update
                .player(target_id)
                .map(|p| target_stats(target_id, p))
        };

        let scanned: Vec<&PlayerInfo> = update
            .players
            .iter()
            .map(|(_, player)| player)
            .take(MAX_PLAYERS_SCANNED)
            .collect();
        let mut slots: Vec<PlayerSlot> = Vec::with_capacity(SLOTS_PER_TEAM * 2);
        for team in [Team::Blue, Team::Orange] {
            slots.extend(
                scanned
                    .iter()
                    .filter(|p| Team::from_index(p.team) == Some(team))
                    .take(SLOTS_PER_TEAM)
                    .map(|p| PlayerSlot {
                        id: p.id.clone(),
                        name: p.name.clone(),
                        team,
                        boost: p.boost,
                        bar_width_px: p.boost * BOOST_BAR_PX_PER_UNIT,
                        highlighted: !target_id.is_empty() && p.id == target_id,
                    }),
            );
        }

        Ok(Self {
            left: left.into(),
            right: right.into(),
            clock: format_clock(update.game.time_seconds, update.game.is_overtime),
            target,
            slots,
        })
    }
}

fn target_stats(target_id: &str, player: &PlayerInfo) -> TargetStats {
    TargetStats {
        display_name: display_name(target_id),
        shots: player.shots,
        goals: player.goals,
        assists: player.assists,
        saves: player.saves,
        score: player.score,
        demos: player.demos,
    }
}

/// Game clock as `m:ss`, prefixed with `+` in overtime.
pub fn format_clock(time_seconds: u32, overtime: bool) -> String {
    let sign = if overtime { "+" } else { "" };
    format!("{}{}:{:02}", sign, time_seconds / 60, time_seconds % 60)
}

/// Player display name: the id without its two-character `_N` suffix.
pub fn display_name(player_id: &str) -> String {
    let keep = player_id.chars().count().saturating_sub(2);
    player_id.chars().take(keep).collect()
}

impl fmt::Display for Scoreboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} {}  {}  {} {}",
            self.left.name, self.left.score, self.clock, self.right.score, self.right.name
        )?;
        for (i, slot) in self.slots.iter().enumerate() {
            let marker = if slot.highlighted { '>' } else { ' ' };
            writeln!(
                f,
                "{}{} {:<16} {:>3} {}",
                marker,
                i + 1,
                slot.name,
                slot.boost,
                "#".repeat((slot.boost / 10) as usize)
            )?;
        }
        match &self.target {
            Some(t) => write!(
                f,
                "{}: goals {} assists {} saves {} shots {} score {} demos {}",
                t.display_name, t.goals, t.assists, t.saves, t.shots, t.score, t.demos
            ),
            None => write!(f, "(free camera)"),
        }
    }
}
