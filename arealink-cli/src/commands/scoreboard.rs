//! Scoreboard command - render live game state from the relay in the terminal.

use std::fmt::Write as _;

use arealink::overlay::{Scoreboard, Team, GAME_CHANNEL, UPDATE_STATE_EVENT};
use arealink::relay::{RelayClient, WS_CHANNEL, WS_CLOSE, WS_OPEN};
use console::{style, Color, Style, Term};
use serde_json::Value;
use tracing::{debug, info};

use super::common::{build_runtime, shutdown_token, GlobalOptions};
use crate::error::CliError;

/// Arguments for the scoreboard command.
pub struct ScoreboardArgs {
    /// Print plain text and append instead of redrawing.
    pub plain: bool,
}

/// Run the scoreboard command until Ctrl+C.
pub fn run(options: &GlobalOptions, args: ScoreboardArgs) -> Result<(), CliError> {
    let config = options.load_config()?;
    let relay_config = options.relay_config(&config);
    let cancel = shutdown_token()?;
    let runtime = build_runtime()?;

    runtime.block_on(async move {
        let client = RelayClient::websocket(relay_config);
        let plain = args.plain;

        let _open = client.subscribe(WS_CHANNEL, WS_OPEN, |_: &Value| {
            info!("Relay connected, waiting for game state");
        });
        let _close = client.subscribe(WS_CHANNEL, WS_CLOSE, |_: &Value| {
            info!("Relay disconnected");
        });
        let _updates = client.subscribe(GAME_CHANNEL, UPDATE_STATE_EVENT, move |data: &Value| {
            match Scoreboard::from_value(data) {
                Ok(board) => show(&board, plain),
                Err(e) => debug!(error = %e, "Skipping game state update"),
            }
        });

        client.connect();
        cancel.cancelled().await;
        client.shutdown().await;
    });

    Ok(())
}

fn show(board: &Scoreboard, plain: bool) {
    if plain {
        println!("{}\n", board);
        return;
    }
    let term = Term::stdout();
    let _ = term.clear_screen();
    let _ = term.write_str(&render(board));
}

fn team_color(team: Team) -> Color {
    match team {
        Team::Blue => Color::Color256(33),
        Team::Orange => Color::Color256(208),
    }
}

/// Coloured rendering of one scoreboard frame.
fn render(board: &Scoreboard) -> String {
    let blue = Style::new().fg(team_color(Team::Blue)).bold();
    let orange = Style::new().fg(team_color(Team::Orange)).bold();

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} {}   {}   {} {}",
        blue.apply_to(&board.left.name),
        blue.apply_to(board.left.score),
        style(&board.clock).bold(),
        orange.apply_to(board.right.score),
        orange.apply_to(&board.right.name),
    );
    let _ = writeln!(out);

    for slot in &board.slots {
        let color = team_color(slot.team);
        let name = if slot.highlighted {
            Style::new().white().bg(color).bold().apply_to(format!(" {:<16}", slot.name))
        } else {
            Style::new().fg(color).apply_to(format!(" {:<16}", slot.name))
        };
        let bar = Style::new()
            .fg(color)
            .apply_to("█".repeat((slot.boost / 5) as usize));
        let _ = writeln!(out, "{} {:>3} {}", name, slot.boost, bar);
    }
    let _ = writeln!(out);

    match &board.target {
        Some(t) => {
            let _ = writeln!(
                out,
                "{}  G {}  A {}  SV {}  SH {}  SC {}  D {}",
                style(&t.display_name).bold(),
                t.goals,
                t.assists,
                t.saves,
                t.shots,
                t.score,
                t.demos
            );
        }
        None => {
            let _ = writeln!(out, "{}", style("free camera").dim());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_render_contains_teams_clock_and_target() {
        let board = Scoreboard::from_value(&json!({
            "game": {
                "teams": [{"name": "Blue", "score": 1}, {"name": "Orange", "score": 2}],
                "time_seconds": 125,
                "isOT": false,
                "target": "Alpha_1"
            },
            "players": {
                "Alpha_1": {"id": "Alpha_1", "name": "Alpha", "team": 0, "boost": 50, "goals": 1}
            }
        }))
        .unwrap();

        let text = console::strip_ansi_codes(&render(&board)).to_string();
        assert!(text.contains("Blue 1"));
        assert!(text.contains("2:05"));
        assert!(text.contains("2 Orange"));
        assert!(text.contains("Alpha"));
        assert!(text.contains("G 1"));
    }
}
