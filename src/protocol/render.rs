//! Text rendering of game state for protocol responses.

use std::time::Duration;

use crate::game::GameModel;
use crate::grid::BASE_RESISTANCE;

/// One line per grid row. Owned tiles show their team letter, unconquered
/// tiles a dot. A digit follows each tile when its resistance is reduced.
pub fn board_lines(game: &GameModel) -> Vec<String> {
    let grid = game.grid();
    (0..grid.height())
        .filter_map(|row| grid.row(row))
        .map(|tiles| {
            tiles
                .iter()
                .map(|tile| {
                    let mark = tile.owner().map_or('.', |t| t.letter());
                    if tile.resistance() < BASE_RESISTANCE {
                        format!("{}{}", mark, tile.resistance())
                    } else {
                        format!("{} ", mark)
                    }
                })
                .collect::<String>()
                .trim_end()
                .to_string()
        })
        .collect()
}

/// Status report lines: active player and turn timer, then one line per team.
pub fn status_lines(game: &GameModel, now: Duration) -> Vec<String> {
    let active = game.active_player();
    let mut lines = vec![format!(
        "active {} player {} team {} remaining {:.1}",
        game.active_index(),
        active.name(),
        active.team(),
        game.turn_remaining(now).as_secs_f64()
    )];
    let summary = game.ownership_summary();
    for team in game.teams() {
        lines.push(format!(
            "team {} name {} color {} money {} tiles {}",
            team.id(),
            team.name(),
            team.color().to_hex(),
            team.money(),
            summary.tiles_of(team.id())
        ));
    }
    lines.push(format!("unowned {}", summary.unowned));
    lines
}

/// Tools of the active player: `tools dos 1/2 ddos 1/1`, usable over held.
pub fn tool_line(game: &GameModel) -> String {
    let mut line = String::from("tools");
    for (kind, sets) in game.active_player().inventory() {
        let usable = sets.iter().filter(|s| !s.is_depleted()).count();
        line.push_str(&format!(" {} {}/{}", kind, usable, sets.len()));
    }
    line
}
