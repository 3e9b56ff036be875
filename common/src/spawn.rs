use crate::game::validate_roster;
use crate::{Direction, Player, Point, Result, GRID_STEP, PLAYER_COLORS};

/// Lay out a starting roster.
///
/// Players are paired into rows spread evenly down the arena. The first of
/// each pair starts a quarter of the way in from the left facing East, the
/// second a quarter in from the right facing West. Coordinates sit on the
/// `GRID_STEP` lattice so heads always land on segment coordinates.
pub fn spawn_roster(width: i32, height: i32, nicknames: &[String]) -> Result<Vec<Player>> {
    validate_roster(width, height, nicknames.iter().map(String::as_str))?;

    let rows = nicknames.len().div_ceil(2) as i32;
    let left_x = snap(width / 4);
    let right_x = snap(width - width / 4);

    let players = nicknames
        .iter()
        .enumerate()
        .map(|(i, nickname)| {
            let row = (i / 2) as i32;
            let y = snap(height * (row + 1) / (rows + 1));
            let (x, direction) = if i % 2 == 0 {
                (left_x, Direction::East)
            } else {
                (right_x, Direction::West)
            };
            Player::new(nickname.clone(), Point::new(x, y), direction, PLAYER_COLORS[i % PLAYER_COLORS.len()])
        })
        .collect();

    Ok(players)
}

fn snap(value: i32) -> i32 {
    value - value.rem_euclid(GRID_STEP)
}
