#![allow(dead_code)]

use square_game::application::engine::GameEngine;
use square_game::config::GameConfig;
use square_game::domain::tile::TileLayout;
use square_game::infrastructure::fixed_layout::FixedLayout;
use std::io::Write;
use tempfile::NamedTempFile;

/// R G B / R G B / Y Y P: red, green, blue and yellow are pairs, pink is the wildcard.
pub const BOARD: &str = "red,green,blue,red,green,blue,yellow,yellow,pink";
pub const PAIRS: [(usize, usize); 4] = [(0, 3), (1, 4), (2, 5), (6, 7)];
pub const WILDCARD: usize = 8;

pub fn board() -> TileLayout {
    BOARD.parse().unwrap()
}

pub fn engine_with(config: GameConfig) -> GameEngine {
    GameEngine::new(config, Box::new(FixedLayout::repeating(board())))
}

pub fn manual_engine() -> GameEngine {
    engine_with(GameConfig {
        auto_tick: false,
        ..GameConfig::default()
    })
}

pub fn timed_engine() -> GameEngine {
    engine_with(GameConfig::default())
}

pub async fn clear_board(engine: &GameEngine) {
    for (a, b) in PAIRS {
        engine.select_tile(a).await.unwrap();
        engine.select_tile(b).await.unwrap();
    }
}

/// Writes an `event,value` script to a temp file.
pub fn script(rows: &[&str]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "event,value").unwrap();
    for row in rows {
        writeln!(file, "{}", row).unwrap();
    }
    file
}
