use crate::domain::ports::LayoutGenerator;
use crate::domain::tile::{PAIR_COUNT, TileColor, TileLayout};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

/// Deals uniformly shuffled boards from the color palette.
///
/// Draws five distinct colors per round: four become pairs, the fifth is the
/// wildcard. Seeded instances replay the same sequence of boards.
pub struct RandomLayout {
    rng: StdRng,
}

impl RandomLayout {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomLayout {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutGenerator for RandomLayout {
    fn next_layout(&mut self) -> TileLayout {
        let mut drawn = TileColor::PALETTE;
        drawn.shuffle(&mut self.rng);

        let pairs = [drawn[0], drawn[1], drawn[2], drawn[3]];
        let wildcard = drawn[PAIR_COUNT];

        let mut layout =
            TileLayout::from_parts(pairs, wildcard).expect("palette colors are distinct");
        layout.shuffle(&mut self.rng);
        layout
    }
}
