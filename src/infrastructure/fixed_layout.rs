use crate::domain::ports::LayoutGenerator;
use crate::domain::tile::TileLayout;
use crate::error::{GameError, Result};
use std::collections::VecDeque;

/// Serves a predefined list of layouts in order, then keeps repeating the last one.
///
/// Used for reproducible runs (`--layout`) and tests that need a known board.
#[derive(Debug, Clone)]
pub struct FixedLayout {
    queue: VecDeque<TileLayout>,
    last: TileLayout,
}

impl FixedLayout {
    pub fn new(layouts: Vec<TileLayout>) -> Result<Self> {
        let last = layouts
            .last()
            .cloned()
            .ok_or_else(|| GameError::InvalidLayout("no layouts given".to_string()))?;
        Ok(Self {
            queue: layouts.into(),
            last,
        })
    }

    pub fn repeating(layout: TileLayout) -> Self {
        Self {
            queue: VecDeque::new(),
            last: layout,
        }
    }
}

impl LayoutGenerator for FixedLayout {
    fn next_layout(&mut self) -> TileLayout {
        self.queue
            .pop_front()
            .unwrap_or_else(|| self.last.clone())
    }
}
