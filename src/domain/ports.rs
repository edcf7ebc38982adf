use super::snapshot::GameSnapshot;
use super::tile::TileLayout;
use crate::error::Result;
use async_trait::async_trait;

/// Source of fresh board layouts. Must not block.
pub trait LayoutGenerator: Send {
    fn next_layout(&mut self) -> TileLayout;
}

/// Presentation-side consumer of state snapshots.
#[async_trait]
pub trait SnapshotSink: Send {
    async fn render(&mut self, snapshot: &GameSnapshot) -> Result<()>;
}

pub type LayoutGeneratorBox = Box<dyn LayoutGenerator>;
pub type SnapshotSinkBox = Box<dyn SnapshotSink>;
