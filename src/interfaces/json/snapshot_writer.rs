use crate::domain::ports::{SnapshotSink, SnapshotSinkBox};
use crate::domain::snapshot::GameSnapshot;
use crate::error::Result;
use async_trait::async_trait;
use std::io::Write;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;

/// Renders each snapshot as one JSON line.
pub struct SnapshotWriter<W: Write> {
    out: W,
}

impl<W: Write> SnapshotWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

#[async_trait]
impl<W: Write + Send> SnapshotSink for SnapshotWriter<W> {
    async fn render(&mut self, snapshot: &GameSnapshot) -> Result<()> {
        serde_json::to_writer(&mut self.out, snapshot)?;
        writeln!(self.out)?;
        self.out.flush()?;
        Ok(())
    }
}

/// Drains engine updates into `sink` until the engine is dropped.
///
/// Returns the number of snapshots rendered. Snapshots skipped because this
/// observer fell behind are logged and not retried.
pub async fn forward_snapshots(
    mut updates: broadcast::Receiver<GameSnapshot>,
    mut sink: SnapshotSinkBox,
) -> Result<u64> {
    let mut rendered = 0;
    loop {
        match updates.recv().await {
            Ok(snapshot) => {
                sink.render(&snapshot).await?;
                rendered += 1;
            }
            Err(RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "presenter fell behind, snapshots dropped");
            }
            Err(RecvError::Closed) => break,
        }
    }
    Ok(rendered)
}
