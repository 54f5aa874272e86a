//! Bounded work queue between the fetch and download stages.

use std::sync::atomic::{AtomicIsize, Ordering};
use std::sync::Arc;

use tokio::sync::mpsc;

use crate::error::{Error, Result};
use crate::media::MediaRecord;

/// Default queue capacity.
pub const DEFAULT_QUEUE_SIZE: usize = 100;

/// An entry on the work queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueueItem {
    Media(MediaRecord),
    /// No more media will be produced.
    EndOfStream,
}

/// Create a queue holding at most `capacity` records.
pub fn work_queue(capacity: usize) -> (QueueSender, QueueReceiver) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    let depth = Arc::new(AtomicIsize::new(0));

    (
        QueueSender {
            tx,
            depth: Arc::clone(&depth),
        },
        QueueReceiver { rx, depth },
    )
}

/// Producer half. `push` suspends while the queue is full.
#[derive(Debug)]
pub struct QueueSender {
    tx: mpsc::Sender<QueueItem>,
    depth: Arc<AtomicIsize>,
}

impl QueueSender {
    /// Enqueue a record, waiting for space if the queue is full.
    pub async fn push(&self, record: MediaRecord) -> Result<()> {
        self.tx
            .send(QueueItem::Media(record))
            .await
            .map_err(|_| Error::Download("work queue closed".into()))?;
        self.depth.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    /// Signal that nothing more will be pushed.
    pub async fn finish(&self) -> Result<()> {
        self.tx
            .send(QueueItem::EndOfStream)
            .await
            .map_err(|_| Error::Download("work queue closed".into()))
    }

    /// Records currently waiting.
    pub fn len(&self) -> usize {
        depth_of(&self.depth)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Consumer half. `next` suspends while the queue is empty.
#[derive(Debug)]
pub struct QueueReceiver {
    rx: mpsc::Receiver<QueueItem>,
    depth: Arc<AtomicIsize>,
}

impl QueueReceiver {
    /// Dequeue the next item. A dropped sender reads as end of stream.
    pub async fn next(&mut self) -> QueueItem {
        match self.rx.recv().await {
            Some(QueueItem::Media(record)) => {
                self.depth.fetch_sub(1, Ordering::SeqCst);
                QueueItem::Media(record)
            }
            Some(QueueItem::EndOfStream) | None => QueueItem::EndOfStream,
        }
    }

    /// Records currently waiting.
    pub fn len(&self) -> usize {
        depth_of(&self.depth)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// The receiver may decrement before the sender's increment lands.
fn depth_of(depth: &AtomicIsize) -> usize {
    depth.load(Ordering::SeqCst).max(0) as usize
}
