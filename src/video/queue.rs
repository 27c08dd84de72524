use crate::video::frame::VideoFrame;

/// What [`FrameQueue::enqueue`] did with the incoming frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnqueueOutcome {
    /// The slot was empty.
    Inserted,
    /// The incoming frame was at or after the held one and took its place.
    Replaced,
    /// The incoming frame was older than the held one and was discarded.
    Dropped,
}

/// Capacity-1 video frame buffer ordered by presentation time.
///
/// Only the newest frame by presentation time survives; on equal timestamps the last
/// inserted frame wins. Not synchronized: producers on another thread must serialize access.
#[derive(Debug, Default)]
pub struct FrameQueue {
    slot: Option<VideoFrame>,
}

impl FrameQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enqueue(&mut self, frame: VideoFrame) -> EnqueueOutcome {
        match &self.slot {
            None => {
                self.slot = Some(frame);
                EnqueueOutcome::Inserted
            }
            Some(held) if frame.presentation_time() >= held.presentation_time() => {
                self.slot = Some(frame);
                EnqueueOutcome::Replaced
            }
            Some(held) => {
                tracing::debug!(
                    incoming_pts = ?frame.presentation_time(),
                    held_pts = ?held.presentation_time(),
                    "dropping out-of-order video frame"
                );
                EnqueueOutcome::Dropped
            }
        }
    }

    pub fn dequeue(&mut self) -> Option<VideoFrame> {
        self.slot.take()
    }

    /// Frame the next [`dequeue`](Self::dequeue) would return.
    pub fn head(&self) -> Option<&VideoFrame> {
        self.slot.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.slot.is_none()
    }

    pub fn len(&self) -> usize {
        usize::from(self.slot.is_some())
    }

    pub fn clear(&mut self) {
        self.slot = None;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/video/queue.rs"]
mod tests;
