use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;

use tracing::{debug, warn};

use crate::assets::decode::{PreparedImage, decode_image};

/// Result of polling the inset loader on a frame boundary.
#[derive(Debug)]
pub enum InsetPoll {
    /// Loads still in flight; keep the base texture.
    Pending,
    /// Every requested image decoded; run the second composition pass.
    Ready(Vec<PreparedImage>),
    /// At least one image will never arrive. The base texture stays
    /// current for the remainder of the process; this is a degraded mode,
    /// not an error.
    Failed,
}

/// Fire-and-forget loader for the photographic insets.
///
/// One detached thread reads and decodes all requested images, then delivers
/// them through a one-shot channel. The frame loop polls without blocking;
/// there is no cancellation path and no timeout. Delivery is all-or-nothing:
/// if any image fails, the sender is dropped and the texture keeps its
/// pre-image state indefinitely.
#[derive(Debug)]
pub struct InsetLoader {
    rx: Option<mpsc::Receiver<Vec<PreparedImage>>>,
    warned: bool,
}

impl InsetLoader {
    /// Begin loading `sources` (resolved against `root`) in the background.
    pub fn spawn(root: PathBuf, sources: Vec<String>) -> Self {
        let (tx, rx) = mpsc::channel();
        let spawned = thread::Builder::new()
            .name("gogai-insets".to_string())
            .spawn(move || {
                let mut out = Vec::with_capacity(sources.len());
                for source in &sources {
                    let path = root.join(source);
                    let bytes = match std::fs::read(&path) {
                        Ok(b) => b,
                        Err(e) => {
                            warn!(source, error = %e, "inset read failed");
                            return;
                        }
                    };
                    match decode_image(&bytes) {
                        Ok(img) => out.push(img),
                        Err(e) => {
                            warn!(source, error = %e, "inset decode failed");
                            return;
                        }
                    }
                }
                debug!(count = out.len(), "insets decoded");
                let _ = tx.send(out);
            });

        if let Err(e) = spawned {
            warn!(error = %e, "inset loader thread failed to start");
            // Receiver with no live sender reports Failed on first poll.
        }
        Self {
            rx: Some(rx),
            warned: false,
        }
    }

    /// Non-blocking poll, intended for the start of each frame.
    ///
    /// After returning [`InsetPoll::Ready`] or [`InsetPoll::Failed`] once,
    /// subsequent polls keep returning [`InsetPoll::Failed`] — the one-shot
    /// has been consumed.
    pub fn poll(&mut self) -> InsetPoll {
        let Some(rx) = self.rx.as_ref() else {
            return InsetPoll::Failed;
        };
        match rx.try_recv() {
            Ok(images) => {
                self.rx = None;
                InsetPoll::Ready(images)
            }
            Err(mpsc::TryRecvError::Empty) => InsetPoll::Pending,
            Err(mpsc::TryRecvError::Disconnected) => {
                self.rx = None;
                if !self.warned {
                    self.warned = true;
                    warn!("insets unavailable; keeping base texture");
                }
                InsetPoll::Failed
            }
        }
    }
}
