//! Asset registry
//!
//! Image loads complete asynchronously on the host. Each completion is sent
//! down a channel as an [`AssetEvent`] and folded into the registry at the
//! start of the next tick, so the frame loop never waits on the network.

use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use crate::error::ShowResult;

/// Which image an event belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetKind {
    Face,
    /// Zero-based tile slot
    Tile(usize),
}

/// Completion of one image load
#[derive(Debug)]
pub struct AssetEvent<H> {
    pub kind: AssetKind,
    pub result: ShowResult<H>,
}

/// Load state of one image
#[derive(Debug, Clone, PartialEq)]
enum Slot<H> {
    Pending,
    Loaded(H),
    Failed,
}

impl<H> Slot<H> {
    fn is_pending(&self) -> bool {
        matches!(self, Slot::Pending)
    }
}

/// Face photograph plus the tile gallery, filled in as loads complete
#[derive(Debug)]
pub struct AssetRegistry<H> {
    face: Slot<H>,
    tiles: Vec<Slot<H>>,
    /// Loaded tiles in completion order; only ever appended to
    loaded: Vec<H>,
    failed_tiles: usize,
    sender: Sender<AssetEvent<H>>,
    receiver: Receiver<AssetEvent<H>>,
}

impl<H: Clone> AssetRegistry<H> {
    pub fn new(tile_count: usize) -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            face: Slot::Pending,
            tiles: (0..tile_count).map(|_| Slot::Pending).collect(),
            loaded: Vec::with_capacity(tile_count),
            failed_tiles: 0,
            sender,
            receiver,
        }
    }

    /// A handle loaders use to report completions
    pub fn sender(&self) -> Sender<AssetEvent<H>> {
        self.sender.clone()
    }

    /// Apply every completion received so far without blocking.
    /// Returns how many events were applied.
    pub fn drain(&mut self) -> usize {
        let mut applied = 0;
        loop {
            match self.receiver.try_recv() {
                Ok(event) => {
                    if self.apply(event) {
                        applied += 1;
                    }
                }
                // The registry holds a sender itself, so the channel never disconnects
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        // Slots are write-once, so this fires on the drain that settles the last one
        if applied > 0 && self.is_settled() {
            log::info!(
                "assets settled: {} of {} tiles loaded, {} failed",
                self.loaded.len(),
                self.tiles.len(),
                self.tiles_failed()
            );
        }
        applied
    }

    /// Record one completion. Slots are written once; repeats are ignored.
    pub fn apply(&mut self, event: AssetEvent<H>) -> bool {
        let AssetEvent { kind, result } = event;
        match kind {
            AssetKind::Face => {
                if !self.face.is_pending() {
                    return false;
                }
                self.face = match result {
                    Ok(image) => {
                        log::info!("face image ready");
                        Slot::Loaded(image)
                    }
                    Err(err) => {
                        log::warn!("face image failed, portrait will be synthetic: {}", err);
                        Slot::Failed
                    }
                };
            }
            AssetKind::Tile(index) => {
                let Some(slot) = self.tiles.get_mut(index) else {
                    log::warn!("ignoring completion for unknown tile slot {}", index);
                    return false;
                };
                if !slot.is_pending() {
                    return false;
                }
                *slot = match result {
                    Ok(image) => {
                        log::debug!("tile {} loaded", index + 1);
                        self.loaded.push(image.clone());
                        Slot::Loaded(image)
                    }
                    Err(err) => {
                        log::warn!("tile {} skipped: {}", index + 1, err);
                        self.failed_tiles += 1;
                        Slot::Failed
                    }
                };
            }
        }
        true
    }

    pub fn face(&self) -> Option<&H> {
        match &self.face {
            Slot::Loaded(image) => Some(image),
            _ => None,
        }
    }

    pub fn face_failed(&self) -> bool {
        matches!(self.face, Slot::Failed)
    }

    /// Loaded tiles, in the order they arrived
    pub fn tiles(&self) -> &[H] {
        &self.loaded
    }

    pub fn tile_count(&self) -> usize {
        self.tiles.len()
    }

    pub fn tiles_ready(&self) -> usize {
        self.loaded.len()
    }

    pub fn tiles_failed(&self) -> usize {
        self.failed_tiles
    }

    /// Nothing is still in flight
    pub fn is_settled(&self) -> bool {
        !self.face.is_pending() && self.tiles.iter().all(|slot| !slot.is_pending())
    }
}
