//! Animated relocations as suspending operations.
//!
//! The relocation service hands back a [`Completion`] that resolves once the
//! animation has finished. The controller suspends on it (or polls it once
//! per frame) instead of spinning. [`InFlight`] keeps at most one
//! outstanding relocation per token.

use super::hex::HexCoord;
use super::types::TokenId;
use std::collections::BTreeSet;
use tokio::sync::oneshot;
use tracing::{debug, instrument, warn};

/// Error raised by the relocation machinery.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum RelocationError {
    /// The token already has a relocation outstanding.
    #[display("{} already has a relocation in flight", _0)]
    InFlight(TokenId),

    /// The completion signal was dropped without firing.
    #[display("relocation of {} was abandoned before completing", _0)]
    Abandoned(TokenId),
}

impl std::error::Error for RelocationError {}

/// Sending half of a completion: fire it when the animation ends.
///
/// Firing consumes the signal, so it can fire at most once.
#[derive(Debug)]
pub struct CompletionSignal {
    token: TokenId,
    tx: oneshot::Sender<()>,
}

impl CompletionSignal {
    /// The token being relocated.
    pub fn token(&self) -> TokenId {
        self.token
    }

    /// Signals that the relocation finished.
    #[instrument(skip(self), fields(token = %self.token))]
    pub fn fire(self) {
        if self.tx.send(()).is_err() {
            debug!("Completion fired after the waiter went away");
        }
    }
}

/// Receiving half of a completion.
#[derive(Debug)]
pub struct Completion {
    token: TokenId,
    rx: oneshot::Receiver<()>,
}

impl Completion {
    /// Creates a linked signal/completion pair for a token.
    pub fn pair(token: TokenId) -> (CompletionSignal, Completion) {
        let (tx, rx) = oneshot::channel();
        (CompletionSignal { token, tx }, Completion { token, rx })
    }

    /// The token being relocated.
    pub fn token(&self) -> TokenId {
        self.token
    }

    /// Suspends until the relocation completes.
    ///
    /// Call at most once per completion.
    #[instrument(skip(self), fields(token = %self.token))]
    pub async fn wait(&mut self) -> Result<(), RelocationError> {
        let token = self.token;
        (&mut self.rx)
            .await
            .map_err(|_| RelocationError::Abandoned(token))
    }

    /// Non-blocking check, for hosts that drive the core once per frame.
    ///
    /// Returns `Ok(true)` once the signal has fired.
    pub fn try_complete(&mut self) -> Result<bool, RelocationError> {
        match self.rx.try_recv() {
            Ok(()) => Ok(true),
            Err(oneshot::error::TryRecvError::Empty) => Ok(false),
            Err(oneshot::error::TryRecvError::Closed) => {
                Err(RelocationError::Abandoned(self.token))
            }
        }
    }
}

/// Relocation service: animates a token to a cell.
///
/// Implementations must eventually fire (or drop) the signal paired with
/// the returned completion. Relocations cannot be cancelled.
pub trait Relocator {
    /// Starts moving `token` to `to`.
    fn relocate(&mut self, token: TokenId, to: HexCoord) -> Completion;
}

impl<R: Relocator + ?Sized> Relocator for &mut R {
    fn relocate(&mut self, token: TokenId, to: HexCoord) -> Completion {
        (**self).relocate(token, to)
    }
}

/// Relocator that completes immediately; for headless hosts.
#[derive(Debug, Default, Clone)]
pub struct InstantRelocator {
    moves: Vec<(TokenId, HexCoord)>,
}

impl InstantRelocator {
    /// Every relocation requested so far, in order.
    pub fn moves(&self) -> &[(TokenId, HexCoord)] {
        &self.moves
    }
}

impl Relocator for InstantRelocator {
    #[instrument(skip(self))]
    fn relocate(&mut self, token: TokenId, to: HexCoord) -> Completion {
        self.moves.push((token, to));
        let (signal, completion) = Completion::pair(token);
        signal.fire();
        completion
    }
}

/// Relocator that hands signals back to the caller to fire later.
#[derive(Debug, Default)]
pub struct DeferredRelocator {
    pending: Vec<CompletionSignal>,
    moves: Vec<(TokenId, HexCoord)>,
}

impl DeferredRelocator {
    /// Every relocation requested so far, in order.
    pub fn moves(&self) -> &[(TokenId, HexCoord)] {
        &self.moves
    }

    /// Takes the oldest unfired signal.
    pub fn take_signal(&mut self) -> Option<CompletionSignal> {
        if self.pending.is_empty() {
            None
        } else {
            Some(self.pending.remove(0))
        }
    }

    /// Number of signals not yet taken.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }
}

impl Relocator for DeferredRelocator {
    #[instrument(skip(self))]
    fn relocate(&mut self, token: TokenId, to: HexCoord) -> Completion {
        self.moves.push((token, to));
        let (signal, completion) = Completion::pair(token);
        self.pending.push(signal);
        completion
    }
}

/// Tokens with an outstanding relocation.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct InFlight {
    tokens: BTreeSet<TokenId>,
}

impl InFlight {
    /// Marks a token as moving; rejects a second concurrent relocation.
    #[instrument(skip(self))]
    pub fn begin(&mut self, token: TokenId) -> Result<(), RelocationError> {
        if self.tokens.insert(token) {
            Ok(())
        } else {
            warn!(%token, "Relocation already in flight");
            Err(RelocationError::InFlight(token))
        }
    }

    /// Clears a token's outstanding relocation.
    pub fn finish(&mut self, token: TokenId) {
        self.tokens.remove(&token);
    }

    /// Returns true if the token is moving.
    pub fn contains(&self, token: TokenId) -> bool {
        self.tokens.contains(&token)
    }

    /// Returns true if nothing is moving.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}
