//! Cooperative cancellation.
//!
//! A [`CancellationToken`] is a one-shot signal shared between the caller
//! and a running stream. It is only observed at checkpoints: before a
//! read, while waiting on a read (through [`CancellationGuard`]), and
//! before each cluster is handed out. Nothing is interrupted forcibly.
//!
//! Notification is built on channel disconnection: every token owns a
//! sender that is never used for sending and is dropped on cancel, which
//! wakes every receiver at once.

use crate::error::GuardError;
use crate::pending::Pending;
use crossbeam_channel::{bounded, select, Receiver, Sender};
use std::fmt;
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

/// Why a token was cancelled.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CancelReason(Arc<str>);

impl CancelReason {
    /// Create a reason from any string.
    pub fn new(reason: impl Into<Arc<str>>) -> Self {
        Self(reason.into())
    }

    /// Get the reason text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for CancelReason {
    fn default() -> Self {
        Self::new("aborted")
    }
}

impl fmt::Display for CancelReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CancelReason {
    fn from(reason: &str) -> Self {
        Self::new(reason)
    }
}

impl From<String> for CancelReason {
    fn from(reason: String) -> Self {
        Self::new(reason)
    }
}

#[derive(Debug)]
struct Inner {
    /// Set exactly once, before `trigger` is dropped.
    reason: OnceLock<CancelReason>,
    /// Dropped on cancel to disconnect `notified`.
    trigger: Mutex<Option<Sender<()>>>,
    notified: Receiver<()>,
}

/// A cloneable, one-shot cancellation signal.
///
/// Clones share state: cancelling any clone cancels all of them.
#[derive(Debug, Clone)]
pub struct CancellationToken {
    inner: Arc<Inner>,
}

impl Default for CancellationToken {
    fn default() -> Self {
        Self::new()
    }
}

impl CancellationToken {
    /// Create a token that has not fired.
    pub fn new() -> Self {
        let (trigger, notified) = bounded(0);
        Self {
            inner: Arc::new(Inner {
                reason: OnceLock::new(),
                trigger: Mutex::new(Some(trigger)),
                notified,
            }),
        }
    }

    /// Cancel with the default reason.
    ///
    /// Returns `true` if this call fired the token.
    pub fn cancel(&self) -> bool {
        self.cancel_with(CancelReason::default())
    }

    /// Cancel with a specific reason.
    ///
    /// Only the first call has any effect; later reasons are ignored.
    pub fn cancel_with(&self, reason: impl Into<CancelReason>) -> bool {
        if self.inner.reason.set(reason.into()).is_err() {
            return false;
        }
        let trigger = self
            .inner
            .trigger
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        drop(trigger);
        true
    }

    /// Check if the token has fired.
    pub fn is_cancelled(&self) -> bool {
        self.inner.reason.get().is_some()
    }

    /// The reason the token fired with, if it has.
    pub fn reason(&self) -> Option<CancelReason> {
        self.inner.reason.get().cloned()
    }

    /// Register for notification.
    ///
    /// The returned receiver never yields a message; it disconnects when
    /// the token fires, so `recv` returns `Err` exactly once cancelled.
    /// Use it with `select!` alongside other channels.
    pub fn notified(&self) -> Receiver<()> {
        self.inner.notified.clone()
    }
}

/// Makes a single wait preemptible by a [`CancellationToken`].
///
/// Without a token the guard simply waits. With one, whichever of the
/// operation or the token settles first decides the outcome; the other is
/// ignored. The underlying operation is never stopped: if it completes
/// after cancellation its value is dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct CancellationGuard<'a> {
    token: Option<&'a CancellationToken>,
}

impl<'a> CancellationGuard<'a> {
    /// Create a guard over an optional token.
    pub const fn new(token: Option<&'a CancellationToken>) -> Self {
        Self { token }
    }

    /// Get the guarded token.
    pub const fn token(&self) -> Option<&'a CancellationToken> {
        self.token
    }

    /// Fail if the token has already fired.
    pub fn checkpoint(&self) -> Result<(), GuardError> {
        match self.token.and_then(CancellationToken::reason) {
            Some(reason) => Err(GuardError::Cancelled(reason)),
            None => Ok(()),
        }
    }

    /// Wait for `pending`, racing it against the token.
    pub fn wait<T>(&self, pending: Pending<T>) -> Result<T, GuardError> {
        let Some(token) = self.token else {
            return pending.wait();
        };
        self.checkpoint()?;

        let notified = token.notified();
        select! {
            recv(pending.receiver()) -> value => value.map_err(|_| GuardError::Abandoned),
            recv(notified) -> _ => Err(GuardError::Cancelled(token.reason().unwrap_or_default())),
        }
    }
}
