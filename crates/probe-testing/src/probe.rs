//! Scriptable stand-in for a dependency handle.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU8, AtomicUsize, Ordering};

use probe_core::health::DependencyProbe;

/// How the mock answers a ping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Behavior {
    Healthy,
    Failing,
    /// Never completes; only a timeout or cancellation ends the ping.
    Hanging,
}

impl Behavior {
    fn to_u8(self) -> u8 {
        match self {
            Self::Healthy => 0,
            Self::Failing => 1,
            Self::Hanging => 2,
        }
    }

    fn from_u8(raw: u8) -> Self {
        match raw {
            0 => Self::Healthy,
            1 => Self::Failing,
            _ => Self::Hanging,
        }
    }
}

/// Cloned handles share behavior and counters, so a test can keep one clone
/// while the service owns another.
#[derive(Clone)]
pub struct MockProbe {
    inner: Arc<Inner>,
}

struct Inner {
    behavior: AtomicU8,
    pings: AtomicUsize,
    abandoned: AtomicUsize,
}

impl MockProbe {
    pub fn new(behavior: Behavior) -> Self {
        Self {
            inner: Arc::new(Inner {
                behavior: AtomicU8::new(behavior.to_u8()),
                pings: AtomicUsize::new(0),
                abandoned: AtomicUsize::new(0),
            }),
        }
    }

    pub fn healthy() -> Self {
        Self::new(Behavior::Healthy)
    }

    pub fn failing() -> Self {
        Self::new(Behavior::Failing)
    }

    pub fn hanging() -> Self {
        Self::new(Behavior::Hanging)
    }

    /// Change the answer for subsequent pings.
    pub fn set_behavior(&self, behavior: Behavior) {
        self.inner
            .behavior
            .store(behavior.to_u8(), Ordering::SeqCst);
    }

    /// Number of pings started.
    pub fn pings(&self) -> usize {
        self.inner.pings.load(Ordering::SeqCst)
    }

    /// Number of pings dropped before they completed.
    pub fn abandoned(&self) -> usize {
        self.inner.abandoned.load(Ordering::SeqCst)
    }
}

/// Counts the ping as abandoned unless disarmed on completion.
struct AbandonGuard<'a> {
    inner: &'a Inner,
    armed: bool,
}

impl Drop for AbandonGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.inner.abandoned.fetch_add(1, Ordering::SeqCst);
        }
    }
}

impl DependencyProbe for MockProbe {
    fn ping(&self) -> impl Future<Output = anyhow::Result<()>> + Send {
        let inner = &*self.inner;
        async move {
            inner.pings.fetch_add(1, Ordering::SeqCst);
            let mut guard = AbandonGuard { inner, armed: true };
            let result = match Behavior::from_u8(inner.behavior.load(Ordering::SeqCst)) {
                Behavior::Healthy => Ok(()),
                Behavior::Failing => Err(anyhow::anyhow!("connection refused")),
                Behavior::Hanging => std::future::pending().await,
            };
            guard.armed = false;
            result
        }
    }
}
