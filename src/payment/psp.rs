//! Payment service provider adapter.

use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::Result;
use async_trait::async_trait;

/// Payment service provider: a boolean charge oracle with an error channel.
///
/// `Ok(true)` means the charge went through, `Ok(false)` means the provider
/// declined it, `Err` means the provider could not be reached or rejected the
/// request outright. Callers treat declines and errors the same way.
#[async_trait]
pub trait Psp: Send + Sync {
    async fn charge(&self, amount: f64) -> Result<bool>;
}

/// What the mock PSP does with each charge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ChargeBehavior {
    Approve,
    Decline,
    Fail,
}

/// Mock PSP. Approves every charge by default; tests can make it decline or
/// error instead. Counts charge attempts.
#[derive(Debug)]
pub struct MockPsp {
    behavior: ChargeBehavior,
    charges: AtomicUsize,
}

impl MockPsp {
    pub fn approving() -> Self {
        Self {
            behavior: ChargeBehavior::Approve,
            charges: AtomicUsize::new(0),
        }
    }

    pub fn declining() -> Self {
        Self {
            behavior: ChargeBehavior::Decline,
            charges: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            behavior: ChargeBehavior::Fail,
            charges: AtomicUsize::new(0),
        }
    }

    /// Number of charge attempts made against this PSP.
    pub fn charge_count(&self) -> usize {
        self.charges.load(Ordering::SeqCst)
    }
}

impl Default for MockPsp {
    fn default() -> Self {
        Self::approving()
    }
}

#[async_trait]
impl Psp for MockPsp {
    async fn charge(&self, amount: f64) -> Result<bool> {
        self.charges.fetch_add(1, Ordering::SeqCst);

        match self.behavior {
            ChargeBehavior::Approve => {
                tracing::debug!(amount, "Mock PSP approved charge");
                Ok(true)
            }
            ChargeBehavior::Decline => Ok(false),
            ChargeBehavior::Fail => Err(anyhow::anyhow!("psp unreachable")),
        }
    }
}
