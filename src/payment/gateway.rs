//! Payment Collaborator Interface
//!
//! The checkout flow never reaches for a global widget. It is handed a
//! [`PaymentCollaborator`] and talks to it through this trait, which lets the
//! server run against [`SimulatedGateway`] and tests substitute their own.

use super::models::{FailureMetadata, PaymentFailure, PaymentOptions, PaymentOutcome, PaymentSuccess};
use super::widget::{LoadState, ScriptRegistry, WidgetMount};
use crate::checkout::CheckoutError;
use dashmap::DashMap;
use std::{
    str::FromStr,
    sync::{
        atomic::{AtomicU64, AtomicU8, AtomicUsize, Ordering},
        Arc,
    },
    time::Duration,
};
use tokio::sync::oneshot;
use uuid::Uuid;

/// Hosted payment widget as seen from the checkout flow
pub trait PaymentCollaborator: Send + Sync {
    /// Injects the widget script. Dropping the mount removes it again.
    fn mount(&self) -> WidgetMount;

    /// Opens a payment session.
    ///
    /// The returned receiver yields at most one outcome for the session.
    fn open(
        &self,
        options: PaymentOptions,
    ) -> Result<oneshot::Receiver<PaymentOutcome>, CheckoutError>;
}

/// A payment session that has been opened and is waiting for its outcome
#[derive(Debug)]
pub struct PendingPayment {
    /// Identifies the attempt this outcome belongs to
    pub attempt: Uuid,

    /// Amount handed to the collaborator, in minor units
    pub amount: u64,

    receiver: oneshot::Receiver<PaymentOutcome>,
}

impl PendingPayment {
    pub fn new(attempt: Uuid, amount: u64, receiver: oneshot::Receiver<PaymentOutcome>) -> Self {
        Self {
            attempt,
            amount,
            receiver,
        }
    }

    /// Waits for the collaborator's outcome, giving up after `timeout`.
    pub async fn wait(self, timeout: Duration) -> PaymentOutcome {
        match tokio::time::timeout(timeout, self.receiver).await {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(_)) => PaymentOutcome::Abandoned,
            Err(_) => PaymentOutcome::TimedOut,
        }
    }
}

// =============================================================================
// Simulated Gateway
// =============================================================================

/// How the simulated widget script finishes loading
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadBehaviour {
    Ready,
    /// Never settles; the checkout sees it as loading until the load timeout
    Pending,
    /// Settles as ready once the delay has passed
    Delayed(Duration),
    Fail(String),
}

/// How the simulated widget answers an opened session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Simulation {
    Approve = 0,
    Decline = 1,
    /// Keeps the session open without ever answering
    Hold = 2,
}

impl FromStr for Simulation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "approve" => Ok(Self::Approve),
            "decline" => Ok(Self::Decline),
            "hold" => Ok(Self::Hold),
            other => Err(format!("unknown payment simulation: {other}")),
        }
    }
}

impl Simulation {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::Approve,
            1 => Self::Decline,
            _ => Self::Hold,
        }
    }
}

/// In-process stand-in for the hosted payment widget
#[derive(Debug)]
pub struct SimulatedGateway {
    scripts: Arc<ScriptRegistry>,
    src: String,
    load: LoadBehaviour,
    simulation: AtomicU8,
    held: DashMap<Uuid, oneshot::Sender<PaymentOutcome>>,
    opened: AtomicUsize,
    last_amount: AtomicU64,
}

impl SimulatedGateway {
    pub fn new(src: impl Into<String>, load: LoadBehaviour, simulation: Simulation) -> Self {
        Self {
            scripts: ScriptRegistry::new(),
            src: src.into(),
            load,
            simulation: AtomicU8::new(simulation as u8),
            held: DashMap::new(),
            opened: AtomicUsize::new(0),
            last_amount: AtomicU64::new(0),
        }
    }

    /// A gateway whose script loads immediately and approves every payment
    pub fn approving() -> Self {
        Self::new(
            crate::config::DEFAULT_WIDGET_SRC,
            LoadBehaviour::Ready,
            Simulation::Approve,
        )
    }

    pub fn set_simulation(&self, simulation: Simulation) {
        self.simulation.store(simulation as u8, Ordering::SeqCst);
    }

    pub fn simulation(&self) -> Simulation {
        Simulation::from_u8(self.simulation.load(Ordering::SeqCst))
    }

    /// The document the widget scripts are injected into
    pub fn scripts(&self) -> &Arc<ScriptRegistry> {
        &self.scripts
    }

    /// Number of payment sessions opened so far
    pub fn opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }

    /// Amount of the most recently opened session, in minor units
    pub fn last_amount(&self) -> u64 {
        self.last_amount.load(Ordering::SeqCst)
    }

    /// Held sessions whose caller is still waiting
    pub fn held_sessions(&self) -> usize {
        self.held.iter().filter(|tx| !tx.is_closed()).count()
    }

    fn settle_after(&self, mount: &WidgetMount, delay: Duration) {
        let scripts = Arc::clone(&self.scripts);
        let id = mount.id();
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    tokio::time::sleep(delay).await;
                    if scripts.mark_loaded(id) {
                        tracing::debug!(script = %id, "simulated widget script loaded");
                    }
                });
            }
            Err(_) => {
                scripts.mark_loaded(id);
            }
        }
    }

    fn decline(options: &PaymentOptions) -> PaymentFailure {
        PaymentFailure {
            code: "BAD_REQUEST_ERROR".to_string(),
            description: "Payment was declined by the issuing bank".to_string(),
            source: "bank".to_string(),
            step: "payment_authorization".to_string(),
            reason: "payment_failed".to_string(),
            metadata: FailureMetadata {
                payment_id: Some(format!("pay_{}", Uuid::new_v4().simple())),
                order_id: options.notes.get("order_id").cloned(),
            },
        }
    }
}

impl PaymentCollaborator for SimulatedGateway {
    fn mount(&self) -> WidgetMount {
        let state = match &self.load {
            LoadBehaviour::Ready => LoadState::Ready,
            LoadBehaviour::Pending | LoadBehaviour::Delayed(_) => LoadState::Loading,
            LoadBehaviour::Fail(reason) => LoadState::Failed(reason.clone()),
        };
        let mount = self.scripts.inject(&self.src, state);
        if let LoadBehaviour::Delayed(delay) = self.load {
            self.settle_after(&mount, delay);
        }
        mount
    }

    fn open(
        &self,
        options: PaymentOptions,
    ) -> Result<oneshot::Receiver<PaymentOutcome>, CheckoutError> {
        let (tx, rx) = oneshot::channel();
        self.opened.fetch_add(1, Ordering::SeqCst);
        self.last_amount.store(options.amount, Ordering::SeqCst);

        let simulation = self.simulation();
        tracing::debug!(amount = options.amount, currency = %options.currency, ?simulation, "simulated payment session opened");

        // A failed send means the caller already dropped the receiver.
        match simulation {
            Simulation::Approve => {
                let success = PaymentSuccess {
                    payment_id: format!("pay_{}", Uuid::new_v4().simple()),
                    order_id: None,
                    signature: None,
                };
                let _ = tx.send(PaymentOutcome::Succeeded(success));
            }
            Simulation::Decline => {
                let _ = tx.send(PaymentOutcome::Failed(Self::decline(&options)));
            }
            Simulation::Hold => {
                // Senders whose receiver timed out or was dismissed are dead weight.
                self.held.retain(|_, held| !held.is_closed());
                self.held.insert(Uuid::new_v4(), tx);
            }
        }

        Ok(rx)
    }
}
