//! Payment Collaborator Module
//!
//! This module contains the boundary to the hosted payment widget:
//! - Options and outcome models exchanged with the widget
//! - Scoped management of the injected widget script
//! - The collaborator trait and an in-process simulated gateway

pub mod gateway;
pub mod models;
pub mod widget;

pub use gateway::{LoadBehaviour, PaymentCollaborator, PendingPayment, SimulatedGateway, Simulation};
pub use models::{PaymentFailure, PaymentOptions, PaymentOutcome, PaymentSuccess, Prefill, Theme};
pub use widget::{LoadState, ScriptRegistry, WidgetMount};
