//! Port traits (interfaces) for the webhook adapter.
//!
//! Merchants implement these to plug their billing system into the
//! inbound repayment webhook server.

mod handler;

pub use handler::RepaymentHandler;
