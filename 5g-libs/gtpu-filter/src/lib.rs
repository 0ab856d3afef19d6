//! gtpu-filter - receive-path classifier for GTP-U user traffic
//!
//! Runs once per received frame, before the frame enters the normal network stack.  It
//! recognises GTP-U encapsulated traffic, decapsulates one tunnel layer, checks the inner
//! payload and returns a [`Verdict`].
//!
//! The code is written for a verifier-constrained dataplane hook: no allocation, no loops, no
//! recursion, and every header read goes through [`BoundedView::check_header`].

#![cfg_attr(not(test), no_std)]

mod classifier;
mod diag;
pub mod eth;
pub mod gtpu;
pub mod ipv4;
pub mod udp;
mod verdict;
mod view;

#[cfg(test)]
mod test_support;

pub use classifier::{Frame, classify, classify_bytes};
pub use diag::{Diagnostics, Event};
pub use verdict::Verdict;
pub use view::{BoundedView, Truncated};
