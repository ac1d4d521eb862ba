//! Core business logic for Pelita.
//!
//! This crate contains the pure domain rules of the school administration
//! system: invoice posting to the general ledger, journal reversal on
//! cancellation, schedule conflict detection, grading rules, and credit
//! balance accounting. It has no web or database dependencies so every rule
//! here is unit-testable in isolation.

pub mod auth;
pub mod credit;
pub mod finance;
pub mod grading;
pub mod schedule;
