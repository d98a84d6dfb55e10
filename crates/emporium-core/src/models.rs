//! Domain models for Emporium.
//!
//! Shops own their permission groups; accounts carry per-shop group
//! memberships and the role projection derived from them.

pub mod account;
pub mod shop;
