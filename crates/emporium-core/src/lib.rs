//! Emporium Core — shop and account models, repository traits, the
//! authorization gate contract and the per-shop role projection.

pub mod authz;
pub mod error;
pub mod models;
pub mod projection;
pub mod repository;
