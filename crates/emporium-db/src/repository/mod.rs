//! SurrealDB repository implementations.

mod account;
mod shop;

pub use account::SurrealAccountRepository;
pub use shop::SurrealShopRepository;
