//! Profile and subscription access

pub mod ports;

pub use ports::{ProfileRepository, SubscriptionRepository};
