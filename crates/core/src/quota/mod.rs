//! Token quota enforcement

pub mod guard;
pub mod ports;

pub use guard::check_limit;
pub use ports::{TokenLedgerRepository, UploadQuotaRepository};
