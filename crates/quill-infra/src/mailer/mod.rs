//! Outbound mail transports.

mod memory;
mod smtp;

pub use memory::InMemoryMailer;
pub use smtp::{SmtpConfig, SmtpMailer};
