//! Mail delivery adapters

pub mod log_mail;

pub use log_mail::LogMailSender;
