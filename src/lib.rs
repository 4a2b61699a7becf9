//! Lead capture: scripted SDR chat, submission gateway, SMTP delivery.

pub mod chat;
pub mod config;
pub mod delivery;
pub mod error;
pub mod gateway;
