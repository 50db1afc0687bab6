//! Outbound notification module
//!
//! Fire-and-forget webhook posts announcing newly submitted applications.

mod webhook_client;

pub use webhook_client::{PengajuanNotification, WebhookClient};
