//! # Ports Layer
//!
//! - `inbound`: what the gateway calls
//! - `outbound`: where vote records live

pub mod inbound;
pub mod outbound;

pub use inbound::SlashingProtectionApi;
pub use outbound::SlashingStore;
