//! Port traits for the collaborators the core talks to.

pub mod config_port;
pub mod price_history_port;
pub mod quote_port;
