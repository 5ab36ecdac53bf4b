//! Port traits the core needs from its collaborators.

pub mod config_port;
pub mod data_port;
pub mod report_port;
