pub mod config;
pub mod error;
pub mod host;
pub mod hub;
pub mod logging;
pub mod model;
pub mod protocol;
pub mod tui;

pub use error::HubError;
