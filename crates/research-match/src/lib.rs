pub mod config;
pub mod error;
pub mod forms;
pub mod reference;
pub mod responder;
pub mod telemetry;
