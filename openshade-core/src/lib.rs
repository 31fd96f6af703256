pub mod action;
pub mod activity;
pub mod apply;
pub mod backup;
pub mod catalog;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod patch;
pub mod persistence;
pub mod recipes;
pub mod shaders;
pub mod sim;
pub mod state;

#[cfg(test)]
mod test_support;

pub use action::{Action, DispatchResult, NavAction, NavIntent};
pub use activity::{ActivityLog, LogEntry, Severity};
pub use apply::{ApplyReport, Outcome};
pub use dispatch::dispatch_action;
pub use error::{Error, Result};
pub use shaders::ShaderFile;
pub use state::AppState;
