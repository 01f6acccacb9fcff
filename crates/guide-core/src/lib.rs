pub mod catalog;
pub mod checklist;
pub mod config;
pub mod csv;
pub mod error;
pub mod fetch;
pub mod io;
pub mod links;
pub mod paths;
pub mod recent;
pub mod source;
pub mod steps;
pub mod store;

pub use error::{GuideError, Result};
