//! Command implementations

pub mod common;
pub mod docs;
pub mod etl;
pub mod run;
pub mod setup;
pub mod validate;
