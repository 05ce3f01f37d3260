//! Command-line front ends over the core

pub mod convert;
pub mod rates;
pub mod setup;
pub mod ui;
