//! Terminal front end for Parley.

pub mod app;
pub mod event;
pub mod theme;
pub mod ui;
