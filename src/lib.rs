pub mod cli;
pub mod config;
pub mod dashboard;
pub mod events;
pub mod picker;
pub mod session;
pub mod web;
