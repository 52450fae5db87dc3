//! # Connect Four Sync
//!
//! A Connect Four engine with undo and save/load that tries a remote store
//! first and falls back to a local one. Ships with a terminal UI built with
//! Ratatui.
//!
//! ## Modules
//!
//! - [`game`]: board, players, win detection, move history, game state
//! - [`persistence`]: snapshot format, store traits, remote-then-local sync
//! - [`controller`]: serialized mutations, published view, winner events
//! - [`ui`]: terminal game view
//! - [`config`]: TOML configuration loading and validation
//! - [`error`]: structured error types

pub mod config;
pub mod controller;
pub mod error;
pub mod game;
pub mod persistence;
pub mod ui;
