//! Blockfall (workspace facade crate).
//!
//! The game rules live in dedicated crates under `crates/`; this package re-exports them as
//! `blockfall::{core,types}` and adds the greedy [`bot`] used by the headless demo binary.

pub mod bot;

pub use blockfall_core as core;
pub use blockfall_types as types;
