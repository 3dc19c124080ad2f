//! tabdeck-core — Pure domain logic, no UI.
//!
//! Profile persistence, weather lookup, cat facts, the canned assistant, and
//! panel state for the tabdeck widget. Frontends own the view and receive the
//! results of delayed work as [`events::DeskEvent`]s.

pub mod avatar;
pub mod chat;
pub mod config;
pub mod deferred;
pub mod events;
pub mod facts;
pub mod profile;
pub mod storage;
pub mod types;
pub mod view;
pub mod weather;
