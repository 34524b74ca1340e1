//! tl - Single-user kanban task board
//!
//! This library provides the core functionality for the tl CLI tool: boards
//! with fixed backlog/in-progress/done columns, tasks moved between and
//! within columns, and a single locally persisted JSON snapshot.
//!
//! # Core Concepts
//!
//! - **Board State Store**: the authoritative in-memory model; every
//!   mutation is a synchronous, infallible transformation of the snapshot
//! - **Persistence Gateway**: asynchronous load/save of the whole snapshot
//!   to one file, with atomic writes and a schema-version guard
//! - **Debounced Autosave**: drag-and-drop bursts coalesce into a single
//!   trailing-edge write; an active drag suppresses autosave entirely
//!
//! # Module Organization
//!
//! - `cli`: command-line interface using clap
//! - `config`: configuration loading from `tl.toml`
//! - `error`: error types and result aliases
//! - `id`: opaque identifier generation
//! - `model`: the serializable board state aggregate
//! - `store`: board state store (mutations + derived views)
//! - `storage`: persistence gateway for the state snapshot
//! - `debounce`: trailing-edge debouncer state machine
//! - `session`: store/persistence wiring and autosave policy
//! - `output`: CLI output formatting

pub mod cli;
pub mod config;
pub mod debounce;
pub mod error;
pub mod id;
pub mod model;
pub mod output;
pub mod session;
pub mod storage;
pub mod store;

pub use error::{Error, Result};
