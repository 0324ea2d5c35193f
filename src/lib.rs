//! Spicechat is a full-screen terminal client for a Spice AI chat server.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`core`] owns runtime state: the server-derived session, the active
//!   conversation pointer, the transcript, and the fence tokenizer that
//!   splits message text into prose and code segments.
//! - [`api`] wraps the backend HTTP endpoints behind a cookie-aware client.
//! - [`ui`] renders the terminal interface (sidebar, transcript, composer,
//!   dialogs, banners) and runs the interactive event loop.
//! - [`commands`] implements the slash commands typed into the composer.
//!
//! The runtime entrypoint lives in the binary crate (`src/main.rs`), which
//! loads configuration and dispatches into [`ui::chat_loop`].

pub mod api;
pub mod commands;
pub mod core;
pub mod logging;
pub mod ui;
pub mod utils;
