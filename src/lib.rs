// Library root
// -----------
// Terminal front-end for the credit risk backend. The binary (`main.rs`)
// resolves the backend, builds a `Shell` and hands it to the menu loop.
//
// Module responsibilities:
// - `config`: defaults, optional TOML file and environment overrides.
// - `discovery`: finds the backend's public URL through the tunnel agent.
// - `api`: HTTP calls to the backend (register, login, predict, log).
// - `session`: login state and the credentials passed to each call.
// - `shell`: what each screen does, expressed as a `Notice` to show.
// - `table`: layout of the prediction log as text.
// - `chat`: the "Chat with AI" completion client.
// - `ui`: prompts, spinner and colored output.
pub mod api;
pub mod chat;
pub mod config;
pub mod discovery;
pub mod error;
pub mod session;
pub mod shell;
pub mod table;
pub mod ui;

pub use error::{Error, Result};
