//! Domain engine for a small polling direct-message service.
//!
//! Accounts authenticate, exchange direct messages and poll for updates; the
//! engine owns the account directory, session tokens and the message store,
//! and exposes the nine operations a transport adapter (gRPC, HTTP, ...)
//! forwards wire calls to. There is no push delivery and no transport code
//! here: clients poll [`ChatEngine::get_messages`] for freshness.

pub mod config;
pub mod db;
pub mod engine;
pub mod error;
pub mod password;

pub use config::EngineConfig;
pub use db::{Account, AccountInfo, DeleteReport, Message, Session};
pub use engine::{AccountPage, ChatEngine, LoginOutcome, MessageBatch};
pub use error::ChatError;
