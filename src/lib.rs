//! # FerroKV Driver
//!
//! A Rust client driver for FerroKV, a replicated key-value store deployed in
//! a primary/replica topology.
//!
//! ## Features
//!
//! - **Intent-Based Routing** - Read commands may be served by replicas, write
//!   commands always go to the primary, decided per command or per batch
//! - **Aggregate Batch Intent** - A batch containing any write is routed as a
//!   whole to the primary, preserving command order
//! - **Lifecycle Management** - Open/active/closed connection state with
//!   idempotent shutdown and one-shot close notifications
//! - **Pluggable Topology** - Connection acquisition, pooling, and replica
//!   selection live behind the [`ConnectionProvider`] trait
//! - **Blocking Facade** - Statically enumerated synchronous operations over
//!   the command completion slots
//!
//! ## Basic Usage
//!
//! ```rust,ignore
//! use std::time::Duration;
//! use ferrokv_driver::{Command, ConnectionHandler, RoutingWriter};
//!
//! // provider: 토폴로지 콜라보레이터 (ConnectionProvider 구현)
//! let writer = RoutingWriter::new(Box::new(provider));
//! let connection = ConnectionHandler::new(writer, Duration::from_secs(60));
//!
//! // GET은 레플리카로, SET은 프라이머리로 라우팅됨
//! let value = connection.sync().get("key1")?;
//! connection.sync().set("key1", "value1")?;
//!
//! // 배치: 쓰기가 하나라도 섞이면 전체가 프라이머리로 감
//! let batch = vec![
//!     Command::get("k1"),
//!     Command::set("k2", "v2"),
//!     Command::get("k3"),
//! ];
//! let results = connection.dispatch_batch(batch)?;
//!
//! connection.close();
//! ```
//!
//! ## Intent Classification
//!
//! ```rust
//! use ferrokv_driver::{CommandName, Intent};
//!
//! assert_eq!(Intent::of(CommandName::Get), Intent::Read);
//! assert_eq!(Intent::of(CommandName::Set), Intent::Write);
//! ```
//!
//! ## Modules
//!
//! - [`writer`] - Intent-based command router
//! - [`handler`] - Connection lifecycle and close-event system
//! - [`provider`] - Topology collaborator contracts

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod command;
pub mod error;
pub mod events;
pub mod handler;
pub mod intent;
pub mod options;
pub mod provider;
pub mod readonly;
pub mod sync;
pub mod writer;

// Re-exports for convenience
pub use command::{Command, CommandName, CommandOutput, Response};
pub use error::{DriverError, DriverResult};
pub use events::{CloseEvents, CloseListener};
pub use handler::{Closeable, CloseableRegistry, ConnectionHandler};
pub use intent::Intent;
pub use options::{ClientOptions, ClientOptionsBuilder, DisconnectedBehavior};
pub use provider::{ConnectionProvider, NodeConnection, ReadFrom};
pub use readonly::{is_read_only, READ_ONLY_COMMANDS};
pub use sync::SyncCommands;
pub use writer::RoutingWriter;
