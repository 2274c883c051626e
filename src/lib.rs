//! Anonymous Chat Room Server Library
//!
//! A WebSocket chat server where anonymous participants create or join
//! short-lived, code-named rooms and exchange messages in real time,
//! with a scripted "AI" participant that echoes `ai:`-prefixed messages.
//!
//! # Features
//! - Room creation with 6-character codes (ambiguous glyphs excluded)
//! - Room joining with one-time history replay
//! - Randomly assigned funny display names, unique per room
//! - Bounded per-room history (last 100 messages)
//! - Scripted AI echo on the `ai:` prefix
//! - Room destruction once the last member leaves
//!
//! # Architecture
//! The room logic (`registry`, `room`, `chat`) is synchronous and
//! transport-free: operations mutate room state and return
//! [`chat::DeliveryPlan`]s describing who must receive what. The WebSocket
//! layer uses the Actor pattern with `mpsc` channels:
//! - `ChatServer` is the central actor owning the registry and all clients
//! - Each connection has a `handler` task communicating with the server
//! - No locks needed - all state access goes through message passing
//!
//! # Example
//! ```ignore
//! use tokio::net::TcpListener;
//! use tokio::sync::mpsc;
//! use anonchat::{ChatServer, handle_connection};
//!
//! #[tokio::main]
//! async fn main() {
//!     let listener = TcpListener::bind("127.0.0.1:8080").await.unwrap();
//!     let (cmd_tx, cmd_rx) = mpsc::channel(256);
//!
//!     tokio::spawn(ChatServer::new(cmd_rx).run());
//!
//!     while let Ok((stream, _)) = listener.accept().await {
//!         let cmd_tx = cmd_tx.clone();
//!         tokio::spawn(handle_connection(stream, cmd_tx));
//!     }
//! }
//! ```

pub mod chat;
pub mod client;
pub mod error;
pub mod handler;
pub mod message;
pub mod registry;
pub mod rng;
pub mod room;
pub mod server;
pub mod types;

// Re-export main types for convenience
pub use chat::{ChatMessage, DeliveryPlan};
pub use client::Client;
pub use error::{AppError, SendError};
pub use handler::handle_connection;
pub use message::{ClientMessage, ErrorCode, ServerMessage};
pub use registry::RoomRegistry;
pub use rng::{IndexPicker, ThreadRngPicker};
pub use room::ChatRoom;
pub use server::{ChatServer, ServerCommand};
pub use types::{ClientId, RoomCode};
