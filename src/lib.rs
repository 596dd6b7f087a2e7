//! # CookOS
//!
//! A small multi-agent kitchen assistant served over a WebSocket.
//!
//! ## Usage
//!
//! ```bash
//! cookos serve [--config cookos.toml] [--port 4605] [-v]
//! ```
//!
//! ## Modules
//!
//! - `agent` - Roles, prompts, the LLM client and the structured-answer extractor
//! - `config` - TOML and environment configuration
//! - `cook` - Timeline acquisition for live cook mode
//! - `error` - Crate-wide error type
//! - `server` - axum WebSocket server, job pipeline and cook flow
//! - `session` - In-memory cook sessions and idle eviction
pub mod agent;
pub mod config;
pub mod cook;
pub mod error;
pub mod server;
pub mod session;
