//! `price-updater`: find and replace prices in text behind a safety gate.
//!
//! Canonicalizes heterogeneous price text, compiles declarative rules
//! (literal or regex, optionally bounded by literal context anchors) into
//! matchers, previews every match with context, and applies replacements
//! only when the match count passes a safety threshold. Exposed over the
//! Model Context Protocol (MCP) on stdio (JSON-RPC 2.0, newline-delimited).
//!
//! # Tools
//!
//! - `normalize_price` / `format_price`: price text to canonical form and back
//! - `set_price`: load the new price into the session
//! - `find_matches`: preview matches, gate verdict and diff
//! - `apply_replacement`: gated replace with undo snapshot and history
//! - `undo`: single-level rollback per file or tab
//! - `templates`, `settings`, `history`: persisted configuration and audit log
//!
//! # Architecture
//!
//! ```text
//! stdin (JSON-RPC) → McpServer → ToolRouter → Session ─→ engine (pure)
//!                                                │
//!                                 TextSource ←───┴───→ KeyValueStore
//! stdout (JSON-RPC) ←─────────────────────────────┘
//! ```

pub mod engine;
pub mod error;
pub mod price;
pub mod rule;
pub mod server;
pub mod session;
pub mod source;
pub mod store;
pub mod tools;
pub mod util;
pub mod workflow;

pub use error::{Outcome, PriceError, PriceResult};
pub use rule::ReplacementRule;
pub use server::run_mcp_server;
pub use session::Session;
