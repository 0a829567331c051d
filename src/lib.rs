//! # hostmux
//!
//! Multiplexes many owners' event handlers onto a host object that natively
//! supports a single callback per event name, and forwards every other
//! property access to the host unchanged.
//!
//! A host object (a game room, an embedded scripting surface, any property
//! bag whose environment calls `host[eventName](...)` when something
//! happens) has one callable slot per event. hostmux lets independent
//! plugins coexist on that slot: each owner registers through its own
//! [`Facade`] view, the shared [`HandlerRegistry`] keeps per-owner entries
//! in registration order, and a single dispatcher installed at the host
//! property fans each event out to everyone.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────┐
//! │  Facade (one per host + owner)                         │
//! │  ├── event names ────► HandlerRegistry                 │
//! │  │   (prefix "on")     (EventName, OwnerId) → Handler  │
//! │  └── other names ────► PropertyStore ────► Host        │
//! │                                                        │
//! │  host.fire("onX", args)                                │
//! │    └──► Dispatcher ──► HandlerRegistry::execute_all    │
//! │                        (registration order; a `false`  │
//! │                         verdict wins)                  │
//! └────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use hostmux::{Handler, MemoryHost, Mux, MuxConfig};
//! use serde_json::json;
//!
//! # fn main() -> hostmux::Result<()> {
//! let mux = Mux::new(MuxConfig::default())?;
//! let host = Arc::new(MemoryHost::new());
//!
//! let plugin_a = mux.facade(host.clone(), "plugin-a")?;
//! plugin_a.set_handler("onPlayerJoin", Handler::from_fn(|_| Some(true)))?;
//!
//! let plugin_b = mux.facade(host.clone(), "plugin-b")?;
//! plugin_b.set_handler("onPlayerJoin", Handler::from_fn(|_| Some(false)))?;
//!
//! // The host sees one callable; both handlers run, and the veto wins.
//! let verdict = host.fire("onPlayerJoin", &[json!({"name": "alice"})])?;
//! assert_eq!(verdict, Some(false));
//! # Ok(())
//! # }
//! ```
//!
//! No event semantics live here: what an event means, and when it fires, is
//! the host environment's business.

pub mod error;
pub mod facade;
pub mod host;
pub mod mux;
pub mod owner;
pub mod registry;
pub mod store;
pub mod value;

pub use error::{Error, Result};
pub use facade::Facade;
pub use host::{Host, MemoryHost};
pub use mux::{Mux, MuxConfig};
pub use owner::OwnerId;
pub use registry::{DispatchOutcome, HandlerRegistry};
pub use store::{Passthrough, PropertyStore};
pub use value::{Handler, HandlerFn, PropValue};
