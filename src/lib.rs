//! # evenement
//!
//! A small, synchronous event emitter. Listeners are registered against
//! event names and run in registration order when the event is emitted.
//!
//! ```rust
//! use evenement::{EventEmitter, Listener};
//! use serde_json::Value;
//!
//! let emitter: EventEmitter = EventEmitter::new();
//! emitter
//!     .on("user.login", Listener::new(|args: &[Value]| {
//!         println!("login: {:?}", args);
//!         Ok(())
//!     }))?
//!     .once("user.login", Listener::new(|_| Ok(())))?;
//!
//! emitter.emit("user.login", &[Value::from("alice")])?;
//! assert_eq!(emitter.listeners("user.login").len(), 1);
//! # Ok::<(), evenement::EmitterError>(())
//! ```
//!
//! ## Modules
//!
//! | Module       | Contents                                               |
//! |--------------|--------------------------------------------------------|
//! | `emitter`    | [`EventEmitter`]: registration, dispatch, forwarding   |
//! | `listener`   | [`Listener`]: identity-comparable callback             |
//! | [`matcher`]  | wildcard segment matching                              |
//! | `config`     | [`EmitterConfig`]: delimiter, wildcard, warn threshold |
//! | [`global`]   | lazily created process-wide emitter                    |
//! | `error`      | [`EmitterError`] and listener result types             |

mod config;
mod emitter;
mod error;
mod listener;
mod registry;

pub mod global;
pub mod matcher;

// Re-exports
pub use config::EmitterConfig;
pub use emitter::EventEmitter;
pub use error::{EmitterError, EmitterResult, ListenerError, ListenerResult};
pub use listener::Listener;
