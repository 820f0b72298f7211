//! Process-wide emitter.
//!
//! [`emitter`] hands out a single [`EventEmitter`] shared by the whole
//! process. It is created with [`EmitterConfig::default`](crate::EmitterConfig)
//! on first use and lives until the process exits; nothing tears it down
//! implicitly. Prefer passing explicit emitter instances where the call sites
//! allow it.

use lazy_static::lazy_static;

use crate::emitter::EventEmitter;

lazy_static! {
    static ref GLOBAL_EMITTER: EventEmitter = {
        tracing::debug!("initializing global emitter");
        EventEmitter::new()
    };
}

pub fn emitter() -> &'static EventEmitter {
    &GLOBAL_EMITTER
}
