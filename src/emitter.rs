//! # Event Emitter
//!
//! [`EventEmitter`] is a synchronous, in-process observer registry: listeners
//! are registered against event names and invoked in order by [`EventEmitter::emit`].
//!
//! ## Features
//!
//! - **Ordered dispatch**: listeners run in registration order on the caller's thread
//! - **Once / many**: listeners that retire after one or `n` invocations
//! - **Reentrancy**: listeners may register, remove or emit on the same emitter
//! - **Forwarding**: every emit can be replayed on child emitters
//! - **Wildcards**: optional segment matching, see [`crate::matcher`]
//!
//! ## Dispatch order
//!
//! ```text
//! emit(event, args)
//!   ├─ snapshot (one lock): any-listeners, before-once (taken), persistent, once
//!   ├─ 0. any-listeners
//!   ├─ 1. before-once listeners
//!   ├─ 2. persistent listeners   (skipped if removed meanwhile)
//!   ├─ 3. once listeners         (taken from the table, then run)
//!   └─ 4. emit(event, args) on every forward target
//! ```
//!
//! Listeners registered while an emit is running are not part of its
//! snapshot and first run on the next emit. The lock is never held while a
//! listener runs.
//!
//! ## Errors
//!
//! A listener returning `Err` aborts the emit: the error is returned as
//! [`EmitterError::Listener`] and the remaining listeners of that pass are
//! skipped. Panics are not caught.

use std::{
    collections::BTreeMap,
    fmt,
    sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use tracing::{debug, trace, warn};

use crate::{
    config::EmitterConfig,
    error::{ensure_event_name, EmitterError, EmitterResult},
    listener::Listener,
    registry::{ListenerRegistry, Lookup, Tier},
};

struct Inner<A> {
    registry: ListenerRegistry<A>,
    any: Vec<Listener<A>>,
    forwards: Vec<EventEmitter<A>>,
}

/// Cloneable handle to a listener registry.
///
/// Clones share the same registry; this is how a listener gets hold of the
/// emitter it is registered on.
///
/// ## Example
///
/// ```rust
/// use std::sync::{Arc, Mutex};
/// use evenement::{EventEmitter, Listener};
/// use serde_json::{json, Value};
///
/// let emitter: EventEmitter = EventEmitter::new();
/// let seen = Arc::new(Mutex::new(Vec::new()));
///
/// let sink = seen.clone();
/// let listener = Listener::new(move |args: &[Value]| {
///     sink.lock().unwrap().extend_from_slice(args);
///     Ok(())
/// });
///
/// emitter.on("user.created", listener.clone()).unwrap();
/// emitter.emit("user.created", &[json!("alice")]).unwrap();
/// emitter.remove_listener("user.created", &listener).unwrap();
/// emitter.emit("user.created", &[json!("bob")]).unwrap();
///
/// assert_eq!(*seen.lock().unwrap(), vec![json!("alice")]);
/// ```
pub struct EventEmitter<A = serde_json::Value> {
    inner: Arc<RwLock<Inner<A>>>,
    config: Arc<EmitterConfig>,
}

impl<A> Clone for EventEmitter<A> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            config: Arc::clone(&self.config),
        }
    }
}

impl<A> Default for EventEmitter<A> {
    fn default() -> Self {
        Self::build(EmitterConfig::default())
    }
}

impl<A> fmt::Debug for EventEmitter<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.read();
        f.debug_struct("EventEmitter")
            .field("events", &inner.registry.event_names())
            .field("any", &inner.any.len())
            .field("forwards", &inner.forwards.len())
            .field("config", &self.config)
            .finish()
    }
}

impl<A> EventEmitter<A> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: EmitterConfig) -> EmitterResult<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: EmitterConfig) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Inner {
                registry: ListenerRegistry::default(),
                any: Vec::new(),
                forwards: Vec::new(),
            })),
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &EmitterConfig {
        &self.config
    }

    // The registry is never left half-updated, so a poisoned lock is still usable.
    fn read(&self) -> RwLockReadGuard<'_, Inner<A>> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner<A>> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn lookup(&self) -> Lookup<'_> {
        if self.config.wildcard {
            Lookup::Wildcard {
                delimiter: &self.config.delimiter,
            }
        } else {
            Lookup::Exact
        }
    }

    fn register(
        &self,
        tier: Tier,
        event: &str,
        listener: Listener<A>,
        remaining: Option<usize>,
    ) -> EmitterResult<&Self> {
        ensure_event_name(event)?;
        let count = self.write().registry.add(tier, event, listener, remaining);
        debug!(event, %tier, count, "listener registered");

        let max = self.config.max_listeners;
        if max > 0 && count > max {
            warn!(
                event,
                count, max, "possible listener leak: listener count exceeds max_listeners"
            );
        }
        Ok(self)
    }

    /// Registers `listener` to run on every emit of `event`.
    ///
    /// The same listener may be registered more than once; it then runs once
    /// per registration.
    pub fn on(&self, event: &str, listener: Listener<A>) -> EmitterResult<&Self> {
        self.register(Tier::Persistent, event, listener, None)
    }

    /// Registers `listener` to run on the next emit of `event` only.
    pub fn once(&self, event: &str, listener: Listener<A>) -> EmitterResult<&Self> {
        self.register(Tier::Once, event, listener, None)
    }

    /// Registers a once-listener that runs ahead of the persistent listeners.
    pub fn before_once(&self, event: &str, listener: Listener<A>) -> EmitterResult<&Self> {
        self.register(Tier::BeforeOnce, event, listener, None)
    }

    /// Registers `listener` to run on at most `times` emits of `event`.
    ///
    /// `times == 0` registers nothing. A negative count fails with
    /// [`EmitterError::OutOfRange`].
    pub fn many(&self, event: &str, times: i64, listener: Listener<A>) -> EmitterResult<&Self> {
        ensure_event_name(event)?;
        if times < 0 {
            return Err(EmitterError::out_of_range(
                "You cannot listen less than zero times.",
            ));
        }
        if times == 0 {
            return Ok(self);
        }
        let times = usize::try_from(times).unwrap_or(usize::MAX);
        self.register(Tier::Persistent, event, listener, Some(times))
    }

    /// Removes the first registration of `listener` from each tier of `event`.
    ///
    /// Removing a listener that is not registered is not an error.
    ///
    /// Called from a running listener, the removal stops a listener that has
    /// not run yet in the current emit, with one exception: once and
    /// before-once listeners are taken from their tables as a batch when
    /// their phase starts (before-once at emit start, once after the
    /// persistent listeners). Removing one of them from within its own batch
    /// does not stop it.
    pub fn remove_listener(&self, event: &str, listener: &Listener<A>) -> EmitterResult<()> {
        ensure_event_name(event)?;
        if self.write().registry.remove(event, listener) {
            debug!(event, "listener removed");
        }
        Ok(())
    }

    /// Clears the listeners of `event`, or of every event with `None`.
    ///
    /// No event is ever registered under an empty name, so `Some("")` clears
    /// nothing and is not rejected.
    pub fn remove_all_listeners(&self, event: Option<&str>) {
        let mut inner = self.write();
        match event {
            Some(event) => {
                inner.registry.clear_event(event);
                debug!(event, "all listeners removed for event");
            }
            None => {
                inner.registry.clear();
                debug!("all listeners removed");
            }
        }
    }

    /// Snapshot of the listeners pending for `event`: before-once, then
    /// persistent, then once listeners, each in registration order.
    pub fn listeners(&self, event: &str) -> Vec<Listener<A>> {
        self.read().registry.listeners(event, self.lookup())
    }

    /// Every event with at least one listener, mapped to its listeners.
    pub fn all_listeners(&self) -> BTreeMap<String, Vec<Listener<A>>> {
        self.read().registry.all()
    }

    pub fn listener_count(&self, event: &str) -> usize {
        self.listeners(event).len()
    }

    pub fn has_listeners(&self, event: &str) -> bool {
        self.listener_count(event) > 0
    }

    pub fn event_names(&self) -> Vec<String> {
        self.read().registry.event_names()
    }

    /// Registers a listener notified on every emit, before named listeners.
    pub fn on_any(&self, listener: Listener<A>) -> &Self {
        self.write().any.push(listener);
        self
    }

    /// Removes the first registration of an any-listener. A listener removed
    /// while an emit is running is skipped if it has not run yet.
    pub fn off_any(&self, listener: &Listener<A>) {
        let mut inner = self.write();
        if let Some(index) = inner.any.iter().position(|l| l.same_as(listener)) {
            inner.any.remove(index);
        }
    }

    /// Replays every emit of this emitter on `child`, after local listeners ran.
    ///
    /// Forwarding cycles are not detected; a cycle recurses until the stack
    /// overflows.
    pub fn forward(&self, child: &EventEmitter<A>) {
        self.write().forwards.push(child.clone());
        debug!("forward target added");
    }

    /// Stops forwarding to `child`. Returns whether it was a forward target.
    pub fn unforward(&self, child: &EventEmitter<A>) -> bool {
        let mut inner = self.write();
        match inner
            .forwards
            .iter()
            .position(|f| Arc::ptr_eq(&f.inner, &child.inner))
        {
            Some(index) => {
                inner.forwards.remove(index);
                true
            }
            None => false,
        }
    }

    /// Synchronously dispatches `event` with `args`. See the module docs for
    /// the dispatch order.
    #[tracing::instrument(level = "trace", skip(self, args), fields(arg_count = args.len()))]
    pub fn emit(&self, event: &str, args: &[A]) -> EmitterResult<()> {
        ensure_event_name(event)?;
        self.emit_with(event, args, self.lookup())
    }

    fn emit_with(&self, event: &str, args: &[A], lookup: Lookup<'_>) -> EmitterResult<()> {
        let (any, before_once, persistent, once) = {
            let mut inner = self.write();
            let before_once = inner.registry.snapshot(Tier::BeforeOnce, event, lookup);
            let before_once = inner.registry.take(Tier::BeforeOnce, before_once);
            (
                inner.any.clone(),
                before_once,
                inner.registry.snapshot(Tier::Persistent, event, lookup),
                inner.registry.snapshot(Tier::Once, event, lookup),
            )
        };

        trace!(count = any.len(), "dispatching any-listeners");
        for listener in &any {
            if !self.read().any.iter().any(|l| l.same_as(listener)) {
                trace!("any-listener removed during dispatch, skipped");
                continue;
            }
            invoke(event, listener, args)?;
        }

        trace!(tier = %Tier::BeforeOnce, count = before_once.len(), "dispatching");
        for listener in &before_once {
            invoke(event, listener, args)?;
        }

        trace!(tier = %Tier::Persistent, count = persistent.len(), "dispatching");
        for slot in &persistent {
            // the write guard is a temporary and is released before the call
            if !self.write().registry.claim(slot) {
                trace!(event = %slot.event, "listener removed during dispatch, skipped");
                continue;
            }
            invoke(event, &slot.listener, args)?;
        }

        let once = self.write().registry.take(Tier::Once, once);
        trace!(tier = %Tier::Once, count = once.len(), "dispatching");
        for listener in &once {
            invoke(event, listener, args)?;
        }

        let forwards = self.read().forwards.clone();
        for child in &forwards {
            trace!("forwarding");
            child.emit(event, args)?;
        }
        Ok(())
    }

    /// Emits every registered event whose name starts with `prefix`, in
    /// lexicographic order, and returns the emitted names.
    ///
    /// Each name is dispatched to its own listeners only, also in wildcard
    /// mode: a registered pattern such as `user.*` is not expanded here.
    pub fn emit_by_prefix(&self, prefix: &str, args: &[A]) -> EmitterResult<Vec<String>> {
        if prefix.is_empty() {
            return Err(EmitterError::invalid_argument(
                "event prefix must not be an empty string",
            ));
        }
        let names: Vec<String> = self
            .event_names()
            .into_iter()
            .filter(|name| name.starts_with(prefix))
            .collect();
        for name in &names {
            trace!(event = %name, "emitting by prefix");
            self.emit_with(name, args, Lookup::Exact)?;
        }
        Ok(names)
    }
}

fn invoke<A>(event: &str, listener: &Listener<A>, args: &[A]) -> EmitterResult<()> {
    listener.call(args).map_err(|source| {
        debug!(event, error = %source, "listener failed");
        EmitterError::Listener {
            event: event.to_string(),
            source,
        }
    })
}
