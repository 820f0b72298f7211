//! # Listener
//!
//! A [`Listener`] is the callable registered against an event. It wraps the
//! closure in an `Arc`, so cloning a listener hands out the *same* listener:
//! registration and removal compare listeners by pointer identity.
//!
//! ```rust
//! use evenement::Listener;
//! use serde_json::Value;
//!
//! let a: Listener<Value> = Listener::new(|_args| Ok(()));
//! let b: Listener<Value> = Listener::new(|_args| Ok(()));
//!
//! assert_eq!(a, a.clone());
//! // Identical bodies, constructed twice: different listeners.
//! assert_ne!(a, b);
//! ```

use std::{fmt, sync::Arc};

use crate::error::ListenerResult;

type Callback<A> = dyn Fn(&[A]) -> ListenerResult + Send + Sync;

pub struct Listener<A = serde_json::Value> {
    callback: Arc<Callback<A>>,
}

impl<A> Listener<A> {
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(&[A]) -> ListenerResult + Send + Sync + 'static,
    {
        Self {
            callback: Arc::new(callback),
        }
    }

    /// Invokes the wrapped closure with the emitted arguments.
    pub fn call(&self, args: &[A]) -> ListenerResult {
        (self.callback)(args)
    }

    pub fn same_as(&self, other: &Listener<A>) -> bool {
        // Compare data pointers only; vtable pointers may differ across codegen units.
        std::ptr::addr_eq(Arc::as_ptr(&self.callback), Arc::as_ptr(&other.callback))
    }
}

impl<A> Clone for Listener<A> {
    fn clone(&self) -> Self {
        Self {
            callback: Arc::clone(&self.callback),
        }
    }
}

impl<A> PartialEq for Listener<A> {
    fn eq(&self, other: &Self) -> bool {
        self.same_as(other)
    }
}

impl<A> Eq for Listener<A> {}

impl<A> fmt::Debug for Listener<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Listener")
            .field(&Arc::as_ptr(&self.callback).cast::<()>())
            .finish()
    }
}
