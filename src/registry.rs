//! # Listener registry
//!
//! Storage behind [`EventEmitter`](crate::EventEmitter). The registry only
//! stores and hands out listeners; it never invokes them, so the emitter can
//! release its lock before any listener code runs.
//!
//! ## Tables
//! ```text
//! ListenerRegistry
//!   ├─ before_once : event → [Entry]   taken as a batch, runs first
//!   ├─ persistent  : event → [Entry]   stays until removed (or `many` runs out)
//!   └─ once        : event → [Entry]   taken as a batch, runs last
//! ```
//!
//! Each [`Entry`] carries a registry-unique id. Dispatch works over
//! snapshots of `(event, id)` [`Slot`]s and re-checks the live tables through
//! those ids, which keeps duplicates of the same listener apart.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::{listener::Listener, matcher};

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub(crate) enum Tier {
    BeforeOnce,
    Persistent,
    Once,
}

impl Tier {
    /// Order in which tiers run and are listed.
    pub(crate) const ALL: [Tier; 3] = [Tier::BeforeOnce, Tier::Persistent, Tier::Once];
}

/// How an emitted name is resolved against registered keys.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Lookup<'a> {
    Exact,
    Wildcard { delimiter: &'a str },
}

impl Lookup<'_> {
    fn hits(&self, key: &str, event: &str) -> bool {
        match self {
            Lookup::Exact => key == event,
            Lookup::Wildcard { delimiter } => matcher::matches(event, key, delimiter),
        }
    }
}

pub(crate) struct Entry<A> {
    id: u64,
    listener: Listener<A>,
    /// Invocations left for `many` registrations; `None` means unbounded.
    remaining: Option<usize>,
}

/// A dispatch snapshot item pointing back into a table.
pub(crate) struct Slot<A> {
    pub(crate) event: String,
    pub(crate) id: u64,
    pub(crate) listener: Listener<A>,
}

struct Table<A> {
    events: HashMap<String, Vec<Entry<A>>>,
}

impl<A> Default for Table<A> {
    fn default() -> Self {
        Self {
            events: HashMap::new(),
        }
    }
}

impl<A> Table<A> {
    fn push(&mut self, event: &str, entry: Entry<A>) {
        self.events
            .entry(event.to_string())
            .or_insert_with(Vec::new)
            .push(entry);
    }

    fn len(&self, event: &str) -> usize {
        self.events.get(event).map_or(0, |v| v.len())
    }

    /// Removes the first entry holding `listener`; prunes the key when emptied.
    fn remove_first(&mut self, event: &str, listener: &Listener<A>) -> bool {
        let Some(entries) = self.events.get_mut(event) else {
            return false;
        };
        let Some(index) = entries.iter().position(|e| e.listener.same_as(listener)) else {
            return false;
        };
        entries.remove(index);
        if entries.is_empty() {
            self.events.remove(event);
        }
        true
    }

    fn remove_id(&mut self, event: &str, id: u64) -> Option<Entry<A>> {
        let entries = self.events.get_mut(event)?;
        let index = entries.iter().position(|e| e.id == id)?;
        let entry = entries.remove(index);
        if entries.is_empty() {
            self.events.remove(event);
        }
        Some(entry)
    }

    fn snapshot(&self, event: &str, lookup: Lookup<'_>) -> Vec<Slot<A>> {
        let mut slots: Vec<Slot<A>> = match lookup {
            Lookup::Exact => self
                .events
                .get_key_value(event)
                .into_iter()
                .flat_map(|(key, entries)| Self::slots(key, entries))
                .collect(),
            Lookup::Wildcard { .. } => self
                .events
                .iter()
                .filter(|(key, _)| lookup.hits(key, event))
                .flat_map(|(key, entries)| Self::slots(key, entries))
                .collect(),
        };
        // ids grow with registration, so this restores registration order across keys
        slots.sort_by_key(|slot| slot.id);
        slots
    }

    fn slots<'a>(key: &'a str, entries: &'a [Entry<A>]) -> impl Iterator<Item = Slot<A>> + 'a {
        entries.iter().map(move |e| Slot {
            event: key.to_string(),
            id: e.id,
            listener: e.listener.clone(),
        })
    }
}

pub(crate) struct ListenerRegistry<A> {
    before_once: Table<A>,
    persistent: Table<A>,
    once: Table<A>,
    next_id: u64,
}

impl<A> Default for ListenerRegistry<A> {
    fn default() -> Self {
        Self {
            before_once: Table::default(),
            persistent: Table::default(),
            once: Table::default(),
            next_id: 0,
        }
    }
}

impl<A> ListenerRegistry<A> {
    fn table(&self, tier: Tier) -> &Table<A> {
        match tier {
            Tier::BeforeOnce => &self.before_once,
            Tier::Persistent => &self.persistent,
            Tier::Once => &self.once,
        }
    }

    fn table_mut(&mut self, tier: Tier) -> &mut Table<A> {
        match tier {
            Tier::BeforeOnce => &mut self.before_once,
            Tier::Persistent => &mut self.persistent,
            Tier::Once => &mut self.once,
        }
    }

    /// Appends a listener and returns the number of entries now pending for `event`.
    pub(crate) fn add(
        &mut self,
        tier: Tier,
        event: &str,
        listener: Listener<A>,
        remaining: Option<usize>,
    ) -> usize {
        let id = self.next_id;
        self.next_id += 1;
        self.table_mut(tier).push(
            event,
            Entry {
                id,
                listener,
                remaining,
            },
        );
        self.count(event)
    }

    /// Removes the first match of `listener` from every tier.
    pub(crate) fn remove(&mut self, event: &str, listener: &Listener<A>) -> bool {
        let mut removed = false;
        for tier in Tier::ALL {
            removed |= self.table_mut(tier).remove_first(event, listener);
        }
        removed
    }

    pub(crate) fn clear_event(&mut self, event: &str) {
        for tier in Tier::ALL {
            self.table_mut(tier).events.remove(event);
        }
    }

    pub(crate) fn clear(&mut self) {
        for tier in Tier::ALL {
            self.table_mut(tier).events.clear();
        }
    }

    pub(crate) fn count(&self, event: &str) -> usize {
        Tier::ALL.iter().map(|t| self.table(*t).len(event)).sum()
    }

    /// Sorted, de-duplicated names of every event with at least one entry.
    pub(crate) fn event_names(&self) -> Vec<String> {
        let names: BTreeSet<&String> = Tier::ALL
            .iter()
            .flat_map(|t| self.table(*t).events.keys())
            .collect();
        names.into_iter().cloned().collect()
    }

    pub(crate) fn snapshot(&self, tier: Tier, event: &str, lookup: Lookup<'_>) -> Vec<Slot<A>> {
        self.table(tier).snapshot(event, lookup)
    }

    /// Removes the snapshotted entries that are still registered and returns
    /// their listeners in snapshot order. Entries removed since the snapshot
    /// are skipped.
    pub(crate) fn take(&mut self, tier: Tier, slots: Vec<Slot<A>>) -> Vec<Listener<A>> {
        let table = self.table_mut(tier);
        slots
            .into_iter()
            .filter_map(|slot| {
                table
                    .remove_id(&slot.event, slot.id)
                    .map(|entry| entry.listener)
            })
            .collect()
    }

    /// Claims one invocation of a persistent entry. Returns false if the entry
    /// was removed since the snapshot. Exhausted `many` entries are pruned.
    pub(crate) fn claim(&mut self, slot: &Slot<A>) -> bool {
        let table = &mut self.persistent;
        let Some(entry) = table
            .events
            .get_mut(&slot.event)
            .and_then(|entries| entries.iter_mut().find(|e| e.id == slot.id))
        else {
            return false;
        };

        match entry.remaining.as_mut() {
            None => true,
            Some(left) => {
                *left = left.saturating_sub(1);
                if *left == 0 {
                    table.remove_id(&slot.event, slot.id);
                }
                true
            }
        }
    }

    /// Before-once, persistent, then once listeners for `event`.
    pub(crate) fn listeners(&self, event: &str, lookup: Lookup<'_>) -> Vec<Listener<A>> {
        Tier::ALL
            .iter()
            .flat_map(|t| self.snapshot(*t, event, lookup))
            .map(|slot| slot.listener)
            .collect()
    }

    pub(crate) fn all(&self) -> BTreeMap<String, Vec<Listener<A>>> {
        self.event_names()
            .into_iter()
            .map(|name| {
                let listeners = self.listeners(&name, Lookup::Exact);
                (name, listeners)
            })
            .collect()
    }
}
