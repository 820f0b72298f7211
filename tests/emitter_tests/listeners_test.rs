use evenement::EventEmitter;
use pretty_assertions::assert_eq;

use crate::noop;

#[test]
fn test_listeners_track_registration_and_removal() {
    let emitter: EventEmitter = EventEmitter::new();
    let (on_a, on_b, on_c) = (noop(), noop(), noop());
    let (once_a, once_b, once_c) = (noop(), noop(), noop());

    assert_eq!(emitter.listeners("event").len(), 0);
    emitter.on("event", on_a.clone()).unwrap();
    assert_eq!(emitter.listeners("event"), vec![on_a.clone()]);
    emitter.once("event", once_a.clone()).unwrap();
    assert_eq!(
        emitter.listeners("event"),
        vec![on_a.clone(), once_a.clone()]
    );
    emitter.once("event", once_b.clone()).unwrap();
    assert_eq!(
        emitter.listeners("event"),
        vec![on_a.clone(), once_a.clone(), once_b.clone()]
    );
    emitter.on("event", on_b.clone()).unwrap();
    assert_eq!(
        emitter.listeners("event"),
        vec![on_a.clone(), on_b.clone(), once_a.clone(), once_b.clone()]
    );
    emitter.remove_listener("event", &once_a).unwrap();
    assert_eq!(
        emitter.listeners("event"),
        vec![on_a.clone(), on_b.clone(), once_b.clone()]
    );
    emitter.once("event", once_c.clone()).unwrap();
    emitter.on("event", on_c.clone()).unwrap();
    emitter.once("event", once_a.clone()).unwrap();
    assert_eq!(
        emitter.listeners("event"),
        vec![
            on_a.clone(),
            on_b.clone(),
            on_c.clone(),
            once_b.clone(),
            once_c.clone(),
            once_a.clone()
        ]
    );
    emitter.remove_listener("event", &on_b).unwrap();
    assert_eq!(emitter.listeners("event").len(), 5);

    emitter.emit("event", &[]).unwrap();
    assert_eq!(emitter.listeners("event"), vec![on_a.clone(), on_c.clone()]);

    emitter.remove_all_listeners(None);
    emitter.once("event", once_a.clone()).unwrap();
    assert_eq!(emitter.listeners("event").len(), 1);
    emitter.remove_listener("event", &once_a).unwrap();
    assert_eq!(emitter.listeners("event").len(), 0);
    assert!(emitter.event_names().is_empty());
}

#[test]
fn test_all_listeners() {
    let emitter: EventEmitter = EventEmitter::new();
    let (a, b, c, d) = (noop(), noop(), noop(), noop());

    emitter.once("event2", c.clone()).unwrap();
    emitter.on("event", a.clone()).unwrap();
    emitter.once("event", b.clone()).unwrap();
    emitter.on("event", c.clone()).unwrap();
    emitter.once("event", d.clone()).unwrap();

    let all = emitter.all_listeners();
    assert_eq!(all.len(), 2);
    assert_eq!(all["event"], vec![a, c.clone(), b, d]);
    assert_eq!(all["event2"], vec![c]);
}

#[test]
fn test_listeners_is_a_snapshot() {
    let emitter: EventEmitter = EventEmitter::new();
    let a = noop();
    emitter.on("event", a.clone()).unwrap();

    let snapshot = emitter.listeners("event");
    emitter.remove_listener("event", &a).unwrap();

    assert_eq!(snapshot, vec![a]);
    assert!(emitter.listeners("event").is_empty());
}

#[test]
fn test_before_once_listed_first() {
    let emitter: EventEmitter = EventEmitter::new();
    let (a, b, c) = (noop(), noop(), noop());
    emitter.once("event", a.clone()).unwrap();
    emitter.on("event", b.clone()).unwrap();
    emitter.before_once("event", c.clone()).unwrap();

    assert_eq!(emitter.listeners("event"), vec![c, b.clone(), a]);
    emitter.emit("event", &[]).unwrap();
    assert_eq!(emitter.listeners("event"), vec![b]);
}

#[test]
fn test_introspection_helpers() {
    let emitter: EventEmitter = EventEmitter::new();
    emitter.on("b", noop()).unwrap();
    emitter.once("a", noop()).unwrap();
    emitter.on("b", noop()).unwrap();

    assert_eq!(emitter.event_names(), vec!["a", "b"]);
    assert_eq!(emitter.listener_count("b"), 2);
    assert!(emitter.has_listeners("a"));
    assert!(!emitter.has_listeners("c"));
}
