//! Integration test: `warn` events for contexts nobody popped.
//!
//! Each test installs a WARN-level fmt subscriber for its own thread that
//! writes into a shared buffer, then inspects the formatted lines. The
//! owned-stack drop exercises the same `Drop` path the thread-local stack
//! takes at thread exit.

use std::io;
use std::sync::{Arc, Mutex};

use lazy_arena::ArenaStack;
use tracing::Level;

#[derive(Clone, Default)]
struct Capture(Arc<Mutex<Vec<u8>>>);

impl Capture {
    fn warn_lines(&self) -> Vec<String> {
        let bytes = self.0.lock().unwrap();
        String::from_utf8_lossy(&bytes)
            .lines()
            .filter(|line| line.contains("WARN"))
            .map(str::to_owned)
            .collect()
    }
}

impl io::Write for Capture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Run `f` with a capturing subscriber and return the WARN lines it logged.
fn capture_warnings(f: impl FnOnce()) -> Vec<String> {
    let capture = Capture::default();
    let writer = capture.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(Level::WARN)
        .with_writer(move || writer.clone())
        .finish();
    tracing::subscriber::with_default(subscriber, f);
    capture.warn_lines()
}

// ── Cascading pop ───────────────────────────────────────────────────

#[test]
fn cascading_pop_warns_with_orphan_count() {
    let lines = capture_warnings(|| {
        let mut stack = ArenaStack::with_default();
        let outer = stack.push_context(16).unwrap();
        for _ in 0..3 {
            stack.push_context(16).unwrap();
        }
        assert_eq!(stack.pop_context(outer), 4);
    });
    assert_eq!(lines.len(), 1, "{lines:?}");
    assert!(lines[0].contains("never popped"));
    assert!(lines[0].contains("orphaned=3"));
    assert!(lines[0].contains("handle=ctx#0"));
}

#[test]
fn popping_the_top_context_does_not_warn() {
    let lines = capture_warnings(|| {
        let mut stack = ArenaStack::with_default();
        let outer = stack.push_context(16).unwrap();
        let inner = stack.push_context(16).unwrap();
        assert_eq!(stack.pop_context(inner), 1);
        assert_eq!(stack.pop_context(outer), 1);
    });
    assert!(lines.is_empty(), "{lines:?}");
}

// ── Dropping a stack with contexts open ─────────────────────────────

#[test]
fn dropping_stack_with_open_contexts_warns() {
    let lines = capture_warnings(|| {
        let mut stack = ArenaStack::with_default();
        stack.push_context(700).unwrap();
        stack.push_context(77).unwrap();
    });
    assert_eq!(lines.len(), 1, "{lines:?}");
    assert!(lines[0].contains("still open"));
    assert!(lines[0].contains("open_contexts=2"));
    assert!(lines[0].contains("reserved_bytes=777"));
}

#[test]
fn dropping_empty_stack_is_silent() {
    let lines = capture_warnings(|| {
        let mut stack = ArenaStack::with_default();
        let h = stack.push_context(32).unwrap();
        stack.pop_context(h);
    });
    assert!(lines.is_empty(), "{lines:?}");
}
