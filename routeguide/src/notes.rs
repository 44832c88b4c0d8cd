//! Location-tagged notes shared by all chat sessions.

use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};

use crate::geo::Point;

/// A message left at a location.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct RouteNote {
    /// Where the note was left.
    pub location: Point,
    /// Free-text message.
    #[serde(default)]
    pub message: String,
}

impl RouteNote {
    /// Create a note.
    pub fn new(location: Point, message: impl Into<String>) -> Self {
        Self {
            location,
            message: message.into(),
        }
    }
}

/// Append-only history of every note received, in arrival order.
///
/// All access goes through one lock, so the scan and the append for a single
/// incoming note happen atomically with respect to every other session.
#[derive(Debug, Default)]
pub struct NoteLog {
    notes: Mutex<Vec<RouteNote>>,
}

impl NoteLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return every stored note at `note`'s location, then store `note`.
    ///
    /// Replayed notes come back in the order they were appended. The incoming
    /// note is never part of its own replay.
    pub fn replay_and_append(&self, note: RouteNote) -> Vec<RouteNote> {
        let mut notes = self.lock();
        let replay: Vec<RouteNote> = notes
            .iter()
            .filter(|n| n.location == note.location)
            .cloned()
            .collect();
        notes.push(note);
        replay
    }

    /// Number of notes stored so far.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether no note has been stored yet.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Copy of the whole history in append order.
    pub fn snapshot(&self) -> Vec<RouteNote> {
        self.lock().clone()
    }

    // A panic while holding the lock cannot leave the Vec half-written: the
    // only mutation is a single push.
    fn lock(&self) -> MutexGuard<'_, Vec<RouteNote>> {
        self.notes.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_replay_excludes_incoming_note() {
        let log = NoteLog::new();
        let q = Point::new(1, 1);

        assert!(log.replay_and_append(RouteNote::new(q, "first")).is_empty());

        let replay = log.replay_and_append(RouteNote::new(q, "second"));
        assert_eq!(replay, vec![RouteNote::new(q, "first")]);

        let replay = log.replay_and_append(RouteNote::new(q, "third"));
        assert_eq!(
            replay,
            vec![RouteNote::new(q, "first"), RouteNote::new(q, "second")]
        );
        assert_eq!(log.len(), 3);
    }

    #[test]
    fn test_replay_matches_exact_location_only() {
        let log = NoteLog::new();
        log.replay_and_append(RouteNote::new(Point::new(1, 1), "a"));
        log.replay_and_append(RouteNote::new(Point::new(1, 2), "b"));
        log.replay_and_append(RouteNote::new(Point::new(2, 1), "c"));

        let replay = log.replay_and_append(RouteNote::new(Point::new(1, 1), "d"));
        assert_eq!(replay.len(), 1);
        assert_eq!(replay[0].message, "a");

        assert!(log
            .replay_and_append(RouteNote::new(Point::new(3, 3), "e"))
            .is_empty());
    }

    #[test]
    fn test_snapshot_keeps_append_order() {
        let log = NoteLog::new();
        assert!(log.is_empty());

        for i in 0..5 {
            log.replay_and_append(RouteNote::new(Point::new(i % 2, 0), i.to_string()));
        }

        let messages: Vec<String> = log.snapshot().into_iter().map(|n| n.message).collect();
        assert_eq!(messages, vec!["0", "1", "2", "3", "4"]);
    }

    #[test]
    fn test_concurrent_scan_and_append_is_atomic() {
        const THREADS: usize = 8;
        const NOTES_PER_THREAD: usize = 50;

        let log = Arc::new(NoteLog::new());
        let q = Point::new(407838351, -746143763);

        let handles: Vec<_> = (0..THREADS)
            .map(|t| {
                let log = Arc::clone(&log);
                thread::spawn(move || {
                    (0..NOTES_PER_THREAD)
                        .map(|i| {
                            let note = RouteNote::new(q, format!("{}-{}", t, i));
                            (note.clone(), log.replay_and_append(note))
                        })
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let results: Vec<_> = handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect();

        let history = log.snapshot();
        assert_eq!(history.len(), THREADS * NOTES_PER_THREAD);

        // Each replay is exactly the history that preceded the note
        for (note, replay) in results {
            let position = history.iter().position(|n| *n == note).unwrap();
            assert_eq!(replay.len(), position);
            assert_eq!(replay.as_slice(), &history[..position]);
        }
    }

    #[test]
    fn test_note_json_shape() {
        let note: RouteNote =
            serde_json::from_str(r#"{"location": {"latitude": 5, "longitude": 6}, "message": "hi"}"#)
                .unwrap();
        assert_eq!(note, RouteNote::new(Point::new(5, 6), "hi"));
    }
}
