use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::ids::{CourseId, LessonId};

//
// ─── RECORD ────────────────────────────────────────────────────────────────────
//

/// Locally cached progress for a single lesson.
///
/// The server only knows whether (and when) a lesson was completed; the start
/// time and attempt counter exist only in the local cache.
///
/// Invariants: `attempts` never decreases and `completed` is never cleared
/// once set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressRecord {
    #[serde(default)]
    started: Option<DateTime<Utc>>,
    #[serde(default)]
    completed: Option<DateTime<Utc>>,
    #[serde(default)]
    attempts: u32,
}

impl ProgressRecord {
    /// A fresh record for a lesson first touched at `now`.
    #[must_use]
    pub fn started_at(now: DateTime<Utc>) -> Self {
        Self {
            started: Some(now),
            completed: None,
            attempts: 0,
        }
    }

    /// A record reconstructed from server data, which carries no start time
    /// or attempt count.
    #[must_use]
    pub fn from_server_completion(completed: Option<DateTime<Utc>>) -> Self {
        Self {
            started: None,
            completed,
            attempts: 0,
        }
    }

    /// Count one run attempt; stamps completion when `completed` is true.
    pub fn record_attempt(&mut self, completed: bool, now: DateTime<Utc>) {
        self.attempts = self.attempts.saturating_add(1);
        if completed {
            self.completed = Some(now);
        }
    }

    /// Fold another record for the same lesson into this one.
    fn absorb(&mut self, other: &ProgressRecord) {
        self.attempts = self.attempts.max(other.attempts);
        self.started = match (self.started, other.started) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };
        if self.completed.is_none() {
            self.completed = other.completed;
        }
    }

    #[must_use]
    pub fn started(&self) -> Option<DateTime<Utc>> {
        self.started
    }

    #[must_use]
    pub fn completed(&self) -> Option<DateTime<Utc>> {
        self.completed
    }

    #[must_use]
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.completed.is_some()
    }
}

//
// ─── MAP ───────────────────────────────────────────────────────────────────────
//

/// Progress records keyed by lesson, serialized as a plain JSON object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProgressMap(BTreeMap<LessonId, ProgressRecord>);

impl ProgressMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an attempt for `lesson`, creating its record on first use.
    pub fn track(&mut self, lesson: &LessonId, completed: bool, now: DateTime<Utc>) -> &ProgressRecord {
        let record = self
            .0
            .entry(lesson.clone())
            .or_insert_with(|| ProgressRecord::started_at(now));
        record.record_attempt(completed, now);
        record
    }

    /// Build a cache snapshot from the server's progress list.
    #[must_use]
    pub fn from_server(entries: &[ServerProgress]) -> Self {
        let records = entries
            .iter()
            .map(|entry| {
                (
                    entry.lesson_id.clone(),
                    ProgressRecord::from_server_completion(entry.completed_at_utc()),
                )
            })
            .collect();
        Self(records)
    }

    /// Merge `other` into `self` without losing completions or attempts.
    pub fn merge(&mut self, other: &ProgressMap) {
        for (lesson, incoming) in &other.0 {
            match self.0.get_mut(lesson) {
                Some(existing) => existing.absorb(incoming),
                None => {
                    self.0.insert(lesson.clone(), incoming.clone());
                }
            }
        }
    }

    #[must_use]
    pub fn get(&self, lesson: &LessonId) -> Option<&ProgressRecord> {
        self.0.get(lesson)
    }

    #[must_use]
    pub fn is_completed(&self, lesson: &LessonId) -> bool {
        self.0.get(lesson).is_some_and(ProgressRecord::is_completed)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&LessonId, &ProgressRecord)> {
        self.0.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

//
// ─── SERVER VIEW ───────────────────────────────────────────────────────────────
//

/// One entry of the server's progress list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerProgress {
    #[serde(default)]
    pub course_id: Option<CourseId>,
    pub lesson_id: LessonId,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub completed_at: Option<String>,
}

impl ServerProgress {
    /// A completed entry, as produced by server-side templates.
    #[must_use]
    pub fn completed(lesson_id: LessonId) -> Self {
        Self {
            course_id: None,
            lesson_id,
            completed: true,
            completed_at: None,
        }
    }

    /// The server marks completion either with the flag or a timestamp.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.completed || self.completed_at_utc().is_some()
    }

    /// Parses `completed_at` as RFC 3339, or as a naive ISO-8601 timestamp
    /// taken to be UTC.
    #[must_use]
    pub fn completed_at_utc(&self) -> Option<DateTime<Utc>> {
        let raw = self.completed_at.as_deref()?.trim();
        if raw.is_empty() {
            return None;
        }
        DateTime::parse_from_rfc3339(raw)
            .map(|at| at.with_timezone(&Utc))
            .ok()
            .or_else(|| raw.parse::<NaiveDateTime>().ok().map(|at| at.and_utc()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;
    use chrono::Duration;

    fn lesson(id: &str) -> LessonId {
        LessonId::new(id).unwrap()
    }

    #[test]
    fn track_counts_attempts_and_keeps_completion() {
        let mut map = ProgressMap::new();
        let l1 = lesson("L1");
        let now = fixed_now();

        map.track(&l1, false, now);
        map.track(&l1, false, now + Duration::seconds(1));
        let record = map.track(&l1, true, now + Duration::seconds(2)).clone();
        assert_eq!(record.attempts(), 3);
        assert_eq!(record.completed(), Some(now + Duration::seconds(2)));
        assert_eq!(record.started(), Some(now));

        let record = map.track(&l1, false, now + Duration::seconds(3));
        assert_eq!(record.attempts(), 4);
        assert!(record.is_completed());
    }

    #[test]
    fn from_server_drops_local_only_fields() {
        let entries = vec![
            ServerProgress {
                course_id: None,
                lesson_id: lesson("1"),
                completed: true,
                completed_at: Some("2024-03-01T10:00:00".into()),
            },
            ServerProgress {
                course_id: None,
                lesson_id: lesson("2"),
                completed: false,
                completed_at: None,
            },
        ];
        let map = ProgressMap::from_server(&entries);
        let first = map.get(&lesson("1")).unwrap();
        assert_eq!(first.attempts(), 0);
        assert!(first.started().is_none());
        assert!(first.is_completed());
        assert!(!map.is_completed(&lesson("2")));
    }

    #[test]
    fn merge_never_clears_completion_or_lowers_attempts() {
        let now = fixed_now();
        let mut local = ProgressMap::new();
        local.track(&lesson("A"), true, now);
        local.track(&lesson("A"), false, now);

        let mut incoming = ProgressMap::new();
        incoming.track(&lesson("A"), false, now - Duration::days(1));
        incoming.track(&lesson("B"), true, now);

        local.merge(&incoming);
        let a = local.get(&lesson("A")).unwrap();
        assert_eq!(a.attempts(), 2);
        assert_eq!(a.completed(), Some(now));
        assert_eq!(a.started(), Some(now - Duration::days(1)));
        assert!(local.is_completed(&lesson("B")));
    }

    #[test]
    fn completed_at_accepts_rfc3339_and_naive() {
        let mut entry = ServerProgress::completed(lesson("3"));
        entry.completed = false;
        entry.completed_at = Some("2024-03-01T10:00:00.123456".into());
        assert!(entry.completed_at_utc().is_some());
        entry.completed_at = Some("2024-03-01T10:00:00Z".into());
        assert!(entry.is_completed());
        entry.completed_at = Some("yesterday".into());
        assert!(!entry.is_completed());
    }

    #[test]
    fn record_json_matches_browser_shape() {
        let json = r#"{"L1":{"started":"2024-01-01T00:00:00.000Z","completed":null,"attempts":2}}"#;
        let map: ProgressMap = serde_json::from_str(json).unwrap();
        assert_eq!(map.get(&lesson("L1")).unwrap().attempts(), 2);
        let back = serde_json::to_value(&map).unwrap();
        assert_eq!(back["L1"]["attempts"], 2);
        assert!(back["L1"]["completed"].is_null());
    }
}
