use std::time::{Duration, Instant};

use dashmap::DashMap;
use uuid::Uuid;

use crate::forum::PostEntry;

/// How long a rendered listing's buttons stay usable.
pub const SELECTION_TTL: Duration = Duration::from_secs(60);

const SUMMARIZE_PREFIX: &str = "summarize:";

struct Selection {
    post: PostEntry,
    expires_at: Instant,
}

/// Snapshots of rendered posts, keyed by the id carried on their buttons.
///
/// Each snapshot is immutable once stored; a button press only ever reads the
/// copy taken when the listing was rendered.
pub struct SelectionStore {
    entries: DashMap<Uuid, Selection>,
    ttl: Duration,
}

impl SelectionStore {
    pub fn new() -> Self {
        Self::with_ttl(SELECTION_TTL)
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
        }
    }

    /// Store a snapshot and return its id. Expired snapshots are purged first.
    pub fn insert(&self, post: PostEntry) -> Uuid {
        self.purge_expired();
        let id = Uuid::new_v4();
        self.entries.insert(
            id,
            Selection {
                post,
                expires_at: Instant::now() + self.ttl,
            },
        );
        id
    }

    pub fn resolve(&self, id: &Uuid) -> Option<PostEntry> {
        let now = Instant::now();
        let post = self
            .entries
            .get(id)
            .filter(|selection| selection.expires_at > now)
            .map(|selection| selection.post.clone());

        if post.is_none() {
            self.entries.remove(id);
        }
        post
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn purge_expired(&self) {
        let now = Instant::now();
        self.entries.retain(|_, selection| selection.expires_at > now);
    }
}

impl Default for SelectionStore {
    fn default() -> Self {
        Self::new()
    }
}

pub fn summarize_custom_id(id: &Uuid) -> String {
    format!("{}{}", SUMMARIZE_PREFIX, id)
}

/// Parse a button id of the form `summarize:<uuid>`.
pub fn parse_summarize_custom_id(custom_id: &str) -> Option<Uuid> {
    custom_id
        .strip_prefix(SUMMARIZE_PREFIX)
        .and_then(|raw| Uuid::parse_str(raw).ok())
}
