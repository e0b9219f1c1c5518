//! Local view state.
//!
//! The snapshot the presentation layer renders. Only the coordinator
//! mutates it, and only through [`LocalViewState::apply`].

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use sui_sync_client::ObjectId;

/// What the presentation layer sees.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocalViewState {
    /// Tracked field value per object.
    pub values: BTreeMap<ObjectId, u64>,
    /// Last-seen object version per object.
    pub versions: BTreeMap<ObjectId, u64>,
    /// Version descriptor reported by the endpoint.
    pub protocol_version: Option<String>,
    /// Endpoint the reader talks to.
    pub endpoint: Option<String>,
    /// Digest of the most recent confirmed transaction.
    pub last_digest: Option<String>,
    /// Objects whose post-confirmation re-read failed.
    pub stale: BTreeSet<ObjectId>,
    /// When the state last changed.
    pub updated_at: Option<DateTime<Utc>>,
}

/// A single change to the view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewUpdate {
    /// An object was read. `value` is set for tracked objects only.
    Loaded {
        object_id: ObjectId,
        version: u64,
        value: Option<u64>,
    },
    ProtocolVersion(String),
    Endpoint(String),
    /// A transaction was confirmed by the ledger.
    Confirmed { digest: String },
    /// A re-read after confirmation failed; the displayed value may be behind.
    Stale(ObjectId),
}

impl LocalViewState {
    /// Apply one update. This is the only way the view changes.
    pub fn apply(&mut self, update: ViewUpdate) {
        match update {
            ViewUpdate::Loaded {
                object_id,
                version,
                value,
            } => {
                if let Some(value) = value {
                    self.values.insert(object_id.clone(), value);
                }
                self.versions.insert(object_id.clone(), version);
                self.stale.remove(&object_id);
            }
            ViewUpdate::ProtocolVersion(version) => self.protocol_version = Some(version),
            ViewUpdate::Endpoint(endpoint) => self.endpoint = Some(endpoint),
            ViewUpdate::Confirmed { digest } => self.last_digest = Some(digest),
            ViewUpdate::Stale(object_id) => {
                self.stale.insert(object_id);
            }
        }
        self.updated_at = Some(Utc::now());
    }

    /// Displayed value of an object, if it has been loaded.
    pub fn value_of(&self, id: &ObjectId) -> Option<u64> {
        self.values.get(id).copied()
    }

    /// Last-seen version of an object.
    pub fn version_of(&self, id: &ObjectId) -> Option<u64> {
        self.versions.get(id).copied()
    }

    pub fn is_stale(&self, id: &ObjectId) -> bool {
        self.stale.contains(id)
    }
}
