//! Webhook authentication and idempotent admission.

use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tracing::{debug, warn};

use checkout_types::{Admission, EventKey, WebhookEvent};

use crate::security;

/// Verifies inbound webhook signatures and admits each logical event at
/// most once within the retention window.
pub struct WebhookAuthenticator {
    secret: String,
    retention: TimeDelta,
    seen: DashMap<EventKey, DateTime<Utc>>,
}

impl WebhookAuthenticator {
    pub fn new(secret: impl Into<String>, retention: Duration) -> Self {
        Self {
            secret: secret.into(),
            retention: TimeDelta::from_std(retention).unwrap_or(TimeDelta::MAX),
            seen: DashMap::new(),
        }
    }

    /// Recomputes the HMAC over the exact raw payload bytes and compares
    /// in constant time.
    pub fn verify_signature(&self, signature: &str, raw_payload: &[u8]) -> bool {
        security::verify_signature(raw_payload, signature, &self.secret)
    }

    /// Admission gate: `Rejected` on signature failure, `Duplicate` for a
    /// key already admitted within retention, else `Admitted` (recorded).
    ///
    /// The dedup check-and-set is atomic per key, so two concurrent
    /// deliveries of the same event admit exactly one.
    pub fn admit(&self, event: &WebhookEvent) -> Admission {
        if !self.verify_signature(&event.signature, &event.payload) {
            warn!(event_type = %event.event_type, invoice = %event.invoice_id, "webhook signature rejected");
            return Admission::Rejected;
        }

        self.prune_expired();

        let now = Utc::now();
        match self.seen.entry(event.key()) {
            Entry::Occupied(mut occupied) => {
                if now.signed_duration_since(*occupied.get()) < self.retention {
                    debug!(event_type = %event.event_type, invoice = %event.invoice_id, "duplicate webhook delivery");
                    Admission::Duplicate
                } else {
                    // retention elapsed; the key is admissible again
                    occupied.insert(now);
                    Admission::Admitted
                }
            }
            Entry::Vacant(vacant) => {
                vacant.insert(now);
                debug!(event_type = %event.event_type, invoice = %event.invoice_id, "webhook admitted");
                Admission::Admitted
            }
        }
    }

    /// Drops dedup keys older than the retention window.
    pub fn prune_expired(&self) {
        let now = Utc::now();
        self.seen
            .retain(|_, admitted_at| now.signed_duration_since(*admitted_at) < self.retention);
    }

    /// Number of event keys currently retained.
    pub fn retained_keys(&self) -> usize {
        self.seen.len()
    }
}
