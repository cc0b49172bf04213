//! Registry of archive brokers and publishers.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::domain::entities::{ChannelKind, Slot};
use crate::domain::ports::{Broker, Publisher};

/// Broker per slot and publisher per channel, as linked by the embedding binary.
///
/// The dispatcher and fan-out look backends up by key and never branch on
/// the concrete provider type.
#[derive(Clone, Default)]
pub struct Backends {
    brokers: HashMap<Slot, Arc<dyn Broker>>,
    publishers: HashMap<ChannelKind, Arc<dyn Publisher>>,
}

impl Backends {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the broker serving `slot`, replacing any previous one.
    pub fn with_broker(mut self, slot: Slot, broker: Arc<dyn Broker>) -> Self {
        self.brokers.insert(slot, broker);
        self
    }

    /// Registers the publisher serving `kind`, replacing any previous one.
    pub fn with_publisher(mut self, kind: ChannelKind, publisher: Arc<dyn Publisher>) -> Self {
        self.publishers.insert(kind, publisher);
        self
    }

    pub fn broker(&self, slot: Slot) -> Option<Arc<dyn Broker>> {
        self.brokers.get(&slot).cloned()
    }

    pub fn publisher(&self, kind: ChannelKind) -> Option<Arc<dyn Publisher>> {
        self.publishers.get(&kind).cloned()
    }

    pub fn has_broker(&self, slot: Slot) -> bool {
        self.brokers.contains_key(&slot)
    }

    pub fn has_publisher(&self, kind: ChannelKind) -> bool {
        self.publishers.contains_key(&kind)
    }
}

impl fmt::Debug for Backends {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut slots: Vec<_> = self.brokers.keys().collect();
        slots.sort();
        let mut channels: Vec<_> = self.publishers.keys().collect();
        channels.sort();

        f.debug_struct("Backends")
            .field("brokers", &slots)
            .field("publishers", &channels)
            .finish()
    }
}
