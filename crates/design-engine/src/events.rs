use decal_types::{AssetId, GarmentOptions, RegionId, SizeTier};
use serde::Serialize;

/// A change to the design, published to subscribers after it happened.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum DesignEvent {
    RegionSelected { region: RegionId },
    AssetStaged { asset: AssetId },
    StagedCleared,
    LogoApplied { region: RegionId, asset: AssetId },
    LogoRemoved { region: RegionId },
    SizeTierChanged { tier: SizeTier },
    GarmentChanged { garment: GarmentOptions },
    Restored,
    Reset,
}

/// Handle returned by `subscribe`, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&DesignEvent)>;

/// Registered change listeners.
#[derive(Default)]
pub(crate) struct Subscribers {
    next_id: u64,
    listeners: Vec<(SubscriptionId, Listener)>,
}

impl Subscribers {
    pub(crate) fn add(&mut self, listener: Listener) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, listener));
        id
    }

    pub(crate) fn remove(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sid, _)| *sid != id);
        self.listeners.len() != before
    }

    pub(crate) fn publish(&mut self, event: &DesignEvent) {
        for (_, listener) in self.listeners.iter_mut() {
            listener(event);
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.listeners.len()
    }
}
