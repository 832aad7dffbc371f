//! Per-touch bookkeeping held by the registry

use super::events::AreaId;

/// An area contending for a touch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    pub area: AreaId,
    /// Sequence number of the ownership request, once made
    pub requested: Option<u64>,
}

/// Everything the registry knows about one active touch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TouchEntry {
    /// Undecided candidates, in registration order
    pub candidates: Vec<Candidate>,
    /// Areas receiving unowned copies of this touch's updates
    pub watchers: Vec<AreaId>,
    pub owner: Option<AreaId>,
}

impl TouchEntry {
    pub fn is_candidate(&self, area: AreaId) -> bool {
        self.candidates.iter().any(|c| c.area == area)
    }

    pub fn is_watcher(&self, area: AreaId) -> bool {
        self.watchers.contains(&area)
    }

    pub fn candidate_mut(&mut self, area: AreaId) -> Option<&mut Candidate> {
        self.candidates.iter_mut().find(|c| c.area == area)
    }

    /// Areas that should see unowned copies of this touch, candidates first
    pub fn unowned_recipients(&self) -> impl Iterator<Item = AreaId> + '_ {
        self.candidates
            .iter()
            .map(|c| c.area)
            .chain(self.watchers.iter().copied().filter(move |w| !self.is_candidate(*w)))
    }

    /// Drop every reference to `area`; returns whether anything changed
    pub fn forget(&mut self, area: AreaId) -> bool {
        let before = (self.candidates.len(), self.watchers.len(), self.owner);
        self.candidates.retain(|c| c.area != area);
        self.watchers.retain(|w| *w != area);
        if self.owner == Some(area) {
            self.owner = None;
        }
        before != (self.candidates.len(), self.watchers.len(), self.owner)
    }
}
