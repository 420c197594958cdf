//! Request tickets so late responses cannot overwrite newer state.

use crate::outcome::OperationKind;
use log::debug;
use std::collections::{HashMap, HashSet};

/// Operation kinds whose results overwrite the same piece of state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Lane {
    /// Load and search both replace the record list.
    List,
    Create,
    Export,
}

impl From<OperationKind> for Lane {
    fn from(kind: OperationKind) -> Self {
        match kind {
            OperationKind::Load | OperationKind::Search => Lane::List,
            OperationKind::Create => Lane::Create,
            OperationKind::Export => Lane::Export,
        }
    }
}

/// Tag attached to an issued request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    pub kind: OperationKind,
    pub seq: u64,
}

/// Issues tickets and decides whether a completion is still current.
#[derive(Debug, Default)]
pub struct RequestTracker {
    next_seq: u64,
    latest: HashMap<Lane, u64>,
    in_flight: HashSet<Lane>,
}

impl RequestTracker {
    /// Issue a ticket that supersedes every earlier ticket in its lane.
    pub fn issue(&mut self, kind: OperationKind) -> Ticket {
        self.next_seq += 1;
        let lane = Lane::from(kind);
        self.latest.insert(lane, self.next_seq);
        self.in_flight.insert(lane);
        debug!("request issued (kind={:?}, seq={})", kind, self.next_seq);
        Ticket {
            kind,
            seq: self.next_seq,
        }
    }

    /// Mark a ticket complete. Returns false when a newer ticket in the same
    /// lane exists, in which case the result must be dropped.
    pub fn settle(&mut self, ticket: Ticket) -> bool {
        let lane = Lane::from(ticket.kind);
        if self.latest.get(&lane) != Some(&ticket.seq) {
            debug!(
                "dropping stale completion (kind={:?}, seq={})",
                ticket.kind, ticket.seq
            );
            return false;
        }
        self.in_flight.remove(&lane);
        true
    }

    /// True while any lane has an unsettled current ticket.
    pub fn is_busy(&self) -> bool {
        !self.in_flight.is_empty()
    }

    /// True while the lane of `kind` has an unsettled current ticket.
    pub fn is_pending(&self, kind: OperationKind) -> bool {
        self.in_flight.contains(&Lane::from(kind))
    }
}

#[cfg(test)]
mod tests {
    use super::RequestTracker;
    use crate::outcome::OperationKind;

    #[test]
    fn newer_list_ticket_supersedes_older() {
        let mut tracker = RequestTracker::default();
        let load = tracker.issue(OperationKind::Load);
        let search = tracker.issue(OperationKind::Search);

        assert!(!tracker.settle(load));
        assert!(tracker.is_busy());
        assert!(tracker.settle(search));
        assert!(!tracker.is_busy());
    }

    #[test]
    fn lanes_are_independent() {
        let mut tracker = RequestTracker::default();
        let export = tracker.issue(OperationKind::Export);
        let load = tracker.issue(OperationKind::Load);

        assert!(tracker.is_pending(OperationKind::Search));
        assert!(tracker.settle(export));
        assert!(!tracker.is_pending(OperationKind::Export));
        assert!(tracker.is_busy());
        assert!(tracker.settle(load));
        assert!(!tracker.is_busy());
    }
}
