//! Two blocker definitions live side by side. [`unresolved_blockers`] only
//! counts dependency targets that are not done; [`edge_blockers`] lists every
//! ticket with an outgoing edge, whatever its target's status.

use db::{models::ticket::Ticket, types::TicketStatus};
use serde::Serialize;

use crate::{Snapshot, snapshot::assignee_name};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Blocker {
    pub key: String,
    pub title: String,
    pub assignee: Option<String>,
    /// Empty for tickets whose own status is BLOCKED.
    pub waiting_on: Vec<String>,
}

impl Blocker {
    /// `KEY: title (assignee: name) (waiting on [K1, K2])`
    pub fn describe(&self) -> String {
        let mut text = format!("{}: {}", self.key, self.title);
        if let Some(assignee) = &self.assignee {
            text.push_str(&format!(" (assignee: {assignee})"));
        }
        if !self.waiting_on.is_empty() {
            text.push_str(&format!(" (waiting on {})", key_list(&self.waiting_on)));
        }
        text
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EdgeBlocker {
    pub key: String,
    pub title: String,
    /// Comma-joined keys of every dependency target.
    pub reason: String,
}

/// `[K1, K2]`
pub fn key_list<S: AsRef<str>>(keys: &[S]) -> String {
    let joined = keys.iter().map(AsRef::as_ref).collect::<Vec<_>>().join(", ");
    format!("[{joined}]")
}

/// Dependency targets of `ticket` that are not done yet.
pub fn waiting_on<'a>(snapshot: &'a Snapshot, ticket: &Ticket) -> Vec<&'a Ticket> {
    snapshot
        .dependency_targets(ticket.id)
        .filter(|target| !target.status.is_done())
        .collect()
}

fn waiting_on_keys(snapshot: &Snapshot, ticket: &Ticket) -> Vec<String> {
    waiting_on(snapshot, ticket)
        .into_iter()
        .map(|target| target.key.clone())
        .collect()
}

/// Open tickets that are BLOCKED or wait on an unfinished dependency.
pub fn unresolved_blockers(snapshot: &Snapshot) -> Vec<Blocker> {
    snapshot
        .tickets
        .iter()
        .filter(|ticket| !ticket.status.is_done())
        .filter_map(|ticket| {
            let waiting_on = if ticket.status == TicketStatus::Blocked {
                Vec::new()
            } else {
                let keys = waiting_on_keys(snapshot, ticket);
                if keys.is_empty() {
                    return None;
                }
                keys
            };
            Some(Blocker {
                key: ticket.key.clone(),
                title: ticket.title.clone(),
                assignee: assignee_name(ticket).map(str::to_string),
                waiting_on,
            })
        })
        .collect()
}

/// Open tickets waiting on at least one unfinished dependency, with the
/// keys they wait on. BLOCKED tickets are included.
pub fn dependency_waits(snapshot: &Snapshot) -> Vec<(&Ticket, Vec<String>)> {
    snapshot
        .tickets
        .iter()
        .filter(|ticket| !ticket.status.is_done())
        .filter_map(|ticket| {
            let keys = waiting_on_keys(snapshot, ticket);
            (!keys.is_empty()).then_some((ticket, keys))
        })
        .collect()
}

/// Every ticket with an outgoing edge.
pub fn edge_blockers(snapshot: &Snapshot) -> Vec<EdgeBlocker> {
    snapshot
        .tickets
        .iter()
        .filter(|ticket| snapshot.has_dependencies(ticket.id))
        .map(|ticket| EdgeBlocker {
            key: ticket.key.clone(),
            title: ticket.title.clone(),
            reason: snapshot
                .dependency_targets(ticket.id)
                .map(|target| target.key.as_str())
                .collect::<Vec<_>>()
                .join(", "),
        })
        .collect()
}
