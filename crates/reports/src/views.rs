//! Read-only joins over the live store for the workboard UI and diagnostics.

use db::{
    models::{pull_request::PullRequest, ticket::Ticket},
    types::TicketStatus,
};
use serde::Serialize;

use crate::{
    Snapshot,
    blockers::{EdgeBlocker, edge_blockers},
};

#[derive(Debug, Clone, Serialize)]
pub struct Aggregate {
    pub tickets: Vec<Ticket>,
    pub prs: Vec<PullRequest>,
    pub blockers: Vec<EdgeBlocker>,
}

pub fn aggregate(snapshot: &Snapshot) -> Aggregate {
    Aggregate {
        blockers: edge_blockers(snapshot),
        tickets: snapshot.tickets.clone(),
        prs: snapshot.pull_requests.clone(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DependencyStatus {
    pub depends_on_id: i64,
    pub depends_on_key: String,
    pub depends_on_status: TicketStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TicketStatusDump {
    pub id: i64,
    pub key: String,
    pub title: String,
    pub status: TicketStatus,
    pub assignee_id: Option<i64>,
    pub assignee_name: Option<String>,
    pub dependencies: Vec<DependencyStatus>,
}

/// Every ticket ordered by key, with the current status of each dependency target.
pub fn ticket_statuses(snapshot: &Snapshot) -> Vec<TicketStatusDump> {
    let mut tickets: Vec<&Ticket> = snapshot.tickets.iter().collect();
    tickets.sort_by(|a, b| a.key.cmp(&b.key));
    tickets
        .into_iter()
        .map(|ticket| TicketStatusDump {
            id: ticket.id,
            key: ticket.key.clone(),
            title: ticket.title.clone(),
            status: ticket.status,
            assignee_id: ticket.assignee.as_ref().map(|member| member.id),
            assignee_name: ticket.assignee.as_ref().map(|member| member.name.clone()),
            dependencies: snapshot
                .dependency_targets(ticket.id)
                .map(|target| DependencyStatus {
                    depends_on_id: target.id,
                    depends_on_key: target.key.clone(),
                    depends_on_status: target.status,
                })
                .collect(),
        })
        .collect()
}
