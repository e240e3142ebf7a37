use std::collections::HashMap;

use db::{
    DbPool, DbErr,
    models::{dependency::Dependency, member::Member, pull_request::PullRequest, ticket::Ticket},
    types::TicketStatus,
};

/// Everything the live reports read, loaded in one pass per request.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    /// Ordered by id.
    pub tickets: Vec<Ticket>,
    pub pull_requests: Vec<PullRequest>,
    pub dependencies: Vec<Dependency>,
    pub members: Vec<Member>,
}

impl Snapshot {
    pub async fn load(pool: &DbPool) -> Result<Self, DbErr> {
        let mut tickets = Ticket::find_all(pool).await?;
        tickets.sort_by_key(|ticket| ticket.id);
        Ok(Self {
            tickets,
            pull_requests: PullRequest::find_all(pool).await?,
            dependencies: Dependency::find_all(pool).await?,
            members: Member::find_all(pool).await?,
        })
    }

    pub fn ticket(&self, id: i64) -> Option<&Ticket> {
        self.tickets.iter().find(|ticket| ticket.id == id)
    }

    /// Targets of `ticket_id`'s outgoing edges, in edge order. Edges whose
    /// target no longer exists are skipped.
    pub fn dependency_targets(&self, ticket_id: i64) -> impl Iterator<Item = &Ticket> + '_ {
        self.dependencies
            .iter()
            .filter(move |edge| edge.ticket == ticket_id)
            .filter_map(|edge| self.ticket(edge.depends_on))
    }

    pub fn has_dependencies(&self, ticket_id: i64) -> bool {
        self.dependencies.iter().any(|edge| edge.ticket == ticket_id)
    }

    pub fn status_counts(&self) -> HashMap<TicketStatus, usize> {
        let mut counts = HashMap::new();
        for ticket in &self.tickets {
            *counts.entry(ticket.status).or_insert(0) += 1;
        }
        counts
    }

    pub fn count_status(&self, status: TicketStatus) -> usize {
        self.tickets.iter().filter(|t| t.status == status).count()
    }

    pub fn member_name(&self, id: Option<i64>) -> Option<&str> {
        let id = id?;
        self.members
            .iter()
            .find(|member| member.id == id)
            .map(|member| member.name.as_str())
    }
}

/// Assignee display name, if any.
pub fn assignee_name(ticket: &Ticket) -> Option<&str> {
    ticket.assignee.as_ref().map(|member| member.name.as_str())
}
