use db::types::TicketStatus;
use serde::Serialize;

use crate::{
    MockData, ReportData, Snapshot,
    blockers::{Blocker, unresolved_blockers},
    snapshot::assignee_name,
};

const MAX_TODAY_ITEMS: usize = 5;
const NO_PLAN: &str = "No planned tasks detected";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyStandup {
    pub summary: StandupSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<StandupDetails>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StandupSummary {
    pub yesterday: String,
    pub today: String,
    pub blockers: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StandupDetails {
    pub today_items: Vec<TodayItem>,
    pub blockers: Vec<Blocker>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TodayItem {
    pub key: String,
    pub title: String,
    pub assignee: Option<String>,
}

pub fn build(data: &ReportData) -> DailyStandup {
    match data {
        ReportData::Live(snapshot) => from_snapshot(snapshot),
        ReportData::Fallback(mock) => from_mock(mock),
    }
}

fn join_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "None".to_string()
    } else {
        items.join(", ")
    }
}

pub fn from_snapshot(snapshot: &Snapshot) -> DailyStandup {
    let yesterday = snapshot
        .pull_requests
        .iter()
        .max_by_key(|pr| (pr.created_at, pr.id))
        .map(|pr| pr.title.clone())
        .unwrap_or_else(|| "No recent PRs".to_string());

    let mut in_progress: Vec<_> = snapshot
        .tickets
        .iter()
        .filter(|ticket| ticket.status == TicketStatus::InProgress)
        .collect();
    in_progress.sort_by(|a, b| (b.updated_at, b.id).cmp(&(a.updated_at, a.id)));
    let today_items: Vec<TodayItem> = in_progress
        .into_iter()
        .take(MAX_TODAY_ITEMS)
        .map(|ticket| TodayItem {
            key: ticket.key.clone(),
            title: ticket.title.clone(),
            assignee: assignee_name(ticket).map(str::to_string),
        })
        .collect();

    let today = match today_items.first() {
        Some(item) => format!("Continue work on {}", item.title),
        None => snapshot
            .tickets
            .iter()
            .max_by_key(|ticket| (ticket.created_at, ticket.id))
            .map(|ticket| format!("Work on {}", ticket.title))
            .unwrap_or_else(|| NO_PLAN.to_string()),
    };

    let blockers = unresolved_blockers(snapshot);
    let descriptions: Vec<String> = blockers.iter().map(Blocker::describe).collect();

    DailyStandup {
        summary: StandupSummary {
            yesterday,
            today,
            blockers: join_or_none(&descriptions),
        },
        details: Some(StandupDetails {
            today_items,
            blockers,
        }),
    }
}

pub fn from_mock(mock: &MockData) -> DailyStandup {
    let yesterday = mock
        .commits
        .last()
        .map(|commit| commit.commit.clone())
        .filter(|commit| !commit.is_empty())
        .unwrap_or_else(|| "No recent commits".to_string());

    let today = mock
        .tickets
        .iter()
        .find(|ticket| ticket.is_in_progress())
        .map(|ticket| format!("Continue work on {}", ticket.title))
        .or_else(|| {
            mock.tickets
                .first()
                .map(|ticket| format!("Work on {}", ticket.title))
        })
        .unwrap_or_else(|| NO_PLAN.to_string());

    let blockers: Vec<String> = mock.blocker_messages().map(str::to_string).collect();

    DailyStandup {
        summary: StandupSummary {
            yesterday,
            today,
            blockers: join_or_none(&blockers),
        },
        details: None,
    }
}

#[cfg(test)]
mod tests {
    use db::types::PullRequestStatus;

    use super::*;
    use crate::{
        fixtures::{at, edge, member, pull_request, snapshot, ticket},
        mock_data::{MockCommit, MockMessage, MockTicket},
    };

    #[test]
    fn live_standup_prefers_latest_in_progress_ticket() {
        let mut older = ticket(1, "PROJ-AAAA", "Login form", TicketStatus::InProgress);
        older.updated_at = at(10);
        let mut newer = ticket(2, "PROJ-BBBB", "Payment API", TicketStatus::InProgress);
        newer.updated_at = at(30);
        newer.assignee = Some(member(3, "Ali Hassan"));
        let newest_created = ticket(9, "PROJ-CCCC", "Docs", TicketStatus::Todo);

        let mut snap = snapshot(vec![older, newer, newest_created], Vec::new());
        snap.pull_requests = vec![
            pull_request(1, "Create auth endpoints", PullRequestStatus::Merged),
            pull_request(2, "Payment gateway integration", PullRequestStatus::Open),
        ];

        let standup = from_snapshot(&snap);
        assert_eq!(standup.summary.yesterday, "Payment gateway integration");
        assert_eq!(standup.summary.today, "Continue work on Payment API");
        assert_eq!(standup.summary.blockers, "None");

        let details = standup.details.unwrap();
        let keys: Vec<_> = details.today_items.iter().map(|i| i.key.as_str()).collect();
        assert_eq!(keys, vec!["PROJ-BBBB", "PROJ-AAAA"]);
        assert_eq!(details.today_items[0].assignee.as_deref(), Some("Ali Hassan"));
    }

    #[test]
    fn live_standup_falls_back_to_newest_ticket_then_to_nothing() {
        let snap = snapshot(
            vec![
                ticket(1, "PROJ-AAAA", "Setup CI", TicketStatus::Todo),
                ticket(2, "PROJ-BBBB", "Write docs", TicketStatus::Done),
            ],
            Vec::new(),
        );
        let standup = from_snapshot(&snap);
        assert_eq!(standup.summary.yesterday, "No recent PRs");
        assert_eq!(standup.summary.today, "Work on Write docs");

        let empty = from_snapshot(&Snapshot::default());
        assert_eq!(empty.summary.today, "No planned tasks detected");
    }

    #[test]
    fn dependency_on_blocked_ticket_is_reported_with_waiting_keys() {
        let a = ticket(1, "PROJ-A001", "Checkout", TicketStatus::InProgress);
        let b = ticket(2, "PROJ-B002", "Payment API", TicketStatus::Blocked);
        let snap = snapshot(vec![a, b], vec![edge(1, 1, 2)]);

        let standup = from_snapshot(&snap);
        let blockers = standup.details.unwrap().blockers;
        let a_blocker = blockers.iter().find(|b| b.key == "PROJ-A001").unwrap();
        assert_eq!(a_blocker.waiting_on, vec!["PROJ-B002".to_string()]);
        assert_eq!(
            standup.summary.blockers,
            "PROJ-A001: Checkout (waiting on [PROJ-B002]), PROJ-B002: Payment API"
        );
    }

    #[test]
    fn fallback_standup_reads_commits_tickets_and_messages() {
        let mock = MockData {
            tickets: vec![
                MockTicket {
                    title: "Setup CI".to_string(),
                    status: "To Do".to_string(),
                    ..MockTicket::default()
                },
                MockTicket {
                    title: "Login page".to_string(),
                    status: "In Progress".to_string(),
                    ..MockTicket::default()
                },
            ],
            commits: vec![
                MockCommit {
                    commit: "Initial commit".to_string(),
                },
                MockCommit {
                    commit: "Add login form".to_string(),
                },
            ],
            messages: vec![
                MockMessage {
                    message: "Blocked on design review".to_string(),
                },
                MockMessage {
                    message: "Deployed to staging".to_string(),
                },
                MockMessage {
                    message: "Still waiting for API keys".to_string(),
                },
            ],
        };

        let standup = from_mock(&mock);
        assert_eq!(standup.summary.yesterday, "Add login form");
        assert_eq!(standup.summary.today, "Continue work on Login page");
        assert_eq!(
            standup.summary.blockers,
            "Blocked on design review, Still waiting for API keys"
        );
        assert!(standup.details.is_none());

        let empty = from_mock(&MockData::default());
        assert_eq!(empty.summary.yesterday, "No recent commits");
        assert_eq!(empty.summary.today, "No planned tasks detected");
        assert_eq!(empty.summary.blockers, "None");
    }
}
