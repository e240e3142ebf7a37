use chrono::NaiveDate;
use db::types::TicketStatus;
use serde::Serialize;

use crate::{
    MockData, ReportData, Snapshot,
    blockers::{dependency_waits, key_list},
    progress_percent,
};

pub const OVERVIEW: &str = "The project is progressing; see milestones and risks.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeeklyReport {
    pub overview: String,
    /// Percentage of done tickets, e.g. `"40%"`.
    pub progress: String,
    pub milestones: Vec<String>,
    pub risks: Vec<String>,
}

pub fn build(data: &ReportData, today: NaiveDate) -> WeeklyReport {
    match data {
        ReportData::Live(snapshot) => from_snapshot(snapshot, today),
        ReportData::Fallback(mock) => from_mock(mock, today),
    }
}

fn report(done: usize, total: usize, milestones: Vec<String>, risks: Vec<String>) -> WeeklyReport {
    WeeklyReport {
        overview: OVERVIEW.to_string(),
        progress: format!("{}%", progress_percent(done, total)),
        milestones,
        risks,
    }
}

pub fn from_snapshot(snapshot: &Snapshot, today: NaiveDate) -> WeeklyReport {
    let milestones: Vec<String> = snapshot
        .tickets
        .iter()
        .filter(|ticket| ticket.status.is_done())
        .map(|ticket| ticket.title.clone())
        .collect();

    let mut risks: Vec<String> = snapshot
        .tickets
        .iter()
        .filter(|ticket| !ticket.status.is_done())
        .filter(|ticket| ticket.due_date.is_some_and(|due| due < today))
        .map(|ticket| format!("{} overdue", ticket.title))
        .collect();
    risks.extend(
        dependency_waits(snapshot)
            .into_iter()
            .map(|(ticket, keys)| format!("{} blocked by {}", ticket.key, key_list(&keys))),
    );

    report(
        snapshot.count_status(TicketStatus::Done),
        snapshot.tickets.len(),
        milestones,
        risks,
    )
}

pub fn from_mock(mock: &MockData, today: NaiveDate) -> WeeklyReport {
    let milestones: Vec<String> = mock
        .tickets
        .iter()
        .filter(|ticket| ticket.is_done())
        .map(|ticket| ticket.title.clone())
        .collect();

    let mut risks: Vec<String> = mock
        .tickets
        .iter()
        .filter(|ticket| ticket.is_overdue(today))
        .map(|ticket| format!("{} overdue", ticket.title))
        .collect();
    risks.extend(mock.blocker_messages().map(str::to_string));

    report(milestones.len(), mock.tickets.len(), milestones, risks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        fixtures::{days_ago, edge, snapshot, ticket, today},
        mock_data::{MockMessage, MockTicket},
    };

    #[test]
    fn all_done_means_full_progress_and_no_risks() {
        let mut late = ticket(1, "PROJ-A001", "Setup CI", TicketStatus::Done);
        late.due_date = Some(days_ago(10));
        let other = ticket(2, "PROJ-B002", "Login page", TicketStatus::Done);
        let snap = snapshot(vec![late, other], vec![edge(1, 1, 2)]);

        let weekly = from_snapshot(&snap, today());
        assert_eq!(weekly.progress, "100%");
        assert!(weekly.risks.is_empty());
        assert_eq!(weekly.milestones, vec!["Setup CI", "Login page"]);
        assert_eq!(weekly.overview, OVERVIEW);
    }

    #[test]
    fn overdue_and_dependency_risks_are_listed() {
        let mut overdue = ticket(1, "PROJ-A001", "Payment API", TicketStatus::InProgress);
        overdue.due_date = Some(days_ago(2));
        let mut due_today = ticket(2, "PROJ-B002", "Receipts", TicketStatus::Todo);
        due_today.due_date = Some(today());
        let done = ticket(3, "PROJ-C003", "Auth", TicketStatus::Done);
        let snap = snapshot(
            vec![overdue, due_today, done],
            vec![edge(1, 2, 1), edge(2, 2, 3)],
        );

        let weekly = from_snapshot(&snap, today());
        assert_eq!(weekly.progress, "33%");
        assert_eq!(
            weekly.risks,
            vec![
                "Payment API overdue".to_string(),
                "PROJ-B002 blocked by [PROJ-A001]".to_string(),
            ]
        );
    }

    #[test]
    fn empty_project_reports_zero_progress() {
        let weekly = from_snapshot(&Snapshot::default(), today());
        assert_eq!(weekly.progress, "0%");
        assert!(weekly.milestones.is_empty());
    }

    #[test]
    fn fallback_uses_mock_statuses_and_messages() {
        let mock = MockData {
            tickets: vec![
                MockTicket {
                    title: "Setup CI".to_string(),
                    status: "Done".to_string(),
                    due_date: Some("2025-01-01".to_string()),
                    ..MockTicket::default()
                },
                MockTicket {
                    title: "Login page".to_string(),
                    status: "In Progress".to_string(),
                    due_date: Some("2025-03-01".to_string()),
                    ..MockTicket::default()
                },
                MockTicket {
                    title: "Docs".to_string(),
                    status: "Completed".to_string(),
                    due_date: Some("2025-03-01".to_string()),
                    ..MockTicket::default()
                },
                MockTicket {
                    title: "Billing".to_string(),
                    status: "To Do".to_string(),
                    due_date: Some("someday".to_string()),
                    ..MockTicket::default()
                },
            ],
            commits: Vec::new(),
            messages: vec![MockMessage {
                message: "Waiting for staging credentials".to_string(),
            }],
        };

        let weekly = from_mock(&mock, today());
        assert_eq!(weekly.progress, "25%");
        assert_eq!(weekly.milestones, vec!["Setup CI"]);
        assert_eq!(
            weekly.risks,
            vec![
                "Login page overdue".to_string(),
                "Waiting for staging credentials".to_string(),
            ]
        );
    }
}
