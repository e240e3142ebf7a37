use std::collections::BTreeMap;

use chrono::NaiveDate;
use db::{models::ticket::Ticket, types::TicketStatus};
use serde::Serialize;
use strum_macros::Display;

use crate::{
    MockData, ReportData, Snapshot,
    blockers::{dependency_waits, key_list},
    snapshot::assignee_name,
};

const UNASSIGNED: &str = "Unassigned";
const HIGH_PRIORITY: &str = "HIGH";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RiskKind {
    Overdue,
    Blocked,
    Dependency,
    HighPriority,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
}

impl Severity {
    /// Sort rank, most severe first.
    pub fn rank(self) -> u8 {
        match self {
            Severity::Critical => 0,
            Severity::High => 1,
            Severity::Medium => 2,
            Severity::Low => 3,
        }
    }

    /// More than a week late is critical, more than three days high.
    pub fn for_days_overdue(days: i64) -> Self {
        if days > 7 {
            Severity::Critical
        } else if days > 3 {
            Severity::High
        } else {
            Severity::Medium
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Risk {
    #[serde(rename = "type")]
    pub kind: RiskKind,
    pub severity: Severity,
    /// Ticket key, empty when the risk is not tied to a ticket.
    pub ticket: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
}

impl Risk {
    fn none() -> Self {
        Self {
            kind: RiskKind::None,
            severity: Severity::Low,
            ticket: String::new(),
            description: "No immediate risks detected".to_string(),
            assignee: Some("N/A".to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RiskSummary {
    pub total: usize,
    pub by_type: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RiskReport {
    pub risks: Vec<Risk>,
    pub summary: RiskSummary,
}

pub fn analyze(data: &ReportData, today: NaiveDate) -> RiskReport {
    let risks = match data {
        ReportData::Live(snapshot) => live_risks(snapshot, today),
        ReportData::Fallback(mock) => mock_risks(mock, today),
    };
    finish(risks)
}

/// Inserts the sentinel for an empty list, orders by severity keeping input
/// order within a rank, and tallies by type.
fn finish(mut risks: Vec<Risk>) -> RiskReport {
    if risks.is_empty() {
        risks.push(Risk::none());
    }
    risks.sort_by_key(|risk| risk.severity.rank());

    let mut by_type = BTreeMap::new();
    for risk in &risks {
        *by_type.entry(risk.kind.to_string()).or_insert(0) += 1;
    }
    RiskReport {
        summary: RiskSummary {
            total: risks.len(),
            by_type,
        },
        risks,
    }
}

fn assignee_or_unassigned(ticket: &Ticket) -> Option<String> {
    Some(assignee_name(ticket).unwrap_or(UNASSIGNED).to_string())
}

pub fn live_risks(snapshot: &Snapshot, today: NaiveDate) -> Vec<Risk> {
    let mut risks = Vec::new();

    for ticket in snapshot.tickets.iter().filter(|t| !t.status.is_done()) {
        let Some(due) = ticket.due_date.filter(|due| *due < today) else {
            continue;
        };
        let days = (today - due).num_days();
        risks.push(Risk {
            kind: RiskKind::Overdue,
            severity: Severity::for_days_overdue(days),
            ticket: ticket.key.clone(),
            description: format!("{} '{}' is {} day(s) overdue", ticket.key, ticket.title, days),
            assignee: assignee_or_unassigned(ticket),
        });
    }

    for ticket in snapshot
        .tickets
        .iter()
        .filter(|t| t.status == TicketStatus::Blocked)
    {
        risks.push(Risk {
            kind: RiskKind::Blocked,
            severity: Severity::High,
            ticket: ticket.key.clone(),
            description: format!("{} '{}' is blocked", ticket.key, ticket.title),
            assignee: assignee_or_unassigned(ticket),
        });
    }

    for (ticket, keys) in dependency_waits(snapshot) {
        if ticket.status == TicketStatus::Blocked {
            continue;
        }
        risks.push(Risk {
            kind: RiskKind::Dependency,
            severity: Severity::Medium,
            ticket: ticket.key.clone(),
            description: format!(
                "{} '{}' is waiting on {}",
                ticket.key,
                ticket.title,
                key_list(&keys)
            ),
            assignee: assignee_or_unassigned(ticket),
        });
    }

    for ticket in snapshot.tickets.iter().filter(|t| {
        t.status == TicketStatus::InProgress && t.priority == HIGH_PRIORITY
    }) {
        risks.push(Risk {
            kind: RiskKind::HighPriority,
            severity: Severity::Low,
            ticket: ticket.key.clone(),
            description: format!(
                "{} '{}' is high-priority and still in progress",
                ticket.key, ticket.title
            ),
            assignee: assignee_or_unassigned(ticket),
        });
    }

    risks
}

pub fn mock_risks(mock: &MockData, today: NaiveDate) -> Vec<Risk> {
    let mut risks: Vec<Risk> = mock
        .tickets
        .iter()
        .filter(|ticket| ticket.is_overdue(today))
        .map(|ticket| Risk {
            kind: RiskKind::Overdue,
            severity: Severity::High,
            ticket: ticket.key.clone(),
            description: format!("{} overdue", ticket.title),
            assignee: None,
        })
        .collect();
    risks.extend(mock.blocker_messages().map(|message| Risk {
        kind: RiskKind::Blocked,
        severity: Severity::Medium,
        ticket: String::new(),
        description: message.to_string(),
        assignee: None,
    }));
    risks
}
