use chrono::NaiveDate;
use db::types::{PullRequestStatus, TicketStatus};
use serde::Serialize;
use strum_macros::Display;

use crate::{
    ReportData, Snapshot,
    progress_percent,
    risk::{RiskKind, Severity},
    snapshot::assignee_name,
};

const RECENT_ACTIVITY_LIMIT: usize = 5;
const TOP_RISKS_PER_KIND: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Health {
    OnTrack,
    NeedsAttention,
    AtRisk,
    Unknown,
}

impl Health {
    pub fn assess(overdue: usize, blocked: usize) -> Self {
        if overdue > 3 || blocked > 2 {
            Health::AtRisk
        } else if overdue > 1 || blocked > 0 {
            Health::NeedsAttention
        } else {
            Health::OnTrack
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecentActivity {
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    pub author: String,
    pub status: PullRequestStatus,
    pub date: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopRisk {
    pub key: String,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: RiskKind,
    pub severity: Severity,
    pub detail: String,
    pub assignee: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    pub total_tickets: usize,
    pub done: usize,
    pub in_progress: usize,
    pub in_review: usize,
    pub blocked: usize,
    pub todo: usize,
    pub total_prs: usize,
    pub open_prs: usize,
    pub merged_prs: usize,
    pub total_members: usize,
    pub overdue_tickets: usize,
    pub progress_percent: u64,
    pub health: Health,
    pub recent_activity: Vec<RecentActivity>,
    pub top_risks: Vec<TopRisk>,
}

impl DashboardStats {
    /// Shown when no live store is in use.
    pub fn unknown() -> Self {
        Self {
            total_tickets: 0,
            done: 0,
            in_progress: 0,
            in_review: 0,
            blocked: 0,
            todo: 0,
            total_prs: 0,
            open_prs: 0,
            merged_prs: 0,
            total_members: 0,
            overdue_tickets: 0,
            progress_percent: 0,
            health: Health::Unknown,
            recent_activity: Vec::new(),
            top_risks: Vec::new(),
        }
    }
}

pub fn build(data: &ReportData, today: NaiveDate) -> DashboardStats {
    match data {
        ReportData::Live(snapshot) => from_snapshot(snapshot, today),
        ReportData::Fallback(_) => DashboardStats::unknown(),
    }
}

pub fn from_snapshot(snapshot: &Snapshot, today: NaiveDate) -> DashboardStats {
    let counts = snapshot.status_counts();
    let count = |status: TicketStatus| counts.get(&status).copied().unwrap_or(0);
    let total = snapshot.tickets.len();
    let done = count(TicketStatus::Done);
    let blocked = count(TicketStatus::Blocked);

    let mut overdue: Vec<_> = snapshot
        .tickets
        .iter()
        .filter(|ticket| !ticket.status.is_done())
        .filter_map(|ticket| {
            ticket
                .due_date
                .filter(|due| *due < today)
                .map(|due| (due, ticket))
        })
        .collect();
    overdue.sort_by_key(|(due, _)| *due);

    let count_prs = |status: PullRequestStatus| {
        snapshot
            .pull_requests
            .iter()
            .filter(|pr| pr.status == status)
            .count()
    };

    let mut recent: Vec<_> = snapshot.pull_requests.iter().collect();
    recent.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
    let recent_activity = recent
        .into_iter()
        .take(RECENT_ACTIVITY_LIMIT)
        .map(|pr| RecentActivity {
            kind: "pr".to_string(),
            title: pr.title.clone(),
            author: snapshot
                .member_name(pr.author)
                .unwrap_or("Unknown")
                .to_string(),
            status: pr.status,
            date: pr.created_at.format("%Y-%m-%d").to_string(),
        })
        .collect();

    let mut top_risks: Vec<TopRisk> = overdue
        .iter()
        .take(TOP_RISKS_PER_KIND)
        .map(|(due, ticket)| {
            let days = (today - *due).num_days();
            TopRisk {
                key: ticket.key.clone(),
                title: ticket.title.clone(),
                kind: RiskKind::Overdue,
                severity: if days > 7 {
                    Severity::Critical
                } else {
                    Severity::High
                },
                detail: format!("{days}d overdue"),
                assignee: assignee_name(ticket).unwrap_or("Unassigned").to_string(),
            }
        })
        .collect();
    top_risks.extend(
        snapshot
            .tickets
            .iter()
            .filter(|ticket| ticket.status == TicketStatus::Blocked)
            .take(TOP_RISKS_PER_KIND)
            .map(|ticket| TopRisk {
                key: ticket.key.clone(),
                title: ticket.title.clone(),
                kind: RiskKind::Blocked,
                severity: Severity::High,
                detail: "Blocked".to_string(),
                assignee: assignee_name(ticket).unwrap_or("Unassigned").to_string(),
            }),
    );

    DashboardStats {
        total_tickets: total,
        done,
        in_progress: count(TicketStatus::InProgress),
        in_review: count(TicketStatus::InReview),
        blocked,
        todo: count(TicketStatus::Todo),
        total_prs: snapshot.pull_requests.len(),
        open_prs: count_prs(PullRequestStatus::Open),
        merged_prs: count_prs(PullRequestStatus::Merged),
        total_members: snapshot.members.len(),
        overdue_tickets: overdue.len(),
        progress_percent: progress_percent(done, total),
        health: Health::assess(overdue.len(), blocked),
        recent_activity,
        top_risks,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        MockData,
        fixtures::{days_ago, member, pull_request, snapshot, ticket, today},
    };

    #[test]
    fn health_thresholds() {
        assert_eq!(Health::assess(0, 0), Health::OnTrack);
        assert_eq!(Health::assess(1, 0), Health::OnTrack);
        assert_eq!(Health::assess(2, 0), Health::NeedsAttention);
        assert_eq!(Health::assess(0, 1), Health::NeedsAttention);
        assert_eq!(Health::assess(4, 0), Health::AtRisk);
        assert_eq!(Health::assess(0, 3), Health::AtRisk);
    }

    #[test]
    fn counts_statuses_prs_and_overdue_tickets() {
        let mut late = ticket(1, "PROJ-A001", "Payment API", TicketStatus::InProgress);
        late.due_date = Some(days_ago(9));
        late.assignee = Some(member(1, "Sara Khan"));
        let mut slightly_late = ticket(2, "PROJ-B002", "Checkout", TicketStatus::Todo);
        slightly_late.due_date = Some(days_ago(2));
        let mut late_but_done = ticket(3, "PROJ-C003", "Auth", TicketStatus::Done);
        late_but_done.due_date = Some(days_ago(20));
        let blocked = ticket(4, "PROJ-D004", "Receipts", TicketStatus::Blocked);
        let review = ticket(5, "PROJ-E005", "Docs", TicketStatus::InReview);

        let mut snap = snapshot(
            vec![late, slightly_late, late_but_done, blocked, review],
            Vec::new(),
        );
        snap.members = vec![member(1, "Sara Khan"), member(2, "Ali Hassan")];
        let mut merged = pull_request(1, "Create auth endpoints", PullRequestStatus::Merged);
        merged.author = Some(1);
        snap.pull_requests = vec![
            merged,
            pull_request(2, "Payment gateway integration", PullRequestStatus::Open),
            pull_request(3, "Draft refactor", PullRequestStatus::Draft),
        ];

        let stats = from_snapshot(&snap, today());
        assert_eq!(stats.total_tickets, 5);
        assert_eq!(stats.done, 1);
        assert_eq!(stats.in_progress, 1);
        assert_eq!(stats.in_review, 1);
        assert_eq!(stats.blocked, 1);
        assert_eq!(stats.todo, 1);
        assert_eq!((stats.total_prs, stats.open_prs, stats.merged_prs), (3, 1, 1));
        assert_eq!(stats.total_members, 2);
        assert_eq!(stats.overdue_tickets, 2);
        assert_eq!(stats.progress_percent, 20);
        assert_eq!(stats.health, Health::NeedsAttention);

        let titles: Vec<_> = stats.recent_activity.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(
            titles,
            vec!["Draft refactor", "Payment gateway integration", "Create auth endpoints"]
        );
        assert_eq!(stats.recent_activity[2].author, "Sara Khan");
        assert_eq!(stats.recent_activity[0].author, "Unknown");
        assert_eq!(stats.recent_activity[0].date, "2025-03-19");

        let risks: Vec<_> = stats
            .top_risks
            .iter()
            .map(|r| (r.key.as_str(), r.severity, r.detail.as_str()))
            .collect();
        assert_eq!(
            risks,
            vec![
                ("PROJ-A001", Severity::Critical, "9d overdue"),
                ("PROJ-B002", Severity::High, "2d overdue"),
                ("PROJ-D004", Severity::High, "Blocked"),
            ]
        );
        assert_eq!(stats.top_risks[0].assignee, "Sara Khan");
        assert_eq!(stats.top_risks[2].assignee, "Unassigned");
    }

    #[test]
    fn lists_are_capped_and_overdue_risks_sorted_by_due_date() {
        let mut tickets = Vec::new();
        for (id, days_late) in [(1, 2), (2, 10), (3, 5), (4, 8)] {
            let mut late = ticket(id, &format!("PROJ-L00{id}"), "Late", TicketStatus::Todo);
            late.due_date = Some(days_ago(days_late));
            tickets.push(late);
        }
        for id in 5..=8 {
            tickets.push(ticket(id, &format!("PROJ-B00{id}"), "Stuck", TicketStatus::Blocked));
        }
        let mut snap = snapshot(tickets, Vec::new());
        snap.pull_requests = (1..=6)
            .map(|id| pull_request(id, &format!("PR {id}"), PullRequestStatus::Open))
            .collect();

        let stats = from_snapshot(&snap, today());
        assert_eq!(stats.overdue_tickets, 4);
        assert_eq!(stats.blocked, 4);
        assert_eq!(stats.health, Health::AtRisk);

        let titles: Vec<_> = stats.recent_activity.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, vec!["PR 6", "PR 5", "PR 4", "PR 3", "PR 2"]);

        assert_eq!(stats.top_risks.len(), 6);
        let keys: Vec<_> = stats.top_risks.iter().map(|r| r.key.as_str()).collect();
        assert_eq!(
            keys,
            vec!["PROJ-L002", "PROJ-L004", "PROJ-L003", "PROJ-B005", "PROJ-B006", "PROJ-B007"]
        );
        let details: Vec<_> = stats.top_risks[..3].iter().map(|r| r.detail.as_str()).collect();
        assert_eq!(details, vec!["10d overdue", "8d overdue", "5d overdue"]);
        assert_eq!(stats.top_risks[2].severity, Severity::High);
    }

    #[test]
    fn fallback_dashboard_is_unknown() {
        let stats = build(&ReportData::Fallback(MockData::default()), today());
        assert_eq!(stats, DashboardStats::unknown());
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["health"], "unknown");
        assert_eq!(json["total_tickets"], 0);
    }

    #[test]
    fn empty_store_is_on_track() {
        let stats = from_snapshot(&Snapshot::default(), today());
        assert_eq!(stats.progress_percent, 0);
        assert_eq!(stats.health, Health::OnTrack);
        assert!(stats.top_risks.is_empty());
    }
}
