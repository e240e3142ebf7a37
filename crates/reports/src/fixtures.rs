//! Hand-built snapshots for report tests.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use db::{
    models::{dependency::Dependency, member::Member, pull_request::PullRequest, ticket::Ticket},
    types::{PullRequestStatus, TicketStatus},
};

use crate::Snapshot;

pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 20).unwrap()
}

pub fn days_ago(days: i64) -> NaiveDate {
    today() - chrono::Duration::days(days)
}

pub fn at(minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 19, 9, minute, 0).unwrap()
}

pub fn member(id: i64, name: &str) -> Member {
    Member {
        id,
        team: None,
        name: name.to_string(),
        email: String::new(),
        role: String::new(),
        created_at: at(0),
    }
}

pub fn ticket(id: i64, key: &str, title: &str, status: TicketStatus) -> Ticket {
    Ticket {
        id,
        key: key.to_string(),
        title: title.to_string(),
        description: String::new(),
        status,
        assignee: None,
        priority: String::new(),
        due_date: None,
        prs: Vec::new(),
        created_at: at(id as u32),
        updated_at: at(id as u32),
    }
}

pub fn pull_request(id: i64, title: &str, status: PullRequestStatus) -> PullRequest {
    PullRequest {
        id,
        repo: "backend".to_string(),
        title: title.to_string(),
        author: None,
        status,
        url: String::new(),
        created_at: at(id as u32),
    }
}

pub fn edge(id: i64, ticket: i64, depends_on: i64) -> Dependency {
    Dependency {
        id,
        ticket,
        depends_on,
        note: String::new(),
    }
}

pub fn snapshot(tickets: Vec<Ticket>, dependencies: Vec<Dependency>) -> Snapshot {
    Snapshot {
        tickets,
        dependencies,
        ..Snapshot::default()
    }
}
