use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use rand::{Rng, distributions::Alphanumeric};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};

use crate::{
    entities::{dependency, member, pull_request, ticket, ticket_pull_request},
    models::{member::Member, pull_request::PullRequest},
    types::{IdRef, TicketStatus},
    validation::{FieldErrors, WriteError},
};

pub const KEY_PREFIX: &str = "PROJ-";
const KEY_SUFFIX_LEN: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    pub id: i64,
    pub key: String,
    pub title: String,
    pub description: String,
    pub status: TicketStatus,
    pub assignee: Option<Member>,
    pub priority: String,
    pub due_date: Option<NaiveDate>,
    pub prs: Vec<PullRequest>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Any `key` sent by the client is dropped; keys are always generated.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTicket {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: Option<TicketStatus>,
    #[serde(default)]
    pub assignee: Option<IdRef>,
    #[serde(default)]
    pub priority: String,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
}

impl CreateTicket {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.require("title", &self.title);
        errors.max_len("title", &self.title, 255);
        errors.max_len("priority", &self.priority, 30);
        errors.into_result()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTicket {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<TicketStatus>,
    /// `""` or an unknown id clears the assignee; absent or `null` keeps it.
    #[serde(default)]
    pub assignee: Option<IdRef>,
    #[serde(default)]
    pub pr_id: Option<IdRef>,
}

impl UpdateTicket {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        if let Some(title) = &self.title {
            errors.require("title", title);
            errors.max_len("title", title, 255);
        }
        errors.into_result()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TicketFilter {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub assignee_id: Option<String>,
    #[serde(default)]
    pub assignee: Option<String>,
}

impl TicketFilter {
    fn assignee(&self) -> Option<&str> {
        self.assignee_id
            .as_deref()
            .filter(|value| !value.is_empty())
            .or(self.assignee.as_deref())
            .filter(|value| !value.is_empty())
    }
}

/// `PROJ-` followed by four random uppercase alphanumerics. Collisions are
/// left to the unique index on `tickets.key`.
pub fn generate_key() -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(KEY_SUFFIX_LEN)
        .map(char::from)
        .collect();
    format!("{KEY_PREFIX}{}", suffix.to_uppercase())
}

impl Ticket {
    async fn hydrate<C: ConnectionTrait>(
        db: &C,
        records: Vec<ticket::Model>,
    ) -> Result<Vec<Self>, DbErr> {
        if records.is_empty() {
            return Ok(Vec::new());
        }

        let mut assignee_ids: Vec<i64> = records.iter().filter_map(|t| t.assignee_id).collect();
        assignee_ids.sort_unstable();
        assignee_ids.dedup();
        let members: HashMap<i64, Member> = member::Entity::find()
            .filter(member::Column::Id.is_in(assignee_ids))
            .all(db)
            .await?
            .into_iter()
            .map(|m| (m.id, Member::from_model(m)))
            .collect();

        let ticket_ids: Vec<i64> = records.iter().map(|t| t.id).collect();
        let links = ticket_pull_request::Entity::find()
            .filter(ticket_pull_request::Column::TicketId.is_in(ticket_ids))
            .order_by_asc(ticket_pull_request::Column::PullRequestId)
            .all(db)
            .await?;
        let pr_ids: Vec<i64> = links.iter().map(|link| link.pull_request_id).collect();
        let prs: HashMap<i64, PullRequest> = if pr_ids.is_empty() {
            HashMap::new()
        } else {
            pull_request::Entity::find()
                .filter(pull_request::Column::Id.is_in(pr_ids))
                .all(db)
                .await?
                .into_iter()
                .map(|pr| (pr.id, PullRequest::from_model(pr)))
                .collect()
        };
        let mut prs_by_ticket: HashMap<i64, Vec<PullRequest>> = HashMap::new();
        for link in links {
            if let Some(pr) = prs.get(&link.pull_request_id) {
                prs_by_ticket
                    .entry(link.ticket_id)
                    .or_default()
                    .push(pr.clone());
            }
        }

        Ok(records
            .into_iter()
            .map(|model| Self {
                assignee: model.assignee_id.and_then(|id| members.get(&id).cloned()),
                prs: prs_by_ticket.remove(&model.id).unwrap_or_default(),
                id: model.id,
                key: model.key,
                title: model.title,
                description: model.description,
                status: model.status,
                priority: model.priority,
                due_date: model.due_date,
                created_at: model.created_at,
                updated_at: model.updated_at,
            })
            .collect())
    }

    pub async fn find_all<C: ConnectionTrait>(db: &C) -> Result<Vec<Self>, DbErr> {
        Self::find_filtered(db, &TicketFilter::default()).await
    }

    /// Newest first. A status that is not a known value matches nothing; a
    /// non-numeric assignee filter is ignored.
    pub async fn find_filtered<C: ConnectionTrait>(
        db: &C,
        filter: &TicketFilter,
    ) -> Result<Vec<Self>, DbErr> {
        let mut query = ticket::Entity::find()
            .order_by_desc(ticket::Column::CreatedAt)
            .order_by_desc(ticket::Column::Id);

        if let Some(status) = filter.status.as_deref().filter(|s| !s.is_empty()) {
            match status.parse::<TicketStatus>() {
                Ok(status) => query = query.filter(ticket::Column::Status.eq(status)),
                Err(_) => return Ok(Vec::new()),
            }
        }
        if let Some(assignee) = filter.assignee() {
            match assignee.trim().parse::<i64>() {
                Ok(id) => query = query.filter(ticket::Column::AssigneeId.eq(id)),
                Err(_) => tracing::debug!(assignee, "Ignoring non-numeric assignee filter"),
            }
        }

        let records = query.all(db).await?;
        Self::hydrate(db, records).await
    }

    pub async fn find_by_id<C: ConnectionTrait>(db: &C, id: i64) -> Result<Option<Self>, DbErr> {
        let Some(record) = ticket::Entity::find_by_id(id).one(db).await? else {
            return Ok(None);
        };
        Ok(Self::hydrate(db, vec![record]).await?.pop())
    }

    pub async fn count<C: ConnectionTrait>(db: &C) -> Result<u64, DbErr> {
        ticket::Entity::find().count(db).await
    }

    /// Run inside a transaction so the insert and the assignee lookup land together.
    pub async fn create<C: ConnectionTrait>(db: &C, data: &CreateTicket) -> Result<Self, WriteError> {
        data.validate()?;

        let assignee_id = match data.assignee.as_ref().and_then(IdRef::id) {
            Some(id) if Member::find_by_id(db, id).await?.is_some() => Some(id),
            Some(id) => {
                tracing::warn!(assignee_id = id, "Unknown assignee on ticket create; leaving unassigned");
                None
            }
            None => None,
        };

        let now = Utc::now();
        let active = ticket::ActiveModel {
            key: Set(generate_key()),
            title: Set(data.title.trim().to_string()),
            description: Set(data.description.clone()),
            status: Set(data.status.unwrap_or_default()),
            assignee_id: Set(assignee_id),
            priority: Set(data.priority.trim().to_string()),
            due_date: Set(data.due_date),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        let model = active.insert(db).await?;
        tracing::debug!(ticket_id = model.id, key = %model.key, "Created ticket");

        Self::find_by_id(db, model.id)
            .await?
            .ok_or_else(|| WriteError::Database(DbErr::RecordNotFound("Ticket not found".to_string())))
    }

    /// Applies the fields present in `data`. Unknown assignee and pull request
    /// ids never fail the update.
    pub async fn update<C: ConnectionTrait>(
        db: &C,
        id: i64,
        data: &UpdateTicket,
    ) -> Result<Self, WriteError> {
        data.validate()?;

        let record = ticket::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| DbErr::RecordNotFound("Ticket not found".to_string()))?;
        let previous_status = record.status;

        let mut active: ticket::ActiveModel = record.into();
        if let Some(assignee) = &data.assignee {
            let assignee_id = match assignee.id() {
                Some(member_id) if Member::find_by_id(db, member_id).await?.is_some() => {
                    Some(member_id)
                }
                Some(member_id) => {
                    tracing::warn!(ticket_id = id, assignee_id = member_id, "Unknown assignee; clearing");
                    None
                }
                None => None,
            };
            active.assignee_id = Set(assignee_id);
        }

        if let Some(pr_id) = data.pr_id.as_ref().and_then(IdRef::id).filter(|pr_id| *pr_id != 0) {
            if pull_request::Entity::find_by_id(pr_id).one(db).await?.is_some() {
                PullRequest::link_to_ticket(db, id, pr_id).await?;
            } else {
                tracing::warn!(ticket_id = id, pr_id, "Unknown pull request; link skipped");
            }
        }

        if let Some(title) = &data.title {
            active.title = Set(title.clone());
        }
        if let Some(description) = &data.description {
            active.description = Set(description.clone());
        }
        if let Some(status) = data.status {
            tracing::info!(
                ticket_id = id,
                from = %previous_status,
                to = %status,
                "Updating ticket status"
            );
            active.status = Set(status);
        }
        active.updated_at = Set(Utc::now());
        active.update(db).await?;

        Self::find_by_id(db, id)
            .await?
            .ok_or_else(|| WriteError::Database(DbErr::RecordNotFound("Ticket not found".to_string())))
    }

    /// Removes the ticket together with its dependency edges and pull request links.
    pub async fn delete<C: ConnectionTrait>(db: &C, id: i64) -> Result<u64, DbErr> {
        dependency::Entity::delete_many()
            .filter(
                Condition::any()
                    .add(dependency::Column::TicketId.eq(id))
                    .add(dependency::Column::DependsOnId.eq(id)),
            )
            .exec(db)
            .await?;
        ticket_pull_request::Entity::delete_many()
            .filter(ticket_pull_request::Column::TicketId.eq(id))
            .exec(db)
            .await?;
        let result = ticket::Entity::delete_many()
            .filter(ticket::Column::Id.eq(id))
            .exec(db)
            .await?;
        Ok(result.rows_affected)
    }
}

#[cfg(test)]
mod tests {
    use sea_orm::TransactionTrait;

    use super::*;
    use crate::models::{
        dependency::{CreateDependency, Dependency},
        member::CreateMember,
        pull_request::CreatePullRequest,
        test_db,
    };

    fn ticket(title: &str) -> CreateTicket {
        CreateTicket {
            title: title.to_string(),
            description: String::new(),
            status: None,
            assignee: None,
            priority: String::new(),
            due_date: None,
        }
    }

    async fn member<C: ConnectionTrait>(db: &C, name: &str) -> Member {
        Member::create(
            db,
            &CreateMember {
                team: None,
                name: name.to_string(),
                email: String::new(),
                role: String::new(),
            },
        )
        .await
        .unwrap()
    }

    fn assert_key_shape(key: &str) {
        let suffix = key.strip_prefix(KEY_PREFIX).unwrap();
        assert_eq!(suffix.len(), 4, "{key}");
        assert!(
            suffix
                .chars()
                .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()),
            "{key}"
        );
    }

    #[test]
    fn generated_keys_match_the_pattern() {
        for _ in 0..50 {
            assert_key_shape(&generate_key());
        }
    }

    #[test]
    fn client_key_is_not_part_of_the_payload() {
        let payload: CreateTicket =
            serde_json::from_value(serde_json::json!({"key": "MINE-1", "title": "Login page"}))
                .unwrap();
        assert_eq!(payload.title, "Login page");
        assert_eq!(payload.status, None);
    }

    #[tokio::test]
    async fn create_generates_key_and_skips_unknown_assignee() {
        let db = test_db().await;
        let mut data = ticket("Implement login UI");
        data.assignee = Some(IdRef::Id(77));

        let tx = db.begin().await.unwrap();
        let created = Ticket::create(&tx, &data).await.unwrap();
        tx.commit().await.unwrap();

        assert_key_shape(&created.key);
        assert_eq!(created.status, TicketStatus::Todo);
        assert_eq!(created.assignee, None);
        assert_eq!(Ticket::count(&db).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn update_applies_lenient_assignee_and_pr_rules() {
        let db = test_db().await;
        let sara = member(&db, "Sara Khan").await;
        let mut data = ticket("Payment gateway");
        data.assignee = Some(IdRef::Text(sara.id.to_string()));
        let created = Ticket::create(&db, &data).await.unwrap();
        assert_eq!(created.assignee.as_ref().map(|m| m.id), Some(sara.id));

        // null keeps the assignee, unknown pr ids are skipped
        let kept = Ticket::update(
            &db,
            created.id,
            &UpdateTicket {
                status: Some(TicketStatus::InProgress),
                pr_id: Some(IdRef::Id(999)),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(kept.status, TicketStatus::InProgress);
        assert_eq!(kept.assignee.as_ref().map(|m| m.id), Some(sara.id));
        assert!(kept.prs.is_empty());

        let pr = PullRequest::create(
            &db,
            &CreatePullRequest {
                repo: "backend".to_string(),
                title: "Payment gateway integration".to_string(),
                author: Some(sara.id),
                status: None,
                url: String::new(),
                ticket_id: None,
            },
        )
        .await
        .unwrap();
        let linked = Ticket::update(
            &db,
            created.id,
            &UpdateTicket {
                pr_id: Some(IdRef::Text(pr.id.to_string())),
                assignee: Some(IdRef::Id(4242)),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(linked.prs, vec![pr]);
        assert_eq!(linked.assignee, None);

        let cleared = Ticket::update(
            &db,
            created.id,
            &UpdateTicket {
                assignee: Some(IdRef::Text(String::new())),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(cleared.assignee, None);
        assert_eq!(cleared.prs.len(), 1);
    }

    #[tokio::test]
    async fn deleting_assignee_keeps_ticket() {
        let db = test_db().await;
        let ali = member(&db, "Ali Hassan").await;
        let mut data = ticket("Write API docs");
        data.assignee = Some(IdRef::Id(ali.id));
        let created = Ticket::create(&db, &data).await.unwrap();

        Member::delete(&db, ali.id).await.unwrap();

        let reloaded = Ticket::find_by_id(&db, created.id).await.unwrap().unwrap();
        assert_eq!(reloaded.assignee, None);
        assert_eq!(reloaded.key, created.key);
    }

    #[tokio::test]
    async fn filters_by_status_and_assignee() {
        let db = test_db().await;
        let ali = member(&db, "Ali Hassan").await;
        let mut first = ticket("Setup CI");
        first.status = Some(TicketStatus::Done);
        let mut second = ticket("Bug bash");
        second.assignee = Some(IdRef::Id(ali.id));
        Ticket::create(&db, &first).await.unwrap();
        let assigned = Ticket::create(&db, &second).await.unwrap();

        let done = Ticket::find_filtered(
            &db,
            &TicketFilter {
                status: Some("DONE".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(done.len(), 1);
        assert_eq!(done[0].title, "Setup CI");

        let by_assignee = Ticket::find_filtered(
            &db,
            &TicketFilter {
                assignee: Some(ali.id.to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(by_assignee, vec![assigned]);

        let ignored = Ticket::find_filtered(
            &db,
            &TicketFilter {
                assignee_id: Some("abc".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(ignored.len(), 2);

        let unknown_status = Ticket::find_filtered(
            &db,
            &TicketFilter {
                status: Some("ARCHIVED".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert!(unknown_status.is_empty());
    }

    #[tokio::test]
    async fn delete_removes_dependency_edges() {
        let db = test_db().await;
        let a = Ticket::create(&db, &ticket("A")).await.unwrap();
        let b = Ticket::create(&db, &ticket("B")).await.unwrap();
        Dependency::create(
            &db,
            &CreateDependency {
                ticket: a.id,
                depends_on: b.id,
                note: String::new(),
            },
        )
        .await
        .unwrap();

        assert_eq!(Ticket::delete(&db, b.id).await.unwrap(), 1);
        assert!(Dependency::find_all(&db).await.unwrap().is_empty());
        assert!(Ticket::find_by_id(&db, a.id).await.unwrap().is_some());
    }
}
