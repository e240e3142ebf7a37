use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set,
};
use serde::{Deserialize, Serialize};

use crate::{
    entities::{member, pull_request, ticket, ticket_pull_request},
    types::{IdRef, PullRequestStatus},
    validation::{FieldErrors, WriteError},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequest {
    pub id: i64,
    pub repo: String,
    pub title: String,
    pub author: Option<i64>,
    pub status: PullRequestStatus,
    pub url: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreatePullRequest {
    #[serde(default)]
    pub repo: String,
    pub title: String,
    #[serde(default)]
    pub author: Option<i64>,
    #[serde(default)]
    pub status: Option<PullRequestStatus>,
    #[serde(default)]
    pub url: String,
    /// Links the new pull request to this ticket when it exists.
    #[serde(default)]
    pub ticket_id: Option<IdRef>,
}

impl CreatePullRequest {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.require("title", &self.title);
        errors.max_len("title", &self.title, 255);
        errors.max_len("repo", &self.repo, 200);
        if !self.url.is_empty() && !(self.url.starts_with("http://") || self.url.starts_with("https://")) {
            errors.add("url", "Enter a valid URL.");
        }
        errors.into_result()
    }
}

impl PullRequest {
    pub(crate) fn from_model(model: pull_request::Model) -> Self {
        Self {
            id: model.id,
            repo: model.repo,
            title: model.title,
            author: model.author_id,
            status: model.status,
            url: model.url,
            created_at: model.created_at,
        }
    }

    pub async fn find_all<C: ConnectionTrait>(db: &C) -> Result<Vec<Self>, DbErr> {
        let records = pull_request::Entity::find()
            .order_by_asc(pull_request::Column::Id)
            .all(db)
            .await?;
        Ok(records.into_iter().map(Self::from_model).collect())
    }

    pub async fn create<C: ConnectionTrait>(
        db: &C,
        data: &CreatePullRequest,
    ) -> Result<Self, WriteError> {
        let mut errors = match data.validate() {
            Ok(()) => FieldErrors::new(),
            Err(errors) => errors,
        };
        if let Some(author_id) = data.author
            && member::Entity::find_by_id(author_id).one(db).await?.is_none()
        {
            errors.missing_pk("author", author_id);
        }
        errors.into_result()?;

        let active = pull_request::ActiveModel {
            repo: Set(data.repo.trim().to_string()),
            title: Set(data.title.trim().to_string()),
            author_id: Set(data.author),
            status: Set(data.status.unwrap_or_default()),
            url: Set(data.url.trim().to_string()),
            created_at: Set(Utc::now()),
            ..Default::default()
        };
        let model = active.insert(db).await?;

        if let Some(ticket_id) = data.ticket_id.as_ref().and_then(IdRef::id) {
            if ticket::Entity::find_by_id(ticket_id).one(db).await?.is_some() {
                Self::link_to_ticket(db, ticket_id, model.id).await?;
            } else {
                tracing::warn!(ticket_id, pr_id = model.id, "Skipping link to unknown ticket");
            }
        }

        Ok(Self::from_model(model))
    }

    /// Idempotent; an existing link is left untouched.
    pub async fn link_to_ticket<C: ConnectionTrait>(
        db: &C,
        ticket_id: i64,
        pull_request_id: i64,
    ) -> Result<(), DbErr> {
        let existing = ticket_pull_request::Entity::find()
            .filter(ticket_pull_request::Column::TicketId.eq(ticket_id))
            .filter(ticket_pull_request::Column::PullRequestId.eq(pull_request_id))
            .one(db)
            .await?;
        if existing.is_some() {
            return Ok(());
        }
        ticket_pull_request::ActiveModel {
            ticket_id: Set(ticket_id),
            pull_request_id: Set(pull_request_id),
            ..Default::default()
        }
        .insert(db)
        .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::test_db;

    fn pr(title: &str) -> CreatePullRequest {
        CreatePullRequest {
            repo: "backend".to_string(),
            title: title.to_string(),
            author: None,
            status: None,
            url: String::new(),
            ticket_id: None,
        }
    }

    #[tokio::test]
    async fn create_defaults_status_to_open() {
        let db = test_db().await;
        let created = PullRequest::create(&db, &pr("Create auth endpoints")).await.unwrap();
        assert_eq!(created.status, PullRequestStatus::Open);
        assert_eq!(created.author, None);
    }

    #[tokio::test]
    async fn create_rejects_unknown_author_without_writing() {
        let db = test_db().await;
        let mut data = pr("Payment gateway integration");
        data.author = Some(5);

        let err = PullRequest::create(&db, &data).await.unwrap_err();
        assert!(matches!(err, WriteError::Invalid(ref errors) if errors.get("author").is_some()));
        assert!(PullRequest::find_all(&db).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn unknown_ticket_link_is_skipped() {
        let db = test_db().await;
        let mut data = pr("Docs: update README");
        data.ticket_id = Some(IdRef::Id(404));

        let created = PullRequest::create(&db, &data).await.unwrap();
        assert_eq!(PullRequest::find_all(&db).await.unwrap(), vec![created]);
    }
}
