use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set,
};
use serde::{Deserialize, Serialize};

use crate::{
    entities::{dependency, ticket},
    validation::{FieldErrors, WriteError},
};

/// Directed edge: `ticket` cannot complete until `depends_on` is done.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
    pub id: i64,
    pub ticket: i64,
    pub depends_on: i64,
    pub note: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateDependency {
    pub ticket: i64,
    pub depends_on: i64,
    #[serde(default)]
    pub note: String,
}

impl Dependency {
    fn from_model(model: dependency::Model) -> Self {
        Self {
            id: model.id,
            ticket: model.ticket_id,
            depends_on: model.depends_on_id,
            note: model.note,
        }
    }

    pub async fn find_all<C: ConnectionTrait>(db: &C) -> Result<Vec<Self>, DbErr> {
        let records = dependency::Entity::find()
            .order_by_asc(dependency::Column::Id)
            .all(db)
            .await?;
        Ok(records.into_iter().map(Self::from_model).collect())
    }

    /// Edges where `ticket_id` is the waiting side.
    pub async fn find_outgoing<C: ConnectionTrait>(
        db: &C,
        ticket_id: i64,
    ) -> Result<Vec<Self>, DbErr> {
        let records = dependency::Entity::find()
            .filter(dependency::Column::TicketId.eq(ticket_id))
            .order_by_asc(dependency::Column::Id)
            .all(db)
            .await?;
        Ok(records.into_iter().map(Self::from_model).collect())
    }

    /// Edges where other tickets wait on `ticket_id`.
    pub async fn find_incoming<C: ConnectionTrait>(
        db: &C,
        ticket_id: i64,
    ) -> Result<Vec<Self>, DbErr> {
        let records = dependency::Entity::find()
            .filter(dependency::Column::DependsOnId.eq(ticket_id))
            .order_by_asc(dependency::Column::Id)
            .all(db)
            .await?;
        Ok(records.into_iter().map(Self::from_model).collect())
    }

    pub async fn create<C: ConnectionTrait>(
        db: &C,
        data: &CreateDependency,
    ) -> Result<Self, WriteError> {
        let mut errors = FieldErrors::new();
        errors.max_len("note", &data.note, 255);
        if ticket::Entity::find_by_id(data.ticket).one(db).await?.is_none() {
            errors.missing_pk("ticket", data.ticket);
        }
        if ticket::Entity::find_by_id(data.depends_on).one(db).await?.is_none() {
            errors.missing_pk("depends_on", data.depends_on);
        }
        errors.into_result()?;

        let duplicate = dependency::Entity::find()
            .filter(dependency::Column::TicketId.eq(data.ticket))
            .filter(dependency::Column::DependsOnId.eq(data.depends_on))
            .one(db)
            .await?;
        if duplicate.is_some() {
            return Err(FieldErrors::single(
                "non_field_errors",
                "The fields ticket, depends_on must make a unique set.",
            )
            .into());
        }

        let model = dependency::ActiveModel {
            ticket_id: Set(data.ticket),
            depends_on_id: Set(data.depends_on),
            note: Set(data.note.clone()),
            ..Default::default()
        }
        .insert(db)
        .await?;
        Ok(Self::from_model(model))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        test_db,
        ticket::{CreateTicket, Ticket},
    };

    async fn ticket<C: ConnectionTrait>(db: &C, title: &str) -> Ticket {
        Ticket::create(
            db,
            &CreateTicket {
                title: title.to_string(),
                description: String::new(),
                status: None,
                assignee: None,
                priority: String::new(),
                due_date: None,
            },
        )
        .await
        .unwrap()
    }

    fn edge(ticket: i64, depends_on: i64) -> CreateDependency {
        CreateDependency {
            ticket,
            depends_on,
            note: String::new(),
        }
    }

    #[tokio::test]
    async fn lists_edges_in_both_directions() {
        let db = test_db().await;
        let a = ticket(&db, "Checkout page").await;
        let b = ticket(&db, "Payment API").await;
        let c = ticket(&db, "Receipt emails").await;
        Dependency::create(&db, &edge(a.id, b.id)).await.unwrap();
        Dependency::create(&db, &edge(c.id, b.id)).await.unwrap();

        let outgoing = Dependency::find_outgoing(&db, a.id).await.unwrap();
        assert_eq!(outgoing.len(), 1);
        assert_eq!(outgoing[0].depends_on, b.id);

        let incoming = Dependency::find_incoming(&db, b.id).await.unwrap();
        let waiting: Vec<_> = incoming.iter().map(|d| d.ticket).collect();
        assert_eq!(waiting, vec![a.id, c.id]);
        assert!(Dependency::find_incoming(&db, a.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn rejects_duplicate_pairs_and_unknown_tickets() {
        let db = test_db().await;
        let a = ticket(&db, "A").await;
        let b = ticket(&db, "B").await;
        Dependency::create(&db, &edge(a.id, b.id)).await.unwrap();

        match Dependency::create(&db, &edge(a.id, b.id)).await.unwrap_err() {
            WriteError::Invalid(errors) => assert!(errors.get("non_field_errors").is_some()),
            other => panic!("unexpected error: {other}"),
        }
        // reverse direction is a different edge
        Dependency::create(&db, &edge(b.id, a.id)).await.unwrap();

        match Dependency::create(&db, &edge(a.id, 404)).await.unwrap_err() {
            WriteError::Invalid(errors) => assert!(errors.get("depends_on").is_some()),
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(Dependency::find_all(&db).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn self_dependency_is_accepted() {
        let db = test_db().await;
        let a = ticket(&db, "Loop").await;
        let created = Dependency::create(&db, &edge(a.id, a.id)).await.unwrap();
        assert_eq!(created.ticket, created.depends_on);
    }
}
