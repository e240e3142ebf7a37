use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set,
};
use sea_orm::sea_query::Expr;
use serde::{Deserialize, Serialize};

use crate::{
    entities::{member, pull_request, team, ticket},
    validation::{FieldErrors, WriteError},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: i64,
    pub team: Option<i64>,
    pub name: String,
    pub email: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateMember {
    #[serde(default)]
    pub team: Option<i64>,
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: String,
}

impl CreateMember {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.require("name", &self.name);
        errors.max_len("name", &self.name, 120);
        errors.max_len("role", &self.role, 80);
        if !self.email.is_empty() && !looks_like_email(&self.email) {
            errors.add("email", "Enter a valid email address.");
        }
        errors.into_result()
    }
}

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^[-!#$%&'*+/=?^_`{}|~0-9a-z]+(\.[-!#$%&'*+/=?^_`{}|~0-9a-z]+)*@([a-z0-9]([a-z0-9-]{0,61}[a-z0-9])?\.)+[a-z]{2,63}$",
    )
    .expect("valid regex")
});

fn looks_like_email(value: &str) -> bool {
    EMAIL.is_match(value)
}

impl Member {
    pub(crate) fn from_model(model: member::Model) -> Self {
        Self {
            id: model.id,
            team: model.team_id,
            name: model.name,
            email: model.email,
            role: model.role,
            created_at: model.created_at,
        }
    }

    pub async fn find_all<C: ConnectionTrait>(db: &C) -> Result<Vec<Self>, DbErr> {
        let records = member::Entity::find()
            .order_by_asc(member::Column::Id)
            .all(db)
            .await?;
        Ok(records.into_iter().map(Self::from_model).collect())
    }

    pub async fn find_by_id<C: ConnectionTrait>(db: &C, id: i64) -> Result<Option<Self>, DbErr> {
        let record = member::Entity::find_by_id(id).one(db).await?;
        Ok(record.map(Self::from_model))
    }

    pub async fn create<C: ConnectionTrait>(db: &C, data: &CreateMember) -> Result<Self, WriteError> {
        let mut errors = match data.validate() {
            Ok(()) => FieldErrors::new(),
            Err(errors) => errors,
        };
        if let Some(team_id) = data.team
            && team::Entity::find_by_id(team_id).one(db).await?.is_none()
        {
            errors.missing_pk("team", team_id);
        }
        errors.into_result()?;

        let active = member::ActiveModel {
            team_id: Set(data.team),
            name: Set(data.name.trim().to_string()),
            email: Set(data.email.trim().to_string()),
            role: Set(data.role.trim().to_string()),
            created_at: Set(Utc::now()),
            ..Default::default()
        };
        let model = active.insert(db).await?;
        Ok(Self::from_model(model))
    }

    /// Removes the member; tickets and pull requests pointing at it keep existing
    /// with their assignee/author cleared.
    pub async fn delete<C: ConnectionTrait>(db: &C, id: i64) -> Result<u64, DbErr> {
        ticket::Entity::update_many()
            .col_expr(ticket::Column::AssigneeId, Expr::value(None::<i64>))
            .filter(ticket::Column::AssigneeId.eq(id))
            .exec(db)
            .await?;
        pull_request::Entity::update_many()
            .col_expr(pull_request::Column::AuthorId, Expr::value(None::<i64>))
            .filter(pull_request::Column::AuthorId.eq(id))
            .exec(db)
            .await?;

        let result = member::Entity::delete_many()
            .filter(member::Column::Id.eq(id))
            .exec(db)
            .await?;
        Ok(result.rows_affected)
    }
}
