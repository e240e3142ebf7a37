use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set,
};
use sea_orm::sea_query::Expr;
use serde::{Deserialize, Serialize};

use crate::{
    entities::{member, team},
    validation::{FieldErrors, WriteError},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateTeam {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl CreateTeam {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.require("name", &self.name);
        errors.max_len("name", &self.name, 120);
        errors.into_result()
    }
}

impl Team {
    fn from_model(model: team::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            description: model.description,
            created_at: model.created_at,
        }
    }

    pub async fn find_all<C: ConnectionTrait>(db: &C) -> Result<Vec<Self>, DbErr> {
        let records = team::Entity::find()
            .order_by_asc(team::Column::Id)
            .all(db)
            .await?;
        Ok(records.into_iter().map(Self::from_model).collect())
    }

    pub async fn create<C: ConnectionTrait>(db: &C, data: &CreateTeam) -> Result<Self, WriteError> {
        data.validate()?;
        let active = team::ActiveModel {
            name: Set(data.name.trim().to_string()),
            description: Set(data.description.clone()),
            created_at: Set(Utc::now()),
            ..Default::default()
        };
        let model = active.insert(db).await?;
        Ok(Self::from_model(model))
    }

    /// Members of the team stay, detached from it.
    pub async fn delete<C: ConnectionTrait>(db: &C, id: i64) -> Result<u64, DbErr> {
        member::Entity::update_many()
            .col_expr(member::Column::TeamId, Expr::value(None::<i64>))
            .filter(member::Column::TeamId.eq(id))
            .exec(db)
            .await?;
        let result = team::Entity::delete_many()
            .filter(team::Column::Id.eq(id))
            .exec(db)
            .await?;
        Ok(result.rows_affected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        member::{CreateMember, Member},
        test_db,
    };

    #[test]
    fn blank_name_is_rejected() {
        let errors = CreateTeam {
            name: "  ".to_string(),
            description: String::new(),
        }
        .validate()
        .unwrap_err();
        assert!(errors.get("name").is_some());
    }

    #[tokio::test]
    async fn deleting_team_detaches_members() {
        let db = test_db().await;
        let team = Team::create(
            &db,
            &CreateTeam {
                name: "Alpha Squad".to_string(),
                description: "Core delivery team".to_string(),
            },
        )
        .await
        .unwrap();
        let member = Member::create(
            &db,
            &CreateMember {
                team: Some(team.id),
                name: "Sara Khan".to_string(),
                email: "sara@example.com".to_string(),
                role: "Frontend Engineer".to_string(),
            },
        )
        .await
        .unwrap();
        assert_eq!(member.team, Some(team.id));

        assert_eq!(Team::delete(&db, team.id).await.unwrap(), 1);

        let reloaded = Member::find_by_id(&db, member.id).await.unwrap().unwrap();
        assert_eq!(reloaded.team, None);
        assert!(Team::find_all(&db).await.unwrap().is_empty());
    }
}
