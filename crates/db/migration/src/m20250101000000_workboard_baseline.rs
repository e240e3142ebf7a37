use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::DatabaseBackend;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create().if_not_exists()
                    .table(Teams::Table)
                    .col(pk_id_col(manager, Teams::Id))
                    .col(ColumnDef::new(Teams::Name).string_len(120).not_null())
                    .col(ColumnDef::new(Teams::Description).text().not_null().default(Expr::val("")))
                    .col(timestamp_col(Teams::CreatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create().if_not_exists()
                    .table(Members::Table)
                    .col(pk_id_col(manager, Members::Id))
                    .col(fk_id_nullable_col(manager, Members::TeamId))
                    .col(ColumnDef::new(Members::Name).string_len(120).not_null())
                    .col(ColumnDef::new(Members::Email).string().not_null().default(Expr::val("")))
                    .col(ColumnDef::new(Members::Role).string_len(80).not_null().default(Expr::val("")))
                    .col(timestamp_col(Members::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_members_team_id")
                            .from(Members::Table, Members::TeamId)
                            .to(Teams::Table, Teams::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create().if_not_exists()
                    .table(PullRequests::Table)
                    .col(pk_id_col(manager, PullRequests::Id))
                    .col(ColumnDef::new(PullRequests::Repo).string_len(200).not_null().default(Expr::val("")))
                    .col(ColumnDef::new(PullRequests::Title).string_len(255).not_null())
                    .col(fk_id_nullable_col(manager, PullRequests::AuthorId))
                    .col(
                        ColumnDef::new(PullRequests::Status)
                            .string_len(30)
                            .not_null()
                            .default(Expr::val("Open")),
                    )
                    .col(ColumnDef::new(PullRequests::Url).string().not_null().default(Expr::val("")))
                    .col(timestamp_col(PullRequests::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_pull_requests_author_id")
                            .from(PullRequests::Table, PullRequests::AuthorId)
                            .to(Members::Table, Members::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create().if_not_exists()
                    .table(Tickets::Table)
                    .col(pk_id_col(manager, Tickets::Id))
                    .col(ColumnDef::new(Tickets::Key).string_len(20).not_null())
                    .col(ColumnDef::new(Tickets::Title).string_len(255).not_null())
                    .col(ColumnDef::new(Tickets::Description).text().not_null().default(Expr::val("")))
                    .col(
                        ColumnDef::new(Tickets::Status)
                            .string_len(30)
                            .not_null()
                            .default(Expr::val("TODO")),
                    )
                    .col(fk_id_nullable_col(manager, Tickets::AssigneeId))
                    .col(ColumnDef::new(Tickets::Priority).string_len(30).not_null().default(Expr::val("")))
                    .col(ColumnDef::new(Tickets::DueDate).date())
                    .col(timestamp_col(Tickets::CreatedAt))
                    .col(timestamp_col(Tickets::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tickets_assignee_id")
                            .from(Tickets::Table, Tickets::AssigneeId)
                            .to(Members::Table, Members::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create().if_not_exists()
                    .name("idx_tickets_key")
                    .table(Tickets::Table)
                    .col(Tickets::Key)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create().if_not_exists()
                    .name("idx_tickets_status")
                    .table(Tickets::Table)
                    .col(Tickets::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create().if_not_exists()
                    .table(TicketPullRequests::Table)
                    .col(pk_id_col(manager, TicketPullRequests::Id))
                    .col(fk_id_col(manager, TicketPullRequests::TicketId))
                    .col(fk_id_col(manager, TicketPullRequests::PullRequestId))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_ticket_pull_requests_ticket_id")
                            .from(TicketPullRequests::Table, TicketPullRequests::TicketId)
                            .to(Tickets::Table, Tickets::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_ticket_pull_requests_pull_request_id")
                            .from(TicketPullRequests::Table, TicketPullRequests::PullRequestId)
                            .to(PullRequests::Table, PullRequests::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create().if_not_exists()
                    .name("idx_ticket_pull_requests_pair")
                    .table(TicketPullRequests::Table)
                    .col(TicketPullRequests::TicketId)
                    .col(TicketPullRequests::PullRequestId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create().if_not_exists()
                    .table(Dependencies::Table)
                    .col(pk_id_col(manager, Dependencies::Id))
                    .col(fk_id_col(manager, Dependencies::TicketId))
                    .col(fk_id_col(manager, Dependencies::DependsOnId))
                    .col(ColumnDef::new(Dependencies::Note).string_len(255).not_null().default(Expr::val("")))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_dependencies_ticket_id")
                            .from(Dependencies::Table, Dependencies::TicketId)
                            .to(Tickets::Table, Tickets::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_dependencies_depends_on_id")
                            .from(Dependencies::Table, Dependencies::DependsOnId)
                            .to(Tickets::Table, Tickets::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create().if_not_exists()
                    .name("idx_dependencies_pair")
                    .table(Dependencies::Table)
                    .col(Dependencies::TicketId)
                    .col(Dependencies::DependsOnId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create().if_not_exists()
                    .name("idx_dependencies_depends_on_id")
                    .table(Dependencies::Table)
                    .col(Dependencies::DependsOnId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Dependencies::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(TicketPullRequests::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Tickets::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PullRequests::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Members::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Teams::Table).if_exists().to_owned())
            .await?;
        Ok(())
    }
}

fn pk_id_col<T: Iden>(manager: &SchemaManager, col: T) -> ColumnDef {
    let mut col = ColumnDef::new(col);
    match manager.get_database_backend() {
        DatabaseBackend::Sqlite => {
            col.integer();
        }
        _ => {
            col.big_integer();
        }
    }
    col.not_null().auto_increment().primary_key().to_owned()
}

fn fk_id_col<T: Iden>(manager: &SchemaManager, col: T) -> ColumnDef {
    let mut col = ColumnDef::new(col);
    match manager.get_database_backend() {
        DatabaseBackend::Sqlite => {
            col.integer();
        }
        _ => {
            col.big_integer();
        }
    }
    col.not_null().to_owned()
}

fn fk_id_nullable_col<T: Iden>(manager: &SchemaManager, col: T) -> ColumnDef {
    let mut col = ColumnDef::new(col);
    match manager.get_database_backend() {
        DatabaseBackend::Sqlite => {
            col.integer();
        }
        _ => {
            col.big_integer();
        }
    }
    col.to_owned()
}

fn timestamp_col<T: Iden>(col: T) -> ColumnDef {
    ColumnDef::new(col)
        .timestamp()
        .not_null()
        .default(Expr::current_timestamp())
        .to_owned()
}

#[derive(Iden)]
enum Teams {
    Table,
    Id,
    Name,
    Description,
    CreatedAt,
}

#[derive(Iden)]
enum Members {
    Table,
    Id,
    TeamId,
    Name,
    Email,
    Role,
    CreatedAt,
}

#[derive(Iden)]
enum PullRequests {
    Table,
    Id,
    Repo,
    Title,
    AuthorId,
    Status,
    Url,
    CreatedAt,
}

#[derive(Iden)]
enum Tickets {
    Table,
    Id,
    Key,
    Title,
    Description,
    Status,
    AssigneeId,
    Priority,
    DueDate,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum TicketPullRequests {
    Table,
    Id,
    TicketId,
    PullRequestId,
}

#[derive(Iden)]
enum Dependencies {
    Table,
    Id,
    TicketId,
    DependsOnId,
    Note,
}
