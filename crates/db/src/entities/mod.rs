pub mod dependency;
pub mod member;
pub mod pull_request;
pub mod team;
pub mod ticket;
pub mod ticket_pull_request;
