pub mod aggregate;
pub mod dependencies;
pub mod health;
pub mod members;
pub mod pull_requests;
pub mod reports;
pub mod teams;
pub mod tickets;
