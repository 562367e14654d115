pub mod alert_models;
pub mod user_models;
pub mod vote_models;
