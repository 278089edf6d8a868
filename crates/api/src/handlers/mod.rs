pub mod audits;
pub mod models;
