pub mod db;
pub mod sample;
pub mod transfer;

pub use db::models;
pub use db::{DashboardStats, GovernanceDb};
