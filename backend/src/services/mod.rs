pub mod businesses;
pub mod health;
