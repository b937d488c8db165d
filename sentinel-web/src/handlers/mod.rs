pub mod analysis;
pub mod health;
pub mod page;
