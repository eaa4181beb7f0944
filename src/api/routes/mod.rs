pub mod execute;
pub mod health;
pub mod history;
pub mod status;
