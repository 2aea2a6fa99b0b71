pub mod flows;
pub mod processors;
pub mod tasks;
pub mod types;
