pub mod database;
pub mod export;
pub mod selection;
pub mod table;
