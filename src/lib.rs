pub mod args;
pub mod catalog;
pub mod date;
pub mod error;
pub mod es;
pub mod purge;
pub mod sink;
