pub mod config;
pub mod csv_io;
pub mod date_utils;
pub mod db;
pub mod error;
pub mod fetch;
pub mod logging;
pub mod report;
