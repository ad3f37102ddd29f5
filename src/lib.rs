pub mod auth;
pub mod batch;
pub mod calendar;
pub mod cli;
pub mod config;
pub mod datetime;
pub mod error;
pub mod startup;
