//! Foundational types: accounts, transactions, batch validation, rule config.

pub mod account;
pub mod config;
pub mod transaction;
