// chanmap CLI - mapping reconciliation against a SQLite-backed store

pub mod commands;
pub mod exit_codes;
