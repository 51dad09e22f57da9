//! Domain model for ChatVault

pub mod entities;
