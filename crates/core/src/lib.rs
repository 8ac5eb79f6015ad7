//! Core business logic for SleepDash.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, display mappings, and calculations live here.
//!
//! # Modules
//!
//! - `auth` - Operator accounts and password hashing
//! - `dashboard` - Headline stats, fallback snapshot, activity feed
//! - `users` - App users, subscription tiers, filters, and analytics
//! - `sounds` - Sound library and filters
//! - `gift_codes` - Gift code issuance and redemption stats
//! - `fixtures` - Seeded, reproducible mock data

pub mod auth;
pub mod dashboard;
pub mod fixtures;
pub mod gift_codes;
pub mod sounds;
pub mod users;
mod raw;
