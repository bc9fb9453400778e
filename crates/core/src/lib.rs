//! Core business logic for Midyear.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `allocation` - Allocation balance and percentage-cap validation
//! - `report` - Report lifecycle, call-type templates and submission rules
//! - `period` - Half-year reporting periods
//! - `financial` - Funds available, spent and remaining

pub mod allocation;
pub mod financial;
pub mod period;
pub mod report;
