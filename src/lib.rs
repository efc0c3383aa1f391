//! Payroll computation engine for garment-factory workers.
//!
//! This crate turns daily attendance markers into salary records: it
//! classifies absences into penalized runs and isolated days, resolves wage
//! rates from the wage-grade master, computes the five salary components
//! under each site's rule style, aggregates the two pay periods of a month
//! and plans the cash denominations needed to pay out.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
pub mod payroll;
