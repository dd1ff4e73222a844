//! Bank onboarding service — role-based onboarding programs, task tracking,
//! and progress analytics.

pub mod config;
pub mod error;
pub mod onboarding;
