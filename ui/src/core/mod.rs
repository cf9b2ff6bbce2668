//! Platform-agnostic plumbing shared by every feature module.

pub mod config;
pub mod format;
pub mod storage;
pub mod timing;
