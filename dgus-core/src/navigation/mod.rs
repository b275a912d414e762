//! Page navigation
//!
//! Tracks which page the panel shows, where "back" leads and where a
//! multi-step flow resumes once it is saved.

pub mod pages;

pub use pages::{NavigationError, Pages, ShowOptions, MAX_BACK_PAGES};
