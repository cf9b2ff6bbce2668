//! Shared UI crate for MediLab. Cross-platform logic, state and views live
//! here; the launchers only add routing.

pub mod actions;
pub mod context;
pub mod core;
pub mod report;
pub mod session;
pub mod state;
pub mod timeline;
pub mod views;

pub mod components {
    pub mod app_navbar;
    pub use app_navbar::register_nav;
    pub use app_navbar::AppNavbar;
    pub use app_navbar::{nav_link, NavBuilder, NavTarget};

    pub mod toast;
    pub use toast::{Feedback, LoadingIndicator, NoticeLevel, Notifier, ToastStack};
}

pub use context::use_app_providers;
