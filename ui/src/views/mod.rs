mod analyze;
pub use analyze::Analyze;

mod home;
pub use home::Home;

mod timeline;
pub use timeline::Timeline;
