//! Uploading lab reports, analysing them and exporting the results.

mod analysis;
pub use analysis::*;

mod export;
pub use export::{deliver, ExportRequest, ExportedReport, LOGIN_TO_EXPORT, NOTHING_TO_EXPORT};

mod staging;
pub use staging::*;

mod summary;
pub use summary::{summarize, Summary};

mod table;
pub use table::ResultsPanel;

mod upload;
pub use upload::UploadPanel;
