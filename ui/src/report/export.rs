//! PDF report download.

use api::{ApiError, Backend, ReportKind, ResultSet};

pub const NOTHING_TO_EXPORT: &str = "Analyze a report first.";
pub const LOGIN_TO_EXPORT: &str = "Please log in to export reports.";

#[derive(Debug, Clone, PartialEq)]
pub struct ExportRequest {
    pub kind: ReportKind,
    pub token: Option<String>,
    pub results: ResultSet,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExportedReport {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl ExportRequest {
    pub async fn fetch(&self, backend: &dyn Backend) -> Result<ExportedReport, ApiError> {
        let bytes = backend
            .generate_pdf(self.token.as_deref(), self.kind, &self.results)
            .await?;
        Ok(ExportedReport {
            file_name: self.kind.file_name(),
            bytes,
        })
    }
}

/// Hands the document to the user: a browser download on the web, a file in
/// the exports directory on desktop (whose path is returned).
pub async fn deliver(report: ExportedReport, kind: ReportKind) -> Result<Option<String>, ApiError> {
    download_bytes(&report.file_name, "application/pdf", report.bytes)
        .await
        .map_err(|err| {
            dioxus::logger::tracing::error!("download of {} failed: {err}", report.file_name);
            ApiError::Export(format!("Error generating {} report.", kind.as_str()))
        })
}

async fn download_bytes(
    filename: &str,
    mime: &str,
    bytes: Vec<u8>,
) -> Result<Option<String>, String> {
    #[cfg(target_arch = "wasm32")]
    {
        use wasm_bindgen::JsCast;
        use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, Url};

        let array = js_sys::Uint8Array::from(bytes.as_slice());
        let parts = js_sys::Array::new();
        parts.push(&array.buffer());

        let opts = BlobPropertyBag::new();
        opts.set_type(mime);
        let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &opts)
            .map_err(|_| "Failed to create blob".to_string())?;
        let url = Url::create_object_url_with_blob(&blob)
            .map_err(|_| "Unable to create download".to_string())?;

        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or("Document unavailable")?;
        let anchor: HtmlAnchorElement = document
            .create_element("a")
            .map_err(|_| "Unable to create anchor")?
            .dyn_into()
            .map_err(|_| "Anchor cast failed")?;
        anchor.set_href(&url);
        anchor.set_download(filename);
        anchor.style().set_property("display", "none").ok();

        document
            .body()
            .ok_or("Missing body")?
            .append_child(&anchor)
            .ok();
        anchor.click();
        anchor.remove();
        Url::revoke_object_url(&url).ok();

        Ok(None)
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = mime;
        let dir = desktop_export_dir()?;
        std::fs::create_dir_all(&dir).map_err(|err| err.to_string())?;
        let path = dir.join(filename);
        std::fs::write(&path, &bytes).map_err(|err| err.to_string())?;
        Ok(Some(path.to_string_lossy().to_string()))
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn desktop_export_dir() -> Result<std::path::PathBuf, String> {
    let dirs = directories::ProjectDirs::from("com", "MediLab", "MediLab")
        .ok_or("Unable to determine export directory")?;
    Ok(dirs.data_dir().join("exports"))
}
