// src/core/signature.rs

//! Generates the marker trailer appended to every stored page.

use chrono::Local;

const ENGINE_URL: &str = "https://github.com/peridotcache/peridot";
const METHOD_LABEL: &str = "Disk Cache";

/// Fixed label identifying this caching backend.
pub fn method_label() -> &'static str {
    "disk"
}

/// Human-readable HTML comment appended to stored content at store time.
/// A pure function of the current local time; nothing ever parses it back.
pub fn signature() -> String {
    format!(
        "\n\n<!-- Peridot v{} | {}\n{} @ {} -->",
        env!("CARGO_PKG_VERSION"),
        ENGINE_URL,
        METHOD_LABEL,
        Local::now().format("%d.%m.%Y %H:%M:%S"),
    )
}
