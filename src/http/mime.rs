//! MIME type detection module
//!
//! Returns the corresponding Content-Type based on file extension.
//! Detection runs in two stages: a generic extension table, then a
//! refinement step that corrects stylesheet and script assets the
//! generic table files under plain text.

/// Get the generic MIME guess based on file extension.
///
/// Source-ish text extensions (including `css` and `js`) land in the
/// plain-text bucket here; [`refine_content_type`] corrects the two
/// that browsers are strict about.
pub fn generic_content_type(extension: Option<&str>) -> &'static str {
    match extension {
        // Text
        Some("html" | "htm") => "text/html; charset=utf-8",
        Some("xml") => "application/xml",
        Some("txt" | "md" | "css" | "js" | "mjs") => "text/plain",

        // Data/WASM
        Some("json") => "application/json",
        Some("wasm") => "application/wasm",

        // Images
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("ico") => "image/x-icon",
        Some("webp") => "image/webp",

        // Video/Audio
        Some("mp4") => "video/mp4",
        Some("webm") => "video/webm",
        Some("mp3") => "audio/mpeg",
        Some("wav") => "audio/wav",

        // Fonts
        Some("woff") => "font/woff",
        Some("woff2") => "font/woff2",
        Some("ttf") => "font/ttf",
        Some("otf") => "font/otf",

        // Documents
        Some("pdf") => "application/pdf",
        Some("zip") => "application/zip",
        Some("gz" | "gzip") => "application/gzip",

        // Default
        _ => "application/octet-stream",
    }
}

/// Correct a plain-text guess for stylesheet and script assets.
///
/// Only fires when the generic guess is exactly `text/plain`; every other
/// guess passes through unchanged. Suffix matching is case-insensitive,
/// like the extension lookup.
pub fn refine_content_type(path: &str, guessed: &'static str) -> &'static str {
    if guessed != "text/plain" {
        return guessed;
    }
    let lowered = path.to_ascii_lowercase();
    if lowered.ends_with(".css") {
        "text/css"
    } else if lowered.ends_with(".js") {
        "application/javascript"
    } else {
        guessed
    }
}

/// Full two-stage Content-Type lookup for a filesystem path.
///
/// Extensions are lowercased before the table lookup, so `LOGO.PNG` and
/// `logo.png` classify the same.
pub fn content_type_for(path: &std::path::Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    let guessed = generic_content_type(extension.as_deref());
    refine_content_type(&path.to_string_lossy(), guessed)
}
