//! Static file resolution module
//!
//! Maps request paths to filesystem entries under the configured root,
//! with index-file resolution, directory listings, and containment
//! guarantees for traversal attempts.

use crate::http::mime;
use crate::logger;
use std::path::{Component, Path, PathBuf};
use std::time::SystemTime;
use tokio::fs;

/// Outcome of resolving a request path against the root.
pub enum Resolved {
    File {
        content: Vec<u8>,
        content_type: &'static str,
        modified: Option<SystemTime>,
    },
    /// Directory requested without a trailing slash
    Redirect { location: String },
    /// Directory with no index file: generated listing
    Listing { html: String },
    NotFound,
}

/// Resolve a request path to a file, redirect, or listing under `root`.
///
/// The wire path is percent-decoded before resolution, so `/my%20file.html`
/// finds `my file.html` on disk. Decoding happens before sanitization:
/// an encoded `..` is rejected the same as a literal one.
///
/// Containment invariant: nothing outside `root` is ever read. Paths with
/// parent-directory components are rejected before any filesystem access,
/// and the final path is canonicalized and prefix-checked so symlinks
/// cannot escape either.
pub async fn resolve(root: &Path, request_path: &str, index_files: &[String]) -> Resolved {
    let decoded = percent_decode(request_path);

    let Some(relative) = sanitize_path(&decoded) else {
        logger::log_warning(&format!("Path traversal attempt blocked: {request_path}"));
        return Resolved::NotFound;
    };

    let root_canonical = match root.canonicalize() {
        Ok(p) => p,
        Err(e) => {
            logger::log_warning(&format!(
                "Serving root not found or inaccessible '{}': {e}",
                root.display()
            ));
            return Resolved::NotFound;
        }
    };

    let mut file_path = root.join(&relative);

    let Ok(meta) = fs::metadata(&file_path).await else {
        return Resolved::NotFound;
    };

    if meta.is_dir() {
        // Directory URLs need the trailing slash so relative links inside
        // the page resolve correctly. The redirect keeps the wire path
        // as the client sent it.
        if !request_path.ends_with('/') {
            return Resolved::Redirect {
                location: format!("{request_path}/"),
            };
        }

        let mut index_found = false;
        for index_file in index_files {
            let index_path = file_path.join(index_file);
            if index_path.is_file() {
                file_path = index_path;
                index_found = true;
                break;
            }
        }

        if !index_found {
            return match render_listing(&root_canonical, &file_path, &decoded).await {
                Some(html) => Resolved::Listing { html },
                None => Resolved::NotFound,
            };
        }
    } else if request_path.ends_with('/') {
        // A trailing slash names a directory; this is a regular file
        return Resolved::NotFound;
    }

    // Symlink containment: the resolved target must stay under the root
    let Ok(file_path_canonical) = file_path.canonicalize() else {
        return Resolved::NotFound;
    };
    if !file_path_canonical.starts_with(&root_canonical) {
        logger::log_warning(&format!(
            "Path escapes serving root, blocked: {} -> {}",
            request_path,
            file_path_canonical.display()
        ));
        return Resolved::NotFound;
    }

    let content = match fs::read(&file_path).await {
        Ok(c) => c,
        Err(e) => {
            logger::log_error(&format!(
                "Failed to read file '{}': {e}",
                file_path.display()
            ));
            return Resolved::NotFound;
        }
    };

    let content_type = mime::content_type_for(&file_path);
    let modified = fs::metadata(&file_path)
        .await
        .ok()
        .and_then(|m| m.modified().ok());

    Resolved::File {
        content,
        content_type,
        modified,
    }
}

/// Decode `%XX` sequences in a wire path.
///
/// Malformed sequences (bad hex digits, truncated at end of string) are
/// kept literally; decoded bytes that are not valid UTF-8 are replaced.
fn percent_decode(path: &str) -> String {
    let bytes = path.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            let hi = char::from(bytes[i + 1]).to_digit(16);
            let lo = char::from(bytes[i + 2]).to_digit(16);
            if let (Some(hi), Some(lo)) = (hi, lo) {
                #[allow(clippy::cast_possible_truncation)]
                out.push((hi * 16 + lo) as u8);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

/// Percent-encode a listing entry name for use in an `href` attribute.
///
/// Unreserved characters and the directory-suffix slash pass through;
/// everything else is encoded byte-wise.
fn percent_encode_href(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for &b in name.as_bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' | b'/' => {
                out.push(char::from(b));
            }
            _ => out.push_str(&format!("%{b:02X}")),
        }
    }
    out
}

/// Turn a decoded request path into a relative path of plain components.
///
/// Returns `None` when any component would step upwards; `.` segments and
/// empty segments are dropped.
fn sanitize_path(request_path: &str) -> Option<PathBuf> {
    let mut relative = PathBuf::new();
    for component in Path::new(request_path.trim_start_matches('/')).components() {
        match component {
            Component::Normal(part) => relative.push(part),
            Component::CurDir => {}
            // RootDir cannot appear after trim; Prefix is Windows-only
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    Some(relative)
}

/// Generate an HTML listing for a directory with no index file.
async fn render_listing(
    root_canonical: &Path,
    dir_path: &Path,
    request_path: &str,
) -> Option<String> {
    // Same containment check as for files before reading the directory
    let dir_canonical = dir_path.canonicalize().ok()?;
    if !dir_canonical.starts_with(root_canonical) {
        logger::log_warning(&format!(
            "Directory escapes serving root, blocked: {request_path}"
        ));
        return None;
    }

    let mut entries = Vec::new();
    let mut read_dir = fs::read_dir(&dir_canonical).await.ok()?;
    while let Ok(Some(entry)) = read_dir.next_entry().await {
        let mut name = entry.file_name().to_string_lossy().into_owned();
        if entry.file_type().await.is_ok_and(|t| t.is_dir()) {
            name.push('/');
        }
        entries.push(name);
    }
    entries.sort();

    let title = format!("Directory listing for {request_path}");
    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n");
    html.push_str(&format!("<title>{}</title>\n", escape_html(&title)));
    html.push_str("<meta charset=\"utf-8\">\n</head>\n<body>\n");
    html.push_str(&format!("<h1>{}</h1>\n<hr>\n<ul>\n", escape_html(&title)));
    for name in &entries {
        html.push_str(&format!(
            "<li><a href=\"{}\">{}</a></li>\n",
            percent_encode_href(name),
            escape_html(name)
        ));
    }
    html.push_str("</ul>\n<hr>\n</body>\n</html>\n");
    Some(html)
}

/// Escape text for embedding in listing HTML
fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs as std_fs;

    /// Fresh temp root per test, keyed by tag to avoid collisions
    fn temp_root(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "previewd-static-{tag}-{}",
            std::process::id()
        ));
        let _ = std_fs::remove_dir_all(&dir);
        std_fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_sanitize_plain_paths() {
        assert_eq!(
            sanitize_path("/snow-cicero/index.html"),
            Some(PathBuf::from("snow-cicero/index.html"))
        );
        assert_eq!(sanitize_path("/"), Some(PathBuf::new()));
        assert_eq!(sanitize_path("/a/./b"), Some(PathBuf::from("a/b")));
    }

    #[test]
    fn test_sanitize_rejects_traversal() {
        assert_eq!(sanitize_path("/../../etc/passwd"), None);
        assert_eq!(sanitize_path("/a/../../b"), None);
        assert_eq!(sanitize_path("/.."), None);
    }

    #[test]
    fn test_percent_decode() {
        assert_eq!(percent_decode("/my%20file.html"), "/my file.html");
        assert_eq!(percent_decode("/a%2Fb"), "/a/b");
        assert_eq!(percent_decode("/plain/path"), "/plain/path");
        // Malformed sequences stay literal
        assert_eq!(percent_decode("/50%25off"), "/50%off");
        assert_eq!(percent_decode("/bad%zz"), "/bad%zz");
        assert_eq!(percent_decode("/truncated%2"), "/truncated%2");
        assert_eq!(percent_decode("/end%"), "/end%");
    }

    #[test]
    fn test_percent_encode_href() {
        assert_eq!(percent_encode_href("my file.html"), "my%20file.html");
        assert_eq!(percent_encode_href("img/"), "img/");
        assert_eq!(percent_encode_href("a&b.txt"), "a%26b.txt");
        assert_eq!(percent_encode_href("plain.html"), "plain.html");
    }

    #[tokio::test]
    async fn test_serves_exact_file_bytes() {
        let root = temp_root("exact");
        std_fs::write(root.join("data.bin"), [0u8, 159, 146, 150]).unwrap();

        match resolve(&root, "/data.bin", &[]).await {
            Resolved::File { content, .. } => assert_eq!(content, vec![0u8, 159, 146, 150]),
            _ => panic!("expected file"),
        }
    }

    #[tokio::test]
    async fn test_percent_encoded_path_resolves_to_file() {
        let root = temp_root("encoded");
        std_fs::write(root.join("my file.html"), "<p>spaced</p>").unwrap();

        match resolve(&root, "/my%20file.html", &[]).await {
            Resolved::File {
                content,
                content_type,
                ..
            } => {
                assert_eq!(content, b"<p>spaced</p>");
                assert!(content_type.starts_with("text/html"));
            }
            _ => panic!("expected file for percent-encoded path"),
        }
    }

    #[tokio::test]
    async fn test_encoded_traversal_is_not_found() {
        let root = temp_root("enc-traversal");
        assert!(matches!(
            resolve(&root, "/%2e%2e/%2e%2e/etc/passwd", &[]).await,
            Resolved::NotFound
        ));
    }

    #[tokio::test]
    async fn test_index_resolution_for_page_directory() {
        let root = temp_root("index");
        std_fs::create_dir_all(root.join("snow-cicero")).unwrap();
        std_fs::write(
            root.join("snow-cicero/index.html"),
            "<!doctype html><html></html>",
        )
        .unwrap();

        let index_files = vec!["index.html".to_string(), "index.htm".to_string()];
        match resolve(&root, "/snow-cicero/", &index_files).await {
            Resolved::File {
                content,
                content_type,
                modified,
            } => {
                assert_eq!(content, b"<!doctype html><html></html>");
                assert!(content_type.starts_with("text/html"));
                assert!(modified.is_some());
            }
            _ => panic!("expected index file"),
        }
    }

    #[tokio::test]
    async fn test_directory_without_slash_redirects() {
        let root = temp_root("redirect");
        std_fs::create_dir_all(root.join("snow-clay")).unwrap();

        match resolve(&root, "/snow-clay", &[]).await {
            Resolved::Redirect { location } => assert_eq!(location, "/snow-clay/"),
            _ => panic!("expected redirect"),
        }
    }

    #[tokio::test]
    async fn test_file_with_trailing_slash_is_not_found() {
        let root = temp_root("file-slash");
        std_fs::write(root.join("file.txt"), "text").unwrap();

        assert!(matches!(
            resolve(&root, "/file.txt/", &[]).await,
            Resolved::NotFound
        ));
        // The file itself still resolves without the slash
        assert!(matches!(
            resolve(&root, "/file.txt", &[]).await,
            Resolved::File { .. }
        ));
    }

    #[tokio::test]
    async fn test_listing_when_no_index() {
        let root = temp_root("listing");
        std_fs::create_dir_all(root.join("assets")).unwrap();
        std_fs::write(root.join("assets/logo.png"), "png").unwrap();
        std_fs::create_dir_all(root.join("assets/img")).unwrap();

        let index_files = vec!["index.html".to_string()];
        match resolve(&root, "/assets/", &index_files).await {
            Resolved::Listing { html } => {
                assert!(html.contains("Directory listing for /assets/"));
                assert!(html.contains("logo.png"));
                assert!(html.contains("img/"));
            }
            _ => panic!("expected listing"),
        }
    }

    #[tokio::test]
    async fn test_listing_encodes_hrefs() {
        let root = temp_root("listing-enc");
        std_fs::create_dir_all(root.join("docs")).unwrap();
        std_fs::write(root.join("docs/my file.html"), "x").unwrap();

        let index_files = vec!["index.html".to_string()];
        match resolve(&root, "/docs/", &index_files).await {
            Resolved::Listing { html } => {
                assert!(html.contains("href=\"my%20file.html\""));
                // Display text keeps the readable name
                assert!(html.contains(">my file.html</a>"));
            }
            _ => panic!("expected listing"),
        }
    }

    #[tokio::test]
    async fn test_missing_path_is_not_found() {
        let root = temp_root("missing");
        assert!(matches!(
            resolve(&root, "/nope.html", &[]).await,
            Resolved::NotFound
        ));
    }

    #[tokio::test]
    async fn test_traversal_is_not_found() {
        let root = temp_root("traversal");
        assert!(matches!(
            resolve(&root, "/../../etc/passwd", &[]).await,
            Resolved::NotFound
        ));
    }

    #[tokio::test]
    async fn test_css_gets_refined_content_type() {
        let root = temp_root("css");
        std_fs::write(root.join("style.css"), "body{}").unwrap();

        match resolve(&root, "/style.css", &[]).await {
            Resolved::File { content_type, .. } => assert_eq!(content_type, "text/css"),
            _ => panic!("expected file"),
        }
    }
}
