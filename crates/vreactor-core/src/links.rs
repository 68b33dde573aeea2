#![forbid(unsafe_code)]

//! Link decoration: external-link hardening and active nav highlighting.

/// `rel` value applied to external links.
pub const EXTERNAL_REL: &str = "noopener noreferrer";
/// `target` value applied to external links.
pub const EXTERNAL_TARGET: &str = "_blank";

/// Whether a link to `link_host` leaves the site served from `page_host`.
///
/// The page host and its subdomains count as internal. An empty page host
/// (a `file://` page) treats every link as internal.
#[must_use]
pub fn is_external(link_host: &str, page_host: &str) -> bool {
    if page_host.is_empty() {
        return false;
    }
    let link_host = link_host.to_ascii_lowercase();
    let page_host = page_host.to_ascii_lowercase();
    if link_host == page_host {
        return false;
    }
    let suffix = format!(".{page_host}");
    !link_host.ends_with(&suffix)
}

/// Whether a nav link's `href` points at the page at `current_path`.
///
/// Compares last path segments, treating an empty segment as
/// `index.html`, and lets `./` or `index.html` match a directory path.
#[must_use]
pub fn is_active_link(current_path: &str, link_href: &str) -> bool {
    let current_page = match last_segment(current_path) {
        "" => "index.html",
        page => page,
    };
    let link_page = last_segment(link_href);
    let links_home = link_href == "./" || link_href == "index.html";

    link_page == current_page
        || (current_page == "index.html" && links_home)
        || (current_path.ends_with('/') && links_home)
}

fn last_segment(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or("")
}
