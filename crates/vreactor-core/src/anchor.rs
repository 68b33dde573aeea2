#![forbid(unsafe_code)]

//! In-page anchor scrolling.

/// Fragment id of an in-page link, or `None` for `#`, empty and
/// non-fragment hrefs (those keep default navigation).
///
/// ```
/// use vreactor_core::anchor::fragment_of;
///
/// assert_eq!(fragment_of("#pricing"), Some("pricing"));
/// assert_eq!(fragment_of("#"), None);
/// assert_eq!(fragment_of("/about"), None);
/// ```
#[must_use]
pub fn fragment_of(href: &str) -> Option<&str> {
    href.strip_prefix('#').filter(|id| !id.is_empty())
}

/// Document offset to scroll to so the target's top edge lands just below
/// a fixed header of `header_offset` px.
#[must_use]
pub fn scroll_target_top(target_client_top: f64, scroll_y: f64, header_offset: f64) -> f64 {
    target_client_top + scroll_y - header_offset
}
