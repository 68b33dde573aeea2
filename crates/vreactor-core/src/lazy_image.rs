#![forbid(unsafe_code)]

//! Fade-in for natively lazy-loaded images.

/// Transition applied to every lazy image.
pub const FADE_TRANSITION: &str = "opacity 0.5s ease";

/// Initial inline styles: transparent unless already decoded.
#[must_use]
pub fn initial_styles(complete: bool) -> [(&'static str, &'static str); 2] {
    [
        ("opacity", if complete { "1" } else { "0" }),
        ("transition", FADE_TRANSITION),
    ]
}

/// Style applied once the image has loaded.
pub const LOADED_STYLE: (&str, &str) = ("opacity", "1");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_images_start_transparent() {
        assert_eq!(initial_styles(false)[0], ("opacity", "0"));
        assert_eq!(initial_styles(true)[0], ("opacity", "1"));
        assert_eq!(initial_styles(false)[1].1, FADE_TRANSITION);
    }
}
