//! YouTube URL parsing.

use once_cell::sync::Lazy;
use regex::Regex;

static PATTERNS: Lazy<[Regex; 2]> = Lazy::new(|| {
    [
        Regex::new(r"(?:youtube\.com/watch\?v=|youtu\.be/)([^&\n?#]+)")
            .expect("valid watch/short-link pattern"),
        Regex::new(r"youtube\.com/embed/([^&\n?#]+)").expect("valid embed pattern"),
    ]
});

/// Extract the video id from a YouTube URL.
///
/// Handles `watch?v=`, `youtu.be/`, and `/embed/` forms; anything else is
/// `None`.
pub fn video_id(url: &str) -> Option<String> {
    PATTERNS
        .iter()
        .find_map(|re| re.captures(url).and_then(|c| c.get(1)).map(|m| m.as_str().to_string()))
        .filter(|id| !id.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn watch_url() {
        assert_eq!(
            video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ").as_deref(),
            Some("dQw4w9WgXcQ")
        );
    }

    #[test]
    fn watch_url_with_extra_params() {
        assert_eq!(
            video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=42s").as_deref(),
            Some("dQw4w9WgXcQ")
        );
    }

    #[test]
    fn short_link() {
        assert_eq!(video_id("https://youtu.be/dQw4w9WgXcQ").as_deref(), Some("dQw4w9WgXcQ"));
    }

    #[test]
    fn embed_url() {
        assert_eq!(
            video_id("https://www.youtube.com/embed/dQw4w9WgXcQ").as_deref(),
            Some("dQw4w9WgXcQ")
        );
    }

    #[test]
    fn unrelated_url_is_rejected() {
        assert!(video_id("https://example.com/watch?v=nope").is_none());
        assert!(video_id("not a url at all").is_none());
    }
}
