//! Turns a pasted link into something the dashboard's player can show.

use festival_map_server_models::ApiVideo;
use regex::Regex;

/// Extensions played directly in a `<video>` element.
const MEDIA_EXTENSIONS: &[&str] = &["mp4", "m4v", "webm", "ogg", "ogv", "mov"];

/// Resolves the text of the video field.
///
/// YouTube watch, shorts, embed, live and `youtu.be` links become an
/// embeddable player; links to media files play natively; blank input
/// clears the player; anything else is offered as a plain link.
#[must_use]
pub fn resolve_video(input: &str) -> ApiVideo {
    let url = input.trim();
    if url.is_empty() {
        return ApiVideo::None;
    }

    if let Some(id) = youtube_id(url) {
        return ApiVideo::Youtube {
            embed_url: format!("https://www.youtube.com/embed/{id}"),
            id,
        };
    }

    if is_media_file(url) {
        return ApiVideo::File {
            src: url.to_string(),
        };
    }

    log::debug!("Unrecognized video link: {url}");
    ApiVideo::Link {
        url: url.to_string(),
    }
}

/// Extracts the 11-character video id from a YouTube link.
fn youtube_id(url: &str) -> Option<String> {
    let re = Regex::new(
        r"^(?:https?://)?(?:www\.|m\.|music\.)?(?:youtube\.com/(?:watch\?(?:[^#]*&)?v=|shorts/|embed/|live/|v/)|youtu\.be/)([A-Za-z0-9_-]{11})(?:[?&#/]|$)",
    )
    .unwrap_or_else(|_| unreachable!());

    re.captures(url).map(|caps| caps[1].to_string())
}

fn is_media_file(url: &str) -> bool {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    path.rsplit_once('.').is_some_and(|(stem, ext)| {
        !stem.is_empty()
            && !ext.contains('/')
            && MEDIA_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn youtube(id: &str) -> ApiVideo {
        ApiVideo::Youtube {
            id: id.to_string(),
            embed_url: format!("https://www.youtube.com/embed/{id}"),
        }
    }

    #[test]
    fn blank_input_clears_player() {
        assert_eq!(resolve_video(""), ApiVideo::None);
        assert_eq!(resolve_video("   "), ApiVideo::None);
    }

    #[test]
    fn recognizes_youtube_link_forms() {
        for url in [
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
            "https://youtube.com/watch?feature=share&v=dQw4w9WgXcQ",
            "https://m.youtube.com/watch?v=dQw4w9WgXcQ&t=42s",
            "https://youtu.be/dQw4w9WgXcQ",
            "https://youtu.be/dQw4w9WgXcQ?si=abc",
            "youtu.be/dQw4w9WgXcQ",
            "https://www.youtube.com/shorts/dQw4w9WgXcQ",
            "https://www.youtube.com/embed/dQw4w9WgXcQ",
            "https://www.youtube.com/live/dQw4w9WgXcQ",
            "  https://youtu.be/dQw4w9WgXcQ  ",
        ] {
            assert_eq!(resolve_video(url), youtube("dQw4w9WgXcQ"), "{url}");
        }
    }

    #[test]
    fn truncated_youtube_id_is_not_embedded() {
        assert!(matches!(
            resolve_video("https://youtu.be/short"),
            ApiVideo::Link { .. }
        ));
    }

    #[test]
    fn media_files_play_natively() {
        assert_eq!(
            resolve_video("https://example.com/fes/kiriko.MP4?download=1"),
            ApiVideo::File {
                src: "https://example.com/fes/kiriko.MP4?download=1".to_string()
            }
        );
        assert!(matches!(
            resolve_video("https://example.com/video.webm"),
            ApiVideo::File { .. }
        ));
    }

    #[test]
    fn other_links_are_passed_through() {
        assert_eq!(
            resolve_video("https://example.com/page.html"),
            ApiVideo::Link {
                url: "https://example.com/page.html".to_string()
            }
        );
        assert!(matches!(
            resolve_video("https://example.com.mp4/page"),
            ApiVideo::Link { .. }
        ));
    }
}
