//! Presentation rules for posts: page titles, download quality choices and
//! the back-office download summaries.

use serde::Serialize;

/// Title shown in the browser/page head: the SEO title when set, otherwise
/// the post title.
pub fn page_title<'a>(seo_title: Option<&'a str>, title: &'a str) -> &'a str {
    match seo_title {
        Some(seo) if !seo.trim().is_empty() => seo,
        _ => title,
    }
}

// ---------------------------------------------------------------------------
// Download quality choices
// ---------------------------------------------------------------------------

/// Fixed (non-episode) quality codes and their button labels, in display order.
const FIXED_QUALITIES: &[(&str, &str)] = &[
    ("360p", "DOWNLOAD MOVIE [360p]"),
    ("mp3", "DOWNLOAD MUSIC/MP3"),
    ("ZIP", "DOWNLOAD FULL ALBUM [ZIP]"),
    ("480p", "DOWNLOAD MOVIE [480p]"),
    ("720p", "DOWNLOAD MOVIE [720p (HD)]"),
    ("1080p", "DOWNLOAD MOVIE 1080p (FHD)]"),
    ("4K", "DOWNLOAD [4K (UHD)]"),
];

/// Episode codes run from `EP1` to `EP{MAX_EPISODE}`.
pub const MAX_EPISODE: u32 = 40;

/// A selectable download quality.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QualityChoice {
    pub code: String,
    pub label: String,
}

/// Button label for a quality code, or `None` when the code is not a valid
/// choice. Codes are case-sensitive (`ZIP`, `4K`, `mp3`).
pub fn quality_label(code: &str) -> Option<String> {
    if let Some((_, label)) = FIXED_QUALITIES.iter().find(|(c, _)| *c == code) {
        return Some((*label).to_string());
    }
    let episode: u32 = code.strip_prefix("EP")?.parse().ok()?;
    if (1..=MAX_EPISODE).contains(&episode) && code == format!("EP{episode}") {
        Some(format!("DOWNLOAD EPISODE {episode}"))
    } else {
        None
    }
}

/// All quality choices in display order.
pub fn quality_choices() -> Vec<QualityChoice> {
    let fixed = FIXED_QUALITIES.iter().map(|(code, label)| QualityChoice {
        code: (*code).to_string(),
        label: (*label).to_string(),
    });
    let episodes = (1..=MAX_EPISODE).map(|n| QualityChoice {
        code: format!("EP{n}"),
        label: format!("DOWNLOAD EPISODE {n}"),
    });
    fixed.chain(episodes).collect()
}

// ---------------------------------------------------------------------------
// Back-office summaries
// ---------------------------------------------------------------------------

/// Summed download counters for a post.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TotalDownloads {
    pub video: i64,
    pub subtitles: i64,
}

/// Sum quality and subtitle download counters.
pub fn total_downloads(quality_counts: &[i32], subtitle_counts: &[i32]) -> TotalDownloads {
    TotalDownloads {
        video: quality_counts.iter().map(|&c| i64::from(c)).sum(),
        subtitles: subtitle_counts.iter().map(|&c| i64::from(c)).sum(),
    }
}

/// What the public download section of a post will show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DownloadsPreview {
    Hidden {
        message: String,
    },
    Visible {
        will_display: String,
        qualities: String,
        subtitles: String,
    },
}

/// Build the live download-section preview shown on the post edit screen.
pub fn downloads_preview(
    enabled: bool,
    section_title: &str,
    quality_count: i64,
    subtitle_count: i64,
) -> DownloadsPreview {
    if !enabled {
        return DownloadsPreview::Hidden {
            message: "Download section will be hidden".to_string(),
        };
    }
    let describe = |n: i64| {
        if n == 0 {
            "None added".to_string()
        } else {
            n.to_string()
        }
    };
    DownloadsPreview::Visible {
        will_display: section_title.to_string(),
        qualities: describe(quality_count),
        subtitles: describe(subtitle_count),
    }
}
