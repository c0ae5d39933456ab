use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Origin used to rebuild a Mixcloud page from an embedded widget's `feed`.
pub const MIXCLOUD_ORIGIN: &str = "https://www.mixcloud.com";
pub const YOUTUBE_WATCH_URL: &str = "https://www.youtube.com/watch?v=";

/// How a show is published, with whatever is needed to rebuild its public
/// listen URL.  Matches the `type` field of `shows.json`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ShowKind {
    /// Audio hosted on the archive site itself.
    LocalAudio,
    /// Mixcloud widget; `embed_url` carries the feed path in its query.
    Embed { embed_url: String },
    /// YouTube embed; the video id is the last path segment.
    #[serde(rename = "youtube")]
    YouTube { embed_url: String },
}

/// One archived broadcast, as loaded from the catalog file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ShowRecord {
    pub id: String,
    pub title: String,
    pub series: String,
    pub date: NaiveDate,
    #[serde(flatten)]
    pub kind: ShowKind,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub guest: Option<String>,
    #[serde(default)]
    pub host: Option<String>,
}

impl ShowRecord {
    /// Public URL a visitor can open to listen to this show.
    ///
    /// `site_url` is the archive's public root (no trailing slash required).
    pub fn listen_url(&self, site_url: &str) -> String {
        match &self.kind {
            ShowKind::LocalAudio => format!(
                "{}/shows/{}.html",
                site_url.trim_end_matches('/'),
                self.id
            ),
            ShowKind::Embed { embed_url } => mixcloud_page(embed_url),
            ShowKind::YouTube { embed_url } => {
                let video = embed_url.trim_end_matches('/').rsplit('/').next().unwrap_or("");
                format!("{}{}", YOUTUBE_WATCH_URL, video)
            }
        }
    }

    /// Release date as shown to visitors (`YYYY-MM-DD`).
    pub fn date_label(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }

    /// Collapse blank optional fields to `None` so callers only check presence.
    pub(crate) fn normalize(&mut self) {
        for field in [&mut self.description, &mut self.guest, &mut self.host] {
            if field.as_deref().is_some_and(|s| s.trim().is_empty()) {
                *field = None;
            }
        }
        self.tags.retain(|t| !t.trim().is_empty());
    }
}

/// Rebuild the Mixcloud page URL from a widget URL's `feed` parameter,
/// falling back to the widget URL itself.
fn mixcloud_page(embed_url: &str) -> String {
    let feed = url::Url::parse(embed_url).ok().and_then(|parsed| {
        parsed
            .query_pairs()
            .find(|(key, _)| key == "feed")
            .map(|(_, value)| value.into_owned())
    });

    match feed {
        Some(path) if !path.is_empty() => format!("{}{}", MIXCLOUD_ORIGIN, path),
        _ => embed_url.to_string(),
    }
}
