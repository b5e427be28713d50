use serde::{Deserialize, Serialize};

/// One searchable catalog entry. The search endpoint returns these as a
/// bare JSON array; fields the upstream sometimes omits default instead
/// of failing the whole decode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub id: String,
    pub name: String,
    pub album: Album,
    #[serde(default)]
    pub artists: Vec<Artist>,
    pub duration_ms: u64,
    #[serde(default)]
    pub explicit: bool,
    #[serde(default)]
    pub popularity: u8,
    #[serde(default)]
    pub preview_url: Option<String>,
    #[serde(default)]
    pub external_urls: ExternalUrls,
}

impl Track {
    /// Track length as `m:ss`.
    pub fn duration_display(&self) -> String {
        let total_secs = self.duration_ms.div_ceil(1000);
        format!("{}:{:02}", total_secs / 60, total_secs % 60)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Album {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub images: Vec<Image>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub external_urls: ExternalUrls,
}

impl Album {
    /// Leading year of `release_date`, which the upstream reports at
    /// day, month, or year precision.
    pub fn release_year(&self) -> Option<&str> {
        let date = self.release_date.as_deref()?;
        Some(date.split('-').next().unwrap_or(date))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artist {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub external_urls: ExternalUrls,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Image {
    pub url: String,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExternalUrls {
    #[serde(default)]
    pub spotify: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track_with_duration(duration_ms: u64) -> Track {
        Track {
            id: "t1".into(),
            name: "Song".into(),
            album: Album {
                id: "a1".into(),
                name: "Album".into(),
                images: vec![],
                release_date: Some("1975-10-31".into()),
                external_urls: ExternalUrls::default(),
            },
            artists: vec![],
            duration_ms,
            explicit: false,
            popularity: 0,
            preview_url: None,
            external_urls: ExternalUrls::default(),
        }
    }

    #[test]
    fn duration_display_pads_seconds() {
        assert_eq!(track_with_duration(354_000).duration_display(), "5:54");
        assert_eq!(track_with_duration(61_000).duration_display(), "1:01");
        assert_eq!(track_with_duration(0).duration_display(), "0:00");
    }

    #[test]
    fn release_year_handles_partial_precision() {
        let track = track_with_duration(1000);
        assert_eq!(track.album.release_year(), Some("1975"));

        let mut year_only = track.clone();
        year_only.album.release_date = Some("1975".into());
        assert_eq!(year_only.album.release_year(), Some("1975"));

        let mut missing = track;
        missing.album.release_date = None;
        assert_eq!(missing.album.release_year(), None);
    }

    #[test]
    fn decodes_with_missing_optional_fields() {
        let raw = serde_json::json!({
            "id": "t9",
            "name": "Sparse",
            "album": { "id": "a9", "name": "Bare" },
            "duration_ms": 1234
        });

        let track: Track = serde_json::from_value(raw).unwrap();
        assert!(track.artists.is_empty());
        assert!(!track.explicit);
        assert_eq!(track.popularity, 0);
        assert!(track.external_urls.spotify.is_none());
    }
}
