use serde::{Deserialize, Deserializer, Serialize};

pub const DEFAULT_STREAM_QUALITY: &str = "320kbps";
pub const DEFAULT_ARTWORK_QUALITY: &str = "500x500";
pub const DEFAULT_THUMBNAIL_QUALITY: &str = "150x150";

/// Accepts a JSON number, a numeric string, or null.
fn lenient_u32<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Number(number) => {
            if let Some(unsigned) = number.as_u64() {
                u32::try_from(unsigned).unwrap_or(u32::MAX)
            } else if let Some(float) = number.as_f64() {
                if float.is_finite() && float >= 0.0 {
                    float.round() as u32
                } else {
                    0
                }
            } else {
                0
            }
        }
        serde_json::Value::String(text) => text.trim().parse::<u32>().unwrap_or_default(),
        _ => 0,
    })
}

fn lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Bool(boolean) => boolean,
        serde_json::Value::Number(number) => number.as_u64().map(|n| n > 0).unwrap_or(false),
        serde_json::Value::String(text) => matches!(
            text.trim().to_ascii_lowercase().as_str(),
            "1" | "true" | "yes"
        ),
        _ => false,
    })
}

/// Strings that the API sometimes sends as numbers.
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(text) => text,
        serde_json::Value::Number(number) => number.to_string(),
        serde_json::Value::Bool(boolean) => boolean.to_string(),
        _ => String::new(),
    })
}

/// Cover art rendition tagged with its size label (`"50x50"`, `"500x500"`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ImageVariant {
    #[serde(default, deserialize_with = "lenient_string")]
    pub quality: String,
    #[serde(default, alias = "url", deserialize_with = "lenient_string")]
    pub link: String,
}

/// Stream rendition tagged with its bitrate label (`"96kbps"`, `"320kbps"`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct StreamVariant {
    #[serde(default, deserialize_with = "lenient_string")]
    pub quality: String,
    #[serde(default, alias = "url", deserialize_with = "lenient_string")]
    pub link: String,
}

pub trait Variant {
    fn quality(&self) -> &str;
    fn link(&self) -> &str;
}

impl Variant for ImageVariant {
    fn quality(&self) -> &str {
        &self.quality
    }
    fn link(&self) -> &str {
        &self.link
    }
}

impl Variant for StreamVariant {
    fn quality(&self) -> &str {
        &self.quality
    }
    fn link(&self) -> &str {
        &self.link
    }
}

/// Preferred-quality lookup falling back to the first variant.
pub fn pick_variant<'a, V: Variant>(variants: &'a [V], preferred: &str) -> Option<&'a str> {
    let chosen = variants
        .iter()
        .find(|variant| variant.quality() == preferred)
        .or_else(|| variants.first())?;
    let link = chosen.link().trim();
    if link.is_empty() {
        None
    } else {
        Some(link)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct AlbumRef {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Song {
    pub id: String,
    #[serde(default, alias = "title", deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default)]
    pub album: AlbumRef,
    #[serde(default, deserialize_with = "lenient_string")]
    pub year: String,
    #[serde(default, alias = "releaseDate")]
    pub release_date: Option<String>,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub duration: u32,
    #[serde(default, deserialize_with = "lenient_string")]
    pub label: String,
    #[serde(default, alias = "primaryArtists", deserialize_with = "lenient_string")]
    pub primary_artists: String,
    #[serde(default, alias = "primaryArtistsId", deserialize_with = "lenient_string")]
    pub primary_artists_id: String,
    #[serde(default, alias = "featuredArtists", deserialize_with = "lenient_string")]
    pub featured_artists: String,
    #[serde(default, alias = "explicitContent", deserialize_with = "lenient_u32")]
    pub explicit_content: u32,
    #[serde(default, alias = "playCount", deserialize_with = "lenient_u32")]
    pub play_count: u32,
    #[serde(default, deserialize_with = "lenient_string")]
    pub language: String,
    #[serde(default, alias = "hasLyrics", deserialize_with = "lenient_bool")]
    pub has_lyrics: bool,
    #[serde(default, deserialize_with = "lenient_string")]
    pub url: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub copyright: String,
    #[serde(default)]
    pub image: Vec<ImageVariant>,
    #[serde(default, alias = "downloadUrl")]
    pub download_url: Vec<StreamVariant>,
}

impl Song {
    pub fn stream_url(&self, preferred_quality: &str) -> Option<&str> {
        pick_variant(&self.download_url, preferred_quality)
    }

    pub fn image_url(&self, preferred_quality: &str) -> Option<&str> {
        pick_variant(&self.image, preferred_quality)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct AlbumArtist {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub url: String,
    #[serde(default)]
    pub image: Vec<ImageVariant>,
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub role: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Album {
    pub id: String,
    #[serde(default, alias = "title", deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub year: String,
    #[serde(default, alias = "releaseDate")]
    pub release_date: Option<String>,
    #[serde(default, alias = "songCount", deserialize_with = "lenient_u32")]
    pub song_count: u32,
    #[serde(default, deserialize_with = "lenient_string")]
    pub url: String,
    #[serde(default, alias = "primaryArtistsId", deserialize_with = "lenient_string")]
    pub primary_artists_id: String,
    #[serde(default, alias = "primaryArtists", deserialize_with = "lenient_string")]
    pub primary_artists: String,
    #[serde(default, alias = "featuredArtists", deserialize_with = "lenient_string")]
    pub featured_artists: String,
    #[serde(default)]
    pub artists: Vec<AlbumArtist>,
    #[serde(default)]
    pub image: Vec<ImageVariant>,
    #[serde(default)]
    pub songs: Vec<Song>,
}

impl Album {
    pub fn image_url(&self, preferred_quality: &str) -> Option<&str> {
        pick_variant(&self.image, preferred_quality)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Artist {
    pub id: String,
    #[serde(default, alias = "title", deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub url: String,
    #[serde(default)]
    pub image: Vec<ImageVariant>,
    #[serde(default, alias = "followerCount", deserialize_with = "lenient_u32")]
    pub follower_count: u32,
    #[serde(default, alias = "fanCount", deserialize_with = "lenient_u32")]
    pub fan_count: u32,
    #[serde(default, alias = "isVerified", deserialize_with = "lenient_bool")]
    pub is_verified: bool,
    #[serde(default, alias = "dominantLanguage", deserialize_with = "lenient_string")]
    pub dominant_language: String,
    #[serde(default, alias = "dominantType", deserialize_with = "lenient_string")]
    pub dominant_type: String,
    #[serde(default, alias = "topSongs")]
    pub top_songs: Vec<Song>,
    #[serde(default, alias = "topAlbums")]
    pub top_albums: Vec<Album>,
}

impl Artist {
    pub fn image_url(&self, preferred_quality: &str) -> Option<&str> {
        pick_variant(&self.image, preferred_quality)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Playlist {
    pub id: String,
    #[serde(default, alias = "userId", deserialize_with = "lenient_string")]
    pub user_id: String,
    #[serde(default, alias = "title", deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default, alias = "followerCount", deserialize_with = "lenient_u32")]
    pub follower_count: u32,
    #[serde(default, alias = "songCount", deserialize_with = "lenient_u32")]
    pub song_count: u32,
    #[serde(default, alias = "fanCount", deserialize_with = "lenient_u32")]
    pub fan_count: u32,
    #[serde(default, deserialize_with = "lenient_string")]
    pub username: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub firstname: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub lastname: String,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub shares: u32,
    #[serde(default)]
    pub image: Vec<ImageVariant>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub url: String,
    #[serde(default)]
    pub songs: Vec<Song>,
}

/// One page of a search or listing endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchPage<T> {
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub total: u32,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub start: u32,
}

impl<T> Default for SearchPage<T> {
    fn default() -> Self {
        Self {
            results: Vec::new(),
            total: 0,
            start: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchSection<T> {
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
}

impl<T> Default for SearchSection<T> {
    fn default() -> Self {
        Self {
            results: Vec::new(),
        }
    }
}

/// Lightweight hit returned by the combined search endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SearchHit {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: String,
    #[serde(default, alias = "name", deserialize_with = "lenient_string")]
    pub title: String,
    #[serde(default)]
    pub image: Vec<ImageVariant>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub url: String,
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SearchAll {
    #[serde(default, alias = "topQuery")]
    pub top_query: SearchSection<SearchHit>,
    #[serde(default)]
    pub songs: SearchSection<SearchHit>,
    #[serde(default)]
    pub albums: SearchSection<SearchHit>,
    #[serde(default)]
    pub artists: SearchSection<SearchHit>,
    #[serde(default)]
    pub playlists: SearchSection<SearchHit>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Trending {
    #[serde(default)]
    pub songs: Vec<Song>,
    #[serde(default)]
    pub albums: Vec<Album>,
}

/// Home page modules (`/api/modules`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct HomeModules {
    #[serde(default)]
    pub albums: Vec<Album>,
    #[serde(default)]
    pub playlists: Vec<Playlist>,
    #[serde(default)]
    pub charts: Vec<Playlist>,
    #[serde(default)]
    pub trending: Trending,
}

pub fn format_duration(seconds: u32) -> String {
    let mins = seconds / 60;
    let secs = seconds % 60;
    format!("{}:{:02}", mins, secs)
}
