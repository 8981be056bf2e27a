// Response envelope types shared by every catalog endpoint.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default = "Option::default")]
    pub data: Option<T>,
}

/// Song lookups answer with either one song or a list of songs.
#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SongPayload {
    Many(Vec<Song>),
    One(Box<Song>),
}

impl SongPayload {
    pub fn into_first(self) -> Option<Song> {
        match self {
            Self::Many(songs) => songs.into_iter().next(),
            Self::One(song) => Some(*song),
        }
    }
}

pub fn parse_envelope<T>(body: &str) -> Result<T, String>
where
    T: DeserializeOwned,
{
    let envelope: Envelope<T> = serde_json::from_str(body).map_err(|e| e.to_string())?;
    match envelope.data {
        Some(data) => Ok(data),
        None => Err(envelope
            .message
            .or(envelope.status)
            .unwrap_or("Missing data".to_string())),
    }
}
