// Single-entity lookups and per-artist listings.
impl CatalogClient {
    pub async fn get_song(&self, song_id: &str) -> Result<Song, String> {
        let song_id = song_id.trim();
        if song_id.is_empty() {
            return Err("Song id is empty".to_string());
        }
        let url = self.build_url(&format!("songs/{}", urlencoding::encode(song_id)), &[]);
        let payload: SongPayload = self.get_data(url).await?;
        payload.into_first().ok_or("Song not found".to_string())
    }

    pub async fn get_song_suggestions(&self, song_id: &str, limit: u32) -> Result<Vec<Song>, String> {
        let limit = limit.max(1).to_string();
        let url = self.build_url(
            &format!("songs/{}/suggestions", urlencoding::encode(song_id.trim())),
            &[("limit", &limit)],
        );
        self.get_data(url).await
    }

    pub async fn get_album(&self, album_id: &str) -> Result<Album, String> {
        let url = self.build_url(&format!("albums/{}", urlencoding::encode(album_id.trim())), &[]);
        self.get_data(url).await
    }

    pub async fn get_artist(&self, artist_id: &str) -> Result<Artist, String> {
        let url = self.build_url(&format!("artists/{}", urlencoding::encode(artist_id.trim())), &[]);
        self.get_data(url).await
    }

    pub async fn get_artist_songs(&self, artist_id: &str, page: u32) -> Result<SearchPage<Song>, String> {
        let page = page.max(1).to_string();
        let url = self.build_url(
            &format!("artists/{}/songs", urlencoding::encode(artist_id.trim())),
            &[("page", &page)],
        );
        self.get_data(url).await
    }

    pub async fn get_artist_albums(
        &self,
        artist_id: &str,
        page: u32,
    ) -> Result<SearchPage<Album>, String> {
        let page = page.max(1).to_string();
        let url = self.build_url(
            &format!("artists/{}/albums", urlencoding::encode(artist_id.trim())),
            &[("page", &page)],
        );
        self.get_data(url).await
    }

    pub async fn get_playlist(&self, playlist_id: &str) -> Result<Playlist, String> {
        let url = self.build_url(
            &format!("playlists/{}", urlencoding::encode(playlist_id.trim())),
            &[],
        );
        self.get_data(url).await
    }

    pub async fn get_modules(&self) -> Result<HomeModules, String> {
        let url = self.build_url("modules", &[]);
        self.get_data(url).await
    }
}
