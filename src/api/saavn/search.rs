// Free-text search endpoints.
impl CatalogClient {
    pub async fn search_all(&self, query: &str) -> Result<SearchAll, String> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(SearchAll::default());
        }
        let url = self.build_url("search/all", &[("query", query)]);
        self.get_data(url).await
    }

    pub async fn search_songs(&self, query: &str, page: u32) -> Result<SearchPage<Song>, String> {
        self.search_page("search/songs", query, page).await
    }

    pub async fn search_albums(&self, query: &str, page: u32) -> Result<SearchPage<Album>, String> {
        self.search_page("search/albums", query, page).await
    }

    pub async fn search_artists(
        &self,
        query: &str,
        page: u32,
    ) -> Result<SearchPage<Artist>, String> {
        self.search_page("search/artists", query, page).await
    }

    pub async fn search_playlists(
        &self,
        query: &str,
        page: u32,
    ) -> Result<SearchPage<Playlist>, String> {
        self.search_page("search/playlists", query, page).await
    }

    async fn search_page<T>(&self, path: &str, query: &str, page: u32) -> Result<SearchPage<T>, String>
    where
        T: DeserializeOwned + Serialize,
    {
        let query = query.trim();
        if query.is_empty() {
            return Ok(SearchPage::default());
        }
        let page = page.max(1).to_string();
        let url = self.build_url(path, &[("query", query), ("page", &page)]);
        self.get_data(url).await
    }
}
