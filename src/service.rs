use crate::{
    data::{Channel, PlaylistItemsPage, PlaylistSummary, VideoPart, VideoRecord},
    error::Result,
};

/// The remote operations the queries are built from.
///
/// `YouTubeClient` talks to the real API; tests swap in an in-memory double.
pub trait VideoService {
    /// Channels owned by a legacy username. Usually zero or one.
    async fn list_channel(&self, for_username: &str) -> Result<Vec<Channel>>;

    /// Every playlist of a channel, in the order the service lists them.
    async fn list_playlists(&self, channel_id: &str) -> Result<Vec<PlaylistSummary>>;

    async fn list_playlist_items(
        &self,
        playlist_id: &str,
        page_token: Option<String>,
        max_results: u32,
    ) -> Result<PlaylistItemsPage>;

    async fn list_videos(&self, ids: &[String], part: VideoPart) -> Result<Vec<VideoRecord>>;
}
