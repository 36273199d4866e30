use crate::{
    data::{Channel, PlaylistItemsPage, PlaylistSummary, VideoPart, VideoRecord},
    error::{Error, Result},
    paginate,
    service::VideoService,
};
use json::JsonValue;
use reqwest::Client;
use tracing::debug;

pub const YOUTUBE_API_BASE: &str = "https://www.googleapis.com/youtube/v3";

/// Playlists are listed in pages of this size.
const PLAYLIST_PAGE_SIZE: u32 = 50;

/// How requests identify themselves to the API.
#[derive(Debug, Clone)]
pub enum Auth {
    /// A developer key, sent as the `key` query parameter. Public data only.
    ApiKey(String),
    /// An OAuth access token, sent as a bearer header.
    Bearer(String),
}

pub struct YouTubeClient {
    client: Client,
    base_url: String,
    auth: Auth,
}

impl YouTubeClient {
    pub fn new(auth: Auth) -> Self {
        YouTubeClient {
            client: Client::new(),
            base_url: YOUTUBE_API_BASE.to_owned(),
            auth,
        }
    }

    async fn get(&self, resource: &str, params: &[(&str, String)]) -> Result<JsonValue> {
        debug!(resource, ?params, "GET");
        let request = self
            .client
            .get(&format!("{}/{}", self.base_url, resource))
            .query(params);
        let request = match &self.auth {
            Auth::ApiKey(key) => request.query(&[("key", key)]),
            Auth::Bearer(token) => request.bearer_auth(token),
        };

        let rsp = request.send().await?;
        let status = rsp.status();
        let body = rsp.text().await?;
        if !status.is_success() {
            return Err(api_error(status.as_u16(), &body));
        }
        Ok(json::parse(&body)?)
    }

    /// One unprocessed `playlistItems` page.
    pub async fn playlist_items_raw(&self, playlist_id: &str, part: &str) -> Result<JsonValue> {
        self.get(
            "playlistItems",
            &[("part", part.to_owned()), ("playlistId", playlist_id.to_owned())],
        )
        .await
    }
}

impl VideoService for YouTubeClient {
    async fn list_channel(&self, for_username: &str) -> Result<Vec<Channel>> {
        let body = self
            .get(
                "channels",
                &[
                    ("part", "contentDetails,statistics".to_owned()),
                    ("forUsername", for_username.to_owned()),
                ],
            )
            .await?;
        Ok(parse_channels(&body))
    }

    async fn list_playlists(&self, channel_id: &str) -> Result<Vec<PlaylistSummary>> {
        paginate::collect(
            move |token| async move {
                let mut params = vec![
                    ("part", "snippet".to_owned()),
                    ("channelId", channel_id.to_owned()),
                    ("maxResults", PLAYLIST_PAGE_SIZE.to_string()),
                ];
                if let Some(token) = token {
                    params.push(("pageToken", token));
                }
                let body = self.get("playlists", &params).await?;
                Ok::<_, Error>(parse_playlists(&body))
            },
            paginate::DEFAULT_MAX_PAGES,
        )
        .await
    }

    async fn list_playlist_items(
        &self,
        playlist_id: &str,
        page_token: Option<String>,
        max_results: u32,
    ) -> Result<PlaylistItemsPage> {
        let mut params = vec![
            ("part", "contentDetails".to_owned()),
            ("playlistId", playlist_id.to_owned()),
            ("maxResults", max_results.to_string()),
        ];
        if let Some(token) = page_token {
            params.push(("pageToken", token));
        }
        let body = self.get("playlistItems", &params).await?;
        Ok(parse_playlist_items(&body))
    }

    async fn list_videos(&self, ids: &[String], part: VideoPart) -> Result<Vec<VideoRecord>> {
        let body = self
            .get(
                "videos",
                &[("part", part.as_str().to_owned()), ("id", ids.join(","))],
            )
            .await?;
        Ok(parse_videos(&body, part))
    }
}

fn string_at(value: &JsonValue) -> Option<String> {
    value.as_str().map(str::to_owned)
}

fn next_page_token(body: &JsonValue) -> Option<String> {
    string_at(&body["nextPageToken"]).filter(|token| !token.is_empty())
}

pub fn parse_channels(body: &JsonValue) -> Vec<Channel> {
    body["items"]
        .members()
        .filter_map(|item| string_at(&item["id"]))
        .map(|id| Channel { id })
        .collect()
}

pub fn parse_playlists(body: &JsonValue) -> (Vec<PlaylistSummary>, Option<String>) {
    let playlists = body["items"]
        .members()
        .filter_map(|item| {
            let id = string_at(&item["id"])?;
            let title = string_at(&item["snippet"]["title"]).unwrap_or_default();
            Some(PlaylistSummary::new(id, title))
        })
        .collect();
    (playlists, next_page_token(body))
}

pub fn parse_playlist_items(body: &JsonValue) -> PlaylistItemsPage {
    PlaylistItemsPage {
        video_ids: body["items"]
            .members()
            .filter_map(|item| string_at(&item["contentDetails"]["videoId"]))
            .collect(),
        next_page_token: next_page_token(body),
    }
}

pub fn parse_videos(body: &JsonValue, part: VideoPart) -> Vec<VideoRecord> {
    body["items"]
        .members()
        .map(|item| {
            let record = VideoRecord::new(string_at(&item["id"]).unwrap_or_default());
            match part {
                VideoPart::ContentDetails => match string_at(&item["contentDetails"]["duration"]) {
                    Some(duration) => record.with_duration(duration),
                    None => record,
                },
                VideoPart::Snippet => match string_at(&item["snippet"]["title"]) {
                    Some(title) => record.with_title(title),
                    None => record,
                },
                // viewCount is a decimal string, and absent when the owner hides it
                VideoPart::Statistics => match item["statistics"]["viewCount"]
                    .as_str()
                    .and_then(|count| count.parse::<u64>().ok())
                {
                    Some(views) => record.with_view_count(views),
                    None => record,
                },
            }
        })
        .collect()
}

/// Builds an `Error::Api` from a failed response, preferring the message the
/// API put in its error body.
pub fn api_error(status: u16, body: &str) -> Error {
    let message = json::parse(body)
        .ok()
        .and_then(|value| string_at(&value["error"]["message"]))
        .unwrap_or_else(|| body.trim().to_owned());
    Error::Api { status, message }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_channels() {
        let body = json::parse(r#"{"items": [{"id": "abc123"}]}"#).unwrap();
        assert_eq!(
            parse_channels(&body),
            vec![Channel {
                id: "abc123".to_owned()
            }]
        );
    }

    #[test]
    fn test_parse_channels_without_items() {
        let body = json::parse(r#"{"kind": "youtube#channelListResponse"}"#).unwrap();
        assert!(parse_channels(&body).is_empty());
    }

    #[test]
    fn test_parse_playlists() {
        let body = json::parse(
            r#"{
                "nextPageToken": "CAUQAA",
                "items": [
                    {"id": "pl123", "snippet": {"title": "MyPlaylist"}},
                    {"id": "pl456", "snippet": {"title": "Other"}}
                ]
            }"#,
        )
        .unwrap();

        let (playlists, token) = parse_playlists(&body);
        assert_eq!(playlists.len(), 2);
        assert_eq!(playlists[0], PlaylistSummary::new("pl123".into(), "MyPlaylist".into()));
        assert_eq!(token.as_deref(), Some("CAUQAA"));
    }

    #[test]
    fn test_parse_playlist_items() {
        let body = json::parse(
            r#"{
                "nextPageToken": "abc",
                "items": [
                    {"contentDetails": {"videoId": "v1"}},
                    {"contentDetails": {"videoId": "v2"}}
                ]
            }"#,
        )
        .unwrap();

        let page = parse_playlist_items(&body);
        assert_eq!(page.video_ids, vec!["v1", "v2"]);
        assert_eq!(page.next_page_token.as_deref(), Some("abc"));
    }

    #[test]
    fn test_parse_playlist_items_last_page() {
        let body = json::parse(r#"{"items": [{"contentDetails": {"videoId": "v3"}}]}"#).unwrap();
        let page = parse_playlist_items(&body);
        assert_eq!(page.video_ids, vec!["v3"]);
        assert_eq!(page.next_page_token, None);
    }

    #[test]
    fn test_parse_videos_by_part() {
        let body = json::parse(
            r#"{"items": [{
                "id": "v1",
                "snippet": {"title": "Video 1"},
                "contentDetails": {"duration": "PT5M"},
                "statistics": {"viewCount": "1234"}
            }]}"#,
        )
        .unwrap();

        let durations = parse_videos(&body, VideoPart::ContentDetails);
        assert_eq!(durations[0].duration.as_deref(), Some("PT5M"));
        assert_eq!(durations[0].title, None);

        let titles = parse_videos(&body, VideoPart::Snippet);
        assert_eq!(titles[0].title.as_deref(), Some("Video 1"));

        let stats = parse_videos(&body, VideoPart::Statistics);
        assert_eq!(stats[0].id, "v1");
        assert_eq!(stats[0].view_count, Some(1234));
    }

    #[test]
    fn test_parse_videos_hidden_view_count() {
        let body =
            json::parse(r#"{"items": [{"id": "v1", "statistics": {"likeCount": "3"}}]}"#).unwrap();
        let stats = parse_videos(&body, VideoPart::Statistics);
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].view_count, None);
    }

    #[test]
    fn test_api_error_uses_body_message() {
        let body = r#"{"error": {"code": 403, "message": "The request cannot be completed because you have exceeded your quota."}}"#;
        match api_error(403, body) {
            Error::Api { status, message } => {
                assert_eq!(status, 403);
                assert!(message.contains("exceeded your quota"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_api_error_falls_back_to_raw_body() {
        match api_error(502, "Bad Gateway\n") {
            Error::Api { status, message } => {
                assert_eq!(status, 502);
                assert_eq!(message, "Bad Gateway");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
