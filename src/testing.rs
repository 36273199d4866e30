//! In-memory `VideoService` used by the unit tests.

use crate::{
    data::{Channel, PlaylistItemsPage, PlaylistSummary, VideoPart, VideoRecord},
    error::Result,
    service::VideoService,
};
use std::{
    cell::{Cell, RefCell},
    collections::{HashMap, VecDeque},
};

#[derive(Default)]
pub struct FakeService {
    channels: Vec<Channel>,
    playlists: Vec<PlaylistSummary>,
    item_pages: RefCell<VecDeque<(Vec<String>, Option<String>)>>,
    videos: HashMap<String, VideoRecord>,
    channel_calls: Cell<usize>,
    item_calls: Cell<usize>,
    video_batches: RefCell<Vec<usize>>,
}

impl FakeService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_channel(mut self, id: &str) -> Self {
        self.channels.push(Channel { id: id.to_owned() });
        self
    }

    pub fn with_playlist(mut self, id: &str, title: &str) -> Self {
        self.playlists
            .push(PlaylistSummary::new(id.to_owned(), title.to_owned()));
        self
    }

    pub fn with_item_pages(self, pages: Vec<(Vec<String>, Option<String>)>) -> Self {
        self.item_pages.borrow_mut().extend(pages);
        self
    }

    pub fn with_video(mut self, record: VideoRecord) -> Self {
        self.videos.insert(record.id.clone(), record);
        self
    }

    pub fn channel_calls(&self) -> usize {
        self.channel_calls.get()
    }

    pub fn item_calls(&self) -> usize {
        self.item_calls.get()
    }

    pub fn video_batch_sizes(&self) -> Vec<usize> {
        self.video_batches.borrow().clone()
    }
}

impl VideoService for FakeService {
    async fn list_channel(&self, _for_username: &str) -> Result<Vec<Channel>> {
        self.channel_calls.set(self.channel_calls.get() + 1);
        Ok(self.channels.clone())
    }

    async fn list_playlists(&self, _channel_id: &str) -> Result<Vec<PlaylistSummary>> {
        Ok(self.playlists.clone())
    }

    async fn list_playlist_items(
        &self,
        _playlist_id: &str,
        _page_token: Option<String>,
        _max_results: u32,
    ) -> Result<PlaylistItemsPage> {
        self.item_calls.set(self.item_calls.get() + 1);
        let (video_ids, next_page_token) = self
            .item_pages
            .borrow_mut()
            .pop_front()
            .unwrap_or_default();
        Ok(PlaylistItemsPage {
            video_ids,
            next_page_token,
        })
    }

    async fn list_videos(&self, ids: &[String], part: VideoPart) -> Result<Vec<VideoRecord>> {
        self.video_batches.borrow_mut().push(ids.len());
        Ok(ids
            .iter()
            .filter_map(|id| self.videos.get(id))
            .map(|record| {
                let mut found = VideoRecord::new(record.id.clone());
                match part {
                    VideoPart::ContentDetails => found.duration = record.duration.clone(),
                    VideoPart::Snippet => found.title = record.title.clone(),
                    VideoPart::Statistics => found.view_count = record.view_count,
                }
                found
            })
            .collect())
    }
}
