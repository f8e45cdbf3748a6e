//! Process-scoped dataset state.
//!
//! Each dataset is fetched and normalized once, then held in memory for the
//! process lifetime and handed out by reference. Nothing is persisted back;
//! `reload` is the explicit refresh operation.

use crate::model::{DatasetName, Frame};
use crate::normalize;
use crate::source::{fetch_or_empty, RowSource};
use chrono::NaiveDate;
use std::collections::HashMap;
use tracing::info;

pub struct DatasetStore {
    source: Box<dyn RowSource>,
    today: NaiveDate,
    frames: HashMap<DatasetName, Frame>,
}

impl DatasetStore {
    /// `today` anchors calendar-derived fields for every load this store
    /// performs, keeping a process's view of "this month" consistent.
    pub fn new(source: Box<dyn RowSource>, today: NaiveDate) -> Self {
        Self {
            source,
            today,
            frames: HashMap::new(),
        }
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    /// Fetch and normalize every dataset up front.
    pub fn load_all(&mut self) {
        for dataset in DatasetName::all() {
            self.load(dataset);
        }
    }

    /// The normalized frame for `dataset`, loading it on first access.
    pub fn get(&mut self, dataset: DatasetName) -> &Frame {
        if !self.frames.contains_key(&dataset) {
            self.load(dataset);
        }
        &self.frames[&dataset]
    }

    /// Drop the held frame and fetch it again.
    pub fn reload(&mut self, dataset: DatasetName) -> &Frame {
        self.load(dataset);
        &self.frames[&dataset]
    }

    fn load(&mut self, dataset: DatasetName) {
        let raw = fetch_or_empty(self.source.as_ref(), dataset);
        let frame = normalize::normalize(dataset, raw, self.today);
        info!(dataset = %dataset, rows = frame.len(), "dataset loaded");
        self.frames.insert(dataset, frame);
    }
}
