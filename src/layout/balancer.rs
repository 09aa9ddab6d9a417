use super::aspect::estimate_aspect_ratio;
use crate::models::Photo;
use serde::Serialize;
use std::collections::HashSet;

/// Greedy masonry layout: every photo goes to the column whose estimated
/// height is smallest at the time it is placed, leftmost on ties.
///
/// Placed photos are never moved unless the column count changes, in which
/// case the whole list is redistributed from empty columns in source order.
#[derive(Debug, Clone)]
pub struct ColumnBalancer {
    fallback_ratio: f64,
    /// Photos in the order they were placed.
    placed: Vec<Photo>,
    placed_ids: HashSet<String>,
    /// Indices into `placed`, per column.
    columns: Vec<Vec<usize>>,
    heights: Vec<f64>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ColumnSnapshot {
    pub height: f64,
    pub photos: Vec<Photo>,
}

impl ColumnBalancer {
    pub fn new(column_count: usize, fallback_ratio: f64) -> Self {
        let column_count = column_count.max(1);
        Self {
            fallback_ratio,
            placed: Vec::new(),
            placed_ids: HashSet::new(),
            columns: vec![Vec::new(); column_count],
            heights: vec![0.0; column_count],
        }
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn len(&self) -> usize {
        self.placed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.placed.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.placed_ids.contains(id)
    }

    pub fn heights(&self) -> &[f64] {
        &self.heights
    }

    /// Places photos not seen before; returns the number placed.
    /// A photo whose id is already placed is ignored, keeping the original.
    pub fn append<'a, I>(&mut self, photos: I) -> usize
    where
        I: IntoIterator<Item = &'a Photo>,
    {
        let mut added = 0;
        for photo in photos {
            if self.placed_ids.contains(&photo.id) {
                log::trace!("Photo {} already placed, ignoring duplicate", photo.id);
                continue;
            }
            let target = self.shortest_column();
            let height = estimate_aspect_ratio(&photo.url, self.fallback_ratio);
            self.placed_ids.insert(photo.id.clone());
            self.columns[target].push(self.placed.len());
            self.placed.push(photo.clone());
            self.heights[target] += height;
            added += 1;
        }
        added
    }

    /// Discards the current assignment and lays out `photos` into `column_count` columns.
    pub fn rebuild(&mut self, column_count: usize, photos: &[Photo]) {
        log::debug!("Rebuilding layout: {} photos into {} columns", photos.len(), column_count);
        *self = Self::new(column_count, self.fallback_ratio);
        self.append(photos);
    }

    /// Brings the layout in line with `source` for the given column count:
    /// a changed count rebuilds from scratch, otherwise only unplaced photos are appended.
    pub fn sync(&mut self, column_count: usize, source: &[Photo]) -> usize {
        if column_count.max(1) != self.column_count() {
            self.rebuild(column_count, source);
            return self.len();
        }
        self.append(source)
    }

    pub fn column(&self, index: usize) -> Vec<&Photo> {
        self.columns
            .get(index)
            .map(|indices| indices.iter().map(|&i| &self.placed[i]).collect())
            .unwrap_or_default()
    }

    pub fn column_ids(&self) -> Vec<Vec<&str>> {
        self.columns
            .iter()
            .map(|indices| indices.iter().map(|&i| self.placed[i].id.as_str()).collect())
            .collect()
    }

    pub fn snapshot(&self) -> Vec<ColumnSnapshot> {
        self.columns
            .iter()
            .zip(&self.heights)
            .map(|(indices, &height)| ColumnSnapshot {
                height,
                photos: indices.iter().map(|&i| self.placed[i].clone()).collect(),
            })
            .collect()
    }

    fn shortest_column(&self) -> usize {
        let mut best = 0;
        for (index, &height) in self.heights.iter().enumerate().skip(1) {
            if height < self.heights[best] {
                best = index;
            }
        }
        best
    }
}
