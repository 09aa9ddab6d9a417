//! Data behind the map widget: points, centering and the home-page overview.

use crate::models::{Author, BlogPost, Photo};
use serde::Serialize;

pub const WORLD_CENTER: (f64, f64) = (20.0, 0.0);
pub const WORLD_ZOOM: u8 = 2;
pub const FOCUSED_ZOOM: u8 = 10;
/// Base marker drawn on every map.
pub const HOME_COORDS: (f64, f64) = (37.7749, -122.4194);
const MAX_AVATARS: usize = 4;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PointCategory {
    Post,
    Photo,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MapPoint {
    pub latitude: f64,
    pub longitude: f64,
    pub title: String,
    pub category: PointCategory,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub avatars: Vec<String>,
}

impl MapPoint {
    pub fn for_photo(photo: &Photo) -> Self {
        Self {
            latitude: photo.location.lat,
            longitude: photo.location.lng,
            title: photo.caption.clone(),
            category: PointCategory::Photo,
            avatars: Vec::new(),
        }
    }

    /// `None` for posts written without a location.
    pub fn for_post(post: &BlogPost) -> Option<Self> {
        let location = post.location.as_ref()?;
        Some(Self {
            latitude: location.lat,
            longitude: location.lng,
            title: post.title.clone(),
            category: PointCategory::Post,
            avatars: Vec::new(),
        })
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MapView {
    pub points: Vec<MapPoint>,
    pub center: (f64, f64),
    pub zoom: u8,
    pub home: (f64, f64),
}

impl MapView {
    pub fn world(points: Vec<MapPoint>) -> Self {
        Self { points, center: WORLD_CENTER, zoom: WORLD_ZOOM, home: HOME_COORDS }
    }

    /// A single point, centered and zoomed in.
    pub fn focused(point: MapPoint) -> Self {
        Self {
            center: (point.latitude, point.longitude),
            points: vec![point],
            zoom: FOCUSED_ZOOM,
            home: HOME_COORDS,
        }
    }

    pub fn with_view(mut self, center: (f64, f64), zoom: u8) -> Self {
        self.center = center;
        self.zoom = zoom;
        self
    }

    /// The point a marker click selects, if the index is valid.
    pub fn activate(&self, index: usize) -> Option<&MapPoint> {
        let point = self.points.get(index);
        if let Some(p) = point {
            log::debug!("Map point activated: {} ({:?})", p.title, p.category);
        }
        point
    }
}

/// Overview map for the home page: located posts first, then every photo.
pub fn home_map(posts: &[BlogPost], photos: &[Photo], authors: &[Author]) -> MapView {
    let avatars: Vec<String> = authors.iter().take(MAX_AVATARS).map(|a| a.avatar.clone()).collect();
    let points = posts
        .iter()
        .filter_map(MapPoint::for_post)
        .chain(photos.iter().map(MapPoint::for_photo))
        .map(|mut point| {
            point.avatars = avatars.clone();
            point
        })
        .collect();
    MapView::world(points)
}
