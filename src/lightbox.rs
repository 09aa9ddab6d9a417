use crate::map::{MapPoint, MapView};
use crate::models::Photo;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    /// The dimmed area around the enlarged photo.
    Backdrop,
    Content,
}

/// Single-photo overlay. At most one photo is open at a time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Lightbox {
    selected: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct LightboxView {
    pub photo: Photo,
    pub map: MapView,
}

impl Lightbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select(&mut self, id: impl Into<String>) {
        let id = id.into();
        log::debug!("Opening lightbox for photo {}", id);
        self.selected = Some(id);
    }

    pub fn close(&mut self) {
        self.selected = None;
    }

    pub fn click(&mut self, target: ClickTarget) {
        if target == ClickTarget::Backdrop {
            self.close();
        }
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn is_open(&self) -> bool {
        self.selected.is_some()
    }

    /// The overlay contents, or `None` when closed or the selected photo is gone.
    pub fn view(&self, photos: &[Photo]) -> Option<LightboxView> {
        let id = self.selected.as_deref()?;
        let photo = photos.iter().find(|p| p.id == id)?;
        Some(LightboxView::for_photo(photo))
    }
}

impl LightboxView {
    pub fn for_photo(photo: &Photo) -> Self {
        Self {
            photo: photo.clone(),
            map: MapView::focused(MapPoint::for_photo(photo)),
        }
    }
}
