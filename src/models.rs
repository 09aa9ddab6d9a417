// src/models.rs

use crate::error::AppError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const DEFAULT_READ_TIME: &str = "5 min read";

/// Records with an identifier that the store can upsert by.
pub trait Record {
    fn id(&self) -> &str;
    fn set_id(&mut self, id: String);
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Location {
    pub lat: f64,
    pub lng: f64,
    pub name: String,
}

impl Location {
    fn validate(&self) -> Result<(), AppError> {
        if !(-90.0..=90.0).contains(&self.lat) {
            return Err(AppError::Validation(format!("latitude {} out of range", self.lat)));
        }
        if !(-180.0..=180.0).contains(&self.lng) {
            return Err(AppError::Validation(format!("longitude {} out of range", self.lng)));
        }
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Photo {
    pub id: String,
    pub url: String,
    pub caption: String,
    pub location: Location,
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AppProject {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Icon name or image URL.
    pub icon: String,
    pub url: String,
    pub tags: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    // Posts stored before drafts existed carry no status and are live.
    #[default]
    Published,
    Draft,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BlogPost {
    pub id: String,
    pub title: String,
    pub excerpt: String,
    pub content: String,
    pub date: String,
    pub location: Option<Location>,
    pub read_time: String,
    #[serde(default)]
    pub status: PostStatus,
    #[serde(default)]
    pub partners: Vec<String>,
}

impl BlogPost {
    pub fn is_published(&self) -> bool {
        self.status == PostStatus::Published
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct Social {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Author {
    pub id: String,
    pub name: String,
    pub role: String,
    pub avatar: String,
    pub bio: String,
    #[serde(default)]
    pub social: Social,
}

macro_rules! impl_record {
    ($($ty:ty),*) => {
        $(impl Record for $ty {
            fn id(&self) -> &str {
                &self.id
            }

            fn set_id(&mut self, id: String) {
                self.id = id;
            }
        })*
    };
}

impl_record!(Photo, AppProject, BlogPost, Author);

fn validate_date(date: &str) -> Result<(), AppError> {
    NaiveDate::parse_from_str(date, DATE_FORMAT)
        .map(|_| ())
        .map_err(|_| AppError::Validation(format!("'{}' is not a YYYY-MM-DD date", date)))
}

fn require(field: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{} is required", field)));
    }
    Ok(())
}

/// Splits a comma-separated tag field, dropping blanks.
pub fn parse_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

// ---------- Drafts: full records submitted by the admin forms ----------

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PhotoDraft {
    #[serde(default)]
    pub id: Option<String>,
    pub url: String,
    pub caption: String,
    pub location: Location,
    pub date: String,
    #[serde(default)]
    pub author_id: Option<String>,
}

impl PhotoDraft {
    pub fn into_photo(self) -> Result<Photo, AppError> {
        let photo = Photo {
            id: self.id.unwrap_or_default(),
            url: self.url.trim().to_string(),
            caption: self.caption.trim().to_string(),
            location: self.location,
            date: self.date,
            author_id: self.author_id.filter(|a| !a.is_empty()),
        };
        validate_photo(&photo)?;
        Ok(photo)
    }
}

pub fn validate_photo(photo: &Photo) -> Result<(), AppError> {
    require("url", &photo.url)?;
    require("caption", &photo.caption)?;
    validate_date(&photo.date)?;
    photo.location.validate()
}

#[derive(Debug, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct AppDraft {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl AppDraft {
    pub fn into_app(self) -> Result<AppProject, AppError> {
        let app = AppProject {
            id: self.id.unwrap_or_default(),
            name: self.name.trim().to_string(),
            description: self.description,
            icon: self.icon,
            url: self.url,
            tags: self
                .tags
                .iter()
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .collect(),
        };
        require("name", &app.name)?;
        Ok(app)
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PostDraft {
    #[serde(default)]
    pub id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub excerpt: String,
    #[serde(default)]
    pub content: String,
    pub date: String,
    #[serde(default)]
    pub location: Option<Location>,
    #[serde(default = "default_read_time")]
    pub read_time: String,
    #[serde(default)]
    pub status: PostStatus,
    #[serde(default)]
    pub partners: Vec<String>,
}

fn default_read_time() -> String {
    DEFAULT_READ_TIME.to_string()
}

impl PostDraft {
    /// Blank editor state for a new story.
    pub fn new_story(today: NaiveDate) -> Self {
        Self {
            id: None,
            title: String::new(),
            excerpt: String::new(),
            content: String::new(),
            date: today.format(DATE_FORMAT).to_string(),
            location: None,
            read_time: default_read_time(),
            status: PostStatus::Draft,
            partners: Vec::new(),
        }
    }

    pub fn into_post(self) -> Result<BlogPost, AppError> {
        let mut partners: Vec<String> = Vec::with_capacity(self.partners.len());
        for partner in self.partners {
            if !partners.contains(&partner) {
                partners.push(partner);
            }
        }
        let post = BlogPost {
            id: self.id.unwrap_or_default(),
            title: self.title.trim().to_string(),
            excerpt: self.excerpt,
            content: self.content,
            date: self.date,
            location: self.location,
            read_time: self.read_time,
            status: self.status,
            partners,
        };
        validate_post(&post)?;
        Ok(post)
    }
}

fn validate_post(post: &BlogPost) -> Result<(), AppError> {
    require("title", &post.title)?;
    validate_date(&post.date)?;
    match &post.location {
        Some(location) => location.validate(),
        None => Ok(()),
    }
}

// ---------- Patches: partial updates producing a full replacement ----------

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PhotoPatch {
    pub url: Option<String>,
    pub caption: Option<String>,
    pub location: Option<Location>,
    pub date: Option<String>,
    /// `Some(None)` clears the author reference.
    #[serde(default, deserialize_with = "double_option")]
    pub author_id: Option<Option<String>>,
}

impl PhotoPatch {
    pub fn apply(self, current: &Photo) -> Result<Photo, AppError> {
        let mut next = current.clone();
        if let Some(url) = self.url {
            next.url = url.trim().to_string();
        }
        if let Some(caption) = self.caption {
            next.caption = caption.trim().to_string();
        }
        if let Some(location) = self.location {
            next.location = location;
        }
        if let Some(date) = self.date {
            next.date = date;
        }
        if let Some(author_id) = self.author_id {
            next.author_id = author_id;
        }
        validate_photo(&next)?;
        Ok(next)
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(deny_unknown_fields)]
pub struct AppPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub url: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl AppPatch {
    pub fn apply(self, current: &AppProject) -> Result<AppProject, AppError> {
        AppDraft {
            id: Some(current.id.clone()),
            name: self.name.unwrap_or_else(|| current.name.clone()),
            description: self.description.unwrap_or_else(|| current.description.clone()),
            icon: self.icon.unwrap_or_else(|| current.icon.clone()),
            url: self.url.unwrap_or_else(|| current.url.clone()),
            tags: self.tags.unwrap_or_else(|| current.tags.clone()),
        }
        .into_app()
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PostPatch {
    pub title: Option<String>,
    pub excerpt: Option<String>,
    pub content: Option<String>,
    pub date: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub location: Option<Option<Location>>,
    pub read_time: Option<String>,
    pub status: Option<PostStatus>,
    pub partners: Option<Vec<String>>,
}

impl PostPatch {
    pub fn apply(self, current: &BlogPost) -> Result<BlogPost, AppError> {
        PostDraft {
            id: Some(current.id.clone()),
            title: self.title.unwrap_or_else(|| current.title.clone()),
            excerpt: self.excerpt.unwrap_or_else(|| current.excerpt.clone()),
            content: self.content.unwrap_or_else(|| current.content.clone()),
            date: self.date.unwrap_or_else(|| current.date.clone()),
            location: self.location.unwrap_or_else(|| current.location.clone()),
            read_time: self.read_time.unwrap_or_else(|| current.read_time.clone()),
            status: self.status.unwrap_or(current.status),
            partners: self.partners.unwrap_or_else(|| current.partners.clone()),
        }
        .into_post()
    }
}

fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: serde::Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
