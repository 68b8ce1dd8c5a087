//! Data model types for the media library.
//!
//! Each entity comes in three shapes: the persisted row (`Scene`), a create
//! record (`NewScene`), and a partial update record (`ScenePartial`). Partial
//! records wrap every updatable field in `Option`; nullable columns use
//! `Option<Option<T>>` so "leave unchanged" (`None`) and "clear to NULL"
//! (`Some(None)`) stay distinguishable.

use serde::{Deserialize, Serialize};

/// MD5 hex digest of a string, used as the default checksum for named
/// entities and path-only scenes.
pub fn md5_hex(value: &str) -> String {
    format!("{:x}", md5::compute(value.as_bytes()))
}

// ── Scene ───────────────────────────────────────────────────────────────────

/// An indexed media file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    pub id: i64,
    pub checksum: String,
    pub path: String,
    pub title: Option<String>,
    pub details: Option<String>,
    pub url: Option<String>,
    pub date: Option<String>,
    /// 1-5 star rating.
    pub rating: Option<i32>,
    /// File size in bytes. Stored as text; numeric ordering casts it.
    pub size: Option<String>,
    pub duration: Option<f64>,
    pub video_codec: Option<String>,
    pub audio_codec: Option<String>,
    pub width: Option<i32>,
    pub height: Option<i32>,
    pub framerate: Option<f64>,
    pub bitrate: Option<i64>,
    pub studio_id: Option<i64>,
    pub created_at: String,
    pub updated_at: String,
}

/// Fields for inserting a scene.
#[derive(Debug, Clone, Default)]
pub struct NewScene {
    pub checksum: String,
    pub path: String,
    pub title: Option<String>,
    pub details: Option<String>,
    pub url: Option<String>,
    pub date: Option<String>,
    pub rating: Option<i32>,
    pub size: Option<String>,
    pub duration: Option<f64>,
    pub video_codec: Option<String>,
    pub audio_codec: Option<String>,
    pub width: Option<i32>,
    pub height: Option<i32>,
    pub framerate: Option<f64>,
    pub bitrate: Option<i64>,
    pub studio_id: Option<i64>,
}

impl NewScene {
    /// A scene known only by its path. The checksum is the MD5 of the path.
    pub fn from_path(path: impl Into<String>) -> Self {
        let path = path.into();
        Self {
            checksum: md5_hex(&path),
            path,
            ..Default::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

/// Partial update of a scene. Only fields set to `Some` are written.
#[derive(Debug, Clone, Default)]
pub struct ScenePartial {
    pub id: i64,
    pub checksum: Option<String>,
    pub path: Option<String>,
    pub title: Option<Option<String>>,
    pub details: Option<Option<String>>,
    pub url: Option<Option<String>>,
    pub date: Option<Option<String>>,
    pub rating: Option<Option<i32>>,
    pub size: Option<Option<String>>,
    pub duration: Option<Option<f64>>,
    pub video_codec: Option<Option<String>>,
    pub audio_codec: Option<Option<String>>,
    pub width: Option<Option<i32>>,
    pub height: Option<Option<i32>>,
    pub framerate: Option<Option<f64>>,
    pub bitrate: Option<Option<i64>>,
    pub studio_id: Option<Option<i64>>,
}

impl ScenePartial {
    pub fn new(id: i64) -> Self {
        Self {
            id,
            ..Default::default()
        }
    }
}

// ── Performer ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Performer {
    pub id: i64,
    pub checksum: String,
    pub name: Option<String>,
    pub url: Option<String>,
    pub gender: Option<String>,
    pub birthdate: Option<String>,
    pub ethnicity: Option<String>,
    pub country: Option<String>,
    pub favorite: bool,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Default)]
pub struct NewPerformer {
    pub checksum: String,
    pub name: Option<String>,
    pub url: Option<String>,
    pub gender: Option<String>,
    pub birthdate: Option<String>,
    pub ethnicity: Option<String>,
    pub country: Option<String>,
    pub favorite: bool,
}

impl NewPerformer {
    /// A performer with the given name, checksummed by name.
    pub fn named(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            checksum: md5_hex(&name),
            name: Some(name),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PerformerPartial {
    pub id: i64,
    pub checksum: Option<String>,
    pub name: Option<Option<String>>,
    pub url: Option<Option<String>>,
    pub gender: Option<Option<String>>,
    pub birthdate: Option<Option<String>>,
    pub ethnicity: Option<Option<String>>,
    pub country: Option<Option<String>>,
    pub favorite: Option<bool>,
}

impl PerformerPartial {
    pub fn new(id: i64) -> Self {
        Self {
            id,
            ..Default::default()
        }
    }
}

// ── Studio ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Studio {
    pub id: i64,
    pub checksum: String,
    pub name: Option<String>,
    pub url: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Default)]
pub struct NewStudio {
    pub checksum: String,
    pub name: Option<String>,
    pub url: Option<String>,
}

impl NewStudio {
    pub fn named(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            checksum: md5_hex(&name),
            name: Some(name),
            url: None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct StudioPartial {
    pub id: i64,
    pub checksum: Option<String>,
    pub name: Option<Option<String>>,
    pub url: Option<Option<String>>,
}

impl StudioPartial {
    pub fn new(id: i64) -> Self {
        Self {
            id,
            ..Default::default()
        }
    }
}

// ── Tag ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    pub id: i64,
    pub name: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Default)]
pub struct NewTag {
    pub name: String,
}

impl NewTag {
    pub fn named(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

#[derive(Debug, Clone, Default)]
pub struct TagPartial {
    pub id: i64,
    pub name: Option<String>,
}

// ── Find Result ─────────────────────────────────────────────────────────────

/// One page of a filtered query plus the total number of matches.
#[derive(Debug, Clone, Serialize)]
pub struct FindResult<T> {
    /// Matches across all pages, ignoring pagination.
    pub count: i64,
    pub items: Vec<T>,
}

impl<T> Default for FindResult<T> {
    fn default() -> Self {
        Self {
            count: 0,
            items: Vec::new(),
        }
    }
}
