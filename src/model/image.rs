//! Image asset naming and paths.
//!
//! Every movie and performer can carry one image, stored on disk in four
//! size tiers under `<root>/images/<size>/`. The image shares its owner's
//! id, so the file name is fully derived from kind + id. Decoding and
//! scaling of pixel data is the presentation layer's business; this module
//! only knows where the files live.

use std::path::{Path, PathBuf};

use crate::model::id::RecordKind;

/// The size tiers an image is stored in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageSize {
    Small,
    Medium,
    Large,
    Wide,
}

impl ImageSize {
    /// all tiers, in ascending size order
    pub const ALL: [ImageSize; 4] = [
        ImageSize::Small,
        ImageSize::Medium,
        ImageSize::Large,
        ImageSize::Wide,
    ];

    /// subdirectory of the image root this tier is stored in
    pub fn folder(self) -> &'static str {
        match self {
            ImageSize::Small => "small",
            ImageSize::Medium => "medium",
            ImageSize::Large => "large",
            ImageSize::Wide => "wide",
        }
    }

    /// nominal width in pixels
    pub fn width(self) -> u32 {
        match self {
            ImageSize::Small => 50,
            ImageSize::Medium => 100,
            ImageSize::Large => 200,
            ImageSize::Wide => 500,
        }
    }

    /// nominal height in pixels
    pub fn height(self) -> u32 {
        match self {
            ImageSize::Small => 75,
            ImageSize::Medium => 150,
            ImageSize::Large => 300,
            ImageSize::Wide => 20,
        }
    }
}

/// Reference to the image assets of one record.
///
/// An `ImageRef` is cheap to construct and carries no pixel data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageRef {
    kind: RecordKind,
    id: u32,
}

impl ImageRef {
    pub fn new(kind: RecordKind, id: u32) -> Self {
        Self { kind, id }
    }

    pub fn kind(&self) -> RecordKind {
        self.kind
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    /// file name shared by all tiers, e.g. "movie_0.png"
    pub fn file_name(&self) -> String {
        format!("{}_{}.png", self.kind.prefix(), self.id)
    }

    /// full path of one tier's file under the given image root
    pub fn path(&self, image_root: &Path, size: ImageSize) -> PathBuf {
        image_root.join(size.folder()).join(self.file_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_name() {
        let image = ImageRef::new(RecordKind::Movie, 0);
        assert_eq!(image.file_name(), "movie_0.png");

        let image = ImageRef::new(RecordKind::Performer, 17);
        assert_eq!(image.file_name(), "performer_17.png");
    }

    #[test]
    fn test_tier_path() {
        let image = ImageRef::new(RecordKind::Movie, 3);
        let path = image.path(Path::new("/data/images"), ImageSize::Large);
        assert_eq!(path, PathBuf::from("/data/images/large/movie_3.png"));
    }

    #[test]
    fn test_all_tiers_distinct() {
        let image = ImageRef::new(RecordKind::Movie, 1);
        let root = Path::new("img");
        let mut paths: Vec<_> = ImageSize::ALL
            .iter()
            .map(|size| image.path(root, *size))
            .collect();
        paths.dedup();
        assert_eq!(paths.len(), 4);
    }
}
