use crate::models::EncodedImage;
use crate::presets::Preset;
use serde::{Deserialize, Serialize};

/// The user's own presets, most recent first.
///
/// The engine appends analyzed styles here and hands the collection back;
/// persisting it is the caller's job. Names are not unique; lookups resolve
/// to the most recently added entry, so a re-analyzed style shadows the old
/// one without deleting it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StyleLibrary {
    presets: Vec<Preset>,
}

impl StyleLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_presets(presets: Vec<Preset>) -> Self {
        Self { presets }
    }

    /// File a freshly analyzed style: it gets the next `Style N` name and
    /// goes to the front. Returns a reference to the stored preset.
    pub fn add_analyzed(&mut self, mut preset: Preset) -> &Preset {
        preset.name = format!("Style {}", self.presets.len() + 1);
        self.presets.insert(0, preset);
        &self.presets[0]
    }

    pub fn add(&mut self, preset: Preset) {
        self.presets.insert(0, preset);
    }

    pub fn find(&self, name: &str) -> Option<&Preset> {
        self.presets.iter().find(|p| p.name == name)
    }

    pub fn presets(&self) -> &[Preset] {
        &self.presets
    }

    pub fn len(&self) -> usize {
        self.presets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }
}

/// Saved results, most recent first, deduplicated by exact encoded bytes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Gallery {
    images: Vec<EncodedImage>,
}

impl Gallery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_images(images: Vec<EncodedImage>) -> Self {
        Self { images }
    }

    /// Save an image unless an identical one is already present. Returns
    /// whether anything was added.
    pub fn save(&mut self, image: EncodedImage) -> bool {
        if self.images.contains(&image) {
            return false;
        }
        self.images.insert(0, image);
        true
    }

    /// Remove an image by exact match. Returns whether anything was removed.
    pub fn delete(&mut self, image: &EncodedImage) -> bool {
        let before = self.images.len();
        self.images.retain(|img| img != image);
        self.images.len() != before
    }

    pub fn images(&self) -> &[EncodedImage] {
        &self.images
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presets::fallback_preset;

    fn unnamed_preset() -> Preset {
        Preset {
            name: String::new(),
            base_prompt: "analyzed style".to_string(),
            negative_prompt: "blurry".to_string(),
            aspect_ratio: "1:1".to_string(),
        }
    }

    #[test]
    fn analyzed_styles_are_numbered_and_prepended() {
        let mut library = StyleLibrary::new();
        assert_eq!(library.add_analyzed(unnamed_preset()).name, "Style 1");
        assert_eq!(library.add_analyzed(unnamed_preset()).name, "Style 2");
        let names: Vec<&str> = library.presets().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["Style 2", "Style 1"]);
    }

    #[test]
    fn duplicate_names_resolve_to_the_most_recent() {
        let mut library = StyleLibrary::new();
        let mut first = fallback_preset();
        first.name = "Duo".to_string();
        first.base_prompt = "old".to_string();
        library.add(first);

        let mut second = fallback_preset();
        second.name = "Duo".to_string();
        second.base_prompt = "new".to_string();
        library.add(second);

        assert_eq!(library.len(), 2);
        assert_eq!(library.find("Duo").unwrap().base_prompt, "new");
    }

    #[test]
    fn gallery_dedupes_exact_bytes_and_orders_newest_first() {
        let mut gallery = Gallery::new();
        let a = EncodedImage::from_bytes("image/png", b"aaa");
        let b = EncodedImage::from_bytes("image/png", b"bbb");

        assert!(gallery.save(a.clone()));
        assert!(gallery.save(b.clone()));
        assert!(!gallery.save(a.clone()));

        assert_eq!(gallery.len(), 2);
        assert_eq!(gallery.images()[0], b);
        assert_eq!(gallery.images()[1], a);
    }

    #[test]
    fn gallery_delete_by_exact_match() {
        let mut gallery = Gallery::new();
        let a = EncodedImage::from_bytes("image/png", b"aaa");
        gallery.save(a.clone());

        let other = EncodedImage::from_bytes("image/png", b"zzz");
        assert!(!gallery.delete(&other));
        assert!(gallery.delete(&a));
        assert!(gallery.is_empty());
    }
}
