use std::collections::HashMap;

/// Text fields of a submitted product form, plus the uploaded image if any.
///
/// Field names are kept as submitted; accessors apply the form normalization
/// (trimmed, empty means absent).
#[derive(Debug, Clone, Default)]
pub struct ProductInput {
    fields: HashMap<String, String>,
    pub image: Option<UploadedImage>,
}

/// A file received in the `image` multipart field
#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub file_name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

impl ProductInput {
    pub fn new(fields: HashMap<String, String>) -> Self {
        Self {
            fields,
            image: None,
        }
    }

    pub fn with_image(mut self, image: Option<UploadedImage>) -> Self {
        self.image = image;
        self
    }

    /// Trimmed value of a field; `None` when missing or blank
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    /// Whether the field was submitted at all, even empty
    pub fn is_present(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Submitted values to echo back into a rejected form
    pub fn old_input(&self) -> HashMap<String, String> {
        self.fields
            .iter()
            .filter(|(name, _)| !name.starts_with('_'))
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect()
    }
}
