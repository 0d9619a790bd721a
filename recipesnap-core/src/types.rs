use std::fmt;
use std::sync::Arc;

use base64::Engine;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};

use crate::error::ValidationError;

/// Media type used when the uploader did not declare one.
pub const DEFAULT_MEDIA_TYPE: &str = "application/octet-stream";

/// Content identity of an [`ImageInput`]: the SHA-256 digest of its bytes.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageId([u8; 32]);

impl ImageId {
    pub fn of(data: &[u8]) -> Self {
        Self(Sha256::digest(data).into())
    }

    /// First 8 hex characters, for logs.
    pub fn short(&self) -> String {
        hex::encode(&self.0[..4])
    }
}

impl fmt::Display for ImageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl fmt::Debug for ImageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ImageId({})", self.short())
    }
}

/// A captured ingredient photo.
///
/// Immutable once built. Two inputs with byte-identical payloads are the same
/// input, whatever their declared media type.
#[derive(Clone)]
pub struct ImageInput {
    id: ImageId,
    data: Arc<[u8]>,
    media_type: String,
}

impl ImageInput {
    /// Build an input from an uploaded payload. Empty payloads are rejected.
    pub fn new(
        data: impl Into<Vec<u8>>,
        media_type: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let data: Vec<u8> = data.into();
        if data.is_empty() {
            return Err(ValidationError::MissingImage);
        }
        let media_type = media_type.into();
        let media_type = match media_type.trim() {
            "" => DEFAULT_MEDIA_TYPE.to_string(),
            declared => declared.to_string(),
        };
        Ok(Self {
            id: ImageId::of(&data),
            data: data.into(),
            media_type,
        })
    }

    pub fn id(&self) -> ImageId {
        self.id
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Render as `data:<media type>;base64,<payload>`.
    pub fn to_data_uri(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.media_type,
            base64::engine::general_purpose::STANDARD.encode(&self.data)
        )
    }

    /// Parse a base64 data URI as produced by [`ImageInput::to_data_uri`].
    pub fn from_data_uri(uri: &str) -> Result<Self, ValidationError> {
        let rest = uri
            .strip_prefix("data:")
            .ok_or(ValidationError::MissingImage)?;
        let (media_type, payload) = rest
            .split_once(";base64,")
            .ok_or(ValidationError::MissingImage)?;
        let data = base64::engine::general_purpose::STANDARD
            .decode(payload.trim())
            .map_err(|_| ValidationError::MissingImage)?;
        Self::new(data, media_type)
    }
}

impl PartialEq for ImageInput {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ImageInput {}

impl fmt::Debug for ImageInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageInput")
            .field("id", &self.id)
            .field("media_type", &self.media_type)
            .field("len", &self.data.len())
            .finish()
    }
}

impl Serialize for ImageInput {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_data_uri())
    }
}

impl<'de> Deserialize<'de> for ImageInput {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let uri = String::deserialize(deserializer)?;
        ImageInput::from_data_uri(&uri).map_err(serde::de::Error::custom)
    }
}

/// A proposed recipe, before expansion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeIdea {
    pub name: String,
    pub description: String,
}

impl RecipeIdea {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

/// One line of a recipe's ingredient list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeIngredient {
    pub name: String,
    pub quantity: String,
    pub unit: String,
}

/// A fully expanded recipe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeDetail {
    /// Slug of the recipe name.
    pub id: String,
    pub name: String,
    pub description: String,
    pub ingredients: Vec<RecipeIngredient>,
    pub instructions: Vec<String>,
    pub prep_time: String,
    pub cook_time: String,
    pub servings: String,
    /// Picture of the finished dish.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// The ingredient photo the recipe was suggested from. Display only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_image: Option<ImageInput>,
}
