use std::fmt;

use crate::error::ValidationError;
use crate::pipeline::Stage;
use crate::types::ImageId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// A dismissible message for the user, scoped to one stage.
///
/// Notices remember the photo (and, for recipe ideas, the ingredient list
/// revision) they were raised for, so one that outlives its input can be
/// hidden instead of shown against the wrong data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub stage: Stage,
    pub message: String,
    /// The input field the message is about, for field-level display.
    pub field: Option<&'static str>,
    image: Option<ImageId>,
    revision: Option<u64>,
}

impl Notice {
    pub fn new(level: NoticeLevel, stage: Stage, message: impl Into<String>) -> Self {
        Self {
            level,
            stage,
            message: message.into(),
            field: None,
            image: None,
            revision: None,
        }
    }

    pub fn info(stage: Stage, message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Info, stage, message)
    }

    pub fn warning(stage: Stage, message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Warning, stage, message)
    }

    pub fn error(stage: Stage, message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Error, stage, message)
    }

    pub fn invalid_input(stage: Stage, error: &ValidationError) -> Self {
        Self::error(stage, error.to_string()).for_field(error.field())
    }

    pub fn for_field(mut self, field: &'static str) -> Self {
        self.field = Some(field);
        self
    }

    pub(crate) fn tagged(mut self, image: Option<ImageId>, revision: Option<u64>) -> Self {
        self.image = image;
        self.revision = revision;
        self
    }

    /// The photo this notice was raised for.
    pub fn image(&self) -> Option<ImageId> {
        self.image
    }

    pub fn revision(&self) -> Option<u64> {
        self.revision
    }

    pub fn is_error(&self) -> bool {
        self.level == NoticeLevel::Error
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self.level {
            NoticeLevel::Info => "info",
            NoticeLevel::Warning => "warning",
            NoticeLevel::Error => "error",
        };
        write!(f, "[{label}] {}", self.message)
    }
}
