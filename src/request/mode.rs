//! Operation mode resolution

use serde::{Deserialize, Serialize};
use std::fmt;

/// Operation requested of the upstream image service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Generate,
    Edit,
    Inpaint,
}

impl Mode {
    /// Resolve the mode from the assets present on a request.
    ///
    /// Total over all inputs: images and a mask give `Inpaint`, images alone give `Edit`,
    /// anything else is `Generate`.
    pub fn classify(has_images: bool, has_mask: bool) -> Self {
        match (has_images, has_mask) {
            (true, true) => Mode::Inpaint,
            (true, false) => Mode::Edit,
            (false, _) => Mode::Generate,
        }
    }

    /// Whether this mode is served by the edit endpoint of the upstream service
    pub fn is_edit_class(&self) -> bool {
        matches!(self, Mode::Edit | Mode::Inpaint)
    }

    /// Request fields this mode cannot run without
    pub fn missing_assets(&self, has_images: bool, has_mask: bool) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.is_edit_class() && !has_images {
            missing.push("image");
        }
        if *self == Mode::Inpaint && !has_mask {
            missing.push("mask");
        }
        missing
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Generate => "generate",
            Mode::Edit => "edit",
            Mode::Inpaint => "inpaint",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
