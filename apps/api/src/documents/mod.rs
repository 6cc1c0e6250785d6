//! Document rendering boundary and multi-format generation.

pub mod handlers;
pub mod pipeline;
pub mod renderer;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use renderer::{DocumentRenderer, HttpDocumentRenderer, RenderError, RenderRequest};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    Pdf,
    Docx,
}

impl DocumentFormat {
    /// Leading bytes every well-formed file of this format starts with.
    pub fn signature(self) -> &'static [u8] {
        match self {
            DocumentFormat::Pdf => b"%PDF",
            DocumentFormat::Docx => b"PK",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            DocumentFormat::Pdf => "application/pdf",
            DocumentFormat::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DocumentFormat::Pdf => "pdf",
            DocumentFormat::Docx => "docx",
        }
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pdf" => Ok(DocumentFormat::Pdf),
            "docx" => Ok(DocumentFormat::Docx),
            other => Err(format!("unknown document format '{other}' (expected pdf or docx)")),
        }
    }
}
