// src/export.rs

use printpdf::{BuiltinFont, Mm, PdfDocument};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const RESPONSE_TITLE: &str = "AI LearnMate - AI Response";
pub const RESPONSE_FILE_NAME: &str = "ai-response.pdf";
pub const README_FILE_NAME: &str = "AI-LearnMate-README.pdf";

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_MM: f32 = 10.0;
const TEXT_WIDTH_MM: f32 = 180.0;
const PT_TO_MM: f32 = 0.3528;
const LINE_HEIGHT_FACTOR: f32 = 1.15;
// Rough average glyph width of Helvetica, in ems.
const AVG_CHAR_EM: f32 = 0.5;

pub const README_LINES: [&str; 27] = [
    "# AI LearnMate",
    "An AI-powered personalized learning tool.",
    "\n## Features",
    "- Voice-based input using speech recognition",
    "- Downloadable AI responses in PDF format",
    "- Quiz Generator",
    "- Flashcard Generator",
    "- Dark Mode toggle",
    "- Difficulty Level Selector",
    "- Session History Log",
    "- Progress Tracker",
    "- Learning Streak Monitor",
    "- Topic Tags",
    "- Daily Learning Tip",
    "- Confetti Celebrations",
    "\n## Usage",
    "Enter a topic and choose the desired output (help, quiz, or flashcard).",
    "Use the voice button to speak your query.",
    "\n## Built With",
    "- Rust",
    "- Axum",
    "- Groq API",
    "- printpdf",
    "- Tokio",
    "- Serde",
    "\n---",
    "(c) 2025 AI LearnMate Team",
];

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("PDF rendering failed: {0}")]
    Render(String),
    #[error("Failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// A text document ready to be laid out onto pages.
#[derive(Debug, Clone, PartialEq)]
pub struct TextDocument {
    pub title: Option<String>,
    pub body: String,
    pub font_size: f32,
}

impl TextDocument {
    /// The layout used for a single AI reply.
    pub fn response(reply: &str) -> Self {
        Self {
            title: Some(RESPONSE_TITLE.to_string()),
            body: reply.to_string(),
            font_size: 14.0,
        }
    }

    pub fn readme() -> Self {
        Self {
            title: None,
            body: README_LINES.join("\n"),
            font_size: 12.0,
        }
    }

    fn line_height_mm(&self) -> f32 {
        self.font_size * PT_TO_MM * LINE_HEIGHT_FACTOR
    }

    pub fn chars_per_line(&self) -> usize {
        ((TEXT_WIDTH_MM / (self.font_size * PT_TO_MM * AVG_CHAR_EM)) as usize).max(1)
    }

    pub fn lines_per_page(&self) -> usize {
        (((PAGE_HEIGHT_MM - 2.0 * MARGIN_MM) / self.line_height_mm()) as usize).max(1)
    }

    /// Title (if any) followed by the wrapped body, split into pages.
    pub fn pages(&self) -> Vec<Vec<String>> {
        let mut lines = Vec::new();
        if let Some(title) = &self.title {
            lines.push(title.clone());
        }
        lines.extend(wrap_text(&self.body, self.chars_per_line()));
        paginate(lines, self.lines_per_page())
    }
}

/// Greedy word wrap. Existing line breaks are kept and words longer than
/// `width` are split.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            let mut word: Vec<char> = word.chars().collect();
            while word.len() > width {
                if !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                }
                let rest = word.split_off(width);
                lines.push(word.into_iter().collect());
                word = rest;
            }
            let word: String = word.into_iter().collect();
            let needed = if current.is_empty() {
                word.chars().count()
            } else {
                current.chars().count() + 1 + word.chars().count()
            };
            if needed > width {
                lines.push(std::mem::take(&mut current));
            }
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(&word);
        }
        lines.push(current);
    }

    lines
}

pub fn paginate(lines: Vec<String>, per_page: usize) -> Vec<Vec<String>> {
    if lines.is_empty() {
        return vec![Vec::new()];
    }
    lines
        .chunks(per_page.max(1))
        .map(|chunk| chunk.to_vec())
        .collect()
}

// The built-in PDF fonts only cover Latin-1.
fn latin1(line: &str) -> String {
    line.chars()
        .map(|c| if (c as u32) < 0x100 { c } else { '?' })
        .collect()
}

/// Renders a document to PDF bytes using the built-in Helvetica font.
pub fn render_pdf(document: &TextDocument) -> Result<Vec<u8>, ExportError> {
    let doc_title = document.title.as_deref().unwrap_or("AI LearnMate");
    let (doc, first_page, first_layer) =
        PdfDocument::new(doc_title, Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| ExportError::Render(format!("{:?}", e)))?;

    let line_height = document.line_height_mm();
    for (index, page_lines) in document.pages().iter().enumerate() {
        let layer = if index == 0 {
            doc.get_page(first_page).get_layer(first_layer)
        } else {
            let (page, layer) = doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
            doc.get_page(page).get_layer(layer)
        };

        let mut y = PAGE_HEIGHT_MM - MARGIN_MM;
        for line in page_lines {
            if !line.is_empty() {
                layer.use_text(latin1(line), document.font_size, Mm(MARGIN_MM), Mm(y), &font);
            }
            y -= line_height;
        }
    }

    doc.save_to_bytes()
        .map_err(|e| ExportError::Render(format!("{:?}", e)))
}

/// Turns text into a downloadable file.
pub trait DocumentExporter: Send + Sync {
    fn export(&self, document: &TextDocument, file_name: &str) -> Result<PathBuf, ExportError>;
}

/// Writes PDFs into a fixed directory.
#[derive(Debug, Clone)]
pub struct PdfExporter {
    output_dir: PathBuf,
}

impl PdfExporter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }
}

impl DocumentExporter for PdfExporter {
    fn export(&self, document: &TextDocument, file_name: &str) -> Result<PathBuf, ExportError> {
        let bytes = render_pdf(document)?;
        let path = self.output_dir.join(file_name);

        std::fs::create_dir_all(&self.output_dir).map_err(|source| ExportError::Io {
            path: self.output_dir.clone(),
            source,
        })?;
        std::fs::write(&path, &bytes).map_err(|source| ExportError::Io {
            path: path.clone(),
            source,
        })?;

        tracing::info!("📄 Exported {} ({} bytes)", path.display(), bytes.len());
        Ok(path)
    }
}
