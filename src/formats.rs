//! Format Detection
//!
//! A fast extension allow-list, optionally refined by a content check.
//! When the content check errors, the extension verdict stands (fail-open),
//! so the menu entry is never hidden because the sniffer could not decide.

use crate::error::{CleanError, CleanResult};
use lazy_static::lazy_static;
use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;

lazy_static! {
    /// Extensions mat2 knows how to clean, lowercase with leading dot
    static ref SUPPORTED_EXTENSIONS: HashSet<&'static str> = [
        // Images
        ".jpg", ".jpeg", ".png", ".gif", ".bmp", ".tiff", ".tif", ".webp",
        ".heic", ".ppm", ".svg", ".svgz",
        // Documents
        ".pdf", ".odt", ".ods", ".odp", ".odg", ".odf", ".odi", ".odc",
        ".docx", ".xlsx", ".pptx", ".epub", ".ncx",
        // Audio
        ".mp3", ".mp1", ".mp2", ".mpga", ".mpega", ".flac", ".ogg", ".oga",
        ".opus", ".spx", ".wav", ".aif", ".aiff", ".aifc",
        // Video
        ".mp4", ".mpg4", ".m4v", ".avi", ".wmv",
        // Archives
        ".zip", ".tar", ".tar.gz", ".tar.bz2", ".tar.xz", ".torrent",
        // Web
        ".html", ".htm", ".shtml", ".xhtml", ".xht", ".css",
        // Text
        ".txt", ".text",
    ]
    .into_iter()
    .collect();
}

/// Longest allow-listed extension matching the file name, if any.
///
/// Compound archive suffixes such as `.tar.gz` win over their last part.
pub fn matched_extension(path: &Path) -> Option<String> {
    let name = path.file_name()?.to_string_lossy().to_lowercase();
    name.match_indices('.')
        .map(|(idx, _)| idx)
        // a leading dot marks a hidden file, not an extension
        .filter(|&idx| idx > 0)
        .map(|idx| &name[idx..])
        .find(|candidate| SUPPORTED_EXTENSIONS.contains(*candidate))
        .map(str::to_string)
}

/// Deeper content check that can refine the extension verdict.
pub trait FormatSniffer: Send + Sync + std::fmt::Debug {
    /// `Ok(true)` when the content looks like the claimed format,
    /// `Ok(false)` when it clearly does not, `Err` when undecidable.
    fn sniff(&self, path: &Path, extension: &str) -> CleanResult<bool>;
}

/// Magic-number check for formats that carry a signature.
///
/// Text-based formats (HTML, CSS, SVG, plain text) and formats with loose
/// framing (MP3, MPEG audio) have no reliable signature and are reported as
/// undecidable.
#[derive(Debug, Default)]
pub struct SignatureSniffer;

/// Bytes read from the head of a file for signature matching
const SNIFF_LEN: usize = 512;

impl SignatureSniffer {
    pub fn new() -> Self {
        Self
    }

    fn matches(extension: &str, head: &[u8]) -> Option<bool> {
        let starts = |sig: &[u8]| head.starts_with(sig);
        let at = |offset: usize, sig: &[u8]| {
            head.len() >= offset + sig.len() && &head[offset..offset + sig.len()] == sig
        };
        let riff = |kind: &[u8]| starts(b"RIFF") && at(8, kind);
        let form = starts(b"FORM") && (at(8, b"AIFF") || at(8, b"AIFC"));

        let verdict = match extension {
            ".pdf" => starts(b"%PDF"),
            ".png" => starts(b"\x89PNG\r\n\x1a\n"),
            ".jpg" | ".jpeg" => starts(&[0xFF, 0xD8, 0xFF]),
            ".gif" => starts(b"GIF87a") || starts(b"GIF89a"),
            ".bmp" => starts(b"BM"),
            ".tif" | ".tiff" => starts(b"II*\0") || starts(b"MM\0*"),
            ".webp" => riff(b"WEBP"),
            ".wav" => riff(b"WAVE"),
            ".avi" => riff(b"AVI "),
            ".aif" | ".aiff" | ".aifc" => form,
            ".heic" | ".mp4" | ".mpg4" | ".m4v" => at(4, b"ftyp"),
            ".ppm" => starts(b"P3") || starts(b"P6"),
            ".flac" => starts(b"fLaC"),
            ".ogg" | ".oga" | ".opus" | ".spx" => starts(b"OggS"),
            ".wmv" => starts(&[0x30, 0x26, 0xB2, 0x75, 0x8E, 0x66, 0xCF, 0x11]),
            ".svgz" | ".tar.gz" => starts(&[0x1F, 0x8B]),
            ".tar.bz2" => starts(b"BZh"),
            ".tar.xz" => starts(&[0xFD, b'7', b'z', b'X', b'Z', 0x00]),
            // pre-POSIX tarballs carry no magic at all
            ".tar" if at(257, b"ustar") => true,
            ".tar" => return None,
            ".torrent" => starts(b"d"),
            // OpenDocument, OOXML and EPUB are all zip containers
            ".zip" | ".docx" | ".xlsx" | ".pptx" | ".epub" | ".odt" | ".ods" | ".odp"
            | ".odg" | ".odf" | ".odi" | ".odc" => starts(b"PK\x03\x04"),
            _ => return None,
        };
        Some(verdict)
    }
}

impl FormatSniffer for SignatureSniffer {
    fn sniff(&self, path: &Path, extension: &str) -> CleanResult<bool> {
        let mut head = Vec::with_capacity(SNIFF_LEN);
        File::open(path)?
            .take(SNIFF_LEN as u64)
            .read_to_end(&mut head)?;

        if head.is_empty() {
            return Err(CleanError::Sniff(format!("{} is empty", path.display())));
        }

        Self::matches(extension, &head)
            .ok_or_else(|| CleanError::Sniff(format!("no signature for {}", extension)))
    }
}

/// Decides whether a file is worth offering to the cleaner.
#[derive(Debug, Default)]
pub struct FormatFilter {
    sniffer: Option<Box<dyn FormatSniffer>>,
}

impl FormatFilter {
    /// Extension check only
    pub fn extension_only() -> Self {
        Self { sniffer: None }
    }

    pub fn with_sniffer(sniffer: Box<dyn FormatSniffer>) -> Self {
        Self {
            sniffer: Some(sniffer),
        }
    }

    pub fn from_config(config: &crate::config::Config) -> Self {
        if config.deep_check {
            Self::with_sniffer(Box::new(SignatureSniffer::new()))
        } else {
            Self::extension_only()
        }
    }

    pub fn is_supported(&self, path: &Path) -> bool {
        let Some(extension) = matched_extension(path) else {
            return false;
        };

        let Some(sniffer) = &self.sniffer else {
            return true;
        };

        match sniffer.sniff(path, &extension) {
            Ok(verdict) => verdict,
            Err(e) => {
                // Extension matched, assume supported
                debug!("Format check failed for {}: {}", path.display(), e);
                true
            }
        }
    }
}
