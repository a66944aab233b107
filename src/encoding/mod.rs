//! Text encoding tags, decode/encode round trips, and line-ending handling
//!
//! The detector (`detect`) turns raw file bytes into a [`DecodedDocument`]
//! holding canonical text (LF line endings, form feeds escaped) plus the
//! encoding and EOL metadata the save pipeline needs to reproduce the
//! original byte form.

pub mod detect;
pub mod sniff;

pub use detect::{detect, detect_with, DecodedDocument, DetectorConfig};

use serde::{Deserialize, Serialize};

/// Visible placeholder for the form-feed control character.
///
/// Raw form feeds corrupt line-based rendering downstream, so the detector
/// replaces them with this token on load and the save pipeline restores
/// them on write. The token must never leak unescaped into preview output
/// or any other external surface.
pub const PAGE_BREAK_TOKEN: &str = "\\f";

const FORM_FEED: char = '\u{000C}';

/// Concrete text encoding of a file on disk.
///
/// Detection never leaves this unset: unknown input resolves to `Utf8`
/// with a warning on the decoded document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EncodingTag {
    Utf8,
    Utf8Bom,
    ShiftJis,
    EucJp,
    Iso2022Jp,
    Utf16Le,
    Utf16Be,
}

impl EncodingTag {
    /// User-facing display name (shown in the status bar and save dialogs)
    pub fn display_name(&self) -> &'static str {
        match self {
            EncodingTag::Utf8 => "UTF-8",
            EncodingTag::Utf8Bom => "UTF-8 (BOM)",
            EncodingTag::ShiftJis => "Shift_JIS",
            EncodingTag::EucJp => "EUC-JP",
            EncodingTag::Iso2022Jp => "ISO-2022-JP",
            EncodingTag::Utf16Le => "UTF-16LE",
            EncodingTag::Utf16Be => "UTF-16BE",
        }
    }

    /// Parse a user-supplied encoding label (CLI override, config)
    pub fn from_label(label: &str) -> Option<Self> {
        let normalized: String = label
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "utf8" => Some(EncodingTag::Utf8),
            "utf8bom" => Some(EncodingTag::Utf8Bom),
            "shiftjis" | "sjis" | "cp932" | "windows31j" => Some(EncodingTag::ShiftJis),
            "eucjp" => Some(EncodingTag::EucJp),
            "iso2022jp" | "jis" => Some(EncodingTag::Iso2022Jp),
            "utf16le" | "utf16" => Some(EncodingTag::Utf16Le),
            "utf16be" => Some(EncodingTag::Utf16Be),
            _ => None,
        }
    }

    fn encoding_rs(&self) -> Option<&'static encoding_rs::Encoding> {
        match self {
            EncodingTag::Utf8 | EncodingTag::Utf8Bom => Some(encoding_rs::UTF_8),
            EncodingTag::ShiftJis => Some(encoding_rs::SHIFT_JIS),
            EncodingTag::EucJp => Some(encoding_rs::EUC_JP),
            EncodingTag::Iso2022Jp => Some(encoding_rs::ISO_2022_JP),
            // The Encoding Standard makes UTF-16 decode-only; encoding is
            // done by hand in encode_text.
            EncodingTag::Utf16Le | EncodingTag::Utf16Be => None,
        }
    }
}

impl std::fmt::Display for EncodingTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// End-of-line convention, detected on load and reapplied on save.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Eol {
    #[default]
    Lf,
    Crlf,
}

impl Eol {
    pub fn display_name(&self) -> &'static str {
        match self {
            Eol::Lf => "LF",
            Eol::Crlf => "CRLF",
        }
    }
}

impl std::fmt::Display for Eol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Detect the EOL convention from the first line break in decoded text.
///
/// Text with no line breaks defaults to LF.
pub fn detect_eol(text: &str) -> Eol {
    match text.find('\n') {
        Some(idx) if idx > 0 && text.as_bytes()[idx - 1] == b'\r' => Eol::Crlf,
        _ => Eol::Lf,
    }
}

/// Normalize CRLF to LF. Canonical text never contains a raw CR-LF pair.
pub fn normalize_eol(text: &str) -> String {
    text.replace("\r\n", "\n")
}

/// Expand canonical LF line endings to the requested convention.
pub fn restore_eol(text: &str, eol: Eol) -> String {
    match eol {
        Eol::Lf => text.to_string(),
        Eol::Crlf => text.replace('\n', "\r\n"),
    }
}

/// Replace raw form feeds with the visible page-break token.
pub fn escape_form_feeds(text: &str) -> String {
    text.replace(FORM_FEED, PAGE_BREAK_TOKEN)
}

/// Restore raw form feeds from the page-break token (inverse of
/// [`escape_form_feeds`], applied by the save pipeline).
pub fn unescape_form_feeds(text: &str) -> String {
    text.replace(PAGE_BREAK_TOKEN, "\u{000C}")
}

/// Decode raw bytes with the given tag's decoder.
///
/// Returns the decoded text and whether malformed sequences were replaced.
/// A leading BOM matching the tag is stripped; any other byte sequence is
/// decoded as content. The BOM-sniffing `decode` entry points of
/// `encoding_rs` are deliberately avoided here: they switch decoders on a
/// foreign BOM, which would make the UTF-8 fallback silently decode a
/// UTF-32LE-marked file as UTF-16LE.
pub fn decode_bytes(tag: EncodingTag, bytes: &[u8]) -> (String, bool) {
    let (encoding, bom): (&'static encoding_rs::Encoding, &[u8]) = match tag {
        EncodingTag::Utf8 => (encoding_rs::UTF_8, &[]),
        EncodingTag::Utf8Bom => (encoding_rs::UTF_8, &[0xEF, 0xBB, 0xBF]),
        EncodingTag::Utf16Le => (encoding_rs::UTF_16LE, &[0xFF, 0xFE]),
        EncodingTag::Utf16Be => (encoding_rs::UTF_16BE, &[0xFE, 0xFF]),
        EncodingTag::ShiftJis => (encoding_rs::SHIFT_JIS, &[]),
        EncodingTag::EucJp => (encoding_rs::EUC_JP, &[]),
        EncodingTag::Iso2022Jp => (encoding_rs::ISO_2022_JP, &[]),
    };
    let body = bytes.strip_prefix(bom).unwrap_or(bytes);
    let (text, had_errors) = encoding.decode_without_bom_handling(body);
    (text.into_owned(), had_errors)
}

/// Re-encode canonical text into the byte form a file with this tag carries.
///
/// This is the exact inverse of the detector's decode step: form feeds are
/// restored, the recorded EOL convention is applied, then the text is
/// encoded with the recorded tag (BOM included where the tag implies one).
/// Unmappable characters are substituted by the encoder; the substitution
/// is logged and left to the save pipeline's size tripwire to catch.
pub fn encode_for_disk(content: &str, tag: EncodingTag, eol: Eol) -> Vec<u8> {
    let raw = unescape_form_feeds(content);
    let text = restore_eol(&raw, eol);
    encode_text(&text, tag)
}

fn encode_text(text: &str, tag: EncodingTag) -> Vec<u8> {
    match tag {
        EncodingTag::Utf8 => text.as_bytes().to_vec(),
        EncodingTag::Utf8Bom => {
            let mut bytes = vec![0xEF, 0xBB, 0xBF];
            bytes.extend_from_slice(text.as_bytes());
            bytes
        }
        EncodingTag::Utf16Le => {
            let mut bytes = vec![0xFF, 0xFE];
            for unit in text.encode_utf16() {
                bytes.extend_from_slice(&unit.to_le_bytes());
            }
            bytes
        }
        EncodingTag::Utf16Be => {
            let mut bytes = vec![0xFE, 0xFF];
            for unit in text.encode_utf16() {
                bytes.extend_from_slice(&unit.to_be_bytes());
            }
            bytes
        }
        EncodingTag::ShiftJis | EncodingTag::EucJp | EncodingTag::Iso2022Jp => {
            let encoding = tag.encoding_rs().unwrap_or(encoding_rs::UTF_8);
            let (bytes, _, had_errors) = encoding.encode(text);
            if had_errors {
                tracing::warn!(
                    "Some characters could not be encoded as {} and were substituted",
                    tag
                );
            }
            bytes.into_owned()
        }
    }
}
