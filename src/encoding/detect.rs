//! Encoding detection cascade
//!
//! Given raw file bytes, produce a [`DecodedDocument`]: canonical text,
//! a concrete encoding tag, the detected EOL convention, and an optional
//! warning for ambiguous or lossy cases. Detection never fails — every
//! path degrades to UTF-8 plus a warning rather than erroring out, trading
//! silent data loss for a visible, dismissable message.

use super::sniff::{has_jis_escape, sniff, Sniffed};
use super::{decode_bytes, detect_eol, escape_form_feeds, normalize_eol, EncodingTag, Eol};

/// Result of detecting and decoding a file. Held by the editor session for
/// the life of the document; `encoding` and `eol` feed the save pipeline
/// unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedDocument {
    /// Canonical Unicode text: LF line endings, form feeds escaped.
    pub content: String,
    /// Concrete encoding tag. Never "unknown" — unresolvable input is
    /// decoded as UTF-8 with `warning` set.
    pub encoding: EncodingTag,
    /// Line-ending convention of the original bytes.
    pub eol: Eol,
    /// Present when detection was ambiguous or lossy. Must be surfaced to
    /// the user before an overwrite-save proceeds silently.
    pub warning: Option<String>,
}

/// Detection policy knobs, fed from persisted config.
#[derive(Debug, Clone, Copy)]
pub struct DetectorConfig {
    /// Prefer UTF-8 when the bytes are byte-exact valid UTF-8, even if the
    /// statistical sniffer suggested a legacy encoding. BOM verdicts always
    /// win regardless of this flag.
    pub prefer_utf8: bool,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self { prefer_utf8: true }
    }
}

/// Detect with the default policy. See [`detect_with`].
pub fn detect(bytes: &[u8]) -> DecodedDocument {
    detect_with(bytes, &DetectorConfig::default())
}

/// Ordered decision cascade:
///
/// 1. Strict UTF-8 check (byte-exact round trip).
/// 2. Statistical sniff over the raw bytes.
/// 3. Decision policy: prefer UTF-8 over non-BOM statistical verdicts
///    (attaching an ambiguity warning when the bytes are also plausible
///    as Shift_JIS or carry ISO-2022-JP escapes); otherwise trust the
///    sniffer with alias normalization (ASCII→UTF-8, UTF-32→UTF-8 with a
///    corruption warning); decode failures and no-signal input fall back
///    to UTF-8 with a warning.
/// 4. Post-processing: EOL detection + CRLF→LF normalization, form-feed
///    escaping.
pub fn detect_with(bytes: &[u8], config: &DetectorConfig) -> DecodedDocument {
    if bytes.is_empty() {
        // Trivially decodable, but there is nothing to detect from.
        return DecodedDocument {
            content: String::new(),
            encoding: EncodingTag::Utf8,
            eol: Eol::Lf,
            warning: Some(no_signal_warning()),
        };
    }

    let strict_utf8 = std::str::from_utf8(bytes).ok();
    let sniffed = sniff(bytes);
    let bom = sniffed.map(|s| s.has_bom()).unwrap_or(false);

    let (text, encoding, warning) = match (strict_utf8, sniffed) {
        (Some(text), verdict) if config.prefer_utf8 && !bom => {
            // Valid UTF-8 wins over statistical false positives, with a
            // cautionary warning when the legacy reading is also plausible.
            let warning = if shift_jis_plausible(bytes) {
                Some(
                    "This file is valid UTF-8 but could also be Shift_JIS. \
                     Opened as UTF-8; change the encoding manually if the text looks wrong."
                        .to_string(),
                )
            } else if matches!(verdict, Some(Sniffed::Iso2022Jp)) || has_jis_escape(bytes) {
                Some(
                    "This file contains ISO-2022-JP escape sequences but was opened as UTF-8. \
                     Change the encoding manually if the text looks wrong."
                        .to_string(),
                )
            } else {
                None
            };
            (text.to_string(), EncodingTag::Utf8, warning)
        }
        (_, Some(verdict)) => decode_sniffed(bytes, verdict),
        (Some(text), None) => {
            // prefer_utf8 disabled and the sniffer had no opinion; the
            // strict check still resolves the bytes unambiguously.
            (text.to_string(), EncodingTag::Utf8, None)
        }
        (None, None) => {
            let (text, _) = decode_bytes(EncodingTag::Utf8, bytes);
            (text, EncodingTag::Utf8, Some(no_signal_warning()))
        }
    };

    let eol = detect_eol(&text);
    let content = escape_form_feeds(&normalize_eol(&text));

    if let Some(w) = &warning {
        tracing::debug!(encoding = %encoding, warning = %w, "encoding detection degraded");
    }

    DecodedDocument {
        content,
        encoding,
        eol,
        warning,
    }
}

/// Decode according to a statistical verdict, normalizing aliases and
/// falling back to UTF-8 when the decode mangles the input.
fn decode_sniffed(bytes: &[u8], verdict: Sniffed) -> (String, EncodingTag, Option<String>) {
    let tag = match verdict {
        // ASCII is a strict UTF-8 subset; normalize exactly.
        Sniffed::Ascii => {
            let (text, _) = decode_bytes(EncodingTag::Utf8, bytes);
            return (text, EncodingTag::Utf8, None);
        }
        // Not supported as a concrete tag; open as UTF-8 and warn.
        Sniffed::Utf32Le | Sniffed::Utf32Be => {
            let (text, _) = decode_bytes(EncodingTag::Utf8, bytes);
            return (
                text,
                EncodingTag::Utf8,
                Some(
                    "UTF-32 is not supported. Opened as UTF-8 instead; \
                     check the text for corruption."
                        .to_string(),
                ),
            );
        }
        Sniffed::Utf8Bom => EncodingTag::Utf8Bom,
        Sniffed::Utf16Le => EncodingTag::Utf16Le,
        Sniffed::Utf16Be => EncodingTag::Utf16Be,
        Sniffed::ShiftJis => EncodingTag::ShiftJis,
        Sniffed::EucJp => EncodingTag::EucJp,
        Sniffed::Iso2022Jp => EncodingTag::Iso2022Jp,
    };

    let (text, had_errors) = decode_bytes(tag, bytes);
    if had_errors {
        let (fallback, _) = decode_bytes(EncodingTag::Utf8, bytes);
        return (
            fallback,
            EncodingTag::Utf8,
            Some(format!(
                "Decoding as {} failed. Opened as UTF-8 instead; \
                 check the text for corruption.",
                tag
            )),
        );
    }
    (text, tag, None)
}

/// Shift_JIS and UTF-8 byte sequences rarely but genuinely collide. The
/// bytes are "plausible Shift_JIS" when they decode cleanly, re-encode to
/// the identical byte string, and actually contain non-ASCII bytes.
fn shift_jis_plausible(bytes: &[u8]) -> bool {
    if bytes.iter().all(|&b| b < 0x80) {
        return false;
    }
    let (text, _, had_errors) = encoding_rs::SHIFT_JIS.decode(bytes);
    if had_errors {
        return false;
    }
    let (reencoded, _, enc_errors) = encoding_rs::SHIFT_JIS.encode(&text);
    !enc_errors && reencoded.as_ref() == bytes
}

fn no_signal_warning() -> String {
    "Could not auto-detect the text encoding. Opened as UTF-8.".to_string()
}
