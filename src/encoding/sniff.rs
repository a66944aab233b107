//! Statistical encoding inference over raw bytes
//!
//! Byte-pattern heuristics in the style of charset-guessing libraries:
//! explicit BOM markers first, then ISO-2022-JP escape sequences, then a
//! scoring pass that weighs Shift_JIS against EUC-JP byte structure.
//! Returns "no opinion" rather than guessing when the bytes carry no
//! recognizable signal.

/// Outcome of the statistical sniffer. Broader than the final tag set:
/// ASCII and UTF-32 are normalized away by the decision policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sniffed {
    Ascii,
    Utf8Bom,
    Utf16Le,
    Utf16Be,
    Utf32Le,
    Utf32Be,
    ShiftJis,
    EucJp,
    Iso2022Jp,
}

impl Sniffed {
    /// Whether this verdict came from an explicit byte-order mark.
    /// BOM verdicts are unambiguous and override the UTF-8 preference.
    pub fn has_bom(&self) -> bool {
        matches!(
            self,
            Sniffed::Utf8Bom
                | Sniffed::Utf16Le
                | Sniffed::Utf16Be
                | Sniffed::Utf32Le
                | Sniffed::Utf32Be
        )
    }
}

/// Infer a probable encoding from byte patterns, or `None` when there is
/// no usable signal (empty input, binary-looking data, inconclusive scores).
pub fn sniff(bytes: &[u8]) -> Option<Sniffed> {
    if bytes.is_empty() {
        return None;
    }

    if let Some(verdict) = sniff_bom(bytes) {
        return Some(verdict);
    }

    if has_jis_escape(bytes) {
        return Some(Sniffed::Iso2022Jp);
    }

    if looks_binary(bytes) {
        return None;
    }

    if bytes.iter().all(|&b| b < 0x80) {
        return Some(Sniffed::Ascii);
    }

    match (score_shift_jis(bytes), score_euc_jp(bytes)) {
        (None, None) => None,
        (Some(_), None) => Some(Sniffed::ShiftJis),
        (None, Some(_)) => Some(Sniffed::EucJp),
        (Some(sjis), Some(euc)) => {
            if euc > sjis {
                Some(Sniffed::EucJp)
            } else if sjis > euc {
                Some(Sniffed::ShiftJis)
            } else {
                None
            }
        }
    }
}

/// Explicit byte-order marks. UTF-32 LE must be checked before UTF-16 LE
/// since FF FE is a prefix of FF FE 00 00.
fn sniff_bom(bytes: &[u8]) -> Option<Sniffed> {
    if bytes.starts_with(&[0xFF, 0xFE, 0x00, 0x00]) {
        Some(Sniffed::Utf32Le)
    } else if bytes.starts_with(&[0x00, 0x00, 0xFE, 0xFF]) {
        Some(Sniffed::Utf32Be)
    } else if bytes.starts_with(&[0xEF, 0xBB, 0xBF]) {
        Some(Sniffed::Utf8Bom)
    } else if bytes.starts_with(&[0xFF, 0xFE]) {
        Some(Sniffed::Utf16Le)
    } else if bytes.starts_with(&[0xFE, 0xFF]) {
        Some(Sniffed::Utf16Be)
    } else {
        None
    }
}

/// ISO-2022-JP shifts between charsets with ESC sequences; their presence
/// is a strong signal since raw ESC is rare in text.
pub fn has_jis_escape(bytes: &[u8]) -> bool {
    bytes.windows(3).any(|w| {
        matches!(
            w,
            [0x1B, 0x24, 0x40] // ESC $ @  (JIS X 0208-1978)
                | [0x1B, 0x24, 0x42] // ESC $ B  (JIS X 0208-1983)
                | [0x1B, 0x28, 0x42] // ESC ( B  (ASCII)
                | [0x1B, 0x28, 0x4A] // ESC ( J  (JIS X 0201 roman)
                | [0x1B, 0x28, 0x49] // ESC ( I  (JIS X 0201 katakana)
        )
    })
}

/// Null/control-byte ratio check: heavily control-laden input is treated
/// as binary, not text, and yields no verdict.
fn looks_binary(bytes: &[u8]) -> bool {
    const SAMPLE: usize = 1024;
    let sample = &bytes[..bytes.len().min(SAMPLE)];

    let mut nulls = 0usize;
    let mut controls = 0usize;
    for &b in sample {
        if b == 0 {
            nulls += 1;
        } else if b < 0x20 && b != b'\t' && b != b'\n' && b != b'\r' && b != 0x0C {
            controls += 1;
        }
    }
    let len = sample.len() as f64;
    (nulls as f64) / len > 0.1 || (controls as f64) / len > 0.3
}

/// Score the byte stream as Shift_JIS. Double-byte pairs score high,
/// half-width katakana singles low (they are a classic false positive).
/// Returns `None` when the stream violates Shift_JIS structure.
fn score_shift_jis(bytes: &[u8]) -> Option<f64> {
    let mut score = 0.0;
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        if b < 0x80 {
            i += 1;
        } else if (0xA1..=0xDF).contains(&b) {
            // half-width katakana
            score += 0.5;
            i += 1;
        } else if (0x81..=0x9F).contains(&b) || (0xE0..=0xFC).contains(&b) {
            let trail = *bytes.get(i + 1)?;
            if (0x40..=0x7E).contains(&trail) || (0x80..=0xFC).contains(&trail) {
                score += 2.0;
                i += 2;
            } else {
                return None;
            }
        } else {
            return None;
        }
    }
    Some(score)
}

/// Score the byte stream as EUC-JP. Returns `None` on structural violations.
fn score_euc_jp(bytes: &[u8]) -> Option<f64> {
    let mut score = 0.0;
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        if b < 0x80 {
            i += 1;
        } else if b == 0x8E {
            // SS2: half-width katakana
            let trail = *bytes.get(i + 1)?;
            if (0xA1..=0xDF).contains(&trail) {
                score += 1.5;
                i += 2;
            } else {
                return None;
            }
        } else if b == 0x8F {
            // SS3: JIS X 0212 three-byte sequence
            let (t1, t2) = (*bytes.get(i + 1)?, *bytes.get(i + 2)?);
            if (0xA1..=0xFE).contains(&t1) && (0xA1..=0xFE).contains(&t2) {
                score += 2.0;
                i += 3;
            } else {
                return None;
            }
        } else if (0xA1..=0xFE).contains(&b) {
            let trail = *bytes.get(i + 1)?;
            if (0xA1..=0xFE).contains(&trail) {
                score += 2.0;
                i += 2;
            } else {
                return None;
            }
        } else {
            return None;
        }
    }
    Some(score)
}
