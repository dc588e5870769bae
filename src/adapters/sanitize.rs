//! Log sanitization for patient values.
//!
//! Log lines may mention clinical fields (`heart_rate=95`, `"creatinine": 1.3`)
//! or assessment ids. `SanitizingMakeWriter` wraps the tracing sink and
//! rewrites each formatted line before it leaves the process, so individual
//! call sites do not have to remember to redact.
//!
//! Input is capped per line (see `PROGNOS_SANITIZE_MAX_BYTES`).

use std::sync::OnceLock;

use regex::Regex;
use tracing_subscriber::fmt::MakeWriter;

use crate::domain::{BINARY_FIELDS, NUMERIC_BOUNDS};

const DEFAULT_SANITIZE_MAX_BYTES: usize = 16 * 1024;

struct Patterns {
    ansi: Regex,
    uuid: Regex,
    clinical_field: Regex,
}

fn max_sanitize_bytes() -> usize {
    std::env::var("PROGNOS_SANITIZE_MAX_BYTES")
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .filter(|&v| v > 0)
        .unwrap_or(DEFAULT_SANITIZE_MAX_BYTES)
}

fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        let fields: Vec<&str> = NUMERIC_BOUNDS
            .iter()
            .map(|b| b.field)
            .chain(BINARY_FIELDS)
            .chain(["admission_type", "temperature_c", "oxygen_saturation_pct"])
            .collect();

        // `field=value`, `field: value` and JSON `"field": value` forms.
        let clinical_field = format!(
            r#""?\b({})\b"?\s*[=:]\s*"?[A-Za-z0-9.+\-]+"?"#,
            fields.join("|")
        );

        Patterns {
            ansi: Regex::new(r"\x1b\[[0-9;]*m").expect("Valid regex"),
            uuid: Regex::new(
                r"[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}",
            )
            .expect("Valid regex"),
            clinical_field: Regex::new(&clinical_field).expect("Valid regex"),
        }
    })
}

fn truncate_to_char_boundary(input: &str, max_bytes: usize) -> (&str, bool) {
    if input.len() <= max_bytes {
        return (input, false);
    }
    let mut end = max_bytes;
    while end > 0 && !input.is_char_boundary(end) {
        end -= 1;
    }
    (&input[..end], true)
}

/// Redact clinical field values and ids from a string.
///
/// ANSI styling is stripped first; the formatter may place escape codes
/// between a field name and its value.
#[must_use]
pub fn sanitize(input: &str) -> String {
    sanitize_with_limit(input, max_sanitize_bytes())
}

fn sanitize_with_limit(input: &str, max_bytes: usize) -> String {
    let p = patterns();
    let (prefix, truncated) = truncate_to_char_boundary(input, max_bytes);

    let plain = p.ansi.replace_all(prefix, "");
    let redacted = p.uuid.replace_all(&plain, "[REDACTED-UUID]");
    let mut out = p
        .clinical_field
        .replace_all(&redacted, "${1}=[REDACTED]")
        .into_owned();

    if truncated {
        out.push_str(" [TRUNCATED]");
    }
    out
}

/// Check whether a string would be altered by `sanitize`.
#[must_use]
pub fn contains_patient_values(input: &str) -> bool {
    let p = patterns();
    let plain = p.ansi.replace_all(input, "");
    p.uuid.is_match(&plain) || p.clinical_field.is_match(&plain)
}

/// A `tracing_subscriber` writer wrapper that sanitizes each formatted log
/// line before it reaches the underlying sink.
#[derive(Debug, Clone)]
pub struct SanitizingMakeWriter<M> {
    inner: M,
}

impl<M> SanitizingMakeWriter<M> {
    #[must_use]
    pub fn new(inner: M) -> Self {
        Self { inner }
    }
}

pub struct SanitizingWriter<W: std::io::Write> {
    inner: W,
    buffer: Vec<u8>,
}

impl<W: std::io::Write> SanitizingWriter<W> {
    fn write_sanitized(&mut self, bytes: &[u8]) -> std::io::Result<()> {
        let text = String::from_utf8_lossy(bytes);
        self.inner.write_all(sanitize(&text).as_bytes())
    }

    fn flush_lines(&mut self) -> std::io::Result<()> {
        while let Some(pos) = self.buffer.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=pos).collect();
            self.write_sanitized(&line)?;
        }
        Ok(())
    }
}

impl<W: std::io::Write> std::io::Write for SanitizingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.buffer.extend_from_slice(buf);

        // A single line longer than twice the cap is emitted truncated.
        if self.buffer.len() > max_sanitize_bytes().saturating_mul(2) {
            let pending = std::mem::take(&mut self.buffer);
            self.write_sanitized(&pending)?;
            self.inner.write_all(b"\n")?;
            return Ok(buf.len());
        }

        self.flush_lines()?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flush_lines()?;
        if !self.buffer.is_empty() {
            let pending = std::mem::take(&mut self.buffer);
            self.write_sanitized(&pending)?;
        }
        self.inner.flush()
    }
}

impl<W: std::io::Write> Drop for SanitizingWriter<W> {
    fn drop(&mut self) {
        let _ = std::io::Write::flush(self);
    }
}

impl<'a, M> MakeWriter<'a> for SanitizingMakeWriter<M>
where
    M: MakeWriter<'a>,
{
    type Writer = SanitizingWriter<M::Writer>;

    fn make_writer(&'a self) -> Self::Writer {
        SanitizingWriter {
            inner: self.inner.make_writer(),
            buffer: Vec::new(),
        }
    }
}
