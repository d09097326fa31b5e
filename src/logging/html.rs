//! HTML rendering for log files
//!
//! Each log file is an HTML document: a header with inline CSS written once
//! when the file is created, followed by one table row per record. The
//! document is never closed; the sink appends rows for the lifetime of the
//! file, so viewers must tolerate missing trailing tags.

use super::record::LogRecord;

/// Inline stylesheet for the log table
///
/// Warn/error/fatal rows get a bold red level cell; rows alternate shading.
const STYLE: &str = "<style type=\"text/css\">
table { margin-left: 2em; margin-right: 2em; border-left: 2px solid #AAA; }
TR.even { background: #FFFFFF; }
TR.odd { background: #EAEAEA; }
TR.warn TD.Level, TR.error TD.Level, TR.fatal TD.Level { font-weight: bold; color: #FF4040 }
TD { padding-right: 1ex; padding-left: 1ex; border-right: 2px solid #AAA; max-width: 1200px; word-wrap: break-word; }
TD.Time { text-align: right; font-family: courier, monospace; font-size: smaller; word-wrap: normal; }
TD.Level { text-align: right; }
TD.Message { text-align: left; }
TR.header { background: #596ED5; color: #FFF; font-weight: bold; font-size: larger; }
</style>";

/// Renders log records as rows of an HTML table
#[derive(Debug, Default)]
pub struct HtmlFormatter {
    /// Rows emitted so far, drives even/odd shading
    row_count: u64,
}

impl HtmlFormatter {
    /// Create a new formatter
    pub fn new() -> Self {
        Self::default()
    }

    /// Render the document header written once per freshly created file
    ///
    /// A file appended to after a restart already carries its header, so the
    /// sink must not emit this twice into the same file.
    pub fn document_header(&self) -> String {
        format!(
            "<html>\n<head>\n<title>support log</title>\n{STYLE}\n</head>\n<body>\n\
             <table cellspacing=\"0\">\n<tr class=\"header\">\n\
             <td class=\"Time\">Time</td>\n<td class=\"Level\">Level</td>\n\
             <td class=\"Message\">Message</td>\n</tr>\n"
        )
    }

    /// Render one record as a table row
    pub fn render_row(&mut self, record: &LogRecord) -> String {
        let parity = if self.row_count % 2 == 0 { "even" } else { "odd" };
        self.row_count += 1;
        format!(
            "<tr class=\"{} {}\">\n<td class=\"Time\">{}</td>\n<td class=\"Level\">{}</td>\n<td class=\"Message\">{}</td>\n</tr>\n",
            record.level.css_class(),
            parity,
            record.timestamp.format("%H:%M:%S%.3f"),
            record.level.as_str(),
            escape_html(&record.message),
        )
    }
}

/// Escape a message for embedding in an HTML cell
///
/// Markup characters become entities, newlines become line breaks, and other
/// control characters are replaced rather than rejected: a record is never
/// dropped because of its content.
fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\n' => escaped.push_str("<br />"),
            '\t' => escaped.push(c),
            c if c.is_control() => escaped.push('\u{FFFD}'),
            c => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::super::record::{LogLevel, LogRecord};
    use super::*;
    use chrono::{Local, TimeZone};

    fn record_at(level: LogLevel, message: &str) -> LogRecord {
        LogRecord {
            timestamp: Local.with_ymd_and_hms(2026, 8, 6, 14, 30, 45).unwrap(),
            level,
            message: message.to_string(),
        }
    }

    #[test]
    fn test_document_header_is_unclosed() {
        let header = HtmlFormatter::new().document_header();
        assert!(header.contains("<style type=\"text/css\">"));
        assert!(header.contains("<tr class=\"header\">"));
        assert!(!header.contains("</table>"));
        assert!(!header.contains("</html>"));
    }

    #[test]
    fn test_render_row_contents() {
        let mut formatter = HtmlFormatter::new();
        let row = formatter.render_row(&record_at(LogLevel::Error, "Net: timeout"));
        assert!(row.contains("Net: timeout"));
        assert!(row.contains("14:30:45.000"));
        assert!(row.contains("<td class=\"Level\">ERROR</td>"));
    }

    #[test]
    fn test_alert_rows_are_distinguished() {
        let mut formatter = HtmlFormatter::new();
        let info = formatter.render_row(&record_at(LogLevel::Info, "ok"));
        let error = formatter.render_row(&record_at(LogLevel::Error, "bad"));
        assert!(info.starts_with("<tr class=\"info "));
        assert!(error.starts_with("<tr class=\"error "));
    }

    #[test]
    fn test_row_shading_alternates() {
        let mut formatter = HtmlFormatter::new();
        let first = formatter.render_row(&record_at(LogLevel::Info, "a"));
        let second = formatter.render_row(&record_at(LogLevel::Info, "b"));
        let third = formatter.render_row(&record_at(LogLevel::Info, "c"));
        assert!(first.contains("even"));
        assert!(second.contains("odd"));
        assert!(third.contains("even"));
    }

    #[test]
    fn test_escaping() {
        let mut formatter = HtmlFormatter::new();
        let row = formatter.render_row(&record_at(LogLevel::Info, "a < b && \"c\""));
        assert!(row.contains("a &lt; b &amp;&amp; &quot;c&quot;"));
    }

    #[test]
    fn test_control_characters_are_sanitized() {
        let row = HtmlFormatter::new().render_row(&record_at(LogLevel::Info, "a\u{0}b\nc"));
        assert!(row.contains("a\u{FFFD}b<br />c"));
    }
}
