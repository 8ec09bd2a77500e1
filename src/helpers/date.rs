//! Date helper functions

use chrono::{DateTime, FixedOffset, Locale, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;

use crate::config::SiteConfig;
use crate::error::{BlogError, Result};

/// Locale-aware formatter for publication dates
///
/// # Examples
/// ```ignore
/// let formatter = DateFormatter::new("pt-BR", "UTC", "dd MMM yyyy")?;
/// formatter.format(Some("2021-03-25T12:00:00Z"))? // -> "25 mar 2021"
/// ```
#[derive(Debug, Clone)]
pub struct DateFormatter {
    locale: Locale,
    timezone: Tz,
    chrono_format: String,
}

impl DateFormatter {
    /// Create a formatter from a BCP 47 locale tag, an IANA timezone and a
    /// date-fns style pattern
    pub fn new(locale: &str, timezone: &str, pattern: &str) -> Result<Self> {
        let locale = parse_locale(locale)?;
        let timezone = timezone
            .parse::<Tz>()
            .map_err(|_| BlogError::Config(format!("unknown timezone: {}", timezone)))?;

        Ok(Self {
            locale,
            timezone,
            chrono_format: date_fns_to_chrono_format(pattern),
        })
    }

    pub fn from_config(config: &SiteConfig) -> Result<Self> {
        Self::new(&config.locale, &config.timezone, &config.date_format)
    }

    /// Format a raw publication timestamp; a missing timestamp is an error
    pub fn format(&self, raw: Option<&str>) -> Result<String> {
        let raw = raw.ok_or_else(|| BlogError::Format("publication date is null".to_string()))?;
        let date = parse_timestamp(raw)?;
        Ok(self.format_datetime(&date))
    }

    pub fn format_datetime<T: TimeZone>(&self, date: &DateTime<T>) -> String {
        date.with_timezone(&self.timezone)
            .format_localized(&self.chrono_format, self.locale)
            .to_string()
    }
}

/// Parse an ISO 8601 timestamp as emitted by the content API
///
/// Accepts RFC 3339 (`2021-03-25T12:00:00Z`), offsets without a colon
/// (`2021-03-25T19:25:28+0000`) and bare dates (`2021-03-25`, read as UTC).
pub fn parse_timestamp(raw: &str) -> Result<DateTime<FixedOffset>> {
    let raw = raw.trim();

    if let Ok(date) = DateTime::parse_from_rfc3339(raw) {
        return Ok(date);
    }

    for format in ["%Y-%m-%dT%H:%M:%S%z", "%Y-%m-%dT%H:%M:%S%.f%z"] {
        if let Ok(date) = DateTime::parse_from_str(raw, format) {
            return Ok(date);
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return Ok(Utc.from_utc_datetime(&midnight).fixed_offset());
        }
    }

    Err(BlogError::Format(format!("invalid timestamp: {:?}", raw)))
}

/// Format a timestamp for a `datetime` attribute
pub fn date_xml<Tz: TimeZone>(date: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    date.format("%Y-%m-%dT%H:%M:%S%:z").to_string()
}

/// Map a BCP 47 tag (`pt-BR`) onto a chrono locale (`pt_BR`)
fn parse_locale(tag: &str) -> Result<Locale> {
    let normalized = tag.replace('-', "_");
    Locale::try_from(normalized.as_str())
        .map_err(|_| BlogError::Config(format!("unsupported locale: {}", tag)))
}

/// Convert a date-fns format pattern to a chrono format string
///
/// Letters are read in runs (`dd`, `MMM`, `yyyy`); text inside single quotes
/// is copied verbatim.
fn date_fns_to_chrono_format(pattern: &str) -> String {
    let chars: Vec<char> = pattern.chars().collect();
    let mut result = String::with_capacity(pattern.len() * 2);
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        if c == '\'' {
            i += 1;
            while i < chars.len() && chars[i] != '\'' {
                push_literal(&mut result, chars[i]);
                i += 1;
            }
            i += 1;
            continue;
        }

        if !c.is_ascii_alphabetic() {
            push_literal(&mut result, c);
            i += 1;
            continue;
        }

        let mut run = 1;
        while i + run < chars.len() && chars[i + run] == c {
            run += 1;
        }

        let token = match (c, run) {
            ('y', 2) => "%y",
            ('y', _) => "%Y",
            ('M', 1) => "%-m",
            ('M', 2) => "%m",
            ('M', 3) => "%b",
            ('M', _) => "%B",
            ('d', 1) => "%-d",
            ('d', _) => "%d",
            ('E', 1..=3) => "%a",
            ('E', _) => "%A",
            ('H', 1) => "%-H",
            ('H', _) => "%H",
            ('h', 1) => "%-I",
            ('h', _) => "%I",
            ('m', 1) => "%-M",
            ('m', _) => "%M",
            ('s', 1) => "%-S",
            ('s', _) => "%S",
            ('a', _) => "%p",
            _ => "",
        };

        if token.is_empty() {
            for _ in 0..run {
                push_literal(&mut result, c);
            }
        } else {
            result.push_str(token);
        }
        i += run;
    }

    result
}

fn push_literal(out: &mut String, c: char) {
    if c == '%' {
        out.push_str("%%");
    } else {
        out.push(c);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pt_br() -> DateFormatter {
        DateFormatter::new("pt-BR", "America/Sao_Paulo", "dd MMM yyyy").unwrap()
    }

    #[test]
    fn test_format_pt_br() {
        let formatter = pt_br();
        assert_eq!(
            formatter.format(Some("2021-03-25T12:00:00Z")).unwrap(),
            "25 mar 2021"
        );
    }

    #[test]
    fn test_format_prismic_timestamp() {
        let formatter = pt_br();
        assert_eq!(
            formatter.format(Some("2021-04-19T19:25:28+0000")).unwrap(),
            "19 abr 2021"
        );
    }

    #[test]
    fn test_format_uses_display_timezone() {
        // 01:00 UTC is still the previous evening in Sao Paulo
        let formatter = pt_br();
        assert_eq!(
            formatter.format(Some("2021-03-26T01:00:00Z")).unwrap(),
            "25 mar 2021"
        );
    }

    #[test]
    fn test_null_and_invalid_dates() {
        let formatter = pt_br();
        assert!(matches!(formatter.format(None), Err(BlogError::Format(_))));
        assert!(matches!(
            formatter.format(Some("yesterday")),
            Err(BlogError::Format(_))
        ));
    }

    #[test]
    fn test_unknown_locale() {
        assert!(DateFormatter::new("xx-YY", "UTC", "dd MMM yyyy").is_err());
        assert!(DateFormatter::new("pt-BR", "Nowhere/City", "dd MMM yyyy").is_err());
    }

    #[test]
    fn test_date_fns_to_chrono() {
        assert_eq!(date_fns_to_chrono_format("dd MMM yyyy"), "%d %b %Y");
        assert_eq!(date_fns_to_chrono_format("yyyy-MM-dd HH:mm"), "%Y-%m-%d %H:%M");
        assert_eq!(date_fns_to_chrono_format("d 'de' MMMM"), "%-d de %B");
        assert_eq!(date_fns_to_chrono_format("100%"), "100%%");
    }

    #[test]
    fn test_date_xml() {
        let date = parse_timestamp("2021-03-25T12:00:00Z").unwrap();
        assert_eq!(date_xml(&date), "2021-03-25T12:00:00+00:00");
    }
}
