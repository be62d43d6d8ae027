//! Build timestamp and cache-busting naming.
//!
//! One minute-resolution UTC identifier (`YYYYMMDDHHMM`) is computed
//! once per process start and never changes afterwards. The same value
//! feeds both cache-busting variants - the filename rename applied to
//! compiled bundles and the `{{timestamp}}` token substituted into
//! markup output - so they can never disagree within one build.
//!
//! Date math is done directly from unix seconds, without a date crate.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use std::time::SystemTime;

/// Literal token replaced with the build timestamp in markup output.
pub const TIMESTAMP_TOKEN: &str = "{{timestamp}}";

/// Process-wide build timestamp.
static BUILD_STAMP: LazyLock<String> = LazyLock::new(|| format_stamp(unix_now()));

/// The process-wide build timestamp, e.g. `"202401011200"`.
pub fn build_timestamp() -> &'static str {
    &BUILD_STAMP
}

/// Current UTC year, for the template `year` helper.
pub fn current_year() -> u16 {
    civil_from_unix(unix_now()).0
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Format unix seconds as a `YYYYMMDDHHMM` UTC identifier.
pub fn format_stamp(secs: u64) -> String {
    let (year, month, day) = civil_from_unix(secs);
    let hour = (secs / 3600) % 24;
    let minute = (secs / 60) % 60;
    format!("{year:04}{month:02}{day:02}{hour:02}{minute:02}")
}

/// Convert unix seconds to a (year, month, day) civil UTC date.
///
/// Era-based algorithm over 400-year cycles; exact for the full u64
/// range this pipeline will ever see.
fn civil_from_unix(secs: u64) -> (u16, u8, u8) {
    let days = (secs / 86_400) as i64;
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z.rem_euclid(146_097);
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let year = yoe + era * 400;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = (doy - (153 * mp + 2) / 5 + 1) as u8;
    let month = if mp < 10 { mp + 3 } else { mp - 9 } as u8;
    let year = if month <= 2 { year + 1 } else { year } as u16;
    (year, month, day)
}

// ============================================================================
// cache-busting variants
// ============================================================================

/// Filename variant: `name.ext` -> `name.<stamp>.ext`.
///
/// Applied only to compiled script/style bundle outputs, and only when
/// cache busting is enabled; the caller owns both checks.
pub fn stamped_filename(path: &Path, stamp: &str) -> PathBuf {
    let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
        return path.to_path_buf();
    };
    let name = match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{stem}.{stamp}.{ext}"),
        None => format!("{stem}.{stamp}"),
    };
    path.with_file_name(name)
}

/// Content variant: replace every literal `{{timestamp}}` token.
pub fn replace_token(content: &str, stamp: &str) -> String {
    content.replace(TIMESTAMP_TOKEN, stamp)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_stamp_epoch() {
        assert_eq!(format_stamp(0), "197001010000");
    }

    #[test]
    fn test_format_stamp_known_instant() {
        // 2024-01-01T12:00:00Z
        assert_eq!(format_stamp(1_704_110_400), "202401011200");
    }

    #[test]
    fn test_civil_from_unix_leap_day() {
        // 2024-02-29T00:00:00Z
        assert_eq!(civil_from_unix(1_709_164_800), (2024, 2, 29));
    }

    #[test]
    fn test_build_timestamp_is_stable() {
        assert_eq!(build_timestamp(), build_timestamp());
        assert_eq!(build_timestamp().len(), 12);
    }

    #[test]
    fn test_stamped_filename() {
        assert_eq!(
            stamped_filename(Path::new("js/app.js"), "202401011200"),
            PathBuf::from("js/app.202401011200.js")
        );
        assert_eq!(
            stamped_filename(Path::new("LICENSE"), "202401011200"),
            PathBuf::from("LICENSE.202401011200")
        );
    }

    #[test]
    fn test_replace_token() {
        let html = r#"<script src="/app.{{timestamp}}.js"></script>"#;
        assert_eq!(
            replace_token(html, "202401011200"),
            r#"<script src="/app.202401011200.js"></script>"#
        );
        // No token: unchanged
        assert_eq!(replace_token("<p>hi</p>", "x"), "<p>hi</p>");
    }
}
