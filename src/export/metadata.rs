//! Application metadata embedded at the end of every SMF/T file.

use base64::engine::general_purpose::URL_SAFE;
use base64::Engine;
use chrono::{DateTime, Utc};

/// Schema identifier of the application metadata block.
pub const METADATA_SCHEMA_ID: &str = "com.io7m.smf.application";
/// Major version of the application metadata schema.
pub const METADATA_SCHEMA_MAJOR: u32 = 1;
/// Minor version of the application metadata schema.
pub const METADATA_SCHEMA_MINOR: u32 = 0;

/// Role recorded for the exporting application.
pub const APP_ROLE_AUTHOR: &str = "author";

/// The `key: value` record stored in the metadata block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportMetadata {
    /// Export time, rendered in UTC.
    pub time: DateTime<Utc>,
    pub app_role: String,
    /// Authoring application name and version.
    pub app_version: String,
    /// Semantic version of the exporter writing the format.
    pub smf_version: String,
}

impl ExportMetadata {
    /// Metadata for an export happening now.
    pub fn new(application: impl Into<String>) -> Self {
        Self {
            time: Utc::now(),
            app_role: APP_ROLE_AUTHOR.to_string(),
            app_version: application.into(),
            smf_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    pub fn with_time(mut self, time: DateTime<Utc>) -> Self {
        self.time = time;
        self
    }

    /// The plaintext record, one `key: value` line per field.
    pub fn record(&self) -> String {
        format!(
            "time: {}\napp.role: {}\napp.version: {}\nsmf.version: {}\n",
            self.time.format("%Y-%m-%dT%H:%M:%S%z"),
            self.app_role,
            self.app_version,
            self.smf_version
        )
    }

    /// The record as URL-safe base64.
    pub fn encode(&self) -> String {
        URL_SAFE.encode(self.record().as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed() -> ExportMetadata {
        let time = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 5).unwrap();
        ExportMetadata::new("Blender 2.79").with_time(time)
    }

    #[test]
    fn test_record_contents() {
        let record = fixed().record();
        let lines: Vec<_> = record.lines().collect();

        assert_eq!(lines[0], "time: 2024-03-01T12:30:05+0000");
        assert_eq!(lines[1], "app.role: author");
        assert_eq!(lines[2], "app.version: Blender 2.79");
        assert_eq!(lines[3], format!("smf.version: {}", env!("CARGO_PKG_VERSION")));
        assert!(record.ends_with('\n'));
    }

    #[test]
    fn test_encoded_record_decodes() {
        let metadata = fixed();
        let encoded = metadata.encode();

        assert!(!encoded.contains('+') && !encoded.contains('/'));
        let decoded = URL_SAFE.decode(encoded.as_bytes()).unwrap();
        assert_eq!(String::from_utf8(decoded).unwrap(), metadata.record());
    }
}
