use std::path::Path;

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::store::error::StoreError;

/// One named TLE from an ingest file.
#[derive(Debug, Clone, PartialEq)]
pub struct TleGroup {
    pub name: Option<String>,
    pub line1: String,
    pub line2: String,
}

/// Parse multi-satellite TLE text: any mix of 3-line (name + elements) and
/// bare 2-line groups. Lines that fit neither form are skipped.
pub fn parse_tle_groups(content: &str) -> Vec<TleGroup> {
    let lines: Vec<&str> = content
        .lines()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .collect();

    let mut groups = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        if lines[i].starts_with("1 ") && i + 1 < lines.len() && lines[i + 1].starts_with("2 ") {
            groups.push(TleGroup {
                name: None,
                line1: lines[i].to_string(),
                line2: lines[i + 1].to_string(),
            });
            i += 2;
        } else if i + 2 < lines.len()
            && lines[i + 1].starts_with("1 ")
            && lines[i + 2].starts_with("2 ")
        {
            groups.push(TleGroup {
                name: Some(lines[i].to_string()),
                line1: lines[i + 1].to_string(),
                line2: lines[i + 2].to_string(),
            });
            i += 3;
        } else {
            i += 1;
        }
    }

    groups
}

#[derive(Debug, Default)]
pub struct IngestReport {
    pub stored: usize,
    pub skipped: usize,
}

/// Loads TLE files into the element store: satellites upserted by NORAD id,
/// each element set appended to the history with its parsed epoch.
pub struct TleIngestor {
    pool: PgPool,
}

const UPSERT_SATELLITE_SQL: &str = r#"
INSERT INTO satellites (norad_cat_id, name)
VALUES ($1, $2)
ON CONFLICT (norad_cat_id) DO UPDATE SET name = EXCLUDED.name
RETURNING id
"#;

const INSERT_TLE_SQL: &str = r#"
INSERT INTO tles (satellite_id, epoch, line1, line2)
VALUES ($1, $2, $3, $4)
"#;

fn celestrak_url(norad_id: u32) -> String {
    format!("https://celestrak.org/NORAD/elements/gp.php?CATNR={norad_id}&FORMAT=tle")
}

impl TleIngestor {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn ingest_file(&self, path: &Path) -> Result<IngestReport, StoreError> {
        let content = tokio::fs::read_to_string(path).await?;
        self.ingest_text(&content, &path.display().to_string()).await
    }

    /// Pulls the current TLE for each NORAD id from Celestrak and stores it.
    /// A failed request skips that id; only database errors abort the run.
    pub async fn fetch_norad_ids(&self, norad_ids: &[u32]) -> Result<IngestReport, StoreError> {
        let client = reqwest::Client::new();
        let mut report = IngestReport::default();

        for &norad_id in norad_ids {
            let body = match client
                .get(celestrak_url(norad_id))
                .send()
                .await
                .and_then(|response| response.error_for_status())
            {
                Ok(response) => match response.text().await {
                    Ok(body) => body,
                    Err(e) => {
                        log::warn!("NORAD {norad_id}: reading Celestrak response failed: {e}");
                        report.skipped += 1;
                        continue;
                    }
                },
                Err(e) => {
                    log::warn!("NORAD {norad_id}: Celestrak request failed: {e}");
                    report.skipped += 1;
                    continue;
                }
            };

            let source = format!("NORAD {norad_id}");
            let partial = self.ingest_text(&body, &source).await?;
            if partial.stored == 0 {
                log::warn!("NORAD {norad_id}: no usable TLE data in Celestrak response");
            }
            report.stored += partial.stored;
            report.skipped += partial.skipped;
        }

        Ok(report)
    }

    async fn ingest_text(&self, content: &str, source: &str) -> Result<IngestReport, StoreError> {
        let mut report = IngestReport::default();

        for group in parse_tle_groups(content) {
            // sgp4 validates the lines and recovers the epoch for us
            let elements = match sgp4::Elements::from_tle(
                group.name.clone(),
                group.line1.as_bytes(),
                group.line2.as_bytes(),
            ) {
                Ok(e) => e,
                Err(e) => {
                    log::warn!("{}: skipping malformed TLE group: {}", source, e);
                    report.skipped += 1;
                    continue;
                }
            };

            let name = group
                .name
                .unwrap_or_else(|| format!("NORAD {}", elements.norad_id));
            let epoch: DateTime<Utc> =
                DateTime::from_naive_utc_and_offset(elements.datetime, Utc);

            let (satellite_id,): (i64,) = sqlx::query_as(UPSERT_SATELLITE_SQL)
                .bind(elements.norad_id as i32)
                .bind(&name)
                .fetch_one(&self.pool)
                .await?;

            sqlx::query(INSERT_TLE_SQL)
                .bind(satellite_id)
                .bind(epoch)
                .bind(&group.line1)
                .bind(&group.line2)
                .execute(&self.pool)
                .await?;

            log::info!("stored TLE for {} (epoch {})", name, epoch);
            report.stored += 1;
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ISS_LINE1: &str =
        "1 25544U 98067A   20194.88612269 -.00002633  00000-0 -38515-4 0  9990";
    const ISS_LINE2: &str =
        "2 25544  51.6443 242.0161 0001486  45.4846 314.6316 15.49507896236000";

    #[test]
    fn parses_named_and_bare_groups() {
        let content = format!(
            "ISS (ZARYA)\n{ISS_LINE1}\n{ISS_LINE2}\n\n{ISS_LINE1}\n{ISS_LINE2}\n"
        );
        let groups = parse_tle_groups(&content);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].name.as_deref(), Some("ISS (ZARYA)"));
        assert_eq!(groups[0].line1, ISS_LINE1);
        assert!(groups[1].name.is_none());
    }

    #[test]
    fn stray_lines_are_skipped() {
        let content = format!(
            "# comment\nnot a tle\nISS (ZARYA)\n{ISS_LINE1}\n{ISS_LINE2}\ntrailing garbage\n"
        );
        let groups = parse_tle_groups(&content);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].name.as_deref(), Some("ISS (ZARYA)"));
    }

    #[test]
    fn empty_input_yields_no_groups() {
        assert!(parse_tle_groups("").is_empty());
        assert!(parse_tle_groups("\n\n  \n").is_empty());
    }

    #[test]
    fn celestrak_url_targets_the_gp_endpoint() {
        assert_eq!(
            celestrak_url(25544),
            "https://celestrak.org/NORAD/elements/gp.php?CATNR=25544&FORMAT=tle"
        );
    }
}
