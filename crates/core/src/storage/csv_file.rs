use crate::domain::error::TurnipError;
use crate::domain::week::{WeekRecord, SLOTS_PER_WEEK, SLOT_NAMES};
use crate::storage::WeekStorage;
use anyhow::Context;
use std::path::{Path, PathBuf};

const FILE_PREFIX: &str = "price_history-";
const SENTINEL: &str = "NaN";

/// Two-line CSV per week: the slot header and a single data row.
#[derive(Debug, Clone)]
pub struct CsvWeekStorage {
    dir: PathBuf,
}

impl CsvWeekStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, week_key: &str) -> PathBuf {
        self.dir.join(format!("{FILE_PREFIX}{week_key}.csv"))
    }

    fn write(&self, path: &Path, record: &WeekRecord) -> anyhow::Result<()> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("failed to create storage dir {}", self.dir.display()))?;
        std::fs::write(path, encode(record)?)
            .with_context(|| format!("failed to write week record {}", path.display()))
    }
}

impl WeekStorage for CsvWeekStorage {
    fn load_or_init(&self, week_key: &str) -> anyhow::Result<WeekRecord> {
        let path = self.path_for(week_key);
        if !path.exists() {
            let record = WeekRecord::empty(week_key);
            self.write(&path, &record)?;
            tracing::info!(week_key, path = %path.display(), "initialized week record");
            return Ok(record);
        }

        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read week record {}", path.display()))?;
        decode(week_key, &path, &text)
    }

    fn save(&self, record: &WeekRecord) -> anyhow::Result<()> {
        let path = self.path_for(&record.week_key);
        self.write(&path, record)?;
        tracing::debug!(
            week_key = %record.week_key,
            path = %path.display(),
            "saved week record"
        );
        Ok(())
    }
}

fn encode(record: &WeekRecord) -> anyhow::Result<Vec<u8>> {
    let row = record.slots.iter().map(|v| {
        if v.is_nan() {
            SENTINEL.to_string()
        } else {
            v.to_string()
        }
    });

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(SLOT_NAMES)
        .context("failed to write week record header")?;
    writer
        .write_record(row)
        .context("failed to write week record row")?;
    writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("failed to flush week record: {}", e.error()))
}

// Unparseable fields read as the sentinel.
fn parse_field(field: &str) -> f64 {
    field
        .trim()
        .parse::<f64>()
        .map(f64::trunc)
        .unwrap_or(f64::NAN)
}

fn decode(week_key: &str, path: &Path, text: &str) -> anyhow::Result<WeekRecord> {
    let lines = text.split('\n').count();
    if lines < 2 {
        return Err(TurnipError::CorruptStorage {
            path: path.to_path_buf(),
            lines,
        }
        .into());
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    // Only the first data row carries values.
    let fields: Vec<f64> = match reader.records().next() {
        Some(row) => row
            .with_context(|| format!("failed to parse week record {}", path.display()))?
            .iter()
            .map(parse_field)
            .collect(),
        None => Vec::new(),
    };
    if fields.len() != SLOTS_PER_WEEK {
        tracing::warn!(
            week_key,
            path = %path.display(),
            fields = fields.len(),
            "week record row does not have 14 fields; missing slots read as unknown"
        );
    }

    let mut record = WeekRecord::empty(week_key);
    for (slot, value) in record.slots.iter_mut().zip(fields) {
        *slot = value;
    }
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EMPTY_FILE: &str = "sun_am,sun_pm,mon_am,mon_pm,tue_am,tue_pm,wed_am,wed_pm,thu_am,thu_pm,fri_am,fri_pm,sat_am,sat_pm\nNaN,NaN,NaN,NaN,NaN,NaN,NaN,NaN,NaN,NaN,NaN,NaN,NaN,NaN\n";

    #[test]
    fn first_access_writes_empty_record() {
        let dir = tempfile::tempdir().unwrap();
        let storage = CsvWeekStorage::new(dir.path().join(".turnip_cli"));

        let record = storage.load_or_init("2026-9-18").unwrap();
        assert_eq!(record.week_key, "2026-9-18");
        assert_eq!(record.known_count(), 0);

        let path = storage.path_for("2026-9-18");
        assert!(path.ends_with(".turnip_cli/price_history-2026-9-18.csv"));
        assert_eq!(std::fs::read_to_string(path).unwrap(), EMPTY_FILE);
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let storage = CsvWeekStorage::new(dir.path());

        let mut record = storage.load_or_init("2026-9-18").unwrap();
        record.slots[0] = 101.0;
        record.slots[1] = 101.0;
        record.slots[4] = 87.0;
        storage.save(&record).unwrap();

        let loaded = storage.load_or_init("2026-9-18").unwrap();
        assert!(loaded.same_slots(&record));

        let text = std::fs::read_to_string(storage.path_for("2026-9-18")).unwrap();
        assert_eq!(
            text.lines().nth(1).unwrap(),
            "101,101,NaN,NaN,87,NaN,NaN,NaN,NaN,NaN,NaN,NaN,NaN,NaN"
        );
    }

    #[test]
    fn single_line_file_is_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let storage = CsvWeekStorage::new(dir.path());
        std::fs::write(storage.path_for("2026-9-18"), "sun_am,sun_pm").unwrap();

        let err = storage.load_or_init("2026-9-18").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<TurnipError>(),
            Some(TurnipError::CorruptStorage { lines: 1, .. })
        ));
    }

    #[test]
    fn garbage_fields_read_as_unknown() {
        let record = decode(
            "k",
            Path::new("k.csv"),
            "header\n95,abc,,120.7,NaN,1,2,3,4,5,6,7,8,9",
        )
        .unwrap();
        assert_eq!(record.known(0), Some(95.0));
        assert_eq!(record.known(1), None);
        assert_eq!(record.known(2), None);
        assert_eq!(record.known(3), Some(120.0));
        assert_eq!(record.known(4), None);
        assert_eq!(record.known(13), Some(9.0));
    }

    #[test]
    fn short_and_long_rows_keep_fourteen_slots() {
        let short = decode("k", Path::new("k.csv"), "header\n90,90,80").unwrap();
        assert_eq!(short.slots.len(), SLOTS_PER_WEEK);
        assert_eq!(short.known_count(), 3);

        let row = ["1"; 20].join(",");
        let long = decode("k", Path::new("k.csv"), &format!("header\n{row}")).unwrap();
        assert_eq!(long.known_count(), SLOTS_PER_WEEK);
    }

    #[test]
    fn quoted_fields_are_unquoted() {
        let text = "sun_am,sun_pm,mon_am\n\"101\",\"101\",\"95\",NaN,NaN,NaN,NaN,NaN,NaN,NaN,NaN,NaN,NaN,NaN\n";
        let record = decode("k", Path::new("k.csv"), text).unwrap();
        assert_eq!(record.known(0), Some(101.0));
        assert_eq!(record.known(1), Some(101.0));
        assert_eq!(record.known(2), Some(95.0));
        assert_eq!(record.known_count(), 3);
    }

    #[test]
    fn header_without_row_reads_as_empty_week() {
        let record = decode("k", Path::new("k.csv"), "sun_am,sun_pm\n").unwrap();
        assert_eq!(record.known_count(), 0);
    }

    #[test]
    fn tolerates_crlf() {
        let text = "header\r\n90,90,NaN,NaN,NaN,NaN,NaN,NaN,NaN,NaN,NaN,NaN,NaN,77\r\n";
        let record = decode("k", Path::new("k.csv"), text).unwrap();
        assert_eq!(record.known(13), Some(77.0));
    }
}
