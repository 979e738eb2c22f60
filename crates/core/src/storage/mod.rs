pub mod csv_file;

use crate::domain::week::WeekRecord;

pub use csv_file::CsvWeekStorage;

/// One persisted [`WeekRecord`] per week key.
pub trait WeekStorage {
    /// Loads the record for `week_key`, creating and persisting an empty one
    /// the first time the week is seen.
    fn load_or_init(&self, week_key: &str) -> anyhow::Result<WeekRecord>;

    fn save(&self, record: &WeekRecord) -> anyhow::Result<()>;
}
