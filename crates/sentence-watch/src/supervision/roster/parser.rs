use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};
use std::io::Read;

/// Raw roster line, one per offender, before enum and date columns are interpreted.
#[derive(Debug, Deserialize)]
pub(crate) struct RosterRow {
    pub(crate) case_number: String,
    pub(crate) full_name: String,
    pub(crate) gender: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub(crate) birth_date: Option<String>,
    #[serde(default)]
    pub(crate) address: String,
    #[serde(default)]
    pub(crate) occupation: String,
    #[serde(default)]
    pub(crate) crime: String,
    pub(crate) case_type: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub(crate) start_date: Option<String>,
    pub(crate) duration_months: u32,
    #[serde(default, deserialize_with = "empty_string_as_zero")]
    pub(crate) reduced_months: u32,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub(crate) reduction_date: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_zero")]
    pub(crate) reduction_count: u32,
}

/// Parsed rows paired with their 1-based data line number.
pub(crate) fn parse_rows<R: Read>(reader: R) -> Result<Vec<(usize, RosterRow)>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    csv_reader
        .deserialize::<RosterRow>()
        .enumerate()
        .map(|(index, row)| row.map(|row| (index + 1, row)))
        .collect()
}

pub(crate) fn parse_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(trimmed, "%d/%m/%Y"))
        .ok()
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

fn empty_string_as_zero<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    match empty_string_as_none(deserializer)? {
        Some(value) => value.trim().parse().map_err(serde::de::Error::custom),
        None => Ok(0),
    }
}
