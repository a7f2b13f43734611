/// Stable card identifier taken from the source CSV.
pub type RecordId = String;
/// Normalized region name.
pub type Region = String;
/// Calendar year.
pub type Year = i32;
