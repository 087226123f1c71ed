use crate::models::Record;
use crate::utils::constants::RECORD_SEPARATOR;

/// Parse one `station;temperature` line.
///
/// Returns `None` for anything that is not a well-formed record: no
/// separator, an empty or non-UTF-8 station name, or a value that is not a
/// finite decimal number. Whitespace around the whole line and around the
/// value token is ignored; the station name is kept as written.
pub fn parse_record(line: &[u8]) -> Option<Record<'_>> {
    let line = line.trim_ascii();
    let separator = line.iter().position(|&b| b == RECORD_SEPARATOR)?;
    let (station, value) = (&line[..separator], &line[separator + 1..]);

    if station.is_empty() {
        return None;
    }

    let station = std::str::from_utf8(station).ok()?;
    let temperature = std::str::from_utf8(value.trim_ascii())
        .ok()?
        .parse::<f64>()
        .ok()?;

    temperature
        .is_finite()
        .then_some(Record::new(station, temperature))
}
