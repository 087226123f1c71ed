/// One parsed `station;temperature` line.
///
/// The station name borrows from the chunk buffer it was parsed out of.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Record<'a> {
    pub station: &'a str,
    pub temperature: f64,
}

impl<'a> Record<'a> {
    pub fn new(station: &'a str, temperature: f64) -> Self {
        Self {
            station,
            temperature,
        }
    }
}
