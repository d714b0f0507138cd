use crate::domain::error::ReturnCodeError;

/// Ordered header collection: each name maps to one or more values.
///
/// Names are compared exactly as given (after trimming by [`HeaderMultimap::add_raw`]) and keep
/// the position of their first insertion. Values for a name keep insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderMultimap {
    entries: Vec<(String, Vec<String>)>,
}

impl HeaderMultimap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `value` to the values stored under `name`.
    pub fn add(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(key, _)| *key == name) {
            Some((_, values)) => values.push(value),
            None => self.entries.push((name, vec![value])),
        }
    }

    /// Splits a raw `Name: Value` string on its first `:` and adds the trimmed pair.
    pub fn add_raw(&mut self, raw: &str) -> Result<(), ReturnCodeError> {
        let (name, value) = raw
            .split_once(':')
            .ok_or_else(|| ReturnCodeError::invalid_header(raw))?;
        self.add(name.trim(), value.trim());
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, values)| values.as_slice())
    }

    /// Iterates every `(name, value)` pair, one item per value.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().flat_map(|(name, values)| {
            values
                .iter()
                .map(move |value| (name.as_str(), value.as_str()))
        })
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
