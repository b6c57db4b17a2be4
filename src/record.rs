use std::borrow::Cow;
use std::fmt;

use crate::error::{MergeError, MergeResult};

/// Number of leading columns every export row must carry.
pub const MIN_FIELDS: usize = 6;

/// The modeled export columns, in positional order.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Field {
    Group,
    Title,
    Username,
    Password,
    Url,
    Notes,
}

impl Field {
    /// Column index in the raw row.
    pub fn index(self) -> usize {
        match self {
            Field::Group => 0,
            Field::Title => 1,
            Field::Username => 2,
            Field::Password => 3,
            Field::Url => 4,
            Field::Notes => 5,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Field::Group => "Group",
            Field::Title => "Title",
            Field::Username => "Username",
            Field::Password => "Password",
            Field::Url => "URL",
            Field::Notes => "Notes",
        }
    }
}

/// Which of the two exports a record was read from.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Input {
    First,
    Second,
}

impl fmt::Display for Input {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Input::First => f.write_str("input 1"),
            Input::Second => f.write_str("input 2"),
        }
    }
}

/// Where a record came from. Never part of any key.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct Origin {
    pub input: Input,
    pub line: u64,
}

impl Origin {
    pub fn new(input: Input, line: u64) -> Self {
        Self { input, line }
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} line {}", self.input, self.line)
    }
}

/// Group/Title/Username triple identifying a logical entry.
///
/// Displayed as `group/title/username`. Held as separate parts so a `/`
/// inside a group path cannot make two different entries compare equal.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct IdentityKey {
    group: Vec<u8>,
    title: Vec<u8>,
    username: Vec<u8>,
}

impl IdentityKey {
    pub fn new(
        group: impl Into<Vec<u8>>,
        title: impl Into<Vec<u8>>,
        username: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            group: group.into(),
            title: title.into(),
            username: username.into(),
        }
    }
}

impl fmt::Display for IdentityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}",
            String::from_utf8_lossy(&self.group),
            String::from_utf8_lossy(&self.title),
            String::from_utf8_lossy(&self.username)
        )
    }
}

/// One exported credential row.
///
/// Cells are raw bytes exactly as read, including any columns past the
/// sixth, and are what gets written back out. Nothing assumes UTF-8.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Record {
    raw: Vec<Vec<u8>>,
    origin: Origin,
}

impl Record {
    /// Build a record from a raw row, rejecting rows with fewer than
    /// [`MIN_FIELDS`] columns.
    pub fn from_fields(origin: Origin, raw: Vec<Vec<u8>>) -> MergeResult<Self> {
        if raw.len() < MIN_FIELDS {
            return Err(MergeError::MalformedRecord {
                input: origin.input,
                line: origin.line,
                found: raw.len(),
            });
        }
        Ok(Self { raw, origin })
    }

    pub fn get(&self, field: Field) -> &[u8] {
        &self.raw[field.index()]
    }

    /// Field value for display; invalid UTF-8 is replaced, never rejected.
    pub fn text(&self, field: Field) -> Cow<'_, str> {
        String::from_utf8_lossy(self.get(field))
    }

    pub fn identity_key(&self) -> IdentityKey {
        IdentityKey::new(
            self.get(Field::Group),
            self.get(Field::Title),
            self.get(Field::Username),
        )
    }

    /// Full row contents; two records with equal content keys are exact
    /// duplicates.
    pub fn content_key(&self) -> &[Vec<u8>] {
        &self.raw
    }

    pub fn raw(&self) -> &[Vec<u8>] {
        &self.raw
    }

    pub fn origin(&self) -> Origin {
        self.origin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> Vec<Vec<u8>> {
        cells.iter().map(|c| c.as_bytes().to_vec()).collect()
    }

    #[test]
    fn maps_fields_positionally() {
        let record = Record::from_fields(
            Origin::new(Input::First, 2),
            row(&["Email", "Gmail", "me", "hunter2", "https://mail", "n"]),
        )
        .unwrap();

        assert_eq!(record.text(Field::Group), "Email");
        assert_eq!(record.text(Field::Title), "Gmail");
        assert_eq!(record.text(Field::Username), "me");
        assert_eq!(record.get(Field::Password), b"hunter2");
        assert_eq!(record.get(Field::Url), b"https://mail");
        assert_eq!(record.get(Field::Notes), b"n");
        assert_eq!(record.identity_key().to_string(), "Email/Gmail/me");
    }

    #[test]
    fn keeps_extra_columns_verbatim() {
        let raw = row(&["g", "t", "u", "p", "url", "n", "2024-01-01", "x"]);
        let record = Record::from_fields(Origin::new(Input::Second, 7), raw.clone()).unwrap();
        assert_eq!(record.raw(), raw.as_slice());
        assert_eq!(record.content_key().len(), 8);
    }

    #[test]
    fn non_utf8_cells_are_kept_and_displayed_lossily() {
        let mut raw = row(&["G", "t", "u", "p", "url", ""]);
        raw[0] = b"G\xe9".to_vec();
        raw[5] = b"caf\xe9".to_vec();
        let record = Record::from_fields(Origin::new(Input::First, 2), raw).unwrap();

        assert_eq!(record.get(Field::Notes), b"caf\xe9");
        assert_eq!(record.text(Field::Notes), "caf\u{fffd}");
        assert_eq!(record.identity_key().to_string(), "G\u{fffd}/t/u");
    }

    #[test]
    fn rejects_short_rows() {
        let err = Record::from_fields(
            Origin::new(Input::Second, 4),
            row(&["g", "t", "u", "p", "url"]),
        )
        .unwrap_err();
        match err {
            MergeError::MalformedRecord { input, line, found } => {
                assert_eq!(input, Input::Second);
                assert_eq!(line, 4);
                assert_eq!(found, 5);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn slash_in_group_does_not_alias_identity() {
        let a = Record::from_fields(
            Origin::new(Input::First, 2),
            row(&["Root/Web", "Site", "me", "p", "", ""]),
        )
        .unwrap();
        let b = Record::from_fields(
            Origin::new(Input::First, 3),
            row(&["Root", "Web/Site", "me", "p", "", ""]),
        )
        .unwrap();
        assert_eq!(a.identity_key().to_string(), b.identity_key().to_string());
        assert_ne!(a.identity_key(), b.identity_key());
    }
}
