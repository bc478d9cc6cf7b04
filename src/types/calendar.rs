use std::fmt;
use std::fmt::{Display, Formatter};

/// First year covered by the ERA5 reanalysis back extension.
pub const FIRST_REANALYSIS_YEAR: i32 = 1940;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Ord, PartialOrd, Hash)]
pub struct Year(pub i32);
impl Year {
    pub fn get(self) -> i32 {
        self.0
    }
}

impl Display for Year {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}", self.0)
    }
}

impl From<i32> for Year {
    fn from(year: i32) -> Self {
        Self(year)
    }
}

/// A calendar month, `1..=12`. Serialized in requests as two digits (`"01"`).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Ord, PartialOrd, Hash)]
pub struct Month(pub u32);
impl Month {
    pub fn get(self) -> u32 {
        self.0
    }

    pub fn is_valid(self) -> bool {
        (1..=12).contains(&self.0)
    }

    /// January through December.
    pub fn all() -> Vec<Month> {
        (1..=12).map(Month).collect()
    }
}

impl Display for Month {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}", self.0)
    }
}

impl From<u32> for Month {
    fn from(month: u32) -> Self {
        Self(month)
    }
}
