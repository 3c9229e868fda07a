//! The atomic unit of topology: one physical table on one data source.

use std::fmt::{self, Display};
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use super::error::Error;

const DELIMITER: char = '.';

/// One physical table instance, identified by its data source
/// and table name. Physical identifiers are case-insensitive.
#[derive(Debug, Clone, Eq)]
pub struct DataNode {
    data_source_name: String,
    table_name: String,
}

impl DataNode {
    pub fn new(data_source_name: impl Into<String>, table_name: impl Into<String>) -> Self {
        Self {
            data_source_name: data_source_name.into(),
            table_name: table_name.into(),
        }
    }

    pub fn data_source_name(&self) -> &str {
        &self.data_source_name
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }
}

impl FromStr for DataNode {
    type Err = Error;

    /// Strict two-segment form: `<data_source>.<table>`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut segments = s.split(DELIMITER);
        match (segments.next(), segments.next(), segments.next()) {
            (Some(data_source), Some(table), None) if !data_source.is_empty() && !table.is_empty() => {
                Ok(Self::new(data_source, table))
            }
            _ => Err(Error::MalformedDataNode(s.into())),
        }
    }
}

impl PartialEq for DataNode {
    fn eq(&self, other: &Self) -> bool {
        self.data_source_name
            .eq_ignore_ascii_case(&other.data_source_name)
            && self.table_name.eq_ignore_ascii_case(&other.table_name)
    }
}

impl Hash for DataNode {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for byte in self.data_source_name.bytes() {
            byte.to_ascii_lowercase().hash(state);
        }
        DELIMITER.hash(state);
        for byte in self.table_name.bytes() {
            byte.to_ascii_lowercase().hash(state);
        }
    }
}

impl Display for DataNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.data_source_name, DELIMITER, self.table_name)
    }
}
