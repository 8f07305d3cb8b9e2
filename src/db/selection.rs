use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Which pane of the selected table is being edited.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum View {
    #[default]
    Schema,
    Data,
}

/// The editing cursor: a table name and a view.
///
/// Not part of the document. An empty `table` means nothing is selected.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Selection {
    pub table: String,
    pub view: View,
}

impl Selection {
    /// The selected table name, if any.
    pub fn table(&self) -> Option<&str> {
        (!self.table.is_empty()).then_some(self.table.as_str())
    }
}
