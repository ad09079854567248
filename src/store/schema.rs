//! Table declarations and two-version schema negotiation
//!
//! Each table declares its current column set and which of those columns
//! are optional. The legacy shape is the current shape minus the optional
//! columns; a write that hits a missing optional column is retried without
//! that one column.

/// How a column's value is stored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// Plain text
    Text,
    /// Structured data serialized as JSON text
    Json,
    /// Floating point number
    Real,
}

impl ColumnKind {
    pub fn sql_type(self) -> &'static str {
        match self {
            ColumnKind::Text | ColumnKind::Json => "TEXT",
            ColumnKind::Real => "REAL",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub name: &'static str,
    pub kind: ColumnKind,
}

const fn col(name: &'static str, kind: ColumnKind) -> Column {
    Column { name, kind }
}

/// Which shape of a table to create or write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaVersion {
    /// All declared columns
    Current,
    /// Declared columns minus the optional ones
    Legacy,
}

/// A storage table declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableSchema {
    pub name: &'static str,
    /// Key columns, in conflict-target order
    pub key: &'static [&'static str],
    pub columns: &'static [Column],
    /// Columns a pending migration may not have added yet
    pub optional: &'static [&'static str],
}

impl TableSchema {
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn is_optional(&self, name: &str) -> bool {
        self.optional.contains(&name)
    }

    pub fn is_key(&self, name: &str) -> bool {
        self.key.contains(&name)
    }

    /// Columns present in the given schema version
    pub fn columns_for(&self, version: SchemaVersion) -> impl Iterator<Item = &Column> + '_ {
        self.columns
            .iter()
            .filter(move |c| version == SchemaVersion::Current || !self.is_optional(c.name))
    }
}

/// Per-page hotspot rows; the flat columns are kept for older readers
pub const PAGE_LAYOUTS: TableSchema = TableSchema {
    name: "page_layouts",
    key: &["page_key", "profile_key"],
    columns: &[
        col("page_key", ColumnKind::Text),
        col("profile_key", ColumnKind::Text),
        col("hotspot", ColumnKind::Json),
        col("x_percent", ColumnKind::Real),
        col("y_percent", ColumnKind::Real),
        col("label", ColumnKind::Text),
        col("target_path", ColumnKind::Text),
        col("updated_by", ColumnKind::Text),
    ],
    optional: &["hotspot"],
};

/// Shelf pages: books, front templates, admin logo
pub const SHELF_LAYOUTS: TableSchema = TableSchema {
    name: "shelf_layouts",
    key: &["page_key"],
    columns: &[
        col("page_key", ColumnKind::Text),
        col("books", ColumnKind::Json),
        col("templates", ColumnKind::Json),
        col("admin_logo", ColumnKind::Json),
        col("updated_by", ColumnKind::Text),
    ],
    optional: &["templates", "admin_logo"],
};

/// Variable maps keyed by namespace and device profile
pub const PROFILE_LAYOUTS: TableSchema = TableSchema {
    name: "profile_layouts",
    key: &["namespace", "profile_key"],
    columns: &[
        col("namespace", ColumnKind::Text),
        col("profile_key", ColumnKind::Text),
        col("vars", ColumnKind::Json),
        col("updated_by", ColumnKind::Text),
    ],
    optional: &[],
};

/// Pages created from the admin editor
pub const PAGES: TableSchema = TableSchema {
    name: "pages",
    key: &["page_key"],
    columns: &[
        col("page_key", ColumnKind::Text),
        col("label", ColumnKind::Text),
        col("path", ColumnKind::Text),
        col("created_by", ColumnKind::Text),
    ],
    optional: &[],
};

pub const ALL_TABLES: [TableSchema; 4] = [PAGE_LAYOUTS, SHELF_LAYOUTS, PROFILE_LAYOUTS, PAGES];
