//! Table catalog - the fixed set of browsable backend tables
//!
//! The catalog is a compile-time constant. Every selection in the app is a
//! `TableId`, so an active table can only ever be one of these six entries.

use std::fmt;

/// Identifier of a browsable table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableId {
    Teachers,
    Classes,
    Students,
    Embeddings,
    Cameras,
    Attendance,
}

/// Static description of one selectable table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableDescriptor {
    pub id: TableId,
    /// Identifier as used by the backend (`teachers`, `classes`, ...)
    pub identifier: &'static str,
    /// Label shown on the selector button
    pub display_label: &'static str,
    /// REST endpoint returning all rows of the table
    pub endpoint_path: &'static str,
}

/// All selectable tables, in display order
pub const CATALOG: [TableDescriptor; 6] = [
    TableDescriptor {
        id: TableId::Teachers,
        identifier: "teachers",
        display_label: "Giáo viên",
        endpoint_path: "/api/teachers",
    },
    TableDescriptor {
        id: TableId::Classes,
        identifier: "classes",
        display_label: "Lớp học",
        endpoint_path: "/api/classes",
    },
    TableDescriptor {
        id: TableId::Students,
        identifier: "students",
        display_label: "Học sinh",
        endpoint_path: "/api/students",
    },
    TableDescriptor {
        id: TableId::Embeddings,
        identifier: "embeddings",
        display_label: "Face Embeddings",
        endpoint_path: "/api/embeddings",
    },
    TableDescriptor {
        id: TableId::Cameras,
        identifier: "cameras",
        display_label: "Camera",
        endpoint_path: "/api/cameras",
    },
    TableDescriptor {
        id: TableId::Attendance,
        identifier: "attendance",
        display_label: "Điểm danh",
        endpoint_path: "/api/attendance",
    },
];

impl TableId {
    /// Position of this table in the catalog
    pub fn index(self) -> usize {
        match self {
            TableId::Teachers => 0,
            TableId::Classes => 1,
            TableId::Students => 2,
            TableId::Embeddings => 3,
            TableId::Cameras => 4,
            TableId::Attendance => 5,
        }
    }

    /// Catalog entry for this table
    pub fn descriptor(self) -> &'static TableDescriptor {
        &CATALOG[self.index()]
    }

    pub fn identifier(self) -> &'static str {
        self.descriptor().identifier
    }

    pub fn display_label(self) -> &'static str {
        self.descriptor().display_label
    }

    pub fn endpoint_path(self) -> &'static str {
        self.descriptor().endpoint_path
    }

    /// Look up a table by its catalog position
    pub fn from_index(index: usize) -> Option<TableId> {
        CATALOG.get(index).map(|entry| entry.id)
    }
}

impl fmt::Display for TableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.identifier())
    }
}
