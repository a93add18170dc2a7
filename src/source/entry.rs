//! Entry descriptors for cached uninverted fields.
//!
//! Each cached entry is identified by the index segment (reader) it was built
//! from and the field that was uninverted. The descriptor string is what
//! shows up under `entry#<i>` in a detailed metrics report:
//!
//! ```text
//! 'segment_3'=>'price',numeric (size =~ 1.5 KB)
//!  └─reader──┘  └field┘ └kind─┘          └estimate┘
//! ```

use std::fmt;

const ONE_KB: u64 = 1024;
const ONE_MB: u64 = ONE_KB * 1024;
const ONE_GB: u64 = ONE_MB * 1024;

/// Shape of the decoded per-document values held by an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheKind {
    /// One number per document.
    Numeric,
    /// One byte string per document.
    Binary,
    /// One ordinal per document into a sorted term dictionary.
    Sorted,
    /// A set of ordinals per document.
    SortedSet,
    /// Bitset of documents that have a value.
    DocsWithField,
}

impl CacheKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheKind::Numeric => "numeric",
            CacheKind::Binary => "binary",
            CacheKind::Sorted => "sorted",
            CacheKind::SortedSet => "sorted_set",
            CacheKind::DocsWithField => "docs_with_field",
        }
    }
}

impl fmt::Display for CacheKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One cached uninverted field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldCacheEntry {
    pub reader_key: String,
    pub field: String,
    pub kind: CacheKind,
    pub estimated_bytes: u64,
}

impl FieldCacheEntry {
    pub fn new(
        reader_key: impl Into<String>,
        field: impl Into<String>,
        kind: CacheKind,
        estimated_bytes: u64,
    ) -> Self {
        Self {
            reader_key: reader_key.into(),
            field: field.into(),
            kind,
            estimated_bytes,
        }
    }

    /// Descriptor string used in detailed reports.
    pub fn describe(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for FieldCacheEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "'{}'=>'{}',{} (size =~ {})",
            self.reader_key,
            self.field,
            self.kind,
            human_readable_size(self.estimated_bytes)
        )
    }
}

/// Formats a byte count with binary units and at most one decimal place.
pub fn human_readable_size(bytes: u64) -> String {
    let (unit, name) = if bytes >= ONE_GB {
        (ONE_GB, "GB")
    } else if bytes >= ONE_MB {
        (ONE_MB, "MB")
    } else if bytes >= ONE_KB {
        (ONE_KB, "KB")
    } else {
        return format!("{bytes} bytes");
    };

    let scaled = format!("{:.1}", bytes as f64 / unit as f64);
    let trimmed = scaled.strip_suffix(".0").unwrap_or(scaled.as_str());
    format!("{trimmed} {name}")
}
