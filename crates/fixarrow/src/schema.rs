//! Row layout: the ordered field list, sub-schema partitioning, and the Arrow
//! schemas derived from it.

use std::sync::Arc;

use arrow_schema::{DataType, Field, Schema};
use serde::{Deserialize, Serialize};

use crate::err::EngineError;

/// The logical type of a field, both as parsed from the source bytes and as
/// stored in the output column.
///
/// | Variant | Arrow `DataType` |
/// |---|---|
/// | `Int8`..`Int64` | `Int8`..`Int64` |
/// | `Uint8`..`Uint64` | `UInt8`..`UInt64` |
/// | `Float32`/`Float64` | `Float32`/`Float64` |
/// | `Boolean` | `Boolean` |
/// | `String` | `Utf8` |
/// | `Date32` | `Date32` (raw seconds-since-epoch, not days — see `codec.rs`) |
/// | `Date64` | `Date64` (milliseconds-since-epoch) |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[allow(missing_docs)]
pub enum FieldType {
    Int8,
    Int16,
    Int32,
    Int64,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Float32,
    Float64,
    Boolean,
    String,
    Date32,
    Date64,
}

impl FieldType {
    /// The Arrow `DataType` this field type is stored as.
    pub fn arrow_type(self) -> DataType {
        match self {
            FieldType::Int8 => DataType::Int8,
            FieldType::Int16 => DataType::Int16,
            FieldType::Int32 => DataType::Int32,
            FieldType::Int64 => DataType::Int64,
            FieldType::Uint8 => DataType::UInt8,
            FieldType::Uint16 => DataType::UInt16,
            FieldType::Uint32 => DataType::UInt32,
            FieldType::Uint64 => DataType::UInt64,
            FieldType::Float32 => DataType::Float32,
            FieldType::Float64 => DataType::Float64,
            FieldType::Boolean => DataType::Boolean,
            FieldType::String => DataType::Utf8,
            // Stored as raw seconds-since-epoch rather than Arrow's canonical
            // days-since-epoch; see the Date32 codec for the rationale.
            FieldType::Date32 => DataType::Date32,
            FieldType::Date64 => DataType::Date64,
        }
    }
}

/// One fixed-width field in a row layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Name, unique within its sub-schema.
    pub name: String,
    /// Number of source bytes this field occupies in each row.
    pub byte_length: usize,
    /// The type parsed from the source slice.
    pub source_type: FieldType,
    /// The type stored in the output column (usually equal to `source_type`).
    pub target_type: FieldType,
    /// Which sub-schema (0-indexed) this field belongs to.
    pub sub_schema_id: usize,
}

impl FieldSpec {
    /// Construct a field whose source and target type are the same.
    pub fn new(name: impl Into<String>, byte_length: usize, field_type: FieldType) -> Self {
        FieldSpec {
            name: name.into(),
            byte_length,
            source_type: field_type,
            target_type: field_type,
            sub_schema_id: 0,
        }
    }

    /// Set the sub-schema this field belongs to.
    pub fn with_sub_schema(mut self, sub_schema_id: usize) -> Self {
        self.sub_schema_id = sub_schema_id;
        self
    }
}

/// The full ordered row layout: fields plus the sub-schema partition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RowLayout {
    /// Fields in declaration order. Byte offsets are the prefix sum of
    /// `byte_length` restricted to each field's sub-schema.
    pub fields: Vec<FieldSpec>,
    /// Sizes of each sub-schema; `sub_schema_sizes[i]` fields belong to
    /// sub-schema `i`. Must sum to `fields.len()`. Defaults to `[fields.len()]`.
    pub sub_schema_sizes: Vec<usize>,
}

impl RowLayout {
    /// Build a single-sub-schema layout from an ordered field list.
    pub fn single(fields: Vec<FieldSpec>) -> Self {
        let n = fields.len();
        RowLayout {
            fields,
            sub_schema_sizes: vec![n],
        }
    }

    /// Total byte length of one row (sum of every field's `byte_length`,
    /// across all sub-schemas).
    pub fn row_byte_length(&self) -> usize {
        self.fields.iter().map(|f| f.byte_length).sum()
    }

    /// Number of sub-schemas.
    pub fn sub_schema_count(&self) -> usize {
        self.sub_schema_sizes.len()
    }

    /// The fields belonging to sub-schema `i`, along with each field's byte
    /// offset within the row (not within the sub-schema).
    pub fn fields_for_sub_schema(&self, sub_schema_id: usize) -> Vec<(&FieldSpec, usize)> {
        let mut offset = 0usize;
        let mut out = Vec::new();
        for field in &self.fields {
            if field.sub_schema_id == sub_schema_id {
                out.push((field, offset));
            }
            offset += field.byte_length;
        }
        out
    }

    /// Validate structural invariants: non-empty, consistent `sub_schema_sizes`,
    /// and unique field names within each sub-schema.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.fields.is_empty() {
            return Err(EngineError::EmptyLayout);
        }
        let sum: usize = self.sub_schema_sizes.iter().sum();
        if sum != self.fields.len() {
            return Err(EngineError::InconsistentSubSchemaSizes {
                sizes: self.sub_schema_sizes.clone(),
                sum,
                field_count: self.fields.len(),
            });
        }
        for sub_schema_id in 0..self.sub_schema_count() {
            let mut seen = std::collections::HashSet::new();
            for (field, _) in self.fields_for_sub_schema(sub_schema_id) {
                if !seen.insert(field.name.as_str()) {
                    return Err(EngineError::DuplicateFieldName {
                        name: field.name.clone(),
                        sub_schema_id,
                    });
                }
            }
        }
        Ok(())
    }

    /// One Arrow `Schema` per sub-schema, in sub-schema order.
    pub fn schemas(&self) -> Vec<Arc<Schema>> {
        (0..self.sub_schema_count())
            .map(|sub_schema_id| {
                let fields: Vec<Field> = self
                    .fields_for_sub_schema(sub_schema_id)
                    .into_iter()
                    .map(|(f, _)| Field::new(&f.name, f.target_type.arrow_type(), true))
                    .collect();
                Arc::new(Schema::new(fields))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_layout_has_one_sub_schema() {
        let layout = RowLayout::single(vec![
            FieldSpec::new("idnr", 11, FieldType::Int64),
            FieldSpec::new("description", 20, FieldType::String),
        ]);
        assert_eq!(layout.sub_schema_count(), 1);
        assert_eq!(layout.row_byte_length(), 31);
        layout.validate().unwrap();
    }

    #[test]
    fn inconsistent_sub_schema_sizes_rejected() {
        let layout = RowLayout {
            fields: vec![FieldSpec::new("a", 1, FieldType::Int32)],
            sub_schema_sizes: vec![2],
        };
        assert!(matches!(
            layout.validate(),
            Err(EngineError::InconsistentSubSchemaSizes { .. })
        ));
    }

    #[test]
    fn empty_layout_rejected() {
        let layout = RowLayout {
            fields: vec![],
            sub_schema_sizes: vec![],
        };
        assert!(matches!(layout.validate(), Err(EngineError::EmptyLayout)));
    }

    #[test]
    fn multi_sub_schema_splits_fields() {
        let layout = RowLayout {
            fields: vec![
                FieldSpec::new("a", 8, FieldType::Int64),
                FieldSpec::new("b", 5, FieldType::String).with_sub_schema(0),
                FieldSpec::new("c", 4, FieldType::Int32).with_sub_schema(1),
            ],
            sub_schema_sizes: vec![2, 1],
        };
        layout.validate().unwrap();
        let schemas = layout.schemas();
        assert_eq!(schemas.len(), 2);
        assert_eq!(schemas[0].fields().len(), 2);
        assert_eq!(schemas[1].fields().len(), 1);
    }

    #[test]
    fn duplicate_field_name_within_sub_schema_rejected() {
        let layout = RowLayout::single(vec![
            FieldSpec::new("a", 1, FieldType::Int32),
            FieldSpec::new("a", 1, FieldType::Int32),
        ]);
        assert!(matches!(
            layout.validate(),
            Err(EngineError::DuplicateFieldName { .. })
        ));
    }
}
