//! Offset tables computed from a descriptor set.
//!
//! Offsets follow the C rules for the host ABI: every field starts at the next
//! multiple of its element alignment, and a record's size is rounded up to its
//! strictest member alignment.

use std::collections::HashMap;

use tracing::debug;

use crate::raw_pipeline::common::error::{RawError, Result};
use crate::raw_pipeline::layout::registry::LayoutSet;
use crate::raw_pipeline::layout::types::{
    ArrayBounds, FieldDescriptor, FieldType, LayoutProvider, RecordKind,
};

#[derive(Debug, Clone)]
pub struct FieldLayout {
    pub descriptor: FieldDescriptor,
    pub offset: usize,
    pub elem_size: usize,
    pub size: usize,
}

#[derive(Debug, Clone)]
pub struct RecordLayout {
    pub kind: RecordKind,
    pub size: usize,
    pub align: usize,
    pub fields: Vec<FieldLayout>,
}

impl RecordLayout {
    pub fn field(&self, name: &str) -> Option<&FieldLayout> {
        self.fields.iter().find(|f| f.descriptor.name == name)
    }
}

/// Absolute position of a (possibly nested) field inside a top-level record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSlot {
    pub offset: usize,
    pub ty: FieldType,
    pub count: usize,
    pub elem_size: usize,
}

impl FieldSlot {
    pub fn byte_len(&self) -> usize {
        self.count * self.elem_size
    }

    pub fn end(&self) -> usize {
        self.offset + self.byte_len()
    }
}

/// The layout descriptor for one engine API version, with all offsets resolved.
#[derive(Debug, Clone)]
pub struct CompiledLayout {
    set: LayoutSet,
    records: HashMap<RecordKind, RecordLayout>,
}

impl CompiledLayout {
    pub fn compile(set: LayoutSet) -> Result<Self> {
        let mut records = HashMap::new();
        for kind in set.record_kinds() {
            let mut visiting = Vec::new();
            compile_record(&set, kind, &mut records, &mut visiting)?;
        }

        debug!(
            "Compiled {} records for API {} ({} bytes of libraw_data_t)",
            records.len(),
            set.api_version(),
            records.get(&RecordKind::Data).map(|r| r.size).unwrap_or(0)
        );

        Ok(Self { set, records })
    }

    pub fn for_version(version: u32) -> Result<Self> {
        Self::compile(LayoutSet::for_version(version)?)
    }

    pub fn set(&self) -> LayoutSet {
        self.set
    }

    pub fn api_version(&self) -> u32 {
        self.set.api_version()
    }

    pub fn array_bounds(&self) -> ArrayBounds {
        self.set.array_bounds()
    }

    pub fn record(&self, kind: RecordKind) -> Result<&RecordLayout> {
        self.records.get(&kind).ok_or_else(|| {
            RawError::LayoutError(format!(
                "API {} has no {} record",
                self.api_version(),
                kind
            ))
        })
    }

    pub fn size_of(&self, kind: RecordKind) -> Result<usize> {
        Ok(self.record(kind)?.size)
    }

    pub fn contains(&self, kind: RecordKind, path: &str) -> bool {
        self.locate(kind, path).is_ok()
    }

    /// Resolve a dotted path such as `"other.parsed_gps.altitude"` or
    /// `"color.dng_color[1].illuminant"` to an absolute slot within `kind`.
    ///
    /// A trailing `[n]` on the last segment narrows the slot to one element
    /// (flattened across all dimensions).
    pub fn locate(&self, kind: RecordKind, path: &str) -> Result<FieldSlot> {
        let mut record = self.record(kind)?;
        let mut base = 0;
        let mut segments = path.split('.').peekable();

        while let Some(segment) = segments.next() {
            let (name, index) = parse_segment(segment)?;
            let field = record.field(name).ok_or_else(|| {
                RawError::LayoutError(format!(
                    "{} has no field '{}' in API {}",
                    record.kind,
                    name,
                    self.api_version()
                ))
            })?;

            let mut slot = FieldSlot {
                offset: base + field.offset,
                ty: field.descriptor.ty,
                count: field.descriptor.element_count(),
                elem_size: field.elem_size,
            };

            if let Some(index) = index {
                if index >= slot.count {
                    return Err(RawError::LayoutError(format!(
                        "index {} out of bounds for '{}' ({} elements)",
                        index, name, slot.count
                    )));
                }
                slot.offset += index * slot.elem_size;
                slot.count = 1;
            }

            if segments.peek().is_none() {
                return Ok(slot);
            }

            match slot.ty {
                FieldType::Record(nested) if slot.count == 1 => {
                    record = self.record(nested)?;
                    base = slot.offset;
                }
                _ => {
                    return Err(RawError::LayoutError(format!(
                        "'{}' in path '{}' is not a single nested record",
                        name, path
                    )));
                }
            }
        }

        Err(RawError::LayoutError(format!("empty field path for {}", kind)))
    }
}

fn parse_segment(segment: &str) -> Result<(&str, Option<usize>)> {
    let invalid = || RawError::LayoutError(format!("malformed path segment '{}'", segment));

    let (name, index) = match segment.split_once('[') {
        Some((name, rest)) => {
            let digits = rest.strip_suffix(']').ok_or_else(invalid)?;
            let index = digits.parse::<usize>().map_err(|_| invalid())?;
            (name, Some(index))
        }
        None => (segment, None),
    };

    if name.is_empty() {
        return Err(invalid());
    }
    Ok((name, index))
}

fn align_up(offset: usize, align: usize) -> usize {
    offset.div_ceil(align) * align
}

fn compile_record(
    set: &LayoutSet,
    kind: RecordKind,
    done: &mut HashMap<RecordKind, RecordLayout>,
    visiting: &mut Vec<RecordKind>,
) -> Result<(usize, usize)> {
    if let Some(record) = done.get(&kind) {
        return Ok((record.size, record.align));
    }
    if visiting.contains(&kind) {
        return Err(RawError::LayoutError(format!("{} contains itself", kind)));
    }

    let descriptors = set.record(kind).ok_or_else(|| {
        RawError::LayoutError(format!(
            "API {} references {} but does not describe it",
            set.api_version(),
            kind
        ))
    })?;
    if descriptors.is_empty() {
        return Err(RawError::LayoutError(format!("{} has no fields", kind)));
    }

    visiting.push(kind);

    let mut offset = 0;
    let mut record_align = 1;
    let mut fields = Vec::with_capacity(descriptors.len());

    for descriptor in descriptors {
        if descriptor.dims.contains(&0) {
            return Err(RawError::LayoutError(format!(
                "{}.{} has an empty dimension",
                kind, descriptor.name
            )));
        }

        let (elem_size, elem_align) = match descriptor.ty {
            FieldType::Record(nested) => compile_record(set, nested, done, visiting)?,
            primitive => primitive.primitive_layout().ok_or_else(|| {
                RawError::LayoutError(format!("{}.{} has no size", kind, descriptor.name))
            })?,
        };

        offset = align_up(offset, elem_align);
        let size = elem_size * descriptor.element_count();
        fields.push(FieldLayout {
            descriptor: *descriptor,
            offset,
            elem_size,
            size,
        });
        offset += size;
        record_align = record_align.max(elem_align);
    }

    visiting.pop();

    let size = align_up(offset, record_align);
    done.insert(
        kind,
        RecordLayout {
            kind,
            size,
            align: record_align,
            fields,
        },
    );
    Ok((size, record_align))
}
