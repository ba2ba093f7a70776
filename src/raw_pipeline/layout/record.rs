//! Bounds-checked typed access to engine records held as raw bytes.
//!
//! Values are read and written in native byte order; the bytes are always a
//! copy of, or a borrow into, memory in this process.

use crate::raw_pipeline::common::error::{RawError, Result};
use crate::raw_pipeline::layout::compiled::{CompiledLayout, FieldSlot};
use crate::raw_pipeline::layout::types::{FieldType, RecordKind};

/// A primitive that can live in a record field.
pub trait Scalar: Copy {
    const SIZE: usize;

    fn accepts(ty: FieldType) -> bool;
    fn read_ne(bytes: &[u8]) -> Self;
    fn write_ne(self, bytes: &mut [u8]);
}

macro_rules! impl_scalar {
    ($t:ty, $($ft:pat_param)|+) => {
        impl Scalar for $t {
            const SIZE: usize = std::mem::size_of::<$t>();

            fn accepts(ty: FieldType) -> bool {
                matches!(ty, $($ft)|+)
            }

            fn read_ne(bytes: &[u8]) -> Self {
                let mut raw = [0u8; std::mem::size_of::<$t>()];
                raw.copy_from_slice(&bytes[..Self::SIZE]);
                <$t>::from_ne_bytes(raw)
            }

            fn write_ne(self, bytes: &mut [u8]) {
                bytes[..Self::SIZE].copy_from_slice(&self.to_ne_bytes());
            }
        }
    };
}

impl_scalar!(i8, FieldType::Char | FieldType::I8);
impl_scalar!(u8, FieldType::U8);
impl_scalar!(i16, FieldType::I16);
impl_scalar!(u16, FieldType::U16);
impl_scalar!(i32, FieldType::I32);
impl_scalar!(u32, FieldType::U32);
impl_scalar!(u64, FieldType::U64);
impl_scalar!(i64, FieldType::TimeT);
impl_scalar!(f32, FieldType::F32);
impl_scalar!(f64, FieldType::F64);
impl_scalar!(usize, FieldType::Pointer);

fn typed_slot<T: Scalar>(
    layout: &CompiledLayout,
    kind: RecordKind,
    path: &str,
    index: usize,
    available: usize,
) -> Result<FieldSlot> {
    let slot = layout.locate(kind, path)?;
    if !T::accepts(slot.ty) || slot.elem_size != T::SIZE {
        return Err(RawError::LayoutError(format!(
            "{} field '{}' is {:?}, not {}",
            kind,
            path,
            slot.ty,
            std::any::type_name::<T>()
        )));
    }
    if index >= slot.count {
        return Err(RawError::LayoutError(format!(
            "index {} out of bounds for '{}' ({} elements)",
            index, path, slot.count
        )));
    }
    if slot.end() > available {
        return Err(RawError::LayoutError(format!(
            "'{}' ends at byte {} but only {} bytes are mapped",
            path,
            slot.end(),
            available
        )));
    }
    Ok(FieldSlot {
        offset: slot.offset + index * slot.elem_size,
        count: 1,
        ..slot
    })
}

fn check_len(layout: &CompiledLayout, kind: RecordKind, len: usize) -> Result<()> {
    let size = layout.size_of(kind)?;
    if len < size {
        return Err(RawError::LayoutError(format!(
            "{} needs {} bytes in API {}, got {}",
            kind,
            size,
            layout.api_version(),
            len
        )));
    }
    Ok(())
}

/// Read-only view over one record.
#[derive(Clone, Copy)]
pub struct RecordView<'a> {
    layout: &'a CompiledLayout,
    kind: RecordKind,
    bytes: &'a [u8],
}

impl<'a> RecordView<'a> {
    pub fn new(layout: &'a CompiledLayout, kind: RecordKind, bytes: &'a [u8]) -> Result<Self> {
        check_len(layout, kind, bytes.len())?;
        Ok(Self { layout, kind, bytes })
    }

    pub fn kind(&self) -> RecordKind {
        self.kind
    }

    pub fn layout(&self) -> &'a CompiledLayout {
        self.layout
    }

    pub fn has(&self, path: &str) -> bool {
        self.layout.contains(self.kind, path)
    }

    pub fn read<T: Scalar>(&self, path: &str) -> Result<T> {
        self.read_at(path, 0)
    }

    pub fn read_at<T: Scalar>(&self, path: &str, index: usize) -> Result<T> {
        let slot = typed_slot::<T>(self.layout, self.kind, path, index, self.bytes.len())?;
        Ok(T::read_ne(&self.bytes[slot.offset..slot.end()]))
    }

    pub fn read_array<T: Scalar>(&self, path: &str) -> Result<Vec<T>> {
        let count = self.layout.locate(self.kind, path)?.count;
        (0..count).map(|i| self.read_at(path, i)).collect()
    }

    /// Read a fixed `char` buffer up to its first NUL.
    pub fn read_string(&self, path: &str) -> Result<String> {
        let raw = self.char_bytes(path)?;
        let end = raw.iter().position(|&b| b == 0).unwrap_or(raw.len());
        Ok(String::from_utf8_lossy(&raw[..end]).trim_end().to_string())
    }

    /// `Some(value)` when this API version has the field, `None` otherwise.
    pub fn try_read<T: Scalar>(&self, path: &str) -> Result<Option<T>> {
        if !self.has(path) {
            return Ok(None);
        }
        self.read(path).map(Some)
    }

    pub fn try_read_string(&self, path: &str) -> Result<Option<String>> {
        if !self.has(path) {
            return Ok(None);
        }
        self.read_string(path).map(Some)
    }

    fn char_bytes(&self, path: &str) -> Result<&'a [u8]> {
        let slot = self.layout.locate(self.kind, path)?;
        if slot.ty != FieldType::Char {
            return Err(RawError::LayoutError(format!(
                "{} field '{}' is {:?}, not a char buffer",
                self.kind, path, slot.ty
            )));
        }
        self.bytes.get(slot.offset..slot.end()).ok_or_else(|| {
            RawError::LayoutError(format!("'{}' lies outside the mapped record", path))
        })
    }
}

/// Mutable view over one record.
pub struct RecordViewMut<'a> {
    layout: &'a CompiledLayout,
    kind: RecordKind,
    bytes: &'a mut [u8],
}

impl<'a> RecordViewMut<'a> {
    pub fn new(layout: &'a CompiledLayout, kind: RecordKind, bytes: &'a mut [u8]) -> Result<Self> {
        check_len(layout, kind, bytes.len())?;
        Ok(Self { layout, kind, bytes })
    }

    pub fn as_view(&self) -> RecordView<'_> {
        RecordView {
            layout: self.layout,
            kind: self.kind,
            bytes: &*self.bytes,
        }
    }

    pub fn has(&self, path: &str) -> bool {
        self.layout.contains(self.kind, path)
    }

    pub fn write<T: Scalar>(&mut self, path: &str, value: T) -> Result<()> {
        self.write_at(path, 0, value)
    }

    pub fn write_at<T: Scalar>(&mut self, path: &str, index: usize, value: T) -> Result<()> {
        let slot = typed_slot::<T>(self.layout, self.kind, path, index, self.bytes.len())?;
        value.write_ne(&mut self.bytes[slot.offset..slot.end()]);
        Ok(())
    }

    pub fn write_array<T: Scalar>(&mut self, path: &str, values: &[T]) -> Result<()> {
        for (i, value) in values.iter().enumerate() {
            self.write_at(path, i, *value)?;
        }
        Ok(())
    }

    /// Copy `value` into a fixed `char` buffer, truncating to leave a trailing NUL.
    pub fn write_string(&mut self, path: &str, value: &str) -> Result<()> {
        let slot = self.layout.locate(self.kind, path)?;
        if slot.ty != FieldType::Char || slot.end() > self.bytes.len() {
            return Err(RawError::LayoutError(format!(
                "{} field '{}' is not a writable char buffer",
                self.kind, path
            )));
        }
        let target = &mut self.bytes[slot.offset..slot.end()];
        target.fill(0);
        let len = value.len().min(target.len().saturating_sub(1));
        target[..len].copy_from_slice(&value.as_bytes()[..len]);
        Ok(())
    }
}
