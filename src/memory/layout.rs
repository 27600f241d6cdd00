//! Static layout inspection
//!
//! Reports the in-memory size of a type (including trailing padding, i.e. its
//! array stride), its alignment, and the offset and size of each named field.
//! Nothing here allocates or touches an instance.
//!
//! # Examples
//!
//! ```
//! use layout_delta::layout_of;
//!
//! #[repr(C)]
//! struct Padded {
//!     flag: bool,
//!     value: u64,
//! }
//!
//! let layout = layout_of!(Padded { flag, value });
//! assert_eq!(layout.size, 16);
//! assert_eq!(layout.offset_of("value"), Some(8));
//! assert_eq!(layout.padding_bytes(), 7);
//! ```

use serde::{Deserialize, Serialize};

/// Position and width of one field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldLayout {
    /// Field name as declared
    pub name: String,
    /// Byte offset from the start of the struct
    pub offset: usize,
    /// Size of the field's type in bytes
    pub size: usize,
}

/// Static size and field placement of one type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutDescriptor {
    /// Type name as reported by `std::any::type_name`, without module path
    pub type_name: String,
    /// `size_of::<T>()`, trailing padding included
    pub size: usize,
    /// `align_of::<T>()`
    pub align: usize,
    /// Inspected fields in declaration order
    pub fields: Vec<FieldLayout>,
}

impl LayoutDescriptor {
    /// Size and alignment of `T`, without field information
    pub fn of<T>() -> Self {
        Self {
            type_name: short_type_name::<T>().to_string(),
            size: std::mem::size_of::<T>(),
            align: std::mem::align_of::<T>(),
            fields: Vec::new(),
        }
    }

    /// Add a field; used by [`layout_of!`](crate::layout_of)
    pub fn with_field(mut self, name: &str, offset: usize, size: usize) -> Self {
        self.fields.push(FieldLayout {
            name: name.to_string(),
            offset,
            size,
        });
        self
    }

    /// Byte offset of the named field, if it was inspected
    pub fn offset_of(&self, field: &str) -> Option<usize> {
        self.fields.iter().find(|f| f.name == field).map(|f| f.offset)
    }

    /// Sum of inspected field sizes
    pub fn field_bytes(&self) -> usize {
        self.fields.iter().map(|f| f.size).sum()
    }

    /// Bytes not covered by any inspected field
    ///
    /// Only meaningful when every field was listed.
    pub fn padding_bytes(&self) -> usize {
        self.size.saturating_sub(self.field_bytes())
    }

    /// Fields sorted by offset, the order they occupy memory in
    pub fn fields_by_offset(&self) -> Vec<&FieldLayout> {
        let mut fields: Vec<&FieldLayout> = self.fields.iter().collect();
        fields.sort_by_key(|f| f.offset);
        fields
    }

    /// Padding gaps as `(offset, length)` pairs, including trailing padding
    pub fn gaps(&self) -> Vec<(usize, usize)> {
        let mut gaps = Vec::new();
        let mut cursor = 0;
        for field in self.fields_by_offset() {
            if field.offset > cursor {
                gaps.push((cursor, field.offset - cursor));
            }
            cursor = cursor.max(field.offset + field.size);
        }
        if self.size > cursor && !self.fields.is_empty() {
            gaps.push((cursor, self.size - cursor));
        }
        gaps
    }
}

/// Size of the field a projection closure points at
///
/// Lets [`layout_of!`](crate::layout_of) learn a field's type without an instance.
#[doc(hidden)]
pub fn field_size<T, F, P>(_projection: P) -> usize
where
    P: Fn(&T) -> &F,
{
    std::mem::size_of::<F>()
}

fn short_type_name<T>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    match base.rfind("::") {
        Some(idx) => &full[idx + 2..],
        None => full,
    }
}

/// Build a [`LayoutDescriptor`] with the listed fields
///
/// ```
/// use layout_delta::layout_of;
///
/// #[repr(C)]
/// struct Pair {
///     a: u8,
///     b: u32,
/// }
///
/// let layout = layout_of!(Pair { a, b });
/// assert_eq!(layout.offset_of("b"), Some(4));
/// ```
#[macro_export]
macro_rules! layout_of {
    ($ty:ty { $($field:ident),* $(,)? }) => {{
        let descriptor = $crate::memory::layout::LayoutDescriptor::of::<$ty>();
        $(
            let descriptor = descriptor.with_field(
                stringify!($field),
                ::core::mem::offset_of!($ty, $field),
                $crate::memory::layout::field_size(|v: &$ty| &v.$field),
            );
        )*
        descriptor
    }};
}

/// Theoretical comparison of an optimized and a baseline layout
///
/// The waste figures come from static sizes only. A live heap delta also
/// includes backing storage owned by fields (string and vector buffers) and
/// allocator rounding, so the two are reported side by side, never merged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutComparison {
    /// Layout with fields ordered to minimize padding
    pub optimized: LayoutDescriptor,
    /// Layout in the original declaration order
    pub baseline: LayoutDescriptor,
}

impl LayoutComparison {
    /// Compare two layouts
    pub fn new(optimized: LayoutDescriptor, baseline: LayoutDescriptor) -> Self {
        Self {
            optimized,
            baseline,
        }
    }

    /// `size(baseline) - size(optimized)`
    pub fn waste_per_instance(&self) -> i64 {
        self.baseline.size as i64 - self.optimized.size as i64
    }

    /// Per-instance waste scaled to `object_count` instances
    pub fn total_waste(&self, object_count: usize) -> i64 {
        self.waste_per_instance()
            .saturating_mul(i64::try_from(object_count).unwrap_or(i64::MAX))
    }
}
