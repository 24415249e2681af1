use cgmath::{Matrix4, Vector3};

use super::program::UniformValue;

/// Type of a field in a [`UniformLayout`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniformKind {
    Bool,
    Int,
    Float,
    Vec3,
    Mat4,
}

impl UniformKind {
    /// std140 (alignment, size) in bytes
    fn std140(self) -> (usize, usize) {
        match self {
            UniformKind::Bool | UniformKind::Int | UniformKind::Float => (4, 4),
            UniformKind::Vec3 => (16, 12),
            UniformKind::Mat4 => (16, 64),
        }
    }

    fn of(value: &UniformValue) -> Self {
        match value {
            UniformValue::Bool(_) => UniformKind::Bool,
            UniformValue::Int(_) => UniformKind::Int,
            UniformValue::Float(_) => UniformKind::Float,
            UniformValue::Vec3(_) => UniformKind::Vec3,
            UniformValue::Mat4(_) => UniformKind::Mat4,
        }
    }
}

#[derive(Debug, Clone)]
struct UniformField {
    name: String,
    kind: UniformKind,
    offset: usize,
}

/// Name to byte-offset map for a std140 uniform block
///
/// Fields are laid out in declaration order, so the WGSL struct must
/// declare its members in the same order.
#[derive(Debug, Clone, Default)]
pub struct UniformLayout {
    fields: Vec<UniformField>,
    size: usize,
}

impl UniformLayout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a field (builder pattern)
    pub fn with_field(mut self, name: &str, kind: UniformKind) -> Self {
        let (align, size) = kind.std140();
        let offset = self.size.next_multiple_of(align);
        self.fields.push(UniformField {
            name: name.to_string(),
            kind,
            offset,
        });
        self.size = offset + size;
        self
    }

    /// Block size in bytes, padded to 16 as uniform buffers require
    pub fn size(&self) -> usize {
        self.size.next_multiple_of(16).max(16)
    }

    pub fn offset_of(&self, name: &str) -> Option<usize> {
        self.field(name).map(|field| field.offset)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.field(name).is_some()
    }

    fn field(&self, name: &str) -> Option<&UniformField> {
        self.fields.iter().find(|field| field.name == name)
    }
}

/// CPU staging copy of a uniform block, written by name
#[derive(Debug, Clone)]
pub struct UniformBlock {
    layout: UniformLayout,
    bytes: Vec<u8>,
}

impl UniformBlock {
    pub fn new(layout: UniformLayout) -> Self {
        let bytes = vec![0; layout.size()];
        Self { layout, bytes }
    }

    /// Writes a value; returns false when the name is unknown or the type differs
    pub fn write(&mut self, name: &str, value: UniformValue) -> bool {
        let Some(field) = self.layout.field(name) else {
            return false;
        };
        if field.kind != UniformKind::of(&value) {
            log::debug!(
                "uniform '{}' is {:?}, ignoring {:?} write",
                name,
                field.kind,
                UniformKind::of(&value)
            );
            return false;
        }

        let offset = field.offset;
        match value {
            UniformValue::Bool(v) => self.put(offset, bytemuck::bytes_of(&(v as u32))),
            UniformValue::Int(v) => self.put(offset, bytemuck::bytes_of(&v)),
            UniformValue::Float(v) => self.put(offset, bytemuck::bytes_of(&v)),
            UniformValue::Vec3(v) => {
                let data: [f32; 3] = v.into();
                self.put(offset, bytemuck::cast_slice(&data));
            }
            UniformValue::Mat4(m) => {
                // cgmath matrices are column-major, which is what WGSL expects
                let data: &[f32; 16] = m.as_ref();
                self.put(offset, bytemuck::cast_slice(data));
            }
        }
        true
    }

    /// Reads a field back from the staged bytes
    pub fn read(&self, name: &str) -> Option<UniformValue> {
        let field = self.layout.field(name)?;
        let at = |i: usize| -> f32 {
            let start = field.offset + i * 4;
            bytemuck::pod_read_unaligned(&self.bytes[start..start + 4])
        };

        Some(match field.kind {
            UniformKind::Bool => {
                let raw: u32 =
                    bytemuck::pod_read_unaligned(&self.bytes[field.offset..field.offset + 4]);
                UniformValue::Bool(raw != 0)
            }
            UniformKind::Int => UniformValue::Int(bytemuck::pod_read_unaligned(
                &self.bytes[field.offset..field.offset + 4],
            )),
            UniformKind::Float => UniformValue::Float(at(0)),
            UniformKind::Vec3 => UniformValue::Vec3(Vector3::new(at(0), at(1), at(2))),
            UniformKind::Mat4 => {
                let mut columns = [[0.0f32; 4]; 4];
                for (i, value) in columns.iter_mut().flatten().enumerate() {
                    *value = at(i);
                }
                UniformValue::Mat4(Matrix4::from(columns))
            }
        })
    }

    pub fn layout(&self) -> &UniformLayout {
        &self.layout
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    fn put(&mut self, offset: usize, data: &[u8]) {
        self.bytes[offset..offset + data.len()].copy_from_slice(data);
    }
}
