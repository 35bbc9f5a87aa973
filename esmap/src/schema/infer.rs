use crate::schema::PropertyType;
use crate::types::TypeDescriptor;

/// Default property type for a field's native type. A `type=` option always wins over this.
///
/// Pointers are transparent. Collections take their element's type, except that a
/// collection of records becomes `nested`: the engine has no array type.
pub fn infer_type(ty: &TypeDescriptor) -> PropertyType {
    match ty {
        TypeDescriptor::Pointer(inner) => infer_type(inner),
        TypeDescriptor::DateTime => PropertyType::Date,
        TypeDescriptor::Slice(element) => match infer_type(element) {
            PropertyType::Object => PropertyType::Nested,
            other => other,
        },
        TypeDescriptor::Record(_) => PropertyType::Object,
        TypeDescriptor::Bool => PropertyType::Boolean,
        TypeDescriptor::Float32 => PropertyType::Float,
        TypeDescriptor::Float64 => PropertyType::Double,
        TypeDescriptor::Int8 => PropertyType::Byte,
        TypeDescriptor::Int16 | TypeDescriptor::UInt8 => PropertyType::Short,
        TypeDescriptor::Int32 | TypeDescriptor::Isize | TypeDescriptor::UInt16 => PropertyType::Integer,
        TypeDescriptor::Int64 | TypeDescriptor::UInt32 | TypeDescriptor::UInt64 | TypeDescriptor::Usize => {
            PropertyType::Long
        }
        TypeDescriptor::Str | TypeDescriptor::Other(_) => PropertyType::Text,
    }
}
