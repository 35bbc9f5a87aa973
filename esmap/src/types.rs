use std::collections::{BTreeSet, HashSet, VecDeque};
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

use crate::errors::Partial;
use crate::naming;
use crate::schema::{SchemaDocument, build_schema};

/// Shape of a field's native type, as far as schema inference cares.
#[derive(Debug, Clone)]
pub enum TypeDescriptor {
    Bool,
    Int8,
    Int16,
    Int32,
    Int64,
    Isize,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    Usize,
    Float32,
    Float64,
    Str,
    DateTime,
    /// Indirection that is transparent to the schema (`Option`, `Box`, references, ...).
    Pointer(Box<TypeDescriptor>),
    /// Homogeneous collection of the inner type.
    Slice(Box<TypeDescriptor>),
    Record(RecordRef),
    /// Anything without a dedicated mapping; carries a display name.
    Other(String),
}

impl TypeDescriptor {
    pub fn pointer(inner: TypeDescriptor) -> Self {
        Self::Pointer(Box::new(inner))
    }

    pub fn slice(inner: TypeDescriptor) -> Self {
        Self::Slice(Box::new(inner))
    }

    /// Strips pointers and collections until a record is reached.
    pub fn record(&self) -> Option<&RecordRef> {
        match self {
            Self::Record(record) => Some(record),
            Self::Pointer(inner) | Self::Slice(inner) => inner.record(),
            _ => None,
        }
    }

    pub fn display_name(&self) -> String {
        match self {
            Self::Bool => "bool".to_string(),
            Self::Int8 => "i8".to_string(),
            Self::Int16 => "i16".to_string(),
            Self::Int32 => "i32".to_string(),
            Self::Int64 => "i64".to_string(),
            Self::Isize => "isize".to_string(),
            Self::UInt8 => "u8".to_string(),
            Self::UInt16 => "u16".to_string(),
            Self::UInt32 => "u32".to_string(),
            Self::UInt64 => "u64".to_string(),
            Self::Usize => "usize".to_string(),
            Self::Float32 => "f32".to_string(),
            Self::Float64 => "f64".to_string(),
            Self::Str => "String".to_string(),
            Self::DateTime => "DateTime".to_string(),
            Self::Pointer(inner) => format!("Option<{}>", inner.display_name()),
            Self::Slice(inner) => format!("Vec<{}>", inner.display_name()),
            Self::Record(record) => record.name().to_string(),
            Self::Other(name) => name.clone(),
        }
    }
}

/// Lazily resolved handle to a record's field table.
///
/// Records are loaded on demand so a type that refers to itself can still be described.
#[derive(Clone)]
pub struct RecordRef {
    name: String,
    load: Arc<dyn Fn() -> RecordDescriptor + Send + Sync>,
}

impl RecordRef {
    pub fn of<T: RecordMetadata>() -> Self {
        Self {
            name: T::record_name().to_string(),
            load: Arc::new(T::record_descriptor),
        }
    }

    pub fn lazy<F>(name: impl Into<String>, load: F) -> Self
    where
        F: Fn() -> RecordDescriptor + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            load: Arc::new(load),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn resolve(&self) -> RecordDescriptor {
        (self.load)()
    }
}

impl fmt::Debug for RecordRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordRef").field("name", &self.name).finish_non_exhaustive()
    }
}

/// One field of a record type, as emitted by `#[derive(SearchRecord)]` or built by hand.
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    /// Field name in the host record.
    pub name: String,
    pub ty: TypeDescriptor,
    /// Raw external-name tag: `"last_name"`, `"last_name,omitempty"` or `"-"`.
    pub external_tag: Option<String>,
    /// Raw configuration tag, e.g. `"ref_id,case_sensitive=false"`.
    pub options_tag: Option<String>,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, ty: TypeDescriptor) -> Self {
        Self {
            name: name.into(),
            ty,
            external_tag: None,
            options_tag: None,
        }
    }

    pub fn external(mut self, tag: impl Into<String>) -> Self {
        self.external_tag = Some(tag.into());
        self
    }

    pub fn options(mut self, tag: impl Into<String>) -> Self {
        self.options_tag = Some(tag.into());
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct RecordDescriptor {
    /// Short type name (`User`).
    pub name: String,
    /// Fully qualified identity used to detect recursion.
    pub type_path: String,
    pub fields: Vec<FieldDescriptor>,
}

impl RecordDescriptor {
    pub fn new(name: impl Into<String>, fields: Vec<FieldDescriptor>) -> Self {
        let name = name.into();
        Self {
            type_path: name.clone(),
            name,
            fields,
        }
    }
}

/// Supplies the descriptor of a field's type. Implemented for std and chrono types here
/// and for records by `#[derive(SearchRecord)]`.
pub trait DescribeType {
    fn describe() -> TypeDescriptor;
}

/// Implemented by `#[derive(SearchRecord)]`.
pub trait RecordMetadata: 'static {
    fn record_name() -> &'static str;

    fn record_descriptor() -> RecordDescriptor;

    /// Property schema for this record.
    fn schema() -> Partial<SchemaDocument> {
        build_schema(&Self::record_descriptor())
    }

    /// Mapping type name, e.g. `user_profile` for `UserProfile`.
    fn type_name() -> String {
        naming::type_name(Self::record_name())
    }

    /// Default index name, e.g. `user_profiles` for `UserProfile`.
    fn index_name() -> String {
        naming::index_name(Self::record_name())
    }
}

macro_rules! describe_as {
    ($variant:ident => $($ty:ty),+ $(,)?) => {
        $(
            impl DescribeType for $ty {
                fn describe() -> TypeDescriptor {
                    TypeDescriptor::$variant
                }
            }
        )+
    };
}

describe_as!(Bool => bool);
describe_as!(Int8 => i8);
describe_as!(Int16 => i16);
describe_as!(Int32 => i32);
describe_as!(Int64 => i64);
describe_as!(Isize => isize);
describe_as!(UInt8 => u8);
describe_as!(UInt16 => u16);
describe_as!(UInt32 => u32);
describe_as!(UInt64 => u64);
describe_as!(Usize => usize);
describe_as!(Float32 => f32);
describe_as!(Float64 => f64);
describe_as!(Str => String, str, char);
describe_as!(DateTime => chrono::NaiveDateTime, chrono::NaiveDate, std::time::SystemTime);

impl<Tz: chrono::TimeZone> DescribeType for chrono::DateTime<Tz> {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::DateTime
    }
}

impl DescribeType for uuid::Uuid {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::Other("Uuid".to_string())
    }
}

impl DescribeType for i128 {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::Other("i128".to_string())
    }
}

impl DescribeType for u128 {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::Other("u128".to_string())
    }
}

macro_rules! describe_wrapper {
    ($wrap:ident => $($ty:ty),+ $(,)?) => {
        $(
            impl<T: DescribeType + ?Sized> DescribeType for $ty {
                fn describe() -> TypeDescriptor {
                    TypeDescriptor::$wrap(Box::new(T::describe()))
                }
            }
        )+
    };
}

describe_wrapper!(Pointer => Box<T>, Rc<T>, Arc<T>, &T);

impl<T: DescribeType> DescribeType for Option<T> {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::pointer(T::describe())
    }
}

impl<T: DescribeType> DescribeType for Vec<T> {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::slice(T::describe())
    }
}

impl<T: DescribeType> DescribeType for [T] {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::slice(T::describe())
    }
}

impl<T: DescribeType, const N: usize> DescribeType for [T; N] {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::slice(T::describe())
    }
}

impl<T: DescribeType> DescribeType for VecDeque<T> {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::slice(T::describe())
    }
}

impl<T: DescribeType> DescribeType for BTreeSet<T> {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::slice(T::describe())
    }
}

impl<T: DescribeType, S> DescribeType for HashSet<T, S> {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::slice(T::describe())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrappers_nest_in_declaration_order() {
        let ty = <Option<Vec<Box<i64>>>>::describe();
        match ty {
            TypeDescriptor::Pointer(inner) => match *inner {
                TypeDescriptor::Slice(element) => {
                    assert!(matches!(*element, TypeDescriptor::Pointer(ref leaf) if matches!(**leaf, TypeDescriptor::Int64)));
                }
                other => panic!("expected slice, got {other:?}"),
            },
            other => panic!("expected pointer, got {other:?}"),
        }
    }

    #[test]
    fn record_lookup_sees_through_wrappers() {
        let record = RecordRef::lazy("Name", || RecordDescriptor::new("Name", Vec::new()));
        let ty = TypeDescriptor::pointer(TypeDescriptor::slice(TypeDescriptor::Record(record)));
        assert_eq!(ty.record().map(RecordRef::name), Some("Name"));
        assert!(TypeDescriptor::Str.record().is_none());
    }

    #[test]
    fn chrono_types_describe_as_dates() {
        assert!(matches!(<chrono::DateTime<chrono::Utc>>::describe(), TypeDescriptor::DateTime));
        assert!(matches!(chrono::NaiveDate::describe(), TypeDescriptor::DateTime));
    }
}
