//! Translatable-field metadata
//!
//! A type opts in by registering a scope and the ordered list of its
//! translatable fields. Registration happens once per type through the
//! [`translatable!`](crate::translatable) macro, which builds an
//! [`EntityDescriptor`] on first use and caches it for the life of the process.
//!
//! # Example
//!
//! ```
//! use multilingual::{translatable, TranslatableEntity};
//!
//! struct User {
//!     id: u64,
//!     status: String,
//!     remark: Option<String>,
//! }
//!
//! // scope defaults to the type name: "User"
//! translatable!(User { status, remark });
//!
//! let user = User { id: 7, status: "ACTIVE".into(), remark: None };
//! assert_eq!(user.scope(), Some("User"));
//! assert_eq!(user.translatable_fields(), vec!["status", "remark"]);
//! ```
//!
//! An explicit scope overrides the type name, which lets several view types
//! share one set of translations:
//!
//! ```
//! use multilingual::{translatable, TranslatableEntity};
//!
//! struct UserSummary {
//!     status: String,
//! }
//!
//! translatable!(#[scope = "User"] UserSummary { status });
//!
//! let summary = UserSummary { status: "ACTIVE".into() };
//! assert_eq!(summary.scope(), Some("User"));
//! ```

use crate::error::FieldAccessError;

/// Current content of a translatable field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceValue {
    /// A string field
    Text(String),
    /// Any other value, in its string form
    Other(String),
}

impl SourceValue {
    /// Empty strings are never looked up; other values always are
    pub fn is_blank(&self) -> bool {
        matches!(self, SourceValue::Text(text) if text.is_empty())
    }

    pub fn as_str(&self) -> &str {
        match self {
            SourceValue::Text(value) | SourceValue::Other(value) => value,
        }
    }

    pub fn into_string(self) -> String {
        match self {
            SourceValue::Text(value) | SourceValue::Other(value) => value,
        }
    }
}

/// A value that can sit in a translatable field
pub trait TranslatableValue {
    /// `None` for null values, which are never looked up
    fn source_value(&self) -> Option<SourceValue>;

    /// Overwrite the value with a translated string
    fn write_translation(&mut self, field: &str, translated: &str) -> Result<(), FieldAccessError>;
}

impl TranslatableValue for String {
    fn source_value(&self) -> Option<SourceValue> {
        Some(SourceValue::Text(self.clone()))
    }

    fn write_translation(&mut self, _field: &str, translated: &str) -> Result<(), FieldAccessError> {
        self.clear();
        self.push_str(translated);
        Ok(())
    }
}

impl<T: TranslatableValue> TranslatableValue for Option<T> {
    fn source_value(&self) -> Option<SourceValue> {
        self.as_ref().and_then(TranslatableValue::source_value)
    }

    fn write_translation(&mut self, field: &str, translated: &str) -> Result<(), FieldAccessError> {
        match self {
            Some(value) => value.write_translation(field, translated),
            None => Err(FieldAccessError::TypeMismatch {
                field: field.to_string(),
                found: "null".to_string(),
            }),
        }
    }
}

impl<T: TranslatableValue> TranslatableValue for Box<T> {
    fn source_value(&self) -> Option<SourceValue> {
        (**self).source_value()
    }

    fn write_translation(&mut self, field: &str, translated: &str) -> Result<(), FieldAccessError> {
        (**self).write_translation(field, translated)
    }
}

// Non-textual values are looked up by their string form but can never be
// overwritten with a translation.
macro_rules! impl_non_textual {
    ($($ty:ty),* $(,)?) => {
        $(
            impl TranslatableValue for $ty {
                fn source_value(&self) -> Option<SourceValue> {
                    Some(SourceValue::Other(self.to_string()))
                }

                fn write_translation(
                    &mut self,
                    field: &str,
                    _translated: &str,
                ) -> Result<(), FieldAccessError> {
                    Err(FieldAccessError::TypeMismatch {
                        field: field.to_string(),
                        found: stringify!($ty).to_string(),
                    })
                }
            }
        )*
    };
}

impl_non_textual!(
    i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64, bool, char
);

/// An object whose fields may be translated in place
///
/// Object safe, so that heterogeneous payloads can be walked uniformly.
/// Statically typed entities get this through [`translatable!`](crate::translatable);
/// [`DynamicRecord`](crate::DynamicRecord) implements it from a runtime schema.
pub trait TranslatableEntity {
    /// Scope name, or `None` when the type carries no translation metadata
    fn scope(&self) -> Option<&str>;

    /// Translatable field names, in declaration order
    fn translatable_fields(&self) -> Vec<&str>;

    /// Read a field's current value; `Ok(None)` for null
    fn read_field(&self, field: &str) -> Result<Option<SourceValue>, FieldAccessError>;

    /// Overwrite a field with a translated value
    fn write_field(&mut self, field: &str, translated: &str) -> Result<(), FieldAccessError>;
}

/// Statically registered translation metadata
pub trait Translatable: Sized + 'static {
    fn descriptor() -> &'static EntityDescriptor<Self>;
}

/// Reads a field as a [`SourceValue`]
pub type FieldReader<T> = fn(&T) -> Option<SourceValue>;

/// Writes a translated string into a field
pub type FieldWriter<T> = fn(&mut T, &str, &str) -> Result<(), FieldAccessError>;

/// One registered field
pub struct FieldDescriptor<T> {
    name: &'static str,
    read: FieldReader<T>,
    write: FieldWriter<T>,
}

impl<T> FieldDescriptor<T> {
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl<T> std::fmt::Debug for FieldDescriptor<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.name)
            .finish()
    }
}

/// Scope and translatable fields of one type
pub struct EntityDescriptor<T> {
    scope: String,
    fields: Vec<FieldDescriptor<T>>,
}

impl<T> EntityDescriptor<T> {
    /// Start a descriptor; a missing or empty override falls back to `type_name`
    ///
    /// `type_name` is the type's simple name as written at the registration
    /// site, so the default scope never depends on compiler diagnostics.
    pub fn new(scope_override: Option<&str>, type_name: &str) -> Self {
        Self {
            scope: resolve_scope(scope_override, type_name),
            fields: Vec::new(),
        }
    }

    /// Register a field; registering the same name twice keeps the first registration
    pub fn with_field(
        mut self,
        name: &'static str,
        read: FieldReader<T>,
        write: FieldWriter<T>,
    ) -> Self {
        if self.fields.iter().all(|field| field.name != name) {
            self.fields.push(FieldDescriptor { name, read, write });
        }
        self
    }

    pub fn scope(&self) -> &str {
        &self.scope
    }

    pub fn fields(&self) -> &[FieldDescriptor<T>] {
        &self.fields
    }

    pub fn field_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|field| field.name)
    }

    fn find(&self, field: &str) -> Result<&FieldDescriptor<T>, FieldAccessError> {
        self.fields
            .iter()
            .find(|candidate| candidate.name == field)
            .ok_or_else(|| FieldAccessError::UnknownField {
                scope: self.scope.clone(),
                field: field.to_string(),
            })
    }

    pub fn read(&self, entity: &T, field: &str) -> Result<Option<SourceValue>, FieldAccessError> {
        let descriptor = self.find(field)?;
        Ok((descriptor.read)(entity))
    }

    pub fn write(
        &self,
        entity: &mut T,
        field: &str,
        translated: &str,
    ) -> Result<(), FieldAccessError> {
        let descriptor = self.find(field)?;
        (descriptor.write)(entity, descriptor.name, translated)
    }
}

impl<T> std::fmt::Debug for EntityDescriptor<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityDescriptor")
            .field("scope", &self.scope)
            .field("fields", &self.fields)
            .finish()
    }
}

/// Pick the scope name: the override when it is non-empty, else the type name
///
/// The override is used exactly as given; whitespace is not trimmed.
pub fn resolve_scope(scope_override: Option<&str>, type_name: &str) -> String {
    scope_override
        .filter(|scope| !scope.is_empty())
        .unwrap_or(type_name)
        .to_string()
}

/// Register a type's translatable fields
///
/// ```
/// # use multilingual::translatable;
/// struct Product { name: String, unit: Option<String>, stock: u32 }
/// struct ProductRow { name: String }
///
/// translatable!(Product { name, unit, stock });
/// translatable!(#[scope = "Product"] ProductRow { name });
/// ```
///
/// Implements [`Translatable`], [`TranslatableEntity`] and
/// [`TranslationPayload`](crate::TranslationPayload) for the type. Every listed
/// field must implement [`TranslatableValue`]. The type is named by a plain
/// path (`User`, `model::User`) without generic parameters, since the
/// descriptor is cached in a `static`; the default scope is the path's last
/// segment.
#[macro_export]
macro_rules! translatable {
    (@last $first:ident :: $($rest:ident)::+) => {
        $crate::translatable!(@last $($rest)::+)
    };
    (@last $only:ident) => {
        ::core::stringify!($only)
    };
    (@impl $ty:ty, $name:expr, $scope:expr, $($field:ident),*) => {
        impl $crate::Translatable for $ty {
            fn descriptor() -> &'static $crate::EntityDescriptor<Self> {
                static DESCRIPTOR: ::std::sync::OnceLock<$crate::EntityDescriptor<$ty>> =
                    ::std::sync::OnceLock::new();
                DESCRIPTOR.get_or_init(|| {
                    $crate::EntityDescriptor::<$ty>::new($scope, $name)
                        $(
                            .with_field(
                                ::core::stringify!($field),
                                |entity: &$ty| {
                                    $crate::TranslatableValue::source_value(&entity.$field)
                                },
                                |entity: &mut $ty, field: &str, translated: &str| {
                                    $crate::TranslatableValue::write_translation(
                                        &mut entity.$field,
                                        field,
                                        translated,
                                    )
                                },
                            )
                        )*
                })
            }
        }

        impl $crate::TranslatableEntity for $ty {
            fn scope(&self) -> ::core::option::Option<&str> {
                ::core::option::Option::Some(
                    <$ty as $crate::Translatable>::descriptor().scope(),
                )
            }

            fn translatable_fields(&self) -> ::std::vec::Vec<&str> {
                <$ty as $crate::Translatable>::descriptor().field_names().collect()
            }

            fn read_field(
                &self,
                field: &str,
            ) -> ::core::result::Result<
                ::core::option::Option<$crate::SourceValue>,
                $crate::FieldAccessError,
            > {
                <$ty as $crate::Translatable>::descriptor().read(self, field)
            }

            fn write_field(
                &mut self,
                field: &str,
                translated: &str,
            ) -> ::core::result::Result<(), $crate::FieldAccessError> {
                <$ty as $crate::Translatable>::descriptor().write(self, field, translated)
            }
        }

        impl $crate::TranslationPayload for $ty {
            fn entities(&self) -> ::std::vec::Vec<&dyn $crate::TranslatableEntity> {
                ::std::vec![self as &dyn $crate::TranslatableEntity]
            }

            fn entities_mut(&mut self) -> ::std::vec::Vec<&mut dyn $crate::TranslatableEntity> {
                ::std::vec![self as &mut dyn $crate::TranslatableEntity]
            }
        }
    };
    (#[scope = $scope:literal] $($seg:ident)::+ { $($field:ident),* $(,)? }) => {
        $crate::translatable!(
            @impl $($seg)::+,
            $crate::translatable!(@last $($seg)::+),
            ::core::option::Option::Some($scope),
            $($field),*
        );
    };
    ($($seg:ident)::+ { $($field:ident),* $(,)? }) => {
        $crate::translatable!(
            @impl $($seg)::+,
            $crate::translatable!(@last $($seg)::+),
            ::core::option::Option::None,
            $($field),*
        );
    };
}
