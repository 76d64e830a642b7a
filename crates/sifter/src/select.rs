//! Field projection.

use std::fmt;

use crate::error::Result;
use crate::field::{resolve, FieldDescriptor};
use crate::traits::Filterable;

/// A resolved field selection.
///
/// Applying it yields a new record of the same type holding only the
/// selected fields; every other field keeps its `Default` value.
pub struct Projection<T: 'static> {
    fields: Vec<&'static FieldDescriptor<T>>,
}

impl<T: Filterable> Projection<T> {
    /// Resolves the selected names against `T`. Duplicates are kept once.
    pub fn resolve<S: AsRef<str>>(names: &[S]) -> Result<Self> {
        let mut fields: Vec<&'static FieldDescriptor<T>> = Vec::with_capacity(names.len());
        for name in names {
            let field = resolve::<T>(name.as_ref())?;
            if !fields.iter().any(|f| std::ptr::eq(*f, field)) {
                fields.push(field);
            }
        }
        Ok(Projection { fields })
    }
}

impl<T: 'static> Projection<T> {
    /// Selected fields, in request order.
    pub fn fields(&self) -> &[&'static FieldDescriptor<T>] {
        &self.fields
    }

    /// Registered names of the selected fields.
    pub fn names(&self) -> Vec<&'static str> {
        self.fields.iter().map(|f| f.name()).collect()
    }

    /// Copies the selected fields of `record` onto `T::default()`.
    pub fn apply(&self, record: &T) -> T
    where
        T: Default,
    {
        let mut shaped = T::default();
        for field in &self.fields {
            field.copy_into(record, &mut shaped);
        }
        shaped
    }
}

impl<T: 'static> Clone for Projection<T> {
    fn clone(&self) -> Self {
        Projection {
            fields: self.fields.clone(),
        }
    }
}

impl<T: 'static> fmt::Debug for Projection<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Projection").field(&self.names()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FilterError;
    use crate::traits::FieldValue;
    use once_cell::sync::Lazy;

    #[derive(Debug, Clone, Default, PartialEq)]
    struct Contact {
        id: i32,
        name: String,
        email: Option<String>,
    }

    impl Filterable for Contact {
        fn fields() -> &'static [FieldDescriptor<Self>] {
            static FIELDS: Lazy<Vec<FieldDescriptor<Contact>>> = Lazy::new(|| {
                vec![
                    FieldDescriptor::<Contact>::new(
                        "Id",
                        <i32 as FieldValue>::TYPE,
                        |c| c.id.field_value(),
                        |s, d| d.id = s.id,
                    ),
                    FieldDescriptor::<Contact>::new(
                        "Name",
                        <String as FieldValue>::TYPE,
                        |c| c.name.field_value(),
                        |s, d| d.name = s.name.clone(),
                    ),
                    FieldDescriptor::<Contact>::new(
                        "Email",
                        <Option<String> as FieldValue>::TYPE,
                        |c| c.email.field_value(),
                        |s, d| d.email = s.email.clone(),
                    ),
                ]
            });
            FIELDS.as_slice()
        }
    }

    #[test]
    fn copies_only_selected_fields() {
        let contact = Contact {
            id: 7,
            name: "Ann".into(),
            email: Some("ann@example.com".into()),
        };
        let projection = Projection::<Contact>::resolve(&["id", "NAME"]).unwrap();
        let shaped = projection.apply(&contact);

        assert_eq!(
            shaped,
            Contact {
                id: 7,
                name: "Ann".into(),
                email: None,
            }
        );
        assert_eq!(contact.email.as_deref(), Some("ann@example.com"));
    }

    #[test]
    fn duplicates_collapse() {
        let projection = Projection::<Contact>::resolve(&["Name", "name", "Id"]).unwrap();
        assert_eq!(projection.names(), vec!["Name", "Id"]);
    }

    #[test]
    fn unknown_field_fails() {
        let err = Projection::<Contact>::resolve(&["Phone"]).unwrap_err();
        assert_eq!(err, FilterError::UnknownField { name: "Phone".into() });
    }
}
