//! Payload shapes the pipeline can walk
//!
//! A payload is whatever an operation returned: one entity, nothing, or a
//! collection of entities. [`TranslationPayload`] flattens all of them into a
//! list of entity references so the pipeline treats them uniformly.

use crate::metadata::TranslatableEntity;

/// A value holding zero or more translatable entities
pub trait TranslationPayload {
    fn entities(&self) -> Vec<&dyn TranslatableEntity>;

    fn entities_mut(&mut self) -> Vec<&mut dyn TranslatableEntity>;
}

impl<P: TranslationPayload> TranslationPayload for Option<P> {
    fn entities(&self) -> Vec<&dyn TranslatableEntity> {
        match self {
            Some(payload) => payload.entities(),
            None => Vec::new(),
        }
    }

    fn entities_mut(&mut self) -> Vec<&mut dyn TranslatableEntity> {
        match self {
            Some(payload) => payload.entities_mut(),
            None => Vec::new(),
        }
    }
}

impl<P: TranslationPayload + ?Sized> TranslationPayload for Box<P> {
    fn entities(&self) -> Vec<&dyn TranslatableEntity> {
        (**self).entities()
    }

    fn entities_mut(&mut self) -> Vec<&mut dyn TranslatableEntity> {
        (**self).entities_mut()
    }
}

impl<P: TranslationPayload> TranslationPayload for [P] {
    fn entities(&self) -> Vec<&dyn TranslatableEntity> {
        self.iter().flat_map(TranslationPayload::entities).collect()
    }

    fn entities_mut(&mut self) -> Vec<&mut dyn TranslatableEntity> {
        self.iter_mut()
            .flat_map(TranslationPayload::entities_mut)
            .collect()
    }
}

impl<P: TranslationPayload> TranslationPayload for Vec<P> {
    fn entities(&self) -> Vec<&dyn TranslatableEntity> {
        self.as_slice().entities()
    }

    fn entities_mut(&mut self) -> Vec<&mut dyn TranslatableEntity> {
        self.as_mut_slice().entities_mut()
    }
}

impl<P: TranslationPayload, const N: usize> TranslationPayload for [P; N] {
    fn entities(&self) -> Vec<&dyn TranslatableEntity> {
        self.as_slice().entities()
    }

    fn entities_mut(&mut self) -> Vec<&mut dyn TranslatableEntity> {
        self.as_mut_slice().entities_mut()
    }
}

/// Extracts the part of an operation result that should be translated
///
/// Operations often wrap their data (`Page { items, total }`, `Response { data }`);
/// a getter points the pipeline at the payload inside.
pub trait DataGetter<R: ?Sized> {
    type Data: TranslationPayload + ?Sized;

    fn data<'a>(&self, result: &'a mut R) -> &'a mut Self::Data;
}

/// Translate the result itself
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Identity;

impl<R: TranslationPayload + ?Sized> DataGetter<R> for Identity {
    type Data = R;

    fn data<'a>(&self, result: &'a mut R) -> &'a mut R {
        result
    }
}

/// Project into a nested field
///
/// ```
/// # use multilingual::{translatable, DataGetter};
/// struct User { status: String }
/// translatable!(User { status });
///
/// struct Page { items: Vec<User>, total: usize }
///
/// let getter: fn(&mut Page) -> &mut Vec<User> = |page| &mut page.items;
/// let mut page = Page { items: vec![User { status: "ACTIVE".into() }], total: 1 };
/// assert_eq!(getter.data(&mut page).len(), page.total);
/// ```
impl<R: ?Sized, D: TranslationPayload + ?Sized> DataGetter<R> for fn(&mut R) -> &mut D {
    type Data = D;

    fn data<'a>(&self, result: &'a mut R) -> &'a mut D {
        self(result)
    }
}
