use semval::prelude::*;
use serde::{Deserialize, Deserializer};

pub const CODE_MIN_LENGTH: usize = 3;
pub const CODE_MAX_LENGTH: usize = 10;
pub const DISPLAY_NAME_MAX_LENGTH: usize = 50;
pub const SYMBOL_MAX_LENGTH: usize = 10;

/// The writable fields of a currency record, as provided by a create or
/// replace request.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CurrencyFields {
    pub code: String,
    pub display_name: String,
    pub symbol: Option<String>,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CurrencyInvalidity {
    CodeLength,
    DisplayNameBlank,
    DisplayNameTooLong,
    SymbolTooLong,
}

impl CurrencyInvalidity {
    pub fn message(self) -> &'static str {
        match self {
            Self::CodeLength => "Code must be between 3 and 10 characters.",
            Self::DisplayNameBlank => "Display name cannot be blank.",
            Self::DisplayNameTooLong => "Display name cannot exceed 50 characters.",
            Self::SymbolTooLong => "Symbol cannot exceed 10 characters.",
        }
    }
}

impl Validate for CurrencyFields {
    type Invalidity = CurrencyInvalidity;

    fn validate(&self) -> ValidationResult<Self::Invalidity> {
        let code_length = self.code.chars().count();

        ValidationContext::new()
            .invalidate_if(
                !(CODE_MIN_LENGTH..=CODE_MAX_LENGTH).contains(&code_length),
                CurrencyInvalidity::CodeLength,
            )
            .invalidate_if(
                self.display_name.trim().is_empty(),
                CurrencyInvalidity::DisplayNameBlank,
            )
            .invalidate_if(
                self.display_name.chars().count() > DISPLAY_NAME_MAX_LENGTH,
                CurrencyInvalidity::DisplayNameTooLong,
            )
            .invalidate_if(
                self.symbol
                    .as_ref()
                    .map_or(false, |symbol| symbol.chars().count() > SYMBOL_MAX_LENGTH),
                CurrencyInvalidity::SymbolTooLong,
            )
            .into()
    }
}

/// A single field of a partial-update request.
///
/// Partial updates have to distinguish a field that was left out of the
/// request body from one that was explicitly set to `null`, so an
/// `Option<T>` is not enough to represent them.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub enum PatchField<T> {
    /// The field was not present in the request.
    #[default]
    Unset,
    /// The field was present with an explicit `null` value.
    Null,
    /// The field was present with a value.
    Value(T),
}

impl<T> PatchField<T> {
    pub fn is_unset(&self) -> bool {
        matches!(self, Self::Unset)
    }
}

// Deserialization only ever sees fields that are present in the request, so
// it maps `null` and values onto the matching variants. Absent fields fall
// back to `Unset` through `#[serde(default)]` on the containing struct.
impl<'de, T> Deserialize<'de> for PatchField<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Option::<T>::deserialize(deserializer)? {
            None => Self::Null,
            Some(value) => Self::Value(value),
        })
    }
}

/// The payload of a partial update, with independent tri-state fields.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct CurrencyPatch {
    pub display_name: PatchField<String>,
    pub symbol: PatchField<String>,
}

impl CurrencyPatch {
    pub fn is_empty(&self) -> bool {
        self.display_name.is_unset() && self.symbol.is_unset()
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PatchInvalidity {
    DisplayNameNull,
    DisplayNameBlank,
    DisplayNameTooLong,
    SymbolTooLong,
}

impl PatchInvalidity {
    pub fn message(self) -> &'static str {
        match self {
            Self::DisplayNameNull => "Display name cannot be null when provided.",
            Self::DisplayNameBlank => "Display name cannot be blank.",
            Self::DisplayNameTooLong => "Display name cannot exceed 50 characters.",
            Self::SymbolTooLong => "Symbol cannot exceed 10 characters.",
        }
    }
}

impl Validate for CurrencyPatch {
    type Invalidity = PatchInvalidity;

    fn validate(&self) -> ValidationResult<Self::Invalidity> {
        ValidationContext::new()
            // An explicit null would erase a required field, while an absent
            // field leaves it untouched.
            .invalidate_if(
                matches!(self.display_name, PatchField::Null),
                PatchInvalidity::DisplayNameNull,
            )
            .invalidate_if(
                matches!(&self.display_name, PatchField::Value(name) if name.trim().is_empty()),
                PatchInvalidity::DisplayNameBlank,
            )
            .invalidate_if(
                matches!(&self.display_name, PatchField::Value(name) if name.chars().count() > DISPLAY_NAME_MAX_LENGTH),
                PatchInvalidity::DisplayNameTooLong,
            )
            .invalidate_if(
                matches!(&self.symbol, PatchField::Value(symbol) if symbol.chars().count() > SYMBOL_MAX_LENGTH),
                PatchInvalidity::SymbolTooLong,
            )
            .into()
    }
}
