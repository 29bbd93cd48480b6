//! Strongly-typed value objects used by domain entities and list queries.
//!
//! These wrappers enforce basic invariants (e.g., positive identifiers,
//! sixteen-digit NIK, bounded ADL scores) so that once a value reaches the
//! domain layer it can be treated as trusted.
use std::{ops::Deref, str::FromStr};

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use thiserror::Error;

/// Errors produced when attempting to construct a constrained value object.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeConstraintError {
    /// Provided identifier is zero or negative.
    #[error("id must be greater than zero")]
    NonPositiveId,
    /// Provided string contained no non-whitespace characters.
    #[error("value cannot be empty")]
    EmptyString,
    /// NIK is not exactly sixteen digits.
    #[error("NIK must consist of exactly 16 digits")]
    InvalidNik,
    /// ADL item score outside of `0..=2`.
    #[error("ADL score must be between 0 and 2, got {0}")]
    InvalidAdlScore(u8),
    /// Page size outside of the allowed set.
    #[error("page size must be one of 10, 25 or 50, got {0}")]
    InvalidPageSize(usize),
    /// Provided value failed custom validation.
    #[error("invalid value: {0}")]
    InvalidValue(String),
}

/// Macro to generate lightweight newtypes for positive identifiers.
macro_rules! id_newtype {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[serde(try_from = "i32", into = "i32")]
        pub struct $name(i32);

        impl $name {
            /// Creates a new identifier ensuring it is greater than zero.
            pub fn new(value: i32) -> Result<Self, TypeConstraintError> {
                if value > 0 {
                    Ok(Self(value))
                } else {
                    Err(TypeConstraintError::NonPositiveId)
                }
            }

            /// Returns the raw `i32` backing this identifier.
            pub const fn get(self) -> i32 {
                self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<i32> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: i32) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for i32 {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl FromStr for $name {
            type Err = TypeConstraintError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let value = s
                    .trim()
                    .parse::<i32>()
                    .map_err(|_| TypeConstraintError::InvalidValue(s.to_string()))?;
                Self::new(value)
            }
        }
    };
}

id_newtype!(LansiaId, "Unique identifier for a lansia record.");

/// Wrapper for non-empty, trimmed strings.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct NonEmptyString(String);

impl NonEmptyString {
    /// Trims whitespace and rejects empty inputs.
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let trimmed = value.into().trim().to_string();
        if trimmed.is_empty() {
            return Err(TypeConstraintError::EmptyString);
        }
        Ok(Self(trimmed))
    }

    /// Borrow the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the wrapper returning the owned string.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for NonEmptyString {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for NonEmptyString {
    type Error = TypeConstraintError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for NonEmptyString {
    type Error = TypeConstraintError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<NonEmptyString> for String {
    fn from(value: NonEmptyString) -> Self {
        value.0
    }
}

macro_rules! non_empty_string_newtype {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(String);

        impl $name {
            /// Constructs a trimmed, non-empty value.
            pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
                let inner = NonEmptyString::new(value)?;
                Ok(Self(inner.into_inner()))
            }

            /// Borrow the value as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the wrapper and return the owned string.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl Deref for $name {
            type Target = str;

            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<String> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl TryFrom<&str> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: &str) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

non_empty_string_newtype!(FullName, "Resident full name enforcing non-empty values.");

non_empty_string_newtype!(
    Gender,
    "Gender label as stored by the backend (`Laki-laki`, `Perempuan`)."
);

/// Population registry number (Nomor Induk Kependudukan): exactly 16 digits.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Nik(String);

impl Nik {
    pub const LENGTH: usize = 16;

    /// Trims the input and checks it is sixteen ASCII digits.
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let trimmed = value.into().trim().to_string();
        if trimmed.len() == Self::LENGTH && trimmed.bytes().all(|b| b.is_ascii_digit()) {
            Ok(Self(trimmed))
        } else {
            Err(TypeConstraintError::InvalidNik)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for Nik {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<&str> for Nik {
    type Error = TypeConstraintError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Score of a single Activities of Daily Living item.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(try_from = "u8", into = "u8")]
pub struct AdlScore(u8);

impl AdlScore {
    pub const MAX: u8 = 2;

    pub fn new(value: u8) -> Result<Self, TypeConstraintError> {
        if value <= Self::MAX {
            Ok(Self(value))
        } else {
            Err(TypeConstraintError::InvalidAdlScore(value))
        }
    }

    pub const fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for AdlScore {
    type Error = TypeConstraintError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<AdlScore> for u8 {
    fn from(value: AdlScore) -> Self {
        value.0
    }
}

/// Columns the backend accepts for ordering the resident list.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    #[default]
    NamaLengkap,
    Nik,
    JenisKelamin,
    Usia,
    Rt,
    Rw,
}

impl SortField {
    pub const ALL: [SortField; 6] = [
        SortField::NamaLengkap,
        SortField::Nik,
        SortField::JenisKelamin,
        SortField::Usia,
        SortField::Rt,
        SortField::Rw,
    ];

    /// Query parameter value understood by the backend.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NamaLengkap => "nama_lengkap",
            Self::Nik => "nik",
            Self::JenisKelamin => "jenis_kelamin",
            Self::Usia => "usia",
            Self::Rt => "rt",
            Self::Rw => "rw",
        }
    }
}

impl Display for SortField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortField {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Self::ALL
            .into_iter()
            .find(|field| field.as_str() == needle)
            .ok_or_else(|| TypeConstraintError::InvalidValue(s.to_string()))
    }
}

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum SortDirection {
    #[default]
    #[serde(rename = "asc")]
    Ascending,
    #[serde(rename = "desc")]
    Descending,
}

impl SortDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ascending => "asc",
            Self::Descending => "desc",
        }
    }

    #[must_use]
    pub fn flipped(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }
}

impl Display for SortDirection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Number of rows per page offered by the table footer.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "usize", into = "usize")]
pub enum PageSize {
    #[default]
    Ten,
    TwentyFive,
    Fifty,
}

impl PageSize {
    pub const ALL: [PageSize; 3] = [PageSize::Ten, PageSize::TwentyFive, PageSize::Fifty];

    pub const fn get(self) -> usize {
        match self {
            Self::Ten => 10,
            Self::TwentyFive => 25,
            Self::Fifty => 50,
        }
    }
}

impl Display for PageSize {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.get())
    }
}

impl TryFrom<usize> for PageSize {
    type Error = TypeConstraintError;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|size| size.get() == value)
            .ok_or(TypeConstraintError::InvalidPageSize(value))
    }
}

impl From<PageSize> for usize {
    fn from(value: PageSize) -> Self {
        value.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lansia_id_rejects_non_positive_values() {
        assert_eq!(LansiaId::new(0), Err(TypeConstraintError::NonPositiveId));
        assert_eq!(LansiaId::new(-4), Err(TypeConstraintError::NonPositiveId));
        assert_eq!(LansiaId::new(7).map(LansiaId::get), Ok(7));
        assert_eq!("12".parse::<LansiaId>().map(i32::from), Ok(12));
        assert!("abc".parse::<LansiaId>().is_err());
    }

    #[test]
    fn nik_requires_sixteen_digits() {
        assert!(Nik::new(" 3273010101500001 ").is_ok());
        assert_eq!(Nik::new("327301010150000"), Err(TypeConstraintError::InvalidNik));
        assert_eq!(Nik::new("32730101015000AB"), Err(TypeConstraintError::InvalidNik));
    }

    #[test]
    fn full_name_is_trimmed() {
        let name = FullName::new("  Siti Aminah ").unwrap();
        assert_eq!(name.as_str(), "Siti Aminah");
        assert_eq!(FullName::new("   "), Err(TypeConstraintError::EmptyString));
    }

    #[test]
    fn adl_score_is_bounded() {
        assert!(AdlScore::new(2).is_ok());
        assert_eq!(AdlScore::new(3), Err(TypeConstraintError::InvalidAdlScore(3)));
    }

    #[test]
    fn page_size_accepts_only_allowed_values() {
        assert_eq!(PageSize::try_from(25), Ok(PageSize::TwentyFive));
        assert_eq!(
            PageSize::try_from(20),
            Err(TypeConstraintError::InvalidPageSize(20))
        );
        assert_eq!(PageSize::default().get(), 10);
    }

    #[test]
    fn sort_field_round_trips_through_query_value() {
        for field in SortField::ALL {
            assert_eq!(field.as_str().parse::<SortField>(), Ok(field));
        }
        assert!("alamat".parse::<SortField>().is_err());
        assert_eq!(SortDirection::Ascending.flipped(), SortDirection::Descending);
    }
}
