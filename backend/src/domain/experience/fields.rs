//! Validated scalar fields of interviews, rounds and questions.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use url::Url;

/// Validation errors for experience fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExperienceValidationError {
    CompanyLength { min: usize, max: usize },
    EmptyRoundName,
    NoteTooLong { max: usize },
    TitleLength { min: usize, max: usize },
    DescriptionTooLong { max: usize },
    InvalidLink,
    InvalidCompensation,
    UnknownValue { field: &'static str, value: String },
}

impl fmt::Display for ExperienceValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CompanyLength { min, max } => {
                write!(f, "company name must be between {min} and {max} characters")
            }
            Self::EmptyRoundName => write!(f, "round name must not be empty"),
            Self::NoteTooLong { max } => write!(f, "note must be at most {max} characters"),
            Self::TitleLength { min, max } => {
                write!(f, "question title must be between {min} and {max} characters")
            }
            Self::DescriptionTooLong { max } => {
                write!(f, "description must be at most {max} characters")
            }
            Self::InvalidLink => write!(f, "link must be an absolute URL with a protocol"),
            Self::InvalidCompensation => {
                write!(f, "compensation must be a non-negative number")
            }
            Self::UnknownValue { field, value } => write!(f, "unknown {field}: {value}"),
        }
    }
}

impl std::error::Error for ExperienceValidationError {}

impl ExperienceValidationError {
    /// Request field the error refers to, in wire casing.
    pub fn field(&self) -> &'static str {
        match self {
            Self::CompanyLength { .. } => "company",
            Self::EmptyRoundName => "name",
            Self::NoteTooLong { .. } => "note",
            Self::TitleLength { .. } => "title",
            Self::DescriptionTooLong { .. } => "description",
            Self::InvalidLink => "link",
            Self::InvalidCompensation => "compensation",
            Self::UnknownValue { field, .. } => *field,
        }
    }
}

fn bounded_trimmed(
    raw: &str,
    min: usize,
    max: usize,
    error: ExperienceValidationError,
) -> Result<String, ExperienceValidationError> {
    let trimmed = raw.trim();
    let length = trimmed.chars().count();
    if length < min || length > max {
        return Err(error);
    }
    Ok(trimmed.to_owned())
}

macro_rules! string_field {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name(String);

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                self.0.as_str()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

pub const COMPANY_MIN: usize = 3;
pub const COMPANY_MAX: usize = 35;
pub const NOTE_MAX: usize = 512;
pub const TITLE_MIN: usize = 10;
pub const TITLE_MAX: usize = 100;
pub const DESCRIPTION_MAX: usize = 300;

string_field!(
    /// Company name, trimmed, 3 to 35 characters.
    CompanyName
);
string_field!(
    /// Round name, unique within its interview.
    RoundName
);
string_field!(
    /// Free-form note on a round.
    RoundNote
);
string_field!(
    /// Question title, trimmed, 10 to 100 characters.
    QuestionTitle
);
string_field!(
    /// Optional question description.
    QuestionDescription
);

impl CompanyName {
    pub fn new(raw: impl AsRef<str>) -> Result<Self, ExperienceValidationError> {
        bounded_trimmed(
            raw.as_ref(),
            COMPANY_MIN,
            COMPANY_MAX,
            ExperienceValidationError::CompanyLength {
                min: COMPANY_MIN,
                max: COMPANY_MAX,
            },
        )
        .map(Self)
    }
}

impl RoundName {
    pub fn new(raw: impl AsRef<str>) -> Result<Self, ExperienceValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(ExperienceValidationError::EmptyRoundName);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl RoundNote {
    pub fn new(raw: impl Into<String>) -> Result<Self, ExperienceValidationError> {
        let raw = raw.into();
        if raw.chars().count() > NOTE_MAX {
            return Err(ExperienceValidationError::NoteTooLong { max: NOTE_MAX });
        }
        Ok(Self(raw))
    }
}

impl QuestionTitle {
    pub fn new(raw: impl AsRef<str>) -> Result<Self, ExperienceValidationError> {
        bounded_trimmed(
            raw.as_ref(),
            TITLE_MIN,
            TITLE_MAX,
            ExperienceValidationError::TitleLength {
                min: TITLE_MIN,
                max: TITLE_MAX,
            },
        )
        .map(Self)
    }
}

impl QuestionDescription {
    pub fn new(raw: impl Into<String>) -> Result<Self, ExperienceValidationError> {
        let raw = raw.into();
        if raw.chars().count() > DESCRIPTION_MAX {
            return Err(ExperienceValidationError::DescriptionTooLong {
                max: DESCRIPTION_MAX,
            });
        }
        Ok(Self(raw))
    }
}

const LINK_SCHEMES: [&str; 3] = ["http", "https", "ftp"];

/// Absolute link attached to a question. Query strings are allowed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionLink(Url);

impl QuestionLink {
    pub fn new(raw: impl AsRef<str>) -> Result<Self, ExperienceValidationError> {
        let url = Url::parse(raw.as_ref().trim())
            .map_err(|_| ExperienceValidationError::InvalidLink)?;
        if !LINK_SCHEMES.contains(&url.scheme()) || url.host_str().is_none() {
            return Err(ExperienceValidationError::InvalidLink);
        }
        Ok(Self(url))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for QuestionLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_str())
    }
}

/// Offered compensation. Finite and non-negative.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Compensation(f64);

impl Compensation {
    pub fn new(amount: f64) -> Result<Self, ExperienceValidationError> {
        if !amount.is_finite() || amount < 0.0 {
            return Err(ExperienceValidationError::InvalidCompensation);
        }
        Ok(Self(amount))
    }

    pub fn amount(self) -> f64 {
        self.0
    }
}

/// Declares a closed string enum with wire values shared by serde and the store.
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $name:ident ($field:literal) {
            $( $(#[$vmeta:meta])* $variant:ident => $wire:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $( $(#[$vmeta])* #[serde(rename = $wire)] $variant ),+
        }

        impl $name {
            pub fn as_str(self) -> &'static str {
                match self {
                    $( Self::$variant => $wire ),+
                }
            }
        }

        impl FromStr for $name {
            type Err = ExperienceValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $( $wire => Ok(Self::$variant), )+
                    other => Err(ExperienceValidationError::UnknownValue {
                        field: $field,
                        value: other.to_owned(),
                    }),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

wire_enum!(
    /// Placement outcome reported by the interviewee.
    #[derive(Default)]
    InterviewStatus ("status") {
        #[default]
        Ongoing => "ongoing",
        Placed => "placed",
        NotPlaced => "not-placed",
    }
);

wire_enum!(
    /// Verification state of a submitted experience.
    #[derive(Default)]
    VerificationStatus ("verification status") {
        #[default]
        NotVerified => "not-verified",
        InQueue => "in-queue",
        Accepted => "accepted",
        Rejected => "rejected",
    }
);

wire_enum!(
    /// Kind of offer received.
    Offer ("offer") {
        Fte => "fte",
        Intern => "intern",
    }
);

wire_enum!(
    /// Interview round category.
    RoundType ("type") {
        Oa => "oa",
        Technical => "technical",
        SysDesign => "sys-design",
        Gd => "gd",
        Hr => "hr",
    }
);
