use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Identifier assigned by the record store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OffenderId(pub u64);

impl fmt::Display for OffenderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Raised when a stored or imported value does not name a known variant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized {kind} value '{value}'")]
pub struct UnknownDomainValue {
    pub kind: &'static str,
    pub value: String,
}

impl UnknownDomainValue {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

/// Matches `raw` against each variant's code (ASCII case-insensitive) or display label.
fn parse_variant<T: Copy>(
    kind: &'static str,
    raw: &str,
    variants: &[T],
    code: fn(T) -> &'static str,
    label: fn(T) -> &'static str,
) -> Result<T, UnknownDomainValue> {
    let trimmed = raw.trim();
    variants
        .iter()
        .copied()
        .find(|variant| {
            code(*variant).eq_ignore_ascii_case(trimmed) || label(*variant) == trimmed
        })
        .ok_or_else(|| UnknownDomainValue::new(kind, raw))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub const fn ordered() -> [Self; 2] {
        [Self::Male, Self::Female]
    }

    pub const fn code(self) -> &'static str {
        match self {
            Self::Male => "MALE",
            Self::Female => "FEMALE",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Male => "Nam",
            Self::Female => "Nữ",
        }
    }
}

impl FromStr for Gender {
    type Err = UnknownDomainValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_variant("gender", s, &Self::ordered(), Self::code, Self::label)
    }
}

/// Kind of non-custodial measure the offender is serving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CaseType {
    SuspendedSentence,
    Probation,
    Postponement,
    ConditionalRelease,
    Other,
}

impl CaseType {
    pub const fn ordered() -> [Self; 5] {
        [
            Self::SuspendedSentence,
            Self::Probation,
            Self::Postponement,
            Self::ConditionalRelease,
            Self::Other,
        ]
    }

    pub const fn code(self) -> &'static str {
        match self {
            Self::SuspendedSentence => "SUSPENDED_SENTENCE",
            Self::Probation => "PROBATION",
            Self::Postponement => "POSTPONEMENT",
            Self::ConditionalRelease => "CONDITIONAL_RELEASE",
            Self::Other => "OTHER",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::SuspendedSentence => "Án treo",
            Self::Probation => "Cải tạo không giam giữ",
            Self::Postponement => "Hoãn chấp hành án",
            Self::ConditionalRelease => "Tha tù trước thời hạn có điều kiện",
            Self::Other => "Khác",
        }
    }
}

impl FromStr for CaseType {
    type Err = UnknownDomainValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_variant("case type", s, &Self::ordered(), Self::code, Self::label)
    }
}

/// Derived position of a supervision period relative to its completion date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SupervisionStatus {
    Active,
    ExpiringSoon,
    Completed,
}

impl SupervisionStatus {
    pub const fn ordered() -> [Self; 3] {
        [Self::Active, Self::ExpiringSoon, Self::Completed]
    }

    pub const fn code(self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::ExpiringSoon => "EXPIRING_SOON",
            Self::Completed => "COMPLETED",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Active => "Đang chấp hành",
            Self::ExpiringSoon => "Sắp kết thúc",
            Self::Completed => "Đã hoàn thành",
        }
    }
}

impl FromStr for SupervisionStatus {
    type Err = UnknownDomainValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_variant("status", s, &Self::ordered(), Self::code, Self::label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub const fn ordered() -> [Self; 3] {
        [Self::Low, Self::Medium, Self::High]
    }

    pub const fn code(self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "Thấp",
            Self::Medium => "Trung bình",
            Self::High => "Cao",
        }
    }
}

impl FromStr for RiskLevel {
    type Err = UnknownDomainValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_variant("risk level", s, &Self::ordered(), Self::code, Self::label)
    }
}

/// Case attributes both calculators read. Owned and mutated by the record layer only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OffenderCaseFacts {
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub duration_months: u32,
    #[serde(default)]
    pub reduced_months: u32,
    #[serde(default)]
    pub reduction_count: u32,
    #[serde(default)]
    pub last_reduction_date: Option<NaiveDate>,
    #[serde(default)]
    pub birth_date: Option<NaiveDate>,
    #[serde(default)]
    pub occupation: String,
    #[serde(default)]
    pub address: String,
}

/// Identity and case paperwork fields that never feed a calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OffenderProfile {
    pub case_number: String,
    pub full_name: String,
    pub gender: Gender,
    #[serde(default)]
    pub id_number: String,
    pub case_type: CaseType,
    #[serde(default)]
    pub crime: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub ward: String,
    #[serde(default)]
    pub notes: String,
}

/// Payload the record layer creates or replaces an offender from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OffenderSubmission {
    pub profile: OffenderProfile,
    pub facts: OffenderCaseFacts,
}
