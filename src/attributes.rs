use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Shared surface of every DCE attribute level enum.
pub trait AttributeLevel: Copy + Display + FromStr + 'static {
    const ATTRIBUTE: Attribute;
    const ALL: [Self; 3];
    const REFERENCE: Self;

    fn as_slug(&self) -> &'static str;

    fn is_reference(&self) -> bool
    where
        Self: PartialEq,
    {
        *self == Self::REFERENCE
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Attribute {
    Program,
    Career,
    Mentorship,
    Delivery,
    Response,
}

impl Attribute {
    pub const ALL: [Attribute; 5] = [
        Attribute::Program,
        Attribute::Career,
        Attribute::Mentorship,
        Attribute::Delivery,
        Attribute::Response,
    ];

    pub fn as_slug(&self) -> &'static str {
        match self {
            Self::Program => "program",
            Self::Career => "career",
            Self::Mentorship => "mentorship",
            Self::Delivery => "delivery",
            Self::Response => "response",
        }
    }
}

impl Display for Attribute {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let display = match self {
            Self::Program => "Program tier",
            Self::Career => "Career incentive",
            Self::Mentorship => "Mentorship",
            Self::Delivery => "Delivery mode",
            Self::Response => "Response speed",
        };
        write!(f, "{display}")
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown {attribute} level: {raw}")]
pub struct LevelParseError {
    pub attribute: &'static str,
    pub raw: String,
}

impl LevelParseError {
    fn new(attribute: &'static str, raw: &str) -> Self {
        Self {
            attribute,
            raw: raw.to_string(),
        }
    }
}

fn normalize(s: &str) -> String {
    s.trim()
        .to_ascii_lowercase()
        .replace(['-', '_', ' '], "")
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum ProgramTier {
    Frontline,
    Intermediate,
    Advanced,
}

impl ProgramTier {
    /// Programme length in months for one cohort.
    pub fn duration_months(&self) -> u32 {
        match self {
            Self::Frontline => 3,
            Self::Intermediate => 12,
            Self::Advanced => 24,
        }
    }
}

impl AttributeLevel for ProgramTier {
    const ATTRIBUTE: Attribute = Attribute::Program;
    const ALL: [Self; 3] = [Self::Frontline, Self::Intermediate, Self::Advanced];
    const REFERENCE: Self = Self::Frontline;

    fn as_slug(&self) -> &'static str {
        match self {
            Self::Frontline => "frontline",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
        }
    }
}

impl Display for ProgramTier {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let display = match self {
            Self::Frontline => "Frontline",
            Self::Intermediate => "Intermediate",
            Self::Advanced => "Advanced",
        };
        write!(f, "{display}")
    }
}

impl FromStr for ProgramTier {
    type Err = LevelParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "frontline" | "basic" => Ok(Self::Frontline),
            "intermediate" => Ok(Self::Intermediate),
            "advanced" => Ok(Self::Advanced),
            _ => Err(LevelParseError::new("program", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum CareerIncentive {
    Certificate,
    Uni,
    Govpath,
}

impl AttributeLevel for CareerIncentive {
    const ATTRIBUTE: Attribute = Attribute::Career;
    const ALL: [Self; 3] = [Self::Certificate, Self::Uni, Self::Govpath];
    const REFERENCE: Self = Self::Certificate;

    fn as_slug(&self) -> &'static str {
        match self {
            Self::Certificate => "certificate",
            Self::Uni => "uni",
            Self::Govpath => "govpath",
        }
    }
}

impl Display for CareerIncentive {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let display = match self {
            Self::Certificate => "Government & partner certificate",
            Self::Uni => "University qualification",
            Self::Govpath => "Government career pathway",
        };
        write!(f, "{display}")
    }
}

impl FromStr for CareerIncentive {
    type Err = LevelParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "certificate" | "cert" => Ok(Self::Certificate),
            "uni" | "university" => Ok(Self::Uni),
            "govpath" | "government" | "career" => Ok(Self::Govpath),
            _ => Err(LevelParseError::new("career", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum MentorshipLevel {
    Low,
    Medium,
    High,
}

impl AttributeLevel for MentorshipLevel {
    const ATTRIBUTE: Attribute = Attribute::Mentorship;
    const ALL: [Self; 3] = [Self::Low, Self::Medium, Self::High];
    const REFERENCE: Self = Self::Low;

    fn as_slug(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl Display for MentorshipLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let display = match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        };
        write!(f, "{display}")
    }
}

impl FromStr for MentorshipLevel {
    type Err = LevelParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "low" => Ok(Self::Low),
            "medium" | "med" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(LevelParseError::new("mentorship", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryMode {
    Blended,
    Inperson,
    Online,
}

impl AttributeLevel for DeliveryMode {
    const ATTRIBUTE: Attribute = Attribute::Delivery;
    const ALL: [Self; 3] = [Self::Blended, Self::Inperson, Self::Online];
    const REFERENCE: Self = Self::Blended;

    fn as_slug(&self) -> &'static str {
        match self {
            Self::Blended => "blended",
            Self::Inperson => "inperson",
            Self::Online => "online",
        }
    }
}

impl Display for DeliveryMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let display = match self {
            Self::Blended => "Blended",
            Self::Inperson => "In-person",
            Self::Online => "Online",
        };
        write!(f, "{display}")
    }
}

impl FromStr for DeliveryMode {
    type Err = LevelParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "blended" | "hybrid" => Ok(Self::Blended),
            "inperson" | "facetoface" => Ok(Self::Inperson),
            "online" | "remote" => Ok(Self::Online),
            _ => Err(LevelParseError::new("delivery", s)),
        }
    }
}

/// Days from outbreak signal to a deployed response team.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ResponseSpeed {
    #[serde(rename = "30")]
    Days30,
    #[serde(rename = "15")]
    Days15,
    #[serde(rename = "7")]
    Days7,
}

impl ResponseSpeed {
    pub fn days(&self) -> u32 {
        match self {
            Self::Days30 => 30,
            Self::Days15 => 15,
            Self::Days7 => 7,
        }
    }
}

impl AttributeLevel for ResponseSpeed {
    const ATTRIBUTE: Attribute = Attribute::Response;
    const ALL: [Self; 3] = [Self::Days30, Self::Days15, Self::Days7];
    const REFERENCE: Self = Self::Days30;

    fn as_slug(&self) -> &'static str {
        match self {
            Self::Days30 => "30",
            Self::Days15 => "15",
            Self::Days7 => "7",
        }
    }
}

impl Display for ResponseSpeed {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} days", self.days())
    }
}

impl FromStr for ResponseSpeed {
    type Err = LevelParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = normalize(s);
        let digits = normalized
            .trim_end_matches("days")
            .trim_end_matches("day")
            .trim_end_matches('d');
        match digits {
            "30" => Ok(Self::Days30),
            "15" => Ok(Self::Days15),
            "7" => Ok(Self::Days7),
            _ => Err(LevelParseError::new("response", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum PreferenceModel {
    Average,
    Supporters,
}

impl PreferenceModel {
    pub const ALL: [PreferenceModel; 2] = [PreferenceModel::Average, PreferenceModel::Supporters];

    pub fn as_slug(&self) -> &'static str {
        match self {
            Self::Average => "average",
            Self::Supporters => "supporters",
        }
    }
}

impl Display for PreferenceModel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let display = match self {
            Self::Average => "Average preferences",
            Self::Supporters => "Supportive subgroup",
        };
        write!(f, "{display}")
    }
}

impl FromStr for PreferenceModel {
    type Err = LevelParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "average" | "mxl" | "mixedlogit" => Ok(Self::Average),
            "supporters" | "supportive" | "lc" | "latentclass" => Ok(Self::Supporters),
            _ => Err(LevelParseError::new("preference model", s)),
        }
    }
}

/// The five attribute levels that make up one programme design.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct AttributeLevels {
    pub program: ProgramTier,
    pub career: CareerIncentive,
    pub mentorship: MentorshipLevel,
    pub delivery: DeliveryMode,
    pub response: ResponseSpeed,
}

impl AttributeLevels {
    pub fn slug(&self, attribute: Attribute) -> &'static str {
        match attribute {
            Attribute::Program => self.program.as_slug(),
            Attribute::Career => self.career.as_slug(),
            Attribute::Mentorship => self.mentorship.as_slug(),
            Attribute::Delivery => self.delivery.as_slug(),
            Attribute::Response => self.response.as_slug(),
        }
    }

    pub fn label(&self, attribute: Attribute) -> String {
        match attribute {
            Attribute::Program => self.program.to_string(),
            Attribute::Career => self.career.to_string(),
            Attribute::Mentorship => self.mentorship.to_string(),
            Attribute::Delivery => self.delivery.to_string(),
            Attribute::Response => self.response.to_string(),
        }
    }

    pub fn differing(&self, other: &AttributeLevels) -> Vec<Attribute> {
        Attribute::ALL
            .into_iter()
            .filter(|attribute| self.slug(*attribute) != other.slug(*attribute))
            .collect()
    }
}

impl Default for AttributeLevels {
    fn default() -> Self {
        Self {
            program: ProgramTier::Intermediate,
            career: CareerIncentive::REFERENCE,
            mentorship: MentorshipLevel::REFERENCE,
            delivery: DeliveryMode::REFERENCE,
            response: ResponseSpeed::REFERENCE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_levels_case_and_separator_insensitively() {
        assert_eq!("In-Person".parse::<DeliveryMode>(), Ok(DeliveryMode::Inperson));
        assert_eq!(" ADVANCED ".parse::<ProgramTier>(), Ok(ProgramTier::Advanced));
        assert_eq!("gov_path".parse::<CareerIncentive>(), Ok(CareerIncentive::Govpath));
        assert_eq!("15 days".parse::<ResponseSpeed>(), Ok(ResponseSpeed::Days15));
        assert_eq!("7d".parse::<ResponseSpeed>(), Ok(ResponseSpeed::Days7));
    }

    #[test]
    fn rejects_unknown_levels() {
        let err = "weekly".parse::<ResponseSpeed>().expect_err("should not parse");
        assert_eq!(err.attribute, "response");
        assert!("expert".parse::<ProgramTier>().is_err());
    }

    #[test]
    fn reference_levels_are_first() {
        assert!(ProgramTier::ALL[0].is_reference());
        assert!(CareerIncentive::ALL[0].is_reference());
        assert!(MentorshipLevel::ALL[0].is_reference());
        assert!(DeliveryMode::ALL[0].is_reference());
        assert!(ResponseSpeed::ALL[0].is_reference());
        assert!(!ProgramTier::Advanced.is_reference());
    }

    #[test]
    fn durations_follow_program_tier() {
        let months: Vec<u32> = ProgramTier::ALL.iter().map(|t| t.duration_months()).collect();
        assert_eq!(months, vec![3, 12, 24]);
    }

    #[test]
    fn lists_differing_attributes_in_fixed_order() {
        let base = AttributeLevels::default();
        let other = AttributeLevels {
            response: ResponseSpeed::Days7,
            program: ProgramTier::Advanced,
            ..base
        };
        assert_eq!(
            base.differing(&other),
            vec![Attribute::Program, Attribute::Response]
        );
        assert!(base.differing(&base).is_empty());
    }

    #[test]
    fn response_speed_serializes_as_day_count() {
        let json = serde_json::to_string(&ResponseSpeed::Days15).expect("serialize");
        assert_eq!(json, "\"15\"");
    }
}
