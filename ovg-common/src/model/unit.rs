//! Organizational unit records and their survey dimensions
//!
//! One `OrganizationUnit` is one segment row (a department, a job title, ...)
//! present in both survey exports. The two detail bags are fixed-shape: every
//! dimension is always present as a field, and any of them may be null.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::Error;

// ========================================
// Classification Enums
// ========================================

/// Segment category taxonomy
///
/// The source exports carry these as Japanese labels in the `区分` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SegmentCategory {
    Department,
    JobTitle,
    EmploymentType,
    Site,
    Gender,
    AgeBracket,
    Overall,
}

impl SegmentCategory {
    /// All categories in taxonomy order
    pub const ALL: [SegmentCategory; 7] = [
        SegmentCategory::Department,
        SegmentCategory::JobTitle,
        SegmentCategory::EmploymentType,
        SegmentCategory::Site,
        SegmentCategory::Gender,
        SegmentCategory::AgeBracket,
        SegmentCategory::Overall,
    ];

    /// Source-language label as written in the survey exports
    pub fn label(&self) -> &'static str {
        match self {
            SegmentCategory::Department => "部署",
            SegmentCategory::JobTitle => "役職",
            SegmentCategory::EmploymentType => "雇用形態",
            SegmentCategory::Site => "拠点",
            SegmentCategory::Gender => "性別",
            SegmentCategory::AgeBracket => "年代",
            SegmentCategory::Overall => "全体",
        }
    }

    /// Identifier used in JSON and query strings
    pub fn as_str(&self) -> &'static str {
        match self {
            SegmentCategory::Department => "department",
            SegmentCategory::JobTitle => "jobTitle",
            SegmentCategory::EmploymentType => "employmentType",
            SegmentCategory::Site => "site",
            SegmentCategory::Gender => "gender",
            SegmentCategory::AgeBracket => "ageBracket",
            SegmentCategory::Overall => "overall",
        }
    }
}

impl fmt::Display for SegmentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SegmentCategory {
    type Err = Error;

    /// Accepts either the identifier (`jobTitle`) or the exact source label (`役職`)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        SegmentCategory::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s) || c.label() == s)
            .ok_or_else(|| Error::InvalidInput(format!("Unknown segment category: {}", s)))
    }
}

/// Two-axis health quadrant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quadrant {
    /// High engagement, high strain
    Burnout,
    /// High engagement, low strain
    Thriving,
    /// Low engagement, low strain ("quiet quitting"); also the null-score fallback
    Disengaged,
    /// Low engagement, high strain
    Distressed,
}

impl fmt::Display for Quadrant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Quadrant::Burnout => write!(f, "burnout"),
            Quadrant::Thriving => write!(f, "thriving"),
            Quadrant::Disengaged => write!(f, "disengaged"),
            Quadrant::Distressed => write!(f, "distressed"),
        }
    }
}

/// Coarse severity label used for prioritization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Critical,
    Warning,
    Caution,
    Healthy,
}

impl RiskLevel {
    /// Critical and warning units are the ones surfaced as "at risk"
    pub fn is_at_risk(&self) -> bool {
        matches!(self, RiskLevel::Critical | RiskLevel::Warning)
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskLevel::Critical => write!(f, "critical"),
            RiskLevel::Warning => write!(f, "warning"),
            RiskLevel::Caution => write!(f, "caution"),
            RiskLevel::Healthy => write!(f, "healthy"),
        }
    }
}

/// Which survey export a row came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SurveySource {
    Engagement,
    Stress,
}

impl fmt::Display for SurveySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SurveySource::Engagement => write!(f, "engagement"),
            SurveySource::Stress => write!(f, "stress"),
        }
    }
}

// ========================================
// Survey Dimensions
// ========================================

/// Engagement survey sub-score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EngagementDimension {
    Enps,
    ExpectationClarity,
    EnvironmentResources,
    SkillFit,
    BeingPraised,
    BeingCaredFor,
    GrowthSupport,
    RespectForIndividual,
    Mission,
    QualityWork,
    Trust,
    Feedback,
    GrowthOpportunity,
    PsychologicalSafety,
    Leadership,
}

impl EngagementDimension {
    pub const ALL: [EngagementDimension; 15] = [
        EngagementDimension::Enps,
        EngagementDimension::ExpectationClarity,
        EngagementDimension::EnvironmentResources,
        EngagementDimension::SkillFit,
        EngagementDimension::BeingPraised,
        EngagementDimension::BeingCaredFor,
        EngagementDimension::GrowthSupport,
        EngagementDimension::RespectForIndividual,
        EngagementDimension::Mission,
        EngagementDimension::QualityWork,
        EngagementDimension::Trust,
        EngagementDimension::Feedback,
        EngagementDimension::GrowthOpportunity,
        EngagementDimension::PsychologicalSafety,
        EngagementDimension::Leadership,
    ];

    /// Dimension name; doubles as the factor name in factor tables
    pub fn label(&self) -> &'static str {
        match self {
            EngagementDimension::Enps => "eNps",
            EngagementDimension::ExpectationClarity => "期待明確化",
            EngagementDimension::EnvironmentResources => "環境資源",
            EngagementDimension::SkillFit => "スキル適正",
            EngagementDimension::BeingPraised => "褒められ度",
            EngagementDimension::BeingCaredFor => "気にかけ度",
            EngagementDimension::GrowthSupport => "成長サポート",
            EngagementDimension::RespectForIndividual => "個人の尊重",
            EngagementDimension::Mission => "ミッション",
            EngagementDimension::QualityWork => "質の高い仕事",
            EngagementDimension::Trust => "信頼関係",
            EngagementDimension::Feedback => "フィードバック",
            EngagementDimension::GrowthOpportunity => "成長機会",
            EngagementDimension::PsychologicalSafety => "心理的安全性",
            EngagementDimension::Leadership => "リーダーシップ",
        }
    }

    /// Column header in the engagement export (trimmed)
    pub fn column(&self) -> &'static str {
        match self {
            EngagementDimension::Enps => "eNps(%)",
            EngagementDimension::ExpectationClarity => "エンゲージメント/ 02_期待明確化",
            EngagementDimension::EnvironmentResources => "エンゲージメント / 03_環境・資源",
            EngagementDimension::SkillFit => "エンゲージメント / 04_スキル適正",
            EngagementDimension::BeingPraised => "エンゲージメント / 05_褒められ度",
            EngagementDimension::BeingCaredFor => "エンゲージメント / 06_気にかけ度",
            EngagementDimension::GrowthSupport => "エンゲージメント / 07_成長サポート",
            EngagementDimension::RespectForIndividual => "エンゲージメント / 08_個人の尊重",
            EngagementDimension::Mission => "エンゲージメント / 09_ミッション",
            EngagementDimension::QualityWork => "エンゲージメント / 10_質の高い仕事",
            EngagementDimension::Trust => "エンゲージメント / 11_信頼関係",
            EngagementDimension::Feedback => "エンゲージメント / 12_フィードバック",
            EngagementDimension::GrowthOpportunity => "エンゲージメント / 13_成長機会",
            EngagementDimension::PsychologicalSafety => "コミュニケーション/心理的安全性",
            EngagementDimension::Leadership => "コミュニケーション/リーダーシップ",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.label() == label)
    }
}

/// Stress-check sub-score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StressDimension {
    QuantitativeWorkload,
    QualitativeWorkload,
    RoleConflict,
    EmotionalBurden,
    SupervisorSupport,
    CoworkerSupport,
    SupervisorLeadership,
    PraisingWorkplace,
    FailureTolerance,
    Vigor,
    Irritability,
    Fatigue,
    Anxiety,
    Depression,
}

impl StressDimension {
    pub const ALL: [StressDimension; 14] = [
        StressDimension::QuantitativeWorkload,
        StressDimension::QualitativeWorkload,
        StressDimension::RoleConflict,
        StressDimension::EmotionalBurden,
        StressDimension::SupervisorSupport,
        StressDimension::CoworkerSupport,
        StressDimension::SupervisorLeadership,
        StressDimension::PraisingWorkplace,
        StressDimension::FailureTolerance,
        StressDimension::Vigor,
        StressDimension::Irritability,
        StressDimension::Fatigue,
        StressDimension::Anxiety,
        StressDimension::Depression,
    ];

    /// Dimension name; the stress export uses it verbatim as column header
    pub fn label(&self) -> &'static str {
        match self {
            StressDimension::QuantitativeWorkload => "仕事の量的負担",
            StressDimension::QualitativeWorkload => "仕事の質的負担",
            StressDimension::RoleConflict => "役割葛藤",
            StressDimension::EmotionalBurden => "情緒的負担",
            StressDimension::SupervisorSupport => "上司のサポート",
            StressDimension::CoworkerSupport => "同僚のサポート",
            StressDimension::SupervisorLeadership => "上司のリーダーシップ",
            StressDimension::PraisingWorkplace => "ほめてもらえる職場",
            StressDimension::FailureTolerance => "失敗を認める職場",
            StressDimension::Vigor => "活気",
            StressDimension::Irritability => "イライラ感",
            StressDimension::Fatigue => "疲労感",
            StressDimension::Anxiety => "不安感",
            StressDimension::Depression => "抑うつ感",
        }
    }

    pub fn column(&self) -> &'static str {
        self.label()
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.label() == label)
    }
}

// ========================================
// Detail Bags
// ========================================

/// Engagement sub-scores (all nullable)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngagementDetails {
    pub enps: Option<f64>,
    pub expectation_clarity: Option<f64>,
    pub environment_resources: Option<f64>,
    pub skill_fit: Option<f64>,
    pub being_praised: Option<f64>,
    pub being_cared_for: Option<f64>,
    pub growth_support: Option<f64>,
    pub respect_for_individual: Option<f64>,
    pub mission: Option<f64>,
    pub quality_work: Option<f64>,
    pub trust: Option<f64>,
    pub feedback: Option<f64>,
    pub growth_opportunity: Option<f64>,
    pub psychological_safety: Option<f64>,
    pub leadership: Option<f64>,
}

impl EngagementDetails {
    pub fn get(&self, dimension: EngagementDimension) -> Option<f64> {
        *self.slot(dimension)
    }

    pub fn set(&mut self, dimension: EngagementDimension, value: Option<f64>) {
        *self.slot_mut(dimension) = value;
    }

    fn slot(&self, dimension: EngagementDimension) -> &Option<f64> {
        match dimension {
            EngagementDimension::Enps => &self.enps,
            EngagementDimension::ExpectationClarity => &self.expectation_clarity,
            EngagementDimension::EnvironmentResources => &self.environment_resources,
            EngagementDimension::SkillFit => &self.skill_fit,
            EngagementDimension::BeingPraised => &self.being_praised,
            EngagementDimension::BeingCaredFor => &self.being_cared_for,
            EngagementDimension::GrowthSupport => &self.growth_support,
            EngagementDimension::RespectForIndividual => &self.respect_for_individual,
            EngagementDimension::Mission => &self.mission,
            EngagementDimension::QualityWork => &self.quality_work,
            EngagementDimension::Trust => &self.trust,
            EngagementDimension::Feedback => &self.feedback,
            EngagementDimension::GrowthOpportunity => &self.growth_opportunity,
            EngagementDimension::PsychologicalSafety => &self.psychological_safety,
            EngagementDimension::Leadership => &self.leadership,
        }
    }

    fn slot_mut(&mut self, dimension: EngagementDimension) -> &mut Option<f64> {
        match dimension {
            EngagementDimension::Enps => &mut self.enps,
            EngagementDimension::ExpectationClarity => &mut self.expectation_clarity,
            EngagementDimension::EnvironmentResources => &mut self.environment_resources,
            EngagementDimension::SkillFit => &mut self.skill_fit,
            EngagementDimension::BeingPraised => &mut self.being_praised,
            EngagementDimension::BeingCaredFor => &mut self.being_cared_for,
            EngagementDimension::GrowthSupport => &mut self.growth_support,
            EngagementDimension::RespectForIndividual => &mut self.respect_for_individual,
            EngagementDimension::Mission => &mut self.mission,
            EngagementDimension::QualityWork => &mut self.quality_work,
            EngagementDimension::Trust => &mut self.trust,
            EngagementDimension::Feedback => &mut self.feedback,
            EngagementDimension::GrowthOpportunity => &mut self.growth_opportunity,
            EngagementDimension::PsychologicalSafety => &mut self.psychological_safety,
            EngagementDimension::Leadership => &mut self.leadership,
        }
    }
}

/// Stress-check sub-scores (all nullable)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StressDetails {
    pub quantitative_workload: Option<f64>,
    pub qualitative_workload: Option<f64>,
    pub role_conflict: Option<f64>,
    pub emotional_burden: Option<f64>,
    pub supervisor_support: Option<f64>,
    pub coworker_support: Option<f64>,
    pub supervisor_leadership: Option<f64>,
    pub praising_workplace: Option<f64>,
    pub failure_tolerance: Option<f64>,
    pub vigor: Option<f64>,
    pub irritability: Option<f64>,
    pub fatigue: Option<f64>,
    pub anxiety: Option<f64>,
    pub depression: Option<f64>,
}

impl StressDetails {
    pub fn get(&self, dimension: StressDimension) -> Option<f64> {
        *self.slot(dimension)
    }

    pub fn set(&mut self, dimension: StressDimension, value: Option<f64>) {
        *self.slot_mut(dimension) = value;
    }

    fn slot(&self, dimension: StressDimension) -> &Option<f64> {
        match dimension {
            StressDimension::QuantitativeWorkload => &self.quantitative_workload,
            StressDimension::QualitativeWorkload => &self.qualitative_workload,
            StressDimension::RoleConflict => &self.role_conflict,
            StressDimension::EmotionalBurden => &self.emotional_burden,
            StressDimension::SupervisorSupport => &self.supervisor_support,
            StressDimension::CoworkerSupport => &self.coworker_support,
            StressDimension::SupervisorLeadership => &self.supervisor_leadership,
            StressDimension::PraisingWorkplace => &self.praising_workplace,
            StressDimension::FailureTolerance => &self.failure_tolerance,
            StressDimension::Vigor => &self.vigor,
            StressDimension::Irritability => &self.irritability,
            StressDimension::Fatigue => &self.fatigue,
            StressDimension::Anxiety => &self.anxiety,
            StressDimension::Depression => &self.depression,
        }
    }

    fn slot_mut(&mut self, dimension: StressDimension) -> &mut Option<f64> {
        match dimension {
            StressDimension::QuantitativeWorkload => &mut self.quantitative_workload,
            StressDimension::QualitativeWorkload => &mut self.qualitative_workload,
            StressDimension::RoleConflict => &mut self.role_conflict,
            StressDimension::EmotionalBurden => &mut self.emotional_burden,
            StressDimension::SupervisorSupport => &mut self.supervisor_support,
            StressDimension::CoworkerSupport => &mut self.coworker_support,
            StressDimension::SupervisorLeadership => &mut self.supervisor_leadership,
            StressDimension::PraisingWorkplace => &mut self.praising_workplace,
            StressDimension::FailureTolerance => &mut self.failure_tolerance,
            StressDimension::Vigor => &mut self.vigor,
            StressDimension::Irritability => &mut self.irritability,
            StressDimension::Fatigue => &mut self.fatigue,
            StressDimension::Anxiety => &mut self.anxiety,
            StressDimension::Depression => &mut self.depression,
        }
    }
}

// ========================================
// Organizational Unit
// ========================================

/// One merged segment row
///
/// Classification fields are computed once, at merge time; a unit is never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrganizationUnit {
    /// Composite key derived from (category, name)
    pub id: String,
    pub category: SegmentCategory,
    /// Display label as given in the source data
    pub name: String,
    /// Respondent count (always above the headcount floor)
    pub headcount: u32,
    /// X axis: composite engagement index (1-4)
    pub engagement_score: Option<f64>,
    /// Y axis: psychological stress response total (1-4, higher is worse)
    pub stress_score: Option<f64>,
    pub engagement: EngagementDetails,
    pub stress: StressDetails,
    pub risk_level: RiskLevel,
    pub quadrant: Quadrant,
}

impl OrganizationUnit {
    /// Units with a null axis were classified by fallback, not by their scores
    pub fn is_low_confidence(&self) -> bool {
        self.engagement_score.is_none() || self.stress_score.is_none()
    }
}
