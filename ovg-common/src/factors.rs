//! Factor weight, benchmark and recommendation table
//!
//! The weights are domain-expert constants, not regression output. The table
//! is injected into the driver and simulation engines through
//! [`crate::config::AnalysisConfig`] so fitted coefficients can replace them
//! without touching engine logic.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Recommendation used when a factor has no entry of its own
pub const FALLBACK_RECOMMENDATION: &str = "個別対応を検討";

/// Which side of the benchmark is bad
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FactorDirection {
    /// Burden factors (workload, role conflict, ...): above benchmark is bad
    HigherIsWorse,
    /// Resource factors (support, praise, ...): below benchmark is bad
    LowerIsWorse,
}

impl Default for FactorDirection {
    fn default() -> Self {
        FactorDirection::LowerIsWorse
    }
}

/// Constants for one factor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactorSpec {
    /// Signed weight against engagement (-0.5..+0.5)
    pub engagement_weight: f64,
    /// Signed weight against stress (-0.5..+0.5)
    pub stress_weight: f64,
    /// Organization-wide reference value
    pub benchmark: f64,
    #[serde(default)]
    pub recommendation: String,
    #[serde(default)]
    pub direction: FactorDirection,
}

impl FactorSpec {
    fn new(
        engagement_weight: f64,
        stress_weight: f64,
        benchmark: f64,
        direction: FactorDirection,
        recommendation: &str,
    ) -> Self {
        Self {
            engagement_weight,
            stress_weight,
            benchmark,
            recommendation: recommendation.to_string(),
            direction,
        }
    }

    /// Weight used for driver ranking: stress first, engagement when the
    /// stress weight is zero
    pub fn primary_weight(&self) -> f64 {
        if self.stress_weight != 0.0 {
            self.stress_weight
        } else {
            self.engagement_weight
        }
    }

    pub fn recommendation(&self) -> &str {
        if self.recommendation.trim().is_empty() {
            FALLBACK_RECOMMENDATION
        } else {
            &self.recommendation
        }
    }
}

/// Factor name -> constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FactorTable {
    entries: BTreeMap<String, FactorSpec>,
}

impl FactorTable {
    /// Empty table (every lookup misses)
    pub fn empty() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    pub fn get(&self, factor: &str) -> Option<&FactorSpec> {
        self.entries.get(factor)
    }

    pub fn get_mut(&mut self, factor: &str) -> Option<&mut FactorSpec> {
        self.entries.get_mut(factor)
    }

    pub fn insert(&mut self, factor: impl Into<String>, spec: FactorSpec) {
        self.entries.insert(factor.into(), spec);
    }

    pub fn contains(&self, factor: &str) -> bool {
        self.entries.contains_key(factor)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FactorSpec)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl Default for FactorTable {
    fn default() -> Self {
        use FactorDirection::{HigherIsWorse, LowerIsWorse};

        let defaults = [
            (
                "上司のサポート",
                FactorSpec::new(
                    0.35,
                    -0.40,
                    2.58,
                    LowerIsWorse,
                    "1on1ミーティングの頻度向上、傾聴スキル研修の実施",
                ),
            ),
            (
                "上司のリーダーシップ",
                FactorSpec::new(
                    0.30,
                    -0.25,
                    2.75,
                    LowerIsWorse,
                    "マネジメント研修の実施、リーダーシップ360度評価の導入",
                ),
            ),
            (
                "ほめてもらえる職場",
                FactorSpec::new(
                    0.40,
                    -0.30,
                    2.75,
                    LowerIsWorse,
                    "称賛文化の醸成、ピアボーナス制度の導入",
                ),
            ),
            (
                "失敗を認める職場",
                FactorSpec::new(
                    0.25,
                    -0.35,
                    2.89,
                    LowerIsWorse,
                    "心理的安全性ワークショップ、失敗共有会の実施",
                ),
            ),
            (
                "役割葛藤",
                FactorSpec::new(
                    -0.30,
                    0.45,
                    2.82,
                    HigherIsWorse,
                    "役割の明確化ミーティング、ジョブディスクリプションの整備",
                ),
            ),
            (
                "仕事の量的負担",
                FactorSpec::new(
                    -0.15,
                    0.50,
                    2.17,
                    HigherIsWorse,
                    "業務棚卸し、タスクの優先順位付け支援",
                ),
            ),
            (
                "仕事の質的負担",
                FactorSpec::new(
                    -0.10,
                    0.35,
                    2.11,
                    HigherIsWorse,
                    "業務プロセスの見直し、スキルアップ研修",
                ),
            ),
            (
                "情緒的負担",
                FactorSpec::new(
                    -0.20,
                    0.40,
                    2.67,
                    HigherIsWorse,
                    "メンタルヘルスサポート、レジリエンス研修",
                ),
            ),
            (
                "期待明確化",
                FactorSpec::new(
                    0.45,
                    -0.20,
                    3.3,
                    LowerIsWorse,
                    "目標設定面談の充実、期待役割のすり合わせ",
                ),
            ),
            (
                "フィードバック",
                FactorSpec::new(
                    0.35,
                    -0.15,
                    3.0,
                    LowerIsWorse,
                    "定期的なフィードバック面談、成長機会の可視化",
                ),
            ),
            (
                "成長機会",
                FactorSpec::new(
                    0.40,
                    -0.10,
                    3.4,
                    LowerIsWorse,
                    "キャリア開発プログラム、社内公募制度の活用",
                ),
            ),
            (
                "心理的安全性",
                FactorSpec::new(
                    0.38,
                    -0.32,
                    3.5,
                    LowerIsWorse,
                    "チームビルディング、オープンコミュニケーション研修",
                ),
            ),
        ];

        Self {
            entries: defaults
                .into_iter()
                .map(|(name, spec)| (name.to_string(), spec))
                .collect(),
        }
    }
}
