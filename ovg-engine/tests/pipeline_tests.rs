//! Pipeline Tests
//! Test File: pipeline_tests.rs
//!
//! End-to-end checks from raw export text to merged units, summary, driver
//! analysis and simulation.

use std::collections::HashSet;
use std::fs;

use ovg_common::model::{EngagementDetails, Quadrant, RiskLevel, SegmentCategory, StressDetails};
use ovg_common::{AnalysisConfig, Error};
use ovg_engine::analysis::{Classifier, DriverAnalyzer, SimulationEngine};
use ovg_engine::ingest::{normalize_rows, TabularParser};
use ovg_engine::pipeline::{load_from_files, load_from_text, merge_texts};
use tempfile::TempDir;

const ENGAGEMENT_CSV: &str = "\
区分,名称,人数,エンゲージメント総合指数,eNps(%),エンゲージメント/ 02_期待明確化,エンゲージメント / 12_フィードバック,エンゲージメント / 13_成長機会,コミュニケーション/心理的安全性
全体,全体,500,3.10,-5.0,3.2,3.0,3.3,3.4
部署,Sales,50,3.50,10.0,3.4,2.7,3.1,3.6
部署,Engineering,80,2.90,-12.5,3.0,2.8,3.0,3.2
部署,Support,40,3.40,5.0,3.5,3.2,3.5,3.6
部署,Tiny,9,3.90,40.0,3.9,3.9,3.9,3.9
部署,EngagementOnly,20,3.00,0.0,3.0,3.0,3.0,3.0
拠点,東京,300,3.20,-,3.2,3.0,3.3,3.4
";

const STRESS_CSV: &str = "\
区分,名称,人数,心理的ストレス反応合計,仕事の量的負担,仕事の質的負担,役割葛藤,情緒的負担,上司のサポート,上司のリーダーシップ,ほめてもらえる職場,失敗を認める職場
全体,全体,500,2.50,2.3,2.2,2.8,2.6,2.6,2.7,2.7,2.9
部署,Sales,50,2.80,3.1,2.4,3.2,2.9,2.0,2.5,2.4,2.7
部署,Engineering,80,3.10,2.9,2.6,3.0,2.8,2.2,2.4,2.3,2.6
部署,Support,40,2.20,2.0,2.0,2.6,2.5,2.9,2.9,3.0,3.1
部署,Tiny,9,1.50,1.5,1.5,1.5,1.5,3.5,3.5,3.5,3.5
部署,StressOnly,25,2.00,2.0,2.0,2.0,2.0,3.0,3.0,3.0,3.0
拠点,東京,300,2.60,2.2,2.1,2.8,2.6,2.6,2.7,2.7,2.9
";

fn config() -> AnalysisConfig {
    AnalysisConfig::default()
}

/// Merging the same texts twice yields identical unit sequences
#[test]
fn test_merge_is_idempotent() {
    let (first, _) = merge_texts(ENGAGEMENT_CSV, STRESS_CSV, &config()).unwrap();
    let (second, _) = merge_texts(ENGAGEMENT_CSV, STRESS_CSV, &config()).unwrap();

    assert_eq!(first, second);
}

/// A key is merged iff it passes the floor in both exports
#[test]
fn test_join_correctness() {
    let parser = TabularParser::new();
    let (engagement, _) =
        normalize_rows::<EngagementDetails>(&parser.parse(ENGAGEMENT_CSV), &config()).unwrap();
    let (stress, _) =
        normalize_rows::<StressDetails>(&parser.parse(STRESS_CSV), &config()).unwrap();

    let engagement_keys: HashSet<&str> = engagement.keys().collect();
    let stress_keys: HashSet<&str> = stress.keys().collect();
    let expected: HashSet<&str> = engagement_keys.intersection(&stress_keys).copied().collect();

    let (units, report) = merge_texts(ENGAGEMENT_CSV, STRESS_CSV, &config()).unwrap();
    let merged: HashSet<&str> = units.iter().map(|u| u.id.as_str()).collect();

    assert_eq!(merged, expected);
    assert_eq!(report.merge.merged, 5);
    assert_eq!(report.merge.unmatched_engagement, vec!["部署_EngagementOnly"]);
    assert_eq!(report.merge.unmatched_stress, vec!["部署_StressOnly"]);
}

/// No partial record keeps a headcount at or below the floor
#[test]
fn test_headcount_floor_applies_to_both_exports() {
    let parser = TabularParser::new();
    let (engagement, engagement_report) =
        normalize_rows::<EngagementDetails>(&parser.parse(ENGAGEMENT_CSV), &config()).unwrap();
    let (stress, _) =
        normalize_rows::<StressDetails>(&parser.parse(STRESS_CSV), &config()).unwrap();

    assert!(engagement.iter().all(|u| u.headcount > 9));
    assert!(stress.iter().all(|u| u.headcount > 9));
    // Headcount 9 is excluded regardless of its scores
    assert!(!engagement.contains_key("部署_Tiny"));
    assert_eq!(engagement_report.rows_below_floor, 1);
}

/// Fractional headcounts are rounded before the floor check
#[test]
fn test_fractional_headcount_floor() {
    let engagement = "区分,名称,人数,エンゲージメント総合指数\n\
                      部署,Tiny,9.4,3.5\n\
                      部署,Small,9.6,3.5\n\
                      部署,Suffixed,50人,3.5\n";
    let stress = "区分,名称,人数,心理的ストレス反応合計\n\
                  部署,Tiny,9.4,2.0\n\
                  部署,Small,9.6,2.0\n\
                  部署,Suffixed,50人,2.0\n";

    let parser = TabularParser::new();
    let (map, _) =
        normalize_rows::<EngagementDetails>(&parser.parse(engagement), &config()).unwrap();
    let headcounts: Vec<u32> = map.iter().map(|u| u.headcount).collect();
    assert_eq!(headcounts, vec![10, 50]);

    let dataset = load_from_text(engagement, stress, &config()).unwrap();
    assert!(dataset.unit("部署_Tiny").is_none());
    assert_eq!(dataset.unit("部署_Small").unwrap().headcount, 10);
    assert_eq!(dataset.unit("部署_Suffixed").unwrap().headcount, 50);
}

/// Sales: 3.5 / 2.8 is burnout, stress not above 2.9 so warning
#[test]
fn test_sales_scenario() {
    let dataset = load_from_text(ENGAGEMENT_CSV, STRESS_CSV, &config()).unwrap();
    let sales = dataset.unit("部署_Sales").expect("Sales should be merged");

    assert_eq!(sales.category, SegmentCategory::Department);
    assert_eq!(sales.engagement_score, Some(3.5));
    assert_eq!(sales.stress_score, Some(2.8));
    assert_eq!(sales.quadrant, Quadrant::Burnout);
    assert_eq!(sales.risk_level, RiskLevel::Warning);
    assert_eq!(sales.stress.supervisor_support, Some(2.0));
    assert_eq!(sales.engagement.feedback, Some(2.7));
}

#[test]
fn test_single_sided_units_absent() {
    let dataset = load_from_text(ENGAGEMENT_CSV, STRESS_CSV, &config()).unwrap();

    assert!(dataset.unit("部署_EngagementOnly").is_none());
    assert!(dataset.unit("部署_StressOnly").is_none());
    assert!(dataset.unit("部署_Tiny").is_none());
}

#[test]
fn test_dataset_summary_and_overall() {
    let dataset = load_from_text(ENGAGEMENT_CSV, STRESS_CSV, &config()).unwrap();

    let overall = dataset.overall.as_ref().expect("Overall row present");
    assert_eq!(overall.category, SegmentCategory::Overall);
    assert_eq!(dataset.summary.total_headcount, 500);
    assert_eq!(dataset.summary.average_engagement, 3.1);

    // Engineering: 2.9 / 3.1 distressed warning; Sales burnout warning
    let critical: Vec<&str> = dataset
        .summary
        .critical_units
        .iter()
        .map(|u| u.name.as_str())
        .collect();
    assert_eq!(critical, vec!["Sales", "Engineering"]);

    let healthy: Vec<&str> = dataset
        .summary
        .healthy_units
        .iter()
        .map(|u| u.name.as_str())
        .collect();
    assert_eq!(healthy, vec!["Support"]);

    // Site rows stay in the dataset but never in the ranked lists
    assert!(dataset.unit("拠点_東京").is_some());
}

#[test]
fn test_classifier_boundary_end_to_end() {
    let engagement = "区分,名称,人数,エンゲージメント総合指数\n部署,Edge,20,3.2\n";
    let stress = "区分,名称,人数,心理的ストレス反応合計\n部署,Edge,20,2.65\n";

    let dataset = load_from_text(engagement, stress, &config()).unwrap();
    let edge = &dataset.units[0];
    assert_eq!(edge.quadrant, Quadrant::Burnout);
    assert_eq!(edge.risk_level, RiskLevel::Warning);
}

#[test]
fn test_classifier_totality_over_grid() {
    let classifier = Classifier::new();
    let mut values = vec![None];
    values.extend((0..=50).map(|i| Some(i as f64 * 0.1)));

    for engagement in &values {
        for stress in &values {
            let (quadrant, risk) = classifier.classify(*engagement, *stress);
            match quadrant {
                Quadrant::Thriving => assert_eq!(risk, RiskLevel::Healthy),
                Quadrant::Disengaged => assert_eq!(risk, RiskLevel::Caution),
                Quadrant::Distressed => assert_eq!(risk, RiskLevel::Warning),
                Quadrant::Burnout => {
                    assert!(matches!(risk, RiskLevel::Critical | RiskLevel::Warning))
                }
            }
        }
    }
}

#[test]
fn test_drivers_ranked_and_bounded() {
    let dataset = load_from_text(ENGAGEMENT_CSV, STRESS_CSV, &config()).unwrap();
    let analyzer = DriverAnalyzer::from_config(&config());

    for unit in &dataset.units {
        let analysis = analyzer.analyze(unit);
        assert!(analysis.top_drivers.len() <= 3);
        assert!(analysis
            .top_drivers
            .windows(2)
            .all(|w| w[0].impact_score >= w[1].impact_score));
        for driver in &analysis.top_drivers {
            assert!((driver.impact_score - (driver.gap * driver.correlation).abs()).abs() < 1e-9);
        }
    }

    let sales = dataset.unit("部署_Sales").unwrap();
    let analysis = analyzer.analyze(sales);
    // 仕事の量的負担: (3.1 - 2.17) * 0.50 = 0.465
    assert_eq!(analysis.top_drivers[0].factor, "仕事の量的負担");
    assert_eq!(analysis.unit_id, "部署_Sales");
    assert_eq!(analysis.insights.len(), 3);
}

#[test]
fn test_simulation_scenario() {
    let dataset = load_from_text(ENGAGEMENT_CSV, STRESS_CSV, &config()).unwrap();
    let sales = dataset.unit("部署_Sales").unwrap();
    let engine = SimulationEngine::from_config(&config());

    let result = engine.simulate(sales, "上司のサポート", 3.0);
    assert_eq!(result.original_value, 2.0);
    assert!((result.predicted_engagement_change - 0.35).abs() < 1e-9);
    assert!((result.predicted_stress_change - (-0.40)).abs() < 1e-9);
    assert_eq!(result.confidence, 0.75);

    let unknown = engine.simulate(sales, "存在しない要因", 3.0);
    assert_eq!(unknown.confidence, 0.0);
    assert_eq!(unknown.predicted_engagement_change, 0.0);
    assert_eq!(unknown.predicted_stress_change, 0.0);
}

#[test]
fn test_strict_keys_reject_duplicates() {
    let engagement = "区分,名称,人数\n部署,Sales,20\n部署,Sales,30\n";
    let stress = "区分,名称,人数\n部署,Sales,20\n";
    let config = AnalysisConfig {
        strict_keys: true,
        ..AnalysisConfig::default()
    };

    let result = load_from_text(engagement, stress, &config);
    assert!(matches!(result, Err(Error::DuplicateKey { .. })));

    // Lenient mode keeps the later row
    let dataset = load_from_text(engagement, stress, &AnalysisConfig::default()).unwrap();
    assert_eq!(dataset.units[0].headcount, 30);
    assert_eq!(dataset.report.engagement.collisions.len(), 1);
}

#[test]
fn test_missing_overall_degrades_summary() {
    let engagement = "区分,名称,人数,エンゲージメント総合指数\n部署,Sales,20,3.5\n";
    let stress = "区分,名称,人数,心理的ストレス反応合計\n部署,Sales,20,3.0\n";

    let dataset = load_from_text(engagement, stress, &config()).unwrap();
    assert!(dataset.overall.is_none());
    assert_eq!(dataset.summary.total_headcount, 0);
    assert_eq!(dataset.summary.critical_units.len(), 1);
}

#[test]
fn test_empty_exports_yield_empty_dataset() {
    let dataset = load_from_text("", "", &config()).unwrap();
    assert!(dataset.units.is_empty());
    assert!(dataset.summary.critical_units.is_empty());
}

#[tokio::test]
async fn test_load_from_files() {
    let dir = TempDir::new().unwrap();
    let engagement_path = dir.path().join("engagement.csv");
    let stress_path = dir.path().join("stress.csv");
    fs::write(&engagement_path, ENGAGEMENT_CSV).unwrap();
    fs::write(&stress_path, STRESS_CSV).unwrap();

    let dataset = load_from_files(&engagement_path, &stress_path, &config())
        .await
        .unwrap();
    assert_eq!(dataset.units.len(), 5);
}

#[tokio::test]
async fn test_load_from_missing_file_is_io_error() {
    let dir = TempDir::new().unwrap();
    let engagement_path = dir.path().join("engagement.csv");
    fs::write(&engagement_path, ENGAGEMENT_CSV).unwrap();
    let missing = dir.path().join("missing.csv");

    let result = load_from_files(&engagement_path, &missing, &config()).await;
    match result {
        Err(Error::Io(e)) => assert!(e.to_string().contains("missing.csv")),
        other => panic!("expected Io error, got {:?}", other.map(|d| d.units.len())),
    }
}

#[test]
fn test_dataset_serializes_for_presentation() {
    let dataset = load_from_text(ENGAGEMENT_CSV, STRESS_CSV, &config()).unwrap();
    let json = serde_json::to_value(&dataset).unwrap();

    assert_eq!(json["units"].as_array().unwrap().len(), 5);
    assert_eq!(json["units"][1]["quadrant"], "burnout");
    assert_eq!(json["units"][1]["category"], "department");
    assert!(json["units"][1]["engagement"]["mission"].is_null());
    assert_eq!(json["summary"]["trend_direction"], "stable");
    assert_eq!(json["report"]["engagement"]["rows_below_floor"], 1);
    assert_eq!(json["report"]["engagement"]["source"], "engagement");
}
