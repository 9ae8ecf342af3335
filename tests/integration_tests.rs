use std::fs;
use std::path::{Path, PathBuf};

use waste_kpi::config::SourcePaths;
use waste_kpi::error::ErrorKind;
use waste_kpi::kpi::KpiRecord;
use waste_kpi::output::{summary_rows, write_summary};
use waste_kpi::pipeline::run;
use waste_kpi::records::City;
use waste_kpi::sources::{parse_file, rule_for};

fn fixtures_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn fixture_paths(dir: &tempfile::TempDir) -> SourcePaths {
    let config = dir.path().join("sources.json");
    fs::write(
        &config,
        r#"{
            "kanazawa": "kanazawa.csv",
            "sakai": "sakai.csv",
            "toyama": "toyama.csv",
            "chiba": "chiba.csv"
        }"#,
    )
    .unwrap();
    SourcePaths::load(&fixtures_dir(), &config).unwrap()
}

fn assert_close(actual: Option<f64>, expected: f64) {
    let actual = actual.expect("KPI should be defined");
    assert!(
        (actual - expected).abs() < 1e-6 * expected.abs().max(1.0),
        "expected {expected}, got {actual}"
    );
}

#[test]
fn test_full_pipeline() {
    let dir = tempfile::tempdir().unwrap();
    let (table, kpis) = run(&fixture_paths(&dir)).expect("Failed to run pipeline");

    assert_eq!(table.len(), 4);
    let cities: Vec<City> = kpis.iter().map(|k| k.city).collect();
    assert_eq!(cities, City::ALL.to_vec());
    assert!(kpis.iter().all(|k| k.year == 2020));

    // (waste g/person/day, cost yen/person/year, cost yen/t), 2020 has 366 days
    let expected = [
        (City::Kanazawa, 1000.0, 7_320.0, 20_000.0),
        (City::Sakai, 1000.0, 10_980.0, 30_000.0),
        (City::Toyama, 1000.0, 12_078.0, 33_000.0),
        (City::Chiba, 1000.0, 9_150.0, 25_000.0),
    ];
    for (kpi, (city, waste, per_capita, per_ton)) in kpis.iter().zip(expected) {
        assert_eq!(kpi.city, city);
        assert_close(kpi.waste_per_capita_g_per_day, waste);
        assert_close(kpi.cost_per_capita_yen_per_year, per_capita);
        assert_close(kpi.cost_per_ton_yen, per_ton);
    }

    let sakai = table.get(City::Sakai, 2020).unwrap();
    assert_eq!(sakai.population, Some(750_000));
    let chiba = table.get(City::Chiba, 2020).unwrap();
    assert_eq!(chiba.population, Some(974_951));
}

#[test]
fn test_parsing_each_source_twice_is_identical() {
    let dir = tempfile::tempdir().unwrap();
    let paths = fixture_paths(&dir);

    for (city, path) in paths.iter() {
        let first = parse_file(rule_for(city), path).unwrap();
        let second = parse_file(rule_for(city), path).unwrap();
        assert_eq!(first, second, "{city} parse is not deterministic");
        assert_eq!(format!("{first:?}"), format!("{second:?}"));
    }
}

#[test]
fn test_summary_csv_has_one_row_per_city() {
    let dir = tempfile::tempdir().unwrap();
    let (table, kpis) = run(&fixture_paths(&dir)).unwrap();
    let out = dir.path().join("waste_analysis_summary.csv");

    write_summary(&out, &summary_rows(&table, &kpis)).unwrap();

    let content = fs::read_to_string(&out).unwrap();
    assert_eq!(content.lines().count(), 5);
    assert!(content.contains("toyama,富山市,2020,400000"));
}

#[test]
fn test_broken_source_aborts_run() {
    let dir = tempfile::tempdir().unwrap();
    for city in ["kanazawa", "sakai", "chiba"] {
        fs::copy(
            fixtures_dir().join(format!("{city}.csv")),
            dir.path().join(format!("{city}.csv")),
        )
        .unwrap();
    }
    fs::write(
        dir.path().join("toyama.csv"),
        "年度,ごみ総排出量,人口,,年度,処理経費\n令和2年度,abc,1,,令和2年度,1\n",
    )
    .unwrap();
    let config = dir.path().join("sources.json");
    fs::write(
        &config,
        r#"{"kanazawa": "kanazawa.csv", "sakai": "sakai.csv", "toyama": "toyama.csv", "chiba": "chiba.csv"}"#,
    )
    .unwrap();

    let paths = SourcePaths::load(dir.path(), &config).unwrap();
    let err = run(&paths).unwrap_err();

    assert_eq!(err.city, City::Toyama);
    assert!(matches!(err.kind, ErrorKind::InvalidNumber { .. }));
    let message = err.to_string();
    assert!(message.contains("toyama.csv"));
    assert!(message.contains("row 2"));
    assert!(message.contains("abc"));
}

#[test]
fn test_missing_source_file_aborts_run() {
    let dir = tempfile::tempdir().unwrap();
    let err = run(&SourcePaths::in_dir(dir.path())).unwrap_err();

    assert_eq!(err.city, City::Kanazawa);
    assert!(matches!(err.kind, ErrorKind::Io(_)));
}

#[test]
fn test_zero_population_kpi_is_missing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("toyama.csv");
    fs::write(
        &path,
        "年度,ごみ総排出量,人口,,年度,処理経費\n2019,100,0,,2019,1\n",
    )
    .unwrap();

    let records = parse_file(rule_for(City::Toyama), &path).unwrap();
    let kpi = KpiRecord::from_record(&records[0]);

    assert_eq!(kpi.waste_per_capita_g_per_day, None);
    assert_eq!(kpi.cost_per_capita_yen_per_year, None);
    assert_eq!(kpi.cost_per_ton_yen, Some(1_000_000.0));
}
