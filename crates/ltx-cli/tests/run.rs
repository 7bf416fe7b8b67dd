//! End-to-end runs over small extracts in a temporary data directory.

use std::fs;
use std::path::Path;

use tempfile::tempdir;

use ltx_cli::pipeline::{
    DONORS_FILE, GAZETTEER_FILE, OUTPUT_DIR, RunRequest, TRANSPLANTS_FILE, execute,
};

fn write_fixtures(dir: &Path) {
    let mut transplants = String::from(
        "DON_OPO,REC_CTR_CD,OPO_ZIP,TXP_CTR_ZIP,REC_TX_DT,DCD,GraftTime,GraftDeath,any_DCU\n",
    );
    for i in 0..12 {
        let time = 30 + i * 140;
        let failed = i % 3 == 0;
        transplants.push_str(&format!(
            "MAOB,NYCP,2115,10016,2020-0{}-15,0,{time},{},{}\n",
            1 + i % 9,
            u8::from(failed),
            i % 2
        ));
    }
    for i in 0..4 {
        transplants.push_str(&format!("CAOP,CAUC,94103,94143,2021-05-01,0,{},0,\n", 100 + i));
    }
    transplants.push_str("CAOP,CAUC,94103,94143,2021-05-01,1,50,1,1\n");
    fs::write(dir.join(TRANSPLANTS_FILE), transplants).unwrap();

    fs::write(
        dir.join(DONORS_FILE),
        "DON_OPO,DON_RECOV_DT,DCD,Transplanted,LUNDON,DCU_any\n\
         MAOB,2023-03-09,0,1,1.2,0\n\
         MAOB,2023-03-08,0,0,0.8,1\n\
         MAOB,2023-03-08,1,1,4.0,1\n\
         MAOB,,0,1,1.0,0\n",
    )
    .unwrap();

    fs::write(
        dir.join(GAZETTEER_FILE),
        "US\t02115\tBoston\tMassachusetts\tMA\tSuffolk\t025\t\t\t42.3432\t-71.0922\t4\n\
         US\t10016\tNew York\tNew York\tNY\tNew York\t061\t\t\t40.7459\t-73.9781\t4\n",
    )
    .unwrap();
}

#[test]
fn full_run_writes_all_datasets() {
    let dir = tempdir().unwrap();
    write_fixtures(dir.path());

    let result = execute(&RunRequest::from_data_dir(dir.path())).unwrap();
    assert!(result.gazetteer_loaded);
    assert_eq!(result.written.len(), 7);

    let output = dir.path().join(OUTPUT_DIR);
    let map = fs::read_to_string(output.join("viz_map_data.csv")).unwrap();
    // Only the MAOB flow geocodes; CAOP's zips are absent from the gazetteer.
    assert!(map.contains("MAOB"));
    assert!(!map.contains("CAOP"));
    assert!(map.contains("02115"));

    let stats = fs::read_to_string(output.join("viz_survival_stats.csv")).unwrap();
    let lines: Vec<&str> = stats.lines().collect();
    assert_eq!(lines[0], "OPO,P_Value");
    assert_eq!(lines.len(), 2);
    assert!(lines[1].starts_with("MAOB,"));

    let curves = fs::read_to_string(output.join("viz_survival_curves.csv")).unwrap();
    assert!(curves.contains("Nationwide"));
    assert!(!curves.contains("CAOP"));

    let cas = fs::read_to_string(output.join("viz_donor_cas_summary.csv")).unwrap();
    assert!(cas.contains("MAOB,Pre-CAS,2,1,0.5"));
    assert!(cas.contains("MAOB,Post-CAS,1,1,1.0"));

    assert_eq!(result.stats.donors_unclassified, 1);
    assert!(output.join("run_manifest.json").exists());
}

#[test]
fn missing_gazetteer_degrades_the_map_only() {
    let dir = tempdir().unwrap();
    write_fixtures(dir.path());
    fs::remove_file(dir.path().join(GAZETTEER_FILE)).unwrap();

    let result = execute(&RunRequest::from_data_dir(dir.path())).unwrap();
    assert!(!result.gazetteer_loaded);
    let map = result
        .datasets
        .iter()
        .find(|dataset| dataset.file == "viz_map_data.csv")
        .unwrap();
    assert_eq!(map.rows, 0);
    assert!(result.stats.flow_groups_unresolved > 0);
}

#[test]
fn missing_extract_fails_and_keeps_previous_outputs() {
    let dir = tempdir().unwrap();
    write_fixtures(dir.path());
    execute(&RunRequest::from_data_dir(dir.path())).unwrap();
    let stats_path = dir.path().join(OUTPUT_DIR).join("viz_survival_stats.csv");
    let before = fs::read_to_string(&stats_path).unwrap();

    fs::remove_file(dir.path().join(DONORS_FILE)).unwrap();
    let error = execute(&RunRequest::from_data_dir(dir.path())).unwrap_err();
    assert!(format!("{error:#}").contains("LU_DON_MAP.csv"));
    assert_eq!(fs::read_to_string(&stats_path).unwrap(), before);
}

#[test]
fn dry_run_writes_nothing() {
    let dir = tempdir().unwrap();
    write_fixtures(dir.path());
    let request = RunRequest {
        dry_run: true,
        ..RunRequest::from_data_dir(dir.path())
    };

    let result = execute(&request).unwrap();
    assert!(result.written.is_empty());
    assert_eq!(result.datasets.len(), 6);
    assert!(!dir.path().join(OUTPUT_DIR).exists());
}
