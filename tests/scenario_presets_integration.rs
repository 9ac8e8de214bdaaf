use std::process::Command;

#[test]
fn reference_scenario_runs_via_cli() {
    let output = run("scenarios/reference.toml");
    assert!(
        output.status.success(),
        "reference run failed: stderr={}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8(output.stdout).expect("stdout should be valid UTF-8");
    assert!(stdout.contains("--- Station Report ---"));
    assert!(
        stdout.contains("delivered 8.25 kWh"),
        "unexpected report: {stdout}"
    );
}

#[test]
fn two_station_scenario_runs_via_cli() {
    let output = run("scenarios/two_stations.toml");
    assert!(
        output.status.success(),
        "two-station run failed: stderr={}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8(output.stdout).expect("stdout should be valid UTF-8");
    assert!(stdout.contains("ev-office"));
    assert!(stdout.contains("ev-street"));
}

#[test]
fn overcharge_scenario_terminates_with_error() {
    let output = run("scenarios/overcharge.toml");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("over/under its capacity"),
        "unexpected stderr: {stderr}"
    );
}

fn run(path: &str) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_ev-station-sim"))
        .args(["--scenario", path, "--quiet"])
        .env("RUST_LOG", "warn")
        .output()
        .expect("ev-station-sim process should run")
}
