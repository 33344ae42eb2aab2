mod common;

use std::fs;

use predicates::{prelude::PredicateBooleanExt, str::contains};
use serde_json::Value as JsonValue;

use common::{TestWorkspace, fixture_path, offline_command};

#[test]
fn stats_reports_counts_as_json() -> anyhow::Result<()> {
    let output = offline_command()
        .args(["stats", "-i"])
        .arg(fixture_path("customers.csv"))
        .arg("--json")
        .output()?;
    assert!(output.status.success());
    let json: JsonValue = serde_json::from_slice(&output.stdout)?;
    assert_eq!(
        json,
        serde_json::json!({
            "rowCount": 5,
            "columnCount": 6,
            "nullValueCount": 1,
            "duplicateRowCount": 1
        })
    );
    Ok(())
}

#[test]
fn stats_reads_stdin_with_input_format() {
    offline_command()
        .args(["stats", "-i", "-", "--input-format", "csv"])
        .write_stdin("name,age\nAlice,30\nBob,\n")
        .assert()
        .success()
        .stdout(contains("null values").and(contains("rows")));
}

#[test]
fn stdin_without_format_fails() {
    offline_command()
        .args(["stats", "-i", "-"])
        .write_stdin("name\nx\n")
        .assert()
        .failure()
        .stderr(contains("--input-format"));
}

#[test]
fn spreadsheet_upload_is_rejected() {
    let workspace = TestWorkspace::new();
    let path = workspace.write("book.xlsx", "name,age\nAlice,30\n");
    offline_command()
        .args(["profile", "-i"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(contains("error:").and(contains("xlsx")));
}

#[test]
fn profile_prints_column_table() {
    offline_command()
        .args(["profile", "-i"])
        .arg(fixture_path("orders.json"))
        .assert()
        .success()
        .stdout(
            contains("order_id")
                .and(contains("placed_at"))
                .and(contains("date"))
                .and(contains("shipped, pending")),
        );
}

#[test]
fn offline_analyze_uses_fallback_scores() -> anyhow::Result<()> {
    let output = offline_command()
        .args(["analyze", "--offline", "--json", "-i"])
        .arg(fixture_path("customers.csv"))
        .output()?;
    assert!(output.status.success());
    let json: JsonValue = serde_json::from_slice(&output.stdout)?;
    assert_eq!(json["file_name"], "customers.csv");
    assert_eq!(json["statistics"]["rowCount"], 5);
    assert_eq!(json["profiles"]["is_active"]["kind"], "boolean");
    assert_eq!(json["analysis"]["provenance"], "fallback");
    assert!(json["analysis"]["value"]["quality"].is_null());
    assert_eq!(json["relationships"]["value"]["preservation_score"], 85.0);
    assert_eq!(json["relationships"]["provenance"], "fallback");
    assert_eq!(json["bias"]["value"]["bias_score"], 80.0);
    assert_eq!(json["privacy"]["value"]["privacy_score"], 75.0);
    assert_eq!(json["recommendations"]["suggested_row_count"], 1000);
    assert_eq!(json["recommendations"]["estimated_generation_time"], "2-5 minutes");
    Ok(())
}

#[test]
fn placeholder_key_counts_as_unconfigured() {
    offline_command()
        .env("GEMINI_API_KEY", "your_gemini_api_key")
        .args(["analyze", "-i"])
        .arg(fixture_path("customers.csv"))
        .assert()
        .success()
        .stdout(contains("(fallback)").and(contains("suggested rows")));
}

#[test]
fn export_json_round_trips_through_csv() -> anyhow::Result<()> {
    let workspace = TestWorkspace::new();
    let out = workspace.join("customers.json");
    offline_command()
        .args(["export", "--format", "json", "-i"])
        .arg(fixture_path("customers.csv"))
        .arg("-o")
        .arg(&out)
        .assert()
        .success();
    let rows: JsonValue = serde_json::from_str(&fs::read_to_string(&out)?)?;
    assert_eq!(rows.as_array().map(Vec::len), Some(5));
    assert_eq!(rows[0]["city"], "Portland, OR");
    assert_eq!(rows[2]["lifetime_value"], JsonValue::Null);

    offline_command()
        .args(["export", "--format", "excel", "-i"])
        .arg(&out)
        .assert()
        .success()
        .stdout(contains("\"Portland, OR\"").and(contains("customer_id,name,city")));
    Ok(())
}

#[test]
fn preview_is_reproducible_with_seed() -> anyhow::Result<()> {
    let run = || {
        offline_command()
            .args(["preview", "--rows", "4", "--seed", "11", "--format", "json", "-s"])
            .arg(fixture_path("fields.json"))
            .output()
    };
    let first = run()?;
    let second = run()?;
    assert!(first.status.success());
    let rows: JsonValue = serde_json::from_slice(&first.stdout)?;
    assert_eq!(rows.as_array().map(Vec::len), Some(4));
    assert_eq!(rows[3]["tier"], "gold");
    // Dates count back from the wall clock, so compare everything else.
    let strip = |value: &JsonValue| {
        let mut rows = value.clone();
        for row in rows.as_array_mut().into_iter().flatten() {
            if let Some(object) = row.as_object_mut() {
                object.remove("joined");
            }
        }
        rows
    };
    let again: JsonValue = serde_json::from_slice(&second.stdout)?;
    assert_eq!(strip(&rows), strip(&again));
    Ok(())
}

#[test]
fn preview_reads_yaml_schema_as_csv() {
    offline_command()
        .args(["preview", "--rows", "2", "--format", "csv", "-s"])
        .arg(fixture_path("fields.yml"))
        .assert()
        .success()
        .stdout(contains("sku,quantity,in_stock,notes").and(contains("A-100,5,")));
}

#[test]
fn describe_offline_proposes_fallback_schema() -> anyhow::Result<()> {
    let workspace = TestWorkspace::new();
    let schema_out = workspace.join("proposed.json");
    offline_command()
        .args([
            "describe",
            "--offline",
            "-d",
            "customers of a bakery",
            "--domain",
            "retail",
            "--rows",
            "2",
            "--schema-out",
        ])
        .arg(&schema_out)
        .assert()
        .success()
        .stdout(contains("domain: retail").and(contains("email")));
    let saved: JsonValue = serde_json::from_str(&fs::read_to_string(&schema_out)?)?;
    assert_eq!(saved["age"]["constraints"]["min"], 18.0);
    assert_eq!(saved["id"]["type"], "uuid");
    Ok(())
}

#[test]
fn generate_offline_writes_fallback_rows() -> anyhow::Result<()> {
    let workspace = TestWorkspace::new();
    let out = workspace.join("generated.csv");
    offline_command()
        .args(["generate", "--offline", "--rows", "250", "-s"])
        .arg(fixture_path("fields.json"))
        .arg("-o")
        .arg(&out)
        .assert()
        .success()
        .stdout(contains("rows generated").and(contains("fallback")));
    let text = fs::read_to_string(&out)?;
    let lines = text.lines().collect::<Vec<_>>();
    assert_eq!(lines.len(), 101);
    assert_eq!(lines[0], "id,value,category,score,generated_at");
    assert!(lines[1].starts_with("0,synthetic_value_0,category_0,50,"));
    Ok(())
}

#[test]
fn generate_with_sample_reports_assessed_quality() {
    let workspace = TestWorkspace::new();
    let out = workspace.join("generated.json");
    offline_command()
        .args(["generate", "--offline", "--format", "json", "-s"])
        .arg(fixture_path("fields.json"))
        .arg("--sample")
        .arg(fixture_path("customers.csv"))
        .arg("-o")
        .arg(&out)
        .assert()
        .success()
        .stdout(contains("assessed quality").and(contains("85 (fallback)")));
}

#[test]
fn generate_rejects_unreadable_sample() {
    let workspace = TestWorkspace::new();
    let sample = workspace.write("sample.xlsx", "a,b\n1,2\n");
    offline_command()
        .args(["generate", "--offline", "-s"])
        .arg(fixture_path("fields.json"))
        .arg("--sample")
        .arg(&sample)
        .assert()
        .failure()
        .stderr(contains("sample"));
}

#[test]
fn schema_file_must_define_fields() {
    let workspace = TestWorkspace::new();
    let schema = workspace.write("empty.yml", "[]\n");
    offline_command()
        .args(["generate", "--offline", "-s"])
        .arg(&schema)
        .assert()
        .failure()
        .stderr(contains("defines no fields"));
}
