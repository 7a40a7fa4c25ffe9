use anyhow::{Context, Result};
use serde_json::Value;

use crate::CliTest;

/// Validates config file structure and default values.
fn assert_config_content(content: &str) -> Result<()> {
    let parsed: Value = serde_json::from_str(content).context("Config should be valid JSON")?;

    assert_eq!(parsed["defaultLocale"], "en");
    assert_eq!(parsed["cjkThreshold"], 0.3);
    assert_eq!(parsed["extraction"]["patterns"][0], "**/*.py");
    assert_eq!(parsed["compiler"], "msgfmt");
    assert!(
        parsed.get("projectType").is_none(),
        "Unset project type should not be written"
    );

    assert!(
        content.contains("\n  \"defaultLocale\""),
        "Config should use 2-space indentation"
    );

    Ok(())
}

#[test]
fn test_init_creates_config() -> Result<()> {
    let test = CliTest::new()?;

    let output = test.run(&["init"])?;
    output.assert_code(0);
    assert_eq!(output.stdout.trim(), "✓ Created .lexisrc.json");

    assert!(test.root().join(".lexisrc.json").exists());
    let content = test.read_file(".lexisrc.json")?;
    assert_config_content(&content)?;

    Ok(())
}

#[test]
fn test_init_fails_if_exists() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(".lexisrc.json", "{}")?;

    let output = test.run(&["init"])?;
    output.assert_code(1);
    assert!(output.stdout.contains(".lexisrc.json already exists"));
    assert_eq!(test.read_file(".lexisrc.json")?, "{}");

    Ok(())
}

#[test]
fn test_init_config_is_immediately_usable() -> Result<()> {
    let test = CliTest::gettext()?;

    test.run(&["init"])?.assert_code(0);

    let output = test.run(&["status"])?;
    output.assert_code(0);

    Ok(())
}

#[test]
fn test_help() -> Result<()> {
    let test = CliTest::new()?;

    let output = test.run(&["--help"])?;
    output.assert_code(0);
    for command in ["status", "write", "compile", "generate", "parity", "match", "bulk", "init"] {
        assert!(output.stdout.contains(command), "help should list {}", command);
    }

    Ok(())
}
