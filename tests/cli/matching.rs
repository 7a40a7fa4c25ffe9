use anyhow::Result;

use crate::CliTest;

const GEMFILE: &str = "source \"https://rubygems.org\"\n";

/// `shop` has a complete German catalog; `admin` is missing `nav.home`.
fn projects() -> Result<CliTest> {
    let test = CliTest::with_file("shop/Gemfile", GEMFILE)?;
    test.write_file(
        "shop/config/locales/en/app.yml",
        "en:\n  nav:\n    home: \"Home\"\n",
    )?;
    test.write_file(
        "shop/config/locales/de/app.yml",
        "de:\n  nav:\n    home: \"Startseite\"\n",
    )?;

    test.write_file("admin/Gemfile", GEMFILE)?;
    test.write_file(
        "admin/config/locales/en/app.yml",
        "en:\n  greeting: \"Hello\"\n  nav:\n    home: \"Home\"\n",
    )?;
    test.write_file(
        "admin/config/locales/de/app.yml",
        "de:\n  greeting: \"Hallo\"\n",
    )?;
    Ok(test)
}

#[test]
fn test_match_dry_run() -> Result<()> {
    let test = projects()?;

    let output = test.run(&["match", "admin", "--from", "shop"])?;
    output.assert_code(0);
    assert!(output.stdout.contains("nav.home [de] <- nav.home (ExactKey) = \"Startseite\""));
    assert!(output.stdout.contains("Would apply 1 translation (de 1)."));

    let de = test.read_file("admin/config/locales/de/app.yml")?;
    assert!(!de.contains("Startseite"));

    Ok(())
}

#[test]
fn test_match_apply_writes_recipient() -> Result<()> {
    let test = projects()?;

    let output = test.run(&["match", "admin", "--from", "shop", "--apply"])?;
    output.assert_code(0);
    assert!(output.stdout.contains("Applied 1 translation (de 1)."));

    let de = test.read_file("admin/config/locales/de/app.yml")?;
    assert!(de.contains("  nav:\n    home: \"Startseite\"\n"));
    assert!(de.contains("  greeting: \"Hallo\"\n"));

    Ok(())
}

#[test]
fn test_match_uses_config_projects() -> Result<()> {
    let test = projects()?;
    test.write_file("admin/.lexisrc.json", r#"{ "projects": ["../shop"] }"#)?;

    let output = test.run(&["match", "admin"])?;
    output.assert_code(0);
    assert!(output.stdout.contains("Would apply 1 translation"));

    Ok(())
}

#[test]
fn test_match_skips_mismatched_default_locale() -> Result<()> {
    let test = projects()?;
    test.write_file("shop/.lexisrc.json", r#"{ "defaultLocale": "de" }"#)?;

    let output = test.run(&["match", "admin", "--from", "shop"])?;
    output.assert_code(0);
    assert!(output.stdout.contains("skipped shop: default locales differ (de vs en)"));
    assert!(output.stdout.contains("No translations to apply."));

    Ok(())
}

#[test]
fn test_match_without_donors() -> Result<()> {
    let test = projects()?;

    let output = test.run(&["match", "admin"])?;
    output.assert_code(2);
    assert!(output.stderr.contains("No donor projects"));

    Ok(())
}
