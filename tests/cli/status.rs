use anyhow::Result;

use crate::CliTest;

#[test]
fn test_status_clean_gettext_project() -> Result<()> {
    let test = CliTest::gettext()?;

    let output = test.run(&["status"])?;
    output.assert_code(0);
    assert!(output.stdout.contains("(gettext)"));
    assert!(output.stdout.contains("Base catalog: locale/messages.pot"));
    assert!(output.stdout.contains("2 strings checked - no defects found"));

    Ok(())
}

#[test]
fn test_status_reports_defects() -> Result<()> {
    let test = CliTest::gettext()?;
    test.write_file(
        "locale/de/LC_MESSAGES/messages.po",
        "msgid \"Hello {0}\"\nmsgstr \"Hallo\"\n\nmsgid \"Old\"\nmsgstr \"Alt\"\n",
    )?;

    let output = test.run(&["status"])?;
    output.assert_code(1);
    assert!(output.stdout.contains("error: missing translations (1 key) [missing]"));
    assert!(output.stdout.contains("  Save  de"));
    assert!(output.stdout.contains("keys not in base catalog (1 key)"));
    assert!(output.stdout.contains("mismatched format indices (1 key)"));
    assert!(output.stdout.contains("  Hello {0}  de"));

    Ok(())
}

#[test]
fn test_status_rails_missing_key() -> Result<()> {
    let test = CliTest::rails()?;

    let output = test.run(&["status"])?;
    output.assert_code(1);
    assert!(output.stdout.contains("(rails)"));
    assert!(output.stdout.contains("  nav.home  de"));

    Ok(())
}

#[test]
fn test_status_project_type_override() -> Result<()> {
    let test = CliTest::rails()?;
    test.write_file("manage.py", "")?;

    let output = test.run(&["status", "--project-type", "rails"])?;
    assert!(output.stdout.contains("(rails)"));

    Ok(())
}

#[test]
fn test_status_malformed_yaml() -> Result<()> {
    let test = CliTest::rails()?;
    test.write_file("config/locales/de/app.yml", "de: [unclosed\n")?;

    let output = test.run(&["status"])?;
    output.assert_code(2);
    assert!(output.stdout.contains("Error:"));
    assert!(output.stdout.contains("Status: failed"));

    Ok(())
}

#[test]
fn test_status_missing_directory() -> Result<()> {
    let test = CliTest::new()?;

    let output = test.run(&["status", "does-not-exist"])?;
    output.assert_code(2);
    assert!(output.stderr.contains("Project directory not found"));

    Ok(())
}

#[test]
fn test_status_invalid_config() -> Result<()> {
    let test = CliTest::gettext()?;
    test.write_file(".lexisrc.json", r#"{ "defaultLocale": "english" }"#)?;

    let output = test.run(&["status"])?;
    output.assert_code(2);
    assert!(output.stderr.contains("defaultLocale"));

    Ok(())
}
