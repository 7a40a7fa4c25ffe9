use anyhow::Result;

use crate::CliTest;

#[test]
fn test_parity_clean() -> Result<()> {
    let test = CliTest::rails()?;

    let output = test.run(&["parity"])?;
    output.assert_code(0);
    assert!(output.stdout.contains("Default locale: en (1 file)"));
    assert!(output.stdout.contains("All locales match the default locale's files"));

    Ok(())
}

#[test]
fn test_parity_reports_gaps_without_writing() -> Result<()> {
    let test = CliTest::rails()?;
    test.write_file("config/locales/en/models.yml", "en:\n  models:\n    user: \"User\"\n")?;
    test.write_file("config/locales/de/legacy.yml", "de:\n  legacy: \"Alt\"\n")?;

    let output = test.run(&["parity"])?;
    output.assert_code(1);
    assert!(output.stdout.contains("de: 1 missing, 1 extra"));
    assert!(output.stdout.contains("missing de/models.yml"));
    assert!(output.stdout.contains("extra de/legacy.yml"));
    assert!(!test.root().join("config/locales/de/models.yml").exists());

    Ok(())
}

#[test]
fn test_parity_requires_rails() -> Result<()> {
    let test = CliTest::gettext()?;

    let output = test.run(&["parity"])?;
    output.assert_code(2);
    assert!(output.stderr.contains("only available for Rails projects"));

    Ok(())
}
