use anyhow::Result;

use crate::CliTest;

#[test]
fn test_write_creates_requested_gettext_catalog() -> Result<()> {
    let test = CliTest::gettext()?;

    let output = test.run(&["write", "--locale", "de"])?;
    output.assert_code(0);
    assert!(output.stdout.contains("Updated: de"));

    let de = test.read_file("locale/de/LC_MESSAGES/messages.po")?;
    assert!(de.contains("msgid \"Save\"\nmsgstr \"\"\n"));
    assert!(de.contains("msgid \"Hello {0}\""));

    Ok(())
}

#[test]
fn test_write_fixes_unicode_in_gettext() -> Result<()> {
    let test = CliTest::gettext()?;
    test.write_file(
        "locale/fr/LC_MESSAGES/messages.po",
        "msgid \"Hello {0}\"\nmsgstr \"Bonjour {0}\"\n\nmsgid \"Save\"\nmsgstr \"Enregistré\"\n",
    )?;

    let output = test.run(&["write"])?;
    output.assert_code(0);
    assert!(output.stdout.contains("Fixed 1 value"));

    let fr = test.read_file("locale/fr/LC_MESSAGES/messages.po")?;
    assert!(fr.contains(r#"msgstr "Enregistr\u00e9""#));

    Ok(())
}

#[test]
fn test_write_rails_fills_placeholders() -> Result<()> {
    let test = CliTest::rails()?;

    let output = test.run(&["write"])?;
    output.assert_code(0);

    let de = test.read_file("config/locales/de/app.yml")?;
    assert!(de.starts_with("de:\n"));
    assert!(de.contains("  greeting: \"Hallo\"\n"));
    assert!(de.contains("  nav:\n    home: \"\"\n"));

    Ok(())
}

#[test]
fn test_write_rails_drops_stale_keys() -> Result<()> {
    let test = CliTest::rails()?;
    test.write_file(
        "config/locales/de/app.yml",
        "# German\nde:\n  greeting: \"Hallo\"\n  old: \"Alt\"\n",
    )?;

    let output = test.run(&["write"])?;
    output.assert_code(0);

    let de = test.read_file("config/locales/de/app.yml")?;
    assert!(de.starts_with("# German\nde:\n"));
    assert!(!de.contains("old:"));

    Ok(())
}

#[test]
fn test_write_rails_creates_parity_file() -> Result<()> {
    let test = CliTest::rails()?;
    test.write_file(
        "config/locales/en/models.yml",
        "# Model names\nen:\n  models:\n    user: \"User\"\n",
    )?;

    test.run(&["write"])?.assert_code(0);

    let models = test.read_file("config/locales/de/models.yml")?;
    assert!(models.starts_with("# Model names\nde:\n"));
    assert!(models.contains("  models:\n    user: \"\"\n"));

    Ok(())
}

#[test]
fn test_compile_rails_is_noop() -> Result<()> {
    let test = CliTest::rails()?;

    let output = test.run(&["compile"])?;
    output.assert_code(0);
    assert!(output.stdout.contains("Status: ok"));

    Ok(())
}
