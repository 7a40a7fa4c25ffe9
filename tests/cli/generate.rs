use anyhow::Result;

use crate::CliTest;

#[test]
fn test_generate_gettext_base_from_sources() -> Result<()> {
    let test = CliTest::with_file(
        "app.py",
        "# TRANSLATORS: window title\ntitle = _(\"Quit\")\n",
    )?;

    let output = test.run(&["generate"])?;
    output.assert_code(0);
    assert!(output.stdout.contains("Base content changed: 1 added, 0 removed, 0 changed"));

    let pot = test.read_file("locale/base.pot")?;
    assert!(pot.contains("#. TRANSLATORS: window title\n#: app.py:2\nmsgid \"Quit\"\nmsgstr \"\"\n"));

    Ok(())
}

#[test]
fn test_generate_unchanged_base() -> Result<()> {
    let test = CliTest::gettext()?;
    test.write_file("app.py", "print(_(\"Hello {0}\"))\nprint(_(\"Save\"))\n")?;

    let first = test.run(&["generate"])?;
    first.assert_code(0);

    let second = test.run(&["generate", "-v"])?;
    second.assert_code(0);
    assert!(second.stdout.contains("Base content unchanged"));

    Ok(())
}

#[test]
fn test_generate_rails_without_locale_files() -> Result<()> {
    let test = CliTest::with_file("Gemfile", "source \"https://rubygems.org\"\n")?;

    let output = test.run(&["generate"])?;
    output.assert_code(0);

    let content = test.read_file("config/locales/en/application.yml")?;
    assert_eq!(content, "en:\n  application:\n    name: \"Application Name\"\n");

    Ok(())
}

#[test]
fn test_generate_refuses_when_a_catalog_is_malformed() -> Result<()> {
    let test = CliTest::gettext()?;
    test.write_file(
        "locale/fr/LC_MESSAGES/messages.po",
        "msgid \"Save\"\nmsgstr \"Enregistrer\n",
    )?;

    let output = test.run(&["generate"])?;
    output.assert_code(2);
    assert!(output.stdout.contains("Status: failed"));
    assert!(output.stdout.contains("messages.po"));
    assert!(!output.stdout.contains("Base content"));

    assert!(!test.root().join("locale/base.pot").exists());
    assert_eq!(test.read_file("locale/messages.pot")?, crate::POT);

    // The project still loads afterwards.
    test.write_file("locale/fr/LC_MESSAGES/messages.po", crate::FR_PO)?;
    test.run(&["status"])?.assert_code(0);

    Ok(())
}

#[test]
fn test_generate_rails_keeps_default_catalog_when_a_locale_is_malformed() -> Result<()> {
    let test = CliTest::with_file("Gemfile", "source \"https://rubygems.org\"\n")?;
    let original = "en:\n  title: \"Shop\"\n  save: \"Save\"\n";
    test.write_file("config/locales/en/application.yml", original)?;
    test.write_file("config/locales/de/app.yml", "de: [broken\n")?;

    let output = test.run(&["generate"])?;
    output.assert_code(2);
    assert!(output.stdout.contains("de/app.yml"));

    assert_eq!(test.read_file("config/locales/en/application.yml")?, original);

    Ok(())
}
