use anyhow::Result;

use crate::CliTest;

const GEMFILE: &str = "source \"https://rubygems.org\"\n";

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

    test.write_file("admin/app.py", "print(_(\"Save\"))\n")?;
    test.write_file(
        "admin/locale/admin.pot",
        "msgid \"Save\"\nmsgstr \"\"\n\nmsgid \"Quit\"\nmsgstr \"\"\n",
    )?;
    test.write_file(
        "admin/locale/fr/LC_MESSAGES/admin.po",
        "msgid \"Save\"\nmsgstr \"\"\n",
    )?;
    Ok(test)
}

#[test]
fn test_bulk_table() -> Result<()> {
    let test = projects()?;

    let output = test.run(&["bulk", "shop", "admin"])?;
    output.assert_code(1);

    let lines: Vec<&str> = output.stdout.lines().collect();
    assert!(lines[0].starts_with("PROJECT"));
    assert!(lines[1].starts_with("admin"), "missing first: {:?}", lines);
    assert!(lines[1].contains("gettext"));
    assert!(lines[1].contains("1 (fr)"));
    assert!(lines[1].contains("untracked"));
    assert!(lines[2].starts_with("shop"));
    assert!(lines[2].contains("rails"));
    assert!(output.stdout.contains("1 of 2 projects missing translations"));

    Ok(())
}

#[test]
fn test_bulk_uses_config_projects() -> Result<()> {
    let test = projects()?;
    test.write_file(".lexisrc.json", r#"{ "projects": ["shop"] }"#)?;

    let output = test.run(&["bulk"])?;
    output.assert_code(0);
    assert!(output.stdout.contains("1 project fully translated"));

    Ok(())
}

#[test]
fn test_bulk_without_projects() -> Result<()> {
    let test = CliTest::new()?;

    let output = test.run(&["bulk"])?;
    output.assert_code(2);
    assert!(output.stderr.contains("No projects given"));

    Ok(())
}

#[test]
fn test_bulk_reports_unreadable_project() -> Result<()> {
    let test = projects()?;
    test.write_file(
        "admin/locale/fr/LC_MESSAGES/admin.po",
        "msgid \"Save\"\nmsgstr \"Enregistrer\n",
    )?;

    let output = test.run(&["bulk", "shop", "admin"])?;
    output.assert_code(1);

    let lines: Vec<&str> = output.stdout.lines().collect();
    let cells: Vec<&str> = lines[1].split_whitespace().collect();
    assert_eq!(cells[0], "admin");
    assert_eq!(&cells[3..], ["-", "failed", "-"]);
    assert!(output.stdout.contains("error: admin: Failed to reload translations"));
    assert!(output.stdout.contains("1 of 2 projects could not be analyzed"));

    assert!(!test.root().join("admin/locale/base.pot").exists());
    assert_eq!(
        test.read_file("admin/locale/admin.pot")?,
        "msgid \"Save\"\nmsgstr \"\"\n\nmsgid \"Quit\"\nmsgstr \"\"\n"
    );

    Ok(())
}
