use anyhow::Result;

use crate::CliTest;

#[test]
fn test_find_hardcoded_clean() -> Result<()> {
    let test = CliTest::gettext()?;

    let output = test.run(&["find-hardcoded"])?;
    output.assert_code(0);
    assert!(output.stdout.contains("No hardcoded strings found"));

    Ok(())
}

#[test]
fn test_find_hardcoded_lists_unwrapped_ui_text() -> Result<()> {
    let test = CliTest::gettext()?;
    test.write_file(
        "ui/window.py",
        "self.setWindowTitle(_(\"Settings\"))\nstatus = QLabel(\"Ready\")\n",
    )?;

    let output = test.run(&["find-hardcoded"])?;
    output.assert_code(1);
    assert!(output.stdout.contains("  ui/window.py\n    2: \"Ready\"\n"));
    assert!(!output.stdout.contains("Settings"));
    assert!(output.stdout.contains("1 hardcoded string in 1 file"));
    // Scanning never touches catalogs.
    assert!(!test.root().join("locale/fr/LC_MESSAGES/messages.mo").exists());

    Ok(())
}

#[test]
fn test_find_hardcoded_rails_views() -> Result<()> {
    let test = CliTest::rails()?;
    test.write_file(
        "app/views/home/index.html.erb",
        "<%= link_to t(\"nav.home\"), root_path %>\n<%= link_to \"Sign out\", logout_path %>\n",
    )?;
    test.write_file("vendor/bundle/gem/helper.rb", "link_to \"Vendored\", x\n")?;

    let output = test.run(&["find-hardcoded"])?;
    output.assert_code(1);
    assert!(output.stdout.contains("app/views/home/index.html.erb"));
    assert!(output.stdout.contains("2: \"Sign out\""));
    assert!(!output.stdout.contains("Vendored"));

    Ok(())
}
