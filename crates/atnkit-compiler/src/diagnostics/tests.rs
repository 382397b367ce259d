use rowan::TextRange;

use super::*;

fn range(start: u32, end: u32) -> TextRange {
    TextRange::new(start.into(), end.into())
}

#[test]
fn severity_display() {
    insta::assert_snapshot!(format!("{}", Severity::Error), @"error");
    insta::assert_snapshot!(format!("{}", Severity::Warning), @"warning");
}

#[test]
fn report_renders_template_arguments() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::IncompatibleCommands, range(0, 4))
        .arg("skip")
        .arg("more")
        .emit();

    assert_eq!(diagnostics.len(), 1);
    assert!(diagnostics.has_warnings());
    let diag = diagnostics.iter().next().unwrap();
    assert_eq!(diag.args(), ["skip", "more"]);
    assert_eq!(diag.message(), "incompatible commands skip and more");
}

#[test]
fn repeated_placeholder() {
    let message = DiagnosticKind::ExpectedNonGreedyWildcardBlock.message(&["*".to_string()]);

    assert_eq!(
        message,
        "greedy block * contains wildcard; the non-greedy syntax *? may be preferred"
    );
}

#[test]
fn missing_arguments_render_empty() {
    let message = DiagnosticKind::CharactersCollisionInSet.message(&["'a'".to_string()]);

    assert_eq!(message, "chars 'a' used multiple times in set ");
}

#[test]
fn warnings_do_not_count_as_errors() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::DuplicatedCommand, range(0, 1))
        .arg("mode")
        .emit();

    assert!(!diagnostics.has_errors());
    assert!(diagnostics.has_warnings());
    assert_eq!(diagnostics.warning_count(), 1);
    assert_eq!(diagnostics.error_count(), 0);
    assert_eq!(diagnostics.count(DiagnosticKind::DuplicatedCommand), 1);
}

#[test]
fn plain_display_includes_file() {
    let mut diagnostics = Diagnostics::for_file(Some("T.g4".to_string()));
    diagnostics
        .report(DiagnosticKind::DuplicatedCommand, range(3, 7))
        .arg("skip")
        .emit();

    insta::assert_snapshot!(diagnostics.render(""), @"T.g4: warning at 3..7: duplicated command skip");
}

#[test]
fn printer_with_source() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::InvalidEscapeSequence, range(0, 5))
        .arg("\\q")
        .emit();

    let result = diagnostics.printer("hello world!").render();
    insta::assert_snapshot!(result, @r"
    error: invalid escape sequence \q
      |
    1 | hello world!
      | ^^^^^ invalid escape sequence \q
    ");
}
