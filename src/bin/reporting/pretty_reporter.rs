use crate::reporting::highlight;
use colored::*;
use goinspect::semantics::Navigator;
use goinspect::*;

pub struct PrettyReporter;

impl PrettyReporter {
    fn color(level: DiagnosticLevel) -> Color {
        match level {
            DiagnosticLevel::Error => Color::BrightRed,
            DiagnosticLevel::Warning => Color::Yellow,
            DiagnosticLevel::WeakWarning => Color::BrightYellow,
        }
    }

    fn header(diagnostic: &Diagnostic) -> String {
        let span = diagnostic.span();
        let uri_row = format!(
            "{}:{}:{}",
            span.start.uri, span.start.line, span.start.character
        );
        let message_row = format!("{}: {}", diagnostic.level(), diagnostic);

        format!(
            "{}\n{}\n",
            message_row.color(Self::color(diagnostic.level())),
            uri_row.bright_black()
        )
    }

    fn code_frame(diagnostic: &Diagnostic, source: Arc<Source>) -> String {
        let span = diagnostic.span();

        let code = highlight(
            source.clone(),
            vec![(Self::color(diagnostic.level()), span.clone())],
        );
        let lines: Vec<_> = code.split('\n').collect();

        let start_line = span.start.line.saturating_sub(3);
        let end_line = (span.end.line + 2).min(lines.len());

        let mut formatted_lines = String::new();

        for (i, line) in lines[start_line..end_line.max(start_line)].iter().enumerate() {
            let line_number = start_line + i + 1;
            formatted_lines.push_str(Self::code_frame_line(line, line_number).as_str());
            formatted_lines.push('\n');
        }

        formatted_lines
    }

    fn code_frame_line(line: &str, n: usize) -> String {
        let line_number_column = format!("{:>3} |", n);

        format!("{} {}", line_number_column.bright_black(), line)
    }

    fn fix_hint(diagnostic: &Diagnostic) -> Option<String> {
        let label = diagnostic.problem()?.fix_label()?;
        Some(format!("{} {}\n", "fix:".bright_black(), label.green()))
    }
}

impl Reporter for PrettyReporter {
    fn report(diagnostics: Vec<Diagnostic>, navigator: &Navigator) {
        for diagnostic in diagnostics {
            let mut result = String::new();
            result.push_str(Self::header(&diagnostic).as_str());
            if let Some(source) = navigator.source(&diagnostic.span().start.uri) {
                result.push_str(Self::code_frame(&diagnostic, source).as_str());
            }
            if let Some(hint) = Self::fix_hint(&diagnostic) {
                result.push_str(hint.as_str());
            }
            println!("{}", result);
        }
    }
}
