use goinspect::semantics::Navigator;
use goinspect::*;
use serde::Serialize;

#[derive(Serialize)]
struct JsonPosition {
    line: usize,
    character: usize,
}

#[derive(Serialize)]
struct JsonDiagnostic {
    file: String,
    start: JsonPosition,
    end: JsonPosition,
    level: String,
    code: usize,
    kind: &'static str,
    message: String,
    fix: Option<String>,
}

impl From<&Diagnostic> for JsonDiagnostic {
    fn from(diagnostic: &Diagnostic) -> Self {
        let span = diagnostic.span();
        JsonDiagnostic {
            file: span.start.uri.to_string(),
            start: JsonPosition {
                line: span.start.line,
                character: span.start.character,
            },
            end: JsonPosition {
                line: span.end.line,
                character: span.end.character,
            },
            level: diagnostic.level().to_string(),
            code: diagnostic.code(),
            kind: diagnostic.into(),
            message: diagnostic.to_string(),
            fix: diagnostic.problem().and_then(|p| p.fix_label()),
        }
    }
}

/// Prints all diagnostics as one JSON array on stdout.
pub struct JsonReporter;

impl JsonReporter {
    pub fn render(diagnostics: &[Diagnostic]) -> GoInspectResult<String> {
        let diagnostics: Vec<JsonDiagnostic> = diagnostics.iter().map(JsonDiagnostic::from).collect();
        Ok(serde_json::to_string_pretty(&diagnostics)?)
    }
}

impl Reporter for JsonReporter {
    fn report(diagnostics: Vec<Diagnostic>, _navigator: &Navigator) {
        match Self::render(&diagnostics) {
            Ok(json) => println!("{}", json),
            Err(err) => error!("Failed to render diagnostics: {}", err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_an_array() {
        let source = Source::scratch("package main\n\nselect {}\n");
        let span = Span::at_range(&source, 14..20);
        let diagnostics = vec![Diagnostic::SyntaxError(span, "Unsupported".into())];

        let json: serde_json::Value =
            serde_json::from_str(JsonReporter::render(&diagnostics).unwrap().as_str()).unwrap();

        assert_eq!(json[0]["file"], "scratch:");
        assert_eq!(json[0]["start"]["line"], 3);
        assert_eq!(json[0]["end"]["character"], 7);
        assert_eq!(json[0]["level"], "error");
        assert_eq!(json[0]["kind"], "SyntaxError");
        assert_eq!(json[0]["message"], "Unsupported");
        assert!(json[0]["fix"].is_null());
    }
}
