use indoc::indoc;
use pretty_assertions::assert_eq;
use scopefmt::{FormatError, FormatOptions, Formatter};
use serde::Deserialize;
use std::fs;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Fixture {
    indent_unit: String,
    tests: Vec<Case>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Case {
    label: String,
    offset: usize,
    selection_start: usize,
    selection_end: usize,
    new_snippet_start: usize,
    new_snippet_end: usize,
    selection: Vec<String>,
    code: String,
    format_result: String,
    format_snippet_result: String,
}

fn load_fixture() -> Fixture {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/java.json");
    let text = fs::read_to_string(path).expect("Failed to read fixture");
    serde_json::from_str(&text).expect("Failed to parse fixture")
}

#[cfg(test)]
mod formatter_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_fixture_format() {
        let fixture = load_fixture();
        let formatter = Formatter::java(&fixture.indent_unit);

        for case in &fixture.tests {
            let expected: Vec<&str> = case.format_result.split('\n').collect();
            assert_eq!(formatter.format(&case.code), expected, "case: {}", case.label);
        }
    }

    #[test]
    fn test_fixture_snippet() {
        let fixture = load_fixture();
        let formatter = Formatter::java(&fixture.indent_unit);

        for case in &fixture.tests {
            let result = formatter
                .format_snippet(&case.code, case.selection_start, case.selection_end, case.offset)
                .expect("Snippet should be extracted");

            let selection: Vec<&str> = result.selection.split('\n').map(str::trim).collect();
            assert_eq!(selection, case.selection, "case: {}", case.label);
            assert_eq!(
                (result.range.start, result.range.end),
                (case.new_snippet_start, case.new_snippet_end),
                "case: {}",
                case.label
            );

            let lines: Vec<&str> = result
                .prefix
                .split('\n')
                .chain(result.selection.split('\n'))
                .chain(result.suffix.split('\n'))
                .collect();
            let expected: Vec<&str> = case.format_snippet_result.split('\n').collect();
            assert_eq!(lines, expected, "case: {}", case.label);
        }
    }

    #[test]
    fn test_format_is_idempotent() {
        let fixture = load_fixture();
        let formatter = Formatter::java(&fixture.indent_unit);

        for case in &fixture.tests {
            let once = formatter.format(&case.code);
            let twice = formatter.format(&once.join("\n"));
            assert_eq!(once, twice, "case: {}", case.label);
        }
    }

    #[test]
    fn test_nested_try_blocks_normalize() {
        let tidy = indoc! {"
            class Port {
            void close() {
            try {
            a.close();
            } catch (Exception e) {
            }
            try {
            b.close();
            } catch (Exception e) {
            }
            try {
            c.close();
            } catch (Exception e) {
            }
            }
            }
        "};
        let messy = indoc! {"
                    class Port {
              void close() {
                        try {
            a.close();
                } catch (Exception e) {
                                    }
             try {
                          b.close();
                } catch (Exception e) {
                }
                                try {
              c.close();
                  } catch (Exception e) {
            }
                      }
              }
        "};

        let expected = indoc! {"
            class Port {
                void close() {
                    try {
                        a.close();
                    } catch (Exception e) {
                    }
                    try {
                        b.close();
                    } catch (Exception e) {
                    }
                    try {
                        c.close();
                    } catch (Exception e) {
                    }
                }
            }"};

        let formatter = Formatter::java("    ");
        assert_eq!(formatter.format(tidy).join("\n"), expected);
        assert_eq!(formatter.format(messy).join("\n"), expected);
    }

    #[test]
    fn test_quoted_braces_do_not_nest() {
        let source = indoc! {r#"
            void log() {
            System.out.println("}}}}}}");
            char open = '{';
            String s = "say \"{\"";
            done();
            }
        "#};

        let formatter = Formatter::java("  ");
        assert_eq!(
            formatter.format(source),
            vec![
                "void log() {",
                r#"  System.out.println("}}}}}}");"#,
                "  char open = '{';",
                r#"  String s = "say \"{\"";"#,
                "  done();",
                "}",
            ]
        );
    }

    #[test]
    fn test_continuation_lines() {
        let source = indoc! {r#"
            String greet(String name) {
            String s = "Hello, " +
            name +
            "!";
            return s;
            }
        "#};

        let formatter = Formatter::java("    ");
        assert_eq!(
            formatter.format(source),
            vec![
                "String greet(String name) {",
                r#"    String s = "Hello, " +"#,
                "        name +",
                r#"        "!";"#,
                "    return s;",
                "}",
            ]
        );
    }

    #[test]
    fn test_comment_bodies() {
        let source = indoc! {"
            class A {
            /**
            * Docs.
            */
            int x;
            }
        "};

        let aligned = Formatter::java("\t").format(source);
        assert_eq!(aligned, vec!["class A {", "\t/**", "\t * Docs.", "\t */", "\tint x;", "}"]);

        let options = FormatOptions {
            align_comment_bodies: false,
            ..FormatOptions::tabs()
        };
        let plain = Formatter::new(options).format(source);
        assert_eq!(plain, vec!["class A {", "\t/**", "\t* Docs.", "\t*/", "\tint x;", "}"]);
    }

    #[test]
    fn test_unbalanced_source_is_best_effort() {
        let formatter = Formatter::java("  ");
        assert_eq!(formatter.format("}\nx();\n{\n"), vec!["}", "x();", "{"]);
        assert_eq!(formatter.format("a();\n}\nb();"), vec!["  a();", "}", "b();"]);
        assert_eq!(formatter.format("if (a) {\nb();"), vec!["if (a) {", "  b();"]);
        assert!(formatter.format("").is_empty());
        assert!(formatter.format("\n   \n\t\n").is_empty());
    }
}

#[cfg(test)]
mod snippet_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn close_case() -> Case {
        load_fixture()
            .tests
            .into_iter()
            .next()
            .expect("Fixture should have a first case")
    }

    #[test]
    fn test_snippet_contains_selection() {
        let case = close_case();
        let source_lines: Vec<&str> = case.code.split('\n').collect();
        let formatter = Formatter::java("    ");

        for (start, end, offset) in [
            (12, 12, 10),
            (17, 17, 4),
            (22, 23, 2),
            (23, 23, 30),
            (14, 14, 0),
            (6, 6, 3),
            (16, 16, 10),
            (26, 27, 5),
        ] {
            let result = formatter
                .format_snippet(&case.code, start, end, offset)
                .expect("Snippet should be extracted");

            let expected: Vec<&str> = source_lines[start - 1..end].iter().map(|l| l.trim()).collect();
            let selection: Vec<&str> = result.selection.split('\n').map(str::trim).collect();
            assert_eq!(selection, expected, "selection {}-{}", start, end);
            assert!(result.range.start <= start);
            assert!(result.range.end >= end);
        }
    }

    #[test]
    fn test_snippet_without_context() {
        let case = close_case();
        let formatter = Formatter::java("    ");
        let result = formatter.format_snippet(&case.code, 14, 14, 0).unwrap();

        assert_eq!(result.prefix, "");
        assert_eq!(result.selection, "inputStream.close();");
        assert_eq!(result.suffix, "");
        assert_eq!((result.range.start, result.range.end), (14, 14));
    }

    #[test]
    fn test_snippet_window_clipped_at_file_start() {
        let source = indoc! {"
            void a() {
            first();
            second();
            }
        "};
        let formatter = Formatter::java("  ");
        let result = formatter.format_snippet(source, 2, 2, 50).unwrap();

        assert_eq!(result.prefix, "void a() {");
        assert_eq!(result.selection, "  first();");
        assert_eq!(result.suffix, "  second();\n}");
        assert_eq!((result.range.start, result.range.end), (1, 4));
    }

    #[test]
    fn test_snippet_selects_blank_line() {
        let case = close_case();
        let formatter = Formatter::java("    ");
        let result = formatter.format_snippet(&case.code, 6, 6, 3).unwrap();

        assert_eq!(result.prefix, "public boolean connected() {\n    return connected;\n}");
        assert_eq!(result.selection.trim(), "");
        assert_eq!(result.suffix, "");
        assert_eq!((result.range.start, result.range.end), (3, 6));
    }

    #[test]
    fn test_snippet_selects_closing_brace() {
        let case = close_case();
        let formatter = Formatter::java("    ");
        let result = formatter.format_snippet(&case.code, 16, 16, 10).unwrap();

        assert_eq!(result.selection, "    }");
        assert!(result.prefix.ends_with("    } catch (Exception e) {"));
        assert!(result.suffix.starts_with("    try {\n        outputStream.close();"));
        assert_eq!((result.range.start, result.range.end), (7, 26));
    }

    #[test]
    fn test_snippet_end_past_source_is_clipped() {
        let formatter = Formatter::java("  ");
        let result = formatter.format_snippet("a();\nb();", 1, 5, 0).unwrap();

        assert_eq!(result.selection, "a();\nb();");
        assert_eq!((result.range.start, result.range.end), (1, 2));
    }

    #[test]
    fn test_snippet_serializes_range_as_pair() {
        let formatter = Formatter::java("  ");
        let result = formatter.format_snippet("a();\nb();", 1, 1, 1).unwrap();
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["range"], serde_json::json!([1, 2]));
        assert_eq!(json["selection"], "a();");
    }

    #[test]
    fn test_snippet_errors() {
        let formatter = Formatter::java("  ");
        assert!(matches!(
            formatter.format_snippet("a();", 0, 0, 1),
            Err(FormatError::InvalidSelectionStart)
        ));
        assert!(matches!(
            formatter.format_snippet("a();\nb();\nc();", 3, 2, 1),
            Err(FormatError::InvertedSelection { start: 3, end: 2 })
        ));
        assert!(matches!(
            formatter.format_snippet("a();\nb();", 5, 6, 1),
            Err(FormatError::SelectionOutOfRange { start: 5, lines: 2 })
        ));
    }
}
