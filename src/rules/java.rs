use super::quotes::find_unquoted;
use super::TokenRules;
use regex::Regex;
use std::sync::LazyLock;

const SCOPE_ENTER_TOKEN: &str = "{";
const SCOPE_EXIT_TOKEN: &str = "}";
const TERMINATION_TOKEN: &str = ";";
const ANNOTATION_TOKEN: &str = "@";
const COMMENT_BODY_TOKEN: &str = "*";
const COMMENT_LINE_TOKEN: &str = "//";
const COMMENT_TOKENS: [&str; 5] = ["/**", "/*", COMMENT_BODY_TOKEN, "*/", COMMENT_LINE_TOKEN];

/// Statements that look like `Type name(` but never start a method.
const NON_METHOD_KEYWORDS: [&str; 2] = ["return", "new"];

static METHOD_SIGNATURE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(public |private |protected |static |final |native |synchronized |abstract |transient )*(<.*>\s+)?\w+(<.*>|\[.*\])?\s+\w+\s*\(.*$",
    )
    .expect("method signature pattern is valid")
});

/// Token rules for Java (and brace-delimited languages close enough to it).
#[derive(Debug, Default, Clone, Copy)]
pub struct JavaRules;

impl JavaRules {
    pub fn new() -> Self {
        Self
    }
}

impl TokenRules for JavaRules {
    fn scope_enter(&self, line: &str) -> Option<usize> {
        find_unquoted(line, SCOPE_ENTER_TOKEN)
    }

    fn scope_exit(&self, line: &str) -> Option<usize> {
        find_unquoted(line, SCOPE_EXIT_TOKEN)
    }

    fn is_complete_expression(&self, lines: &[String], index: usize) -> bool {
        let Some(line) = lines.get(index) else {
            return false;
        };
        let line = line.trim();

        line.ends_with(TERMINATION_TOKEN)
            || self.scope_enter(line).is_some()
            || self.scope_exit(line).is_some()
            || self.is_special_statement(line)
    }

    fn is_special_statement(&self, line: &str) -> bool {
        line.is_empty()
            || line.starts_with(ANNOTATION_TOKEN)
            || COMMENT_TOKENS.iter().any(|token| line.starts_with(token))
    }

    fn is_unit_signature(&self, line: &str) -> bool {
        let trimmed = line.trim();
        if NON_METHOD_KEYWORDS
            .iter()
            .any(|keyword| trimmed.starts_with(keyword))
        {
            return false;
        }

        METHOD_SIGNATURE.is_match(line)
    }

    fn comment_body_token(&self) -> &str {
        COMMENT_BODY_TOKEN
    }

    fn comment_line_token(&self) -> &str {
        COMMENT_LINE_TOKEN
    }

    // ` * text` and ` */` line up under the `/` of `/**`
    fn comment_body_padding(&self, trimmed: &str) -> &str {
        match trimmed.strip_prefix(COMMENT_BODY_TOKEN) {
            Some(rest)
                if rest.is_empty() || rest.starts_with(|c: char| c.is_whitespace() || c == '/') =>
            {
                " "
            }
            _ => "",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(text: &[&str]) -> Vec<String> {
        text.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_signatures() {
        let rules = JavaRules::new();
        assert!(rules.is_unit_signature("public void close() throws IOException {"));
        assert!(rules.is_unit_signature("private static <T> List<T> copy(List<T> src) {"));
        assert!(rules.is_unit_signature("int[] values()"));
        assert!(!rules.is_unit_signature("return foo(bar);"));
        assert!(!rules.is_unit_signature("new Thread(runnable).start();"));
        assert!(!rules.is_unit_signature("if (x != null) {"));
        assert!(!rules.is_unit_signature("} catch (Exception e) {"));
        assert!(!rules.is_unit_signature("Logger.getLogger(name).log(Level.INFO,"));
    }

    #[test]
    fn test_special_statements() {
        let rules = JavaRules::new();
        assert!(rules.is_special_statement(""));
        assert!(rules.is_special_statement("@Override"));
        assert!(rules.is_special_statement("// note"));
        assert!(rules.is_special_statement("/** doc"));
        assert!(rules.is_special_statement("* body"));
        assert!(rules.is_special_statement("*/"));
        assert!(!rules.is_special_statement("x = 1;"));
    }

    #[test]
    fn test_complete_expressions() {
        let rules = JavaRules::new();
        let code = lines(&[
            "int a = 1;",
            "String s = \"a\" +",
            "try {",
            "}",
            "foo(\"{\",",
        ]);
        assert!(rules.is_complete_expression(&code, 0));
        assert!(!rules.is_complete_expression(&code, 1));
        assert!(rules.is_complete_expression(&code, 2));
        assert!(rules.is_complete_expression(&code, 3));
        assert!(!rules.is_complete_expression(&code, 4));
        assert!(!rules.is_complete_expression(&code, 5));
    }

    #[test]
    fn test_comment_body_padding() {
        let rules = JavaRules::new();
        assert_eq!(rules.comment_body_padding("* text"), " ");
        assert_eq!(rules.comment_body_padding("*/"), " ");
        assert_eq!(rules.comment_body_padding("*"), " ");
        assert_eq!(rules.comment_body_padding("/**"), "");
        assert_eq!(rules.comment_body_padding("*factor;"), "");
    }
}
