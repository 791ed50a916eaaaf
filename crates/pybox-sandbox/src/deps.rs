//! Static dependency discovery over submitted Python source.
//!
//! Primary strategy: a structured scan of import statements (handles dotted
//! names, aliases, comma lists and parenthesised `from x import (...)`
//! continuations). If the source does not scan cleanly — e.g. it only
//! becomes valid after render augmentation — we degrade to a line regex
//! that is intentionally less precise. Comment directives (`# pip install
//! ...` and `# requirements: ...`) contribute additional names either way.
//!
//! Extraction never fails; it returns the raw, unresolved names in
//! first-seen order, deduplicated.

use regex::Regex;
use std::collections::HashSet;

/// Extract raw dependency names from `source`.
pub fn extract(source: &str) -> Vec<String> {
    let mut names = match scan_statements(source) {
        Some(found) => found,
        None => {
            tracing::debug!("structured import scan failed, using regex fallback");
            scan_fallback(source)
        }
    };
    names.extend(scan_directives(source));
    dedup_first_seen(names)
}

/// Structured scan. Returns `None` when an import statement is malformed,
/// which callers treat as "source not parseable on its own".
fn scan_statements(source: &str) -> Option<Vec<String>> {
    let mut names = Vec::new();
    let mut in_triple: Option<&str> = None;
    let mut pending = String::new();
    let mut paren_depth: i32 = 0;

    for line in source.lines() {
        // Skip triple-quoted string bodies so docstring text is not
        // mistaken for import statements.
        if let Some(quote) = in_triple {
            if line.contains(quote) {
                in_triple = None;
            }
            continue;
        }
        let trimmed = line.trim();
        if paren_depth == 0 {
            for quote in ["\"\"\"", "'''"] {
                if trimmed.matches(quote).count() == 1 {
                    in_triple = Some(quote);
                }
            }
            if in_triple.is_some() {
                continue;
            }
        }

        if paren_depth > 0 {
            pending.push(' ');
            pending.push_str(trimmed);
        } else {
            if !(trimmed.starts_with("import ")
                || trimmed.starts_with("from ")
                || trimmed == "import"
                || trimmed == "from")
            {
                continue;
            }
            pending = trimmed.to_string();
        }

        paren_depth += balance(trimmed);
        if paren_depth < 0 {
            return None;
        }
        if paren_depth > 0 {
            continue;
        }

        let statement = std::mem::take(&mut pending);
        for stmt in statement.split(';') {
            let stmt = stmt.trim();
            if stmt.is_empty() {
                continue;
            }
            if let Some(rest) = stmt.strip_prefix("import ") {
                for item in rest.split(',') {
                    let item = item.trim();
                    let name = item.split_whitespace().next().unwrap_or("");
                    let root = root_segment(name)?;
                    names.push(root.to_string());
                }
            } else if let Some(rest) = stmt.strip_prefix("from ") {
                let module = rest.split_whitespace().next().unwrap_or("");
                if !rest.contains(" import") {
                    return None;
                }
                if module.starts_with('.') {
                    // Relative import: no installable root.
                    continue;
                }
                let root = root_segment(module)?;
                names.push(root.to_string());
            } else if stmt == "import" || stmt == "from" {
                return None;
            }
        }
    }

    if paren_depth != 0 {
        return None;
    }
    Some(names)
}

/// Net parenthesis balance of a statement fragment.
fn balance(s: &str) -> i32 {
    let open = s.matches('(').count() as i32;
    let close = s.matches(')').count() as i32;
    open - close
}

/// First dotted segment, validated as a Python identifier.
fn root_segment(name: &str) -> Option<&str> {
    let root = name.split('.').next().unwrap_or("");
    if root.is_empty() {
        return None;
    }
    let mut chars = root.chars();
    let first = chars.next()?;
    if !(first.is_ascii_alphabetic() || first == '_') {
        return None;
    }
    if chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        Some(root)
    } else {
        None
    }
}

/// Regex fallback over raw lines. Less precise by design: it may over- or
/// under-collect relative to the structured scan.
fn scan_fallback(source: &str) -> Vec<String> {
    let pattern = Regex::new(r"(?m)^\s*(?:from\s+([A-Za-z_][A-Za-z0-9_.]*)|import\s+([A-Za-z_][A-Za-z0-9_.]*))")
        .expect("static import pattern");
    let mut names = Vec::new();
    for caps in pattern.captures_iter(source) {
        let name = caps.get(1).or_else(|| caps.get(2)).map(|m| m.as_str());
        if let Some(name) = name {
            if let Some(root) = root_segment(name) {
                names.push(root.to_string());
            }
        }
    }
    names
}

/// Comment directives: `# pip install a b c` and `# requirements: a, b`.
fn scan_directives(source: &str) -> Vec<String> {
    let mut names = Vec::new();
    for line in source.lines() {
        let line = line.trim();
        if !line.starts_with('#') {
            continue;
        }
        if let Some((_, rest)) = line.split_once("pip install") {
            for token in rest.split_whitespace() {
                // Skip pip flags like --upgrade.
                if !token.starts_with('-') {
                    names.push(token.to_string());
                }
            }
        } else if let Some((_, rest)) = line.split_once("requirements:") {
            for token in rest.split(',') {
                let token = token.trim();
                if !token.is_empty() {
                    names.push(token.to_string());
                }
            }
        }
    }
    names
}

fn dedup_first_seen(names: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    names
        .into_iter()
        .filter(|n| seen.insert(n.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_imports() {
        let source = "import numpy\nimport pandas as pd\nimport os.path\n";
        assert_eq!(extract(source), vec!["numpy", "pandas", "os"]);
    }

    #[test]
    fn comma_list_and_from() {
        let source = "import json, math\nfrom bs4 import BeautifulSoup\n";
        assert_eq!(extract(source), vec!["json", "math", "bs4"]);
    }

    #[test]
    fn parenthesised_from_import() {
        let source = "from manim import (\n    Scene,\n    Circle,\n)\nprint('ok')\n";
        assert_eq!(extract(source), vec!["manim"]);
    }

    #[test]
    fn relative_imports_are_skipped() {
        let source = "from . import helpers\nfrom .local import thing\n";
        assert!(extract(source).is_empty());
    }

    #[test]
    fn docstring_imports_are_ignored() {
        let source = "\"\"\"\nimport fake_module\n\"\"\"\nimport real_module\n";
        assert_eq!(extract(source), vec!["real_module"]);
    }

    #[test]
    fn pip_install_directive() {
        let source = "# pip install requests beautifulsoup4\nimport requests\n";
        assert_eq!(extract(source), vec!["requests", "beautifulsoup4"]);
    }

    #[test]
    fn requirements_directive() {
        let source = "# requirements: numpy, scipy\nprint('no imports')\n";
        assert_eq!(extract(source), vec!["numpy", "scipy"]);
    }

    #[test]
    fn directives_come_after_syntactic_imports() {
        let source = "import torch\n# requirements: numpy\n";
        assert_eq!(extract(source), vec!["torch", "numpy"]);
    }

    #[test]
    fn no_imports_yields_empty() {
        assert!(extract("print('hi')\n").is_empty());
        assert!(extract("").is_empty());
    }

    #[test]
    fn duplicates_collapse_preserving_order() {
        let source = "import numpy\nimport scipy\nimport numpy\n# pip install numpy\n";
        assert_eq!(extract(source), vec!["numpy", "scipy"]);
    }

    #[test]
    fn malformed_import_degrades_to_fallback() {
        // "import" with nothing behind it trips the structured scan; the
        // regex fallback still collects the well-formed lines.
        let source = "import\nimport numpy\n";
        assert_eq!(extract(source), vec!["numpy"]);
    }

    #[test]
    fn unbalanced_parens_degrade_to_fallback() {
        let source = "from manim import (Scene,\nimport numpy\n";
        let names = extract(source);
        assert!(names.contains(&"manim".to_string()));
        assert!(names.contains(&"numpy".to_string()));
    }
}
