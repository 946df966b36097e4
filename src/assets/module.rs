//! Rewrites ES module syntax into the body of a registry function.
//!
//! Every bundled module runs as `function (module, exports, __require, __default)`.
//! Imports become `__require` calls on registry ids, exports become assignments
//! on `exports`. Only top-of-line `import`/`export` statements are recognized.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::{Captures, Regex};

fn import_statement() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"(?m)^([ \t]*)import\s+(?:([^'";]*?)\s*from\s*)?['"]([^'"]+)['"][ \t]*;?"#)
            .expect("import pattern is valid")
    })
}

fn reexport_statement() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r#"(?m)^([ \t]*)export\s+(\*|\{[^}]*\})\s*from\s*['"]([^'"]+)['"][ \t]*;?"#,
        )
        .expect("re-export pattern is valid")
    })
}

fn require_call() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"\brequire\(\s*['"]([^'"]+)['"]\s*\)"#).expect("require pattern is valid")
    })
}

fn default_export() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?m)^([ \t]*)export\s+default\s+").expect("export pattern is valid")
    })
}

fn declaration_export() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r"(?m)^([ \t]*)export\s+((?:async\s+)?function\*?|class|const|let|var)\s+([A-Za-z_$][\w$]*)",
        )
        .expect("export pattern is valid")
    })
}

fn list_export() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?m)^[ \t]*export\s*\{([^}]*)\}[ \t]*;?").expect("export pattern is valid")
    })
}

/// Rewrite `source` for the registry. `ids` maps each specifier to its registry id.
pub fn to_registry_body(source: &str, ids: &HashMap<String, String>) -> String {
    let id_literal = |specifier: &str| {
        let id = ids.get(specifier).map(String::as_str).unwrap_or(specifier);
        serde_json::to_string(id).unwrap_or_else(|_| "\"\"".to_string())
    };

    let mut temp = 0usize;
    let mut next_temp = || {
        let name = format!("__m{temp}");
        temp += 1;
        name
    };

    let code = import_statement().replace_all(source, |caps: &Captures<'_>| {
        let indent = &caps[1];
        let id = id_literal(&caps[3]);
        let clause = caps.get(2).map(|m| m.as_str().trim()).filter(|c| !c.is_empty());
        match clause {
            Some(clause) => format!("{indent}{}", import_bindings(clause, &id, &next_temp())),
            None => format!("{indent}__require({id});"),
        }
    });

    let code = reexport_statement().replace_all(&code, |caps: &Captures<'_>| {
        let indent = &caps[1];
        let id = id_literal(&caps[3]);
        let temp = next_temp();
        let mut out = format!("{indent}var {temp} = __require({id});");
        if &caps[2] == "*" {
            out.push_str(&format!(
                " Object.keys({temp}).forEach(function (k) {{ if (k !== \"default\") exports[k] = {temp}[k]; }});"
            ));
        } else {
            for (local, exported) in parse_list(&caps[2]) {
                out.push_str(&format!(" exports.{exported} = {temp}.{local};"));
            }
        }
        out
    });

    let code = require_call().replace_all(&code, |caps: &Captures<'_>| {
        format!("__require({})", id_literal(&caps[1]))
    });

    let mut trailer = Vec::new();
    let mut has_exports = default_export().is_match(&code);

    let code = default_export().replace_all(&code, "${1}exports.default = ");

    let code = declaration_export().replace_all(&code, |caps: &Captures<'_>| {
        trailer.push(format!("exports.{0} = {0};", &caps[3]));
        format!("{}{} {}", &caps[1], &caps[2], &caps[3])
    });

    let code = list_export().replace_all(&code, |caps: &Captures<'_>| {
        for (local, exported) in parse_list(&caps[1]) {
            trailer.push(format!("exports.{exported} = {local};"));
        }
        String::new()
    });

    has_exports |= !trailer.is_empty() || reexport_statement().is_match(source);

    let mut body = String::with_capacity(code.len() + 64);
    if has_exports {
        body.push_str("Object.defineProperty(exports, \"__esModule\", { value: true });\n");
    }
    body.push_str(&code);
    if !body.ends_with('\n') {
        body.push('\n');
    }
    for line in trailer {
        body.push_str(&line);
        body.push('\n');
    }
    body
}

/// `Default, { a, b as c }`, `* as ns`, `{ a }` or `Default`.
fn import_bindings(clause: &str, id: &str, temp: &str) -> String {
    let (default, rest) = if clause.starts_with('{') || clause.starts_with('*') {
        (None, Some(clause))
    } else {
        match clause.split_once(',') {
            Some((default, rest)) => (Some(default.trim()), Some(rest.trim())),
            None => (Some(clause), None),
        }
    };

    let mut out = format!("var {temp} = __require({id});");
    if let Some(default) = default {
        out.push_str(&format!(" var {default} = __default({temp});"));
    }
    if let Some(rest) = rest {
        if let Some(namespace) = rest.strip_prefix('*') {
            let name = namespace.trim().trim_start_matches("as").trim();
            out.push_str(&format!(" var {name} = {temp};"));
        } else {
            for (imported, local) in parse_list(rest) {
                out.push_str(&format!(" var {local} = {temp}.{imported};"));
            }
        }
    }
    out
}

/// `{ a, b as c }` → `[(a, a), (b, c)]`.
fn parse_list(list: &str) -> Vec<(String, String)> {
    list.trim()
        .trim_start_matches('{')
        .trim_end_matches('}')
        .split(',')
        .filter_map(|item| {
            let parts: Vec<&str> = item.split_whitespace().collect();
            match parts.as_slice() {
                [name] => Some((name.to_string(), name.to_string())),
                [from, "as", to] => Some((from.to_string(), to.to_string())),
                _ => None,
            }
        })
        .collect()
}
