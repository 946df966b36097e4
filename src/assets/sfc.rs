//! Vue single-file components.
//!
//! A `.vue` file is split into its blocks. The `<script>` block becomes the
//! module, the `<template>` block is attached to the default export as a
//! `template` string, and `<style>` blocks go to the stylesheet.

use std::sync::OnceLock;

use regex::Regex;

fn script_block() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?s)<script(?:\s[^>]*)?>(.*?)</script\s*>").expect("script pattern is valid")
    })
}

fn style_block() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?s)<style(?:\s[^>]*)?>(.*?)</style\s*>").expect("style pattern is valid")
    })
}

fn template_open() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"<template(?:\s[^>]*)?>").expect("template pattern is valid"))
}

fn default_export() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?m)^([ \t]*)export\s+default\s+").expect("export pattern is valid")
    })
}

/// The blocks of one component file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SingleFileComponent {
    pub template: Option<String>,
    pub script: Option<String>,
    pub styles: Vec<String>,
}

impl SingleFileComponent {
    pub fn parse(source: &str) -> Self {
        let script = script_block()
            .captures(source)
            .map(|caps| caps[1].to_string());
        let styles = style_block()
            .captures_iter(source)
            .map(|caps| caps[1].trim().to_string())
            .filter(|css| !css.is_empty())
            .collect();

        // Script and style bodies may mention `</template>`; cut them out first.
        let rest = style_block().replace_all(source, "");
        let rest = script_block().replace_all(&rest, "");

        // Nested <template> tags (slots) are part of the outer one.
        let template = template_open().find(&rest).and_then(|open| {
            let close = rest.rfind("</template>")?;
            (close >= open.end()).then(|| rest[open.end()..close].trim().to_string())
        });

        Self {
            template,
            script,
            styles,
        }
    }

    /// ES module source exporting the component options.
    pub fn to_module(&self) -> String {
        let mut module = String::new();

        match &self.script {
            Some(script) if default_export().is_match(script) => {
                module.push_str(&default_export().replace(script, "${1}const __sfc__ = "));
            }
            Some(script) => {
                module.push_str(script);
                module.push_str("\nconst __sfc__ = {};");
            }
            None => module.push_str("const __sfc__ = {};"),
        }
        if !module.ends_with('\n') {
            module.push('\n');
        }

        if let Some(template) = &self.template {
            let literal =
                serde_json::to_string(template).unwrap_or_else(|_| "\"\"".to_string());
            module.push_str(&format!("__sfc__.template = {literal};\n"));
        }
        module.push_str("export default __sfc__;\n");
        module
    }
}
