//! Shell page rendering.

use crate::assets::AssetManifest;
use crate::config::ShellPageConfig;
use crate::routing::RouteTable;

/// Id of the `<script type="application/json">` carrying the route table.
pub const ROUTES_ELEMENT_ID: &str = "spa-routes";

/// Everything the shell needs to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellPage {
    pub title: String,
    pub mount_id: String,
    pub script_url: String,
    pub stylesheet_url: String,
    pub routes_json: String,
}

impl ShellPage {
    pub fn from_config(
        config: &ShellPageConfig,
        routes: &RouteTable,
        manifest: Option<&AssetManifest>,
    ) -> Self {
        let versioned = |url: &str| match manifest {
            Some(m) => m.versioned(url).to_string(),
            None => url.to_string(),
        };

        Self {
            title: config.title.clone(),
            mount_id: config.mount_id.clone(),
            script_url: versioned(&config.script_url),
            stylesheet_url: versioned(&config.stylesheet_url),
            routes_json: routes.to_json(),
        }
    }

    pub fn render(&self) -> String {
        format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{title}</title>
  <link rel="stylesheet" href="{stylesheet}">
</head>
<body>
  <div id="{mount}"></div>
  <script type="application/json" id="{routes_id}">{routes}</script>
  <script src="{script}"></script>
</body>
</html>
"#,
            title = escape_html(&self.title),
            stylesheet = escape_html(&self.stylesheet_url),
            mount = escape_html(&self.mount_id),
            routes_id = ROUTES_ELEMENT_ID,
            routes = escape_script_json(&self.routes_json),
            script = escape_html(&self.script_url),
        )
    }
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// JSON inside `<script>` must never contain `</`.
fn escape_script_json(json: &str) -> String {
    json.replace("</", "<\\/")
}
