//! Page rendering.
//!
//! `TemplateRenderer` is the seam between dispatch and markup: it takes a
//! layout id plus a JSON context and returns HTML. `TeraRenderer` carries the
//! built-in index and jasmine layouts and, optionally, a directory of
//! user templates that override built-ins by name.

use anyhow::{Context, Result, anyhow, bail};
use std::path::Path;
use tera::Tera;

/// Prefix prepended to source/spec paths when none is configured.
pub const DEFAULT_STATIC_URL: &str = "/static/";

const BUILTIN_TEMPLATES: &[(&str, &str)] = &[
    (
        "specrunner/index.html",
        include_str!("../templates/specrunner/index.html"),
    ),
    (
        "specrunner/jasmine.html",
        include_str!("../templates/specrunner/jasmine.html"),
    ),
];

/// Renders a named layout with a context object.
pub trait TemplateRenderer: Send + Sync {
    fn render(&self, template: &str, context: &serde_json::Value) -> Result<String>;
}

pub struct TeraRenderer {
    tera: Tera,
    static_url: String,
}

impl TeraRenderer {
    /// Renderer over the built-in layouts only.
    pub fn builtin(static_url: &str) -> Result<Self> {
        let mut tera = Tera::default();
        tera.add_raw_templates(BUILTIN_TEMPLATES.iter().copied())
            .context("compiling builtin templates")?;
        Ok(Self::finish(tera, static_url))
    }

    /// Renderer over every file under `dir`, falling back to the built-ins.
    ///
    /// Template ids are paths relative to `dir`, so `dir/custom/page.html` is
    /// addressed as `custom/page.html`. Overrides may `{% extends %}` a
    /// built-in layout; inheritance is resolved only after both sets are
    /// merged.
    pub fn with_template_dir(dir: &Path, static_url: &str) -> Result<Self> {
        if !dir.is_dir() {
            bail!("template directory {} does not exist", dir.display());
        }
        let glob = format!("{}/**/*", dir.display());
        let mut tera = Tera::parse(&glob)
            .with_context(|| format!("parsing templates in {}", dir.display()))?;

        let builtin = Self::builtin(static_url)?;
        tera.extend(&builtin.tera)
            .context("merging builtin templates")?;
        tera.build_inheritance_chains()
            .with_context(|| format!("resolving template inheritance in {}", dir.display()))?;
        tracing::debug!(
            dir = %dir.display(),
            templates = tera.get_template_names().count(),
            "loaded template overrides"
        );
        Ok(Self::finish(tera, static_url))
    }

    fn finish(mut tera: Tera, static_url: &str) -> Self {
        tera.set_escape_fn(escape_html);
        Self {
            tera,
            static_url: static_url.to_string(),
        }
    }

    /// Whether a layout with this id is loaded.
    pub(crate) fn has_template(&self, template: &str) -> bool {
        self.tera.get_template_names().any(|name| name == template)
    }
}

impl TemplateRenderer for TeraRenderer {
    fn render(&self, template: &str, context: &serde_json::Value) -> Result<String> {
        let mut ctx = tera::Context::from_value(context.clone())
            .map_err(|err| anyhow!("render context for {template} must be an object: {err}"))?;
        ctx.insert("static_url", &self.static_url);
        self.tera
            .render(template, &ctx)
            .with_context(|| format!("rendering {template}"))
    }
}

/// HTML escaping that leaves `/` alone so asset paths stay readable.
fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}
