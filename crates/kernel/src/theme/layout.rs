//! Page layouts.
//!
//! A [`Layout`] key selects the page chrome a document is wrapped in. Each
//! layout is one Tera template extending a shared `base.html` shell; adding a
//! layout means one enum case and one template, nothing in the block code.

use std::fmt;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use tera::Tera;
use tracing::debug;

/// Page chrome variant. Unknown or absent keys resolve to [`Layout::Default`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Layout {
    /// Single centered column.
    #[default]
    Default,
    /// Full-bleed, reduced vertical padding.
    Landing,
    /// Wide centered column.
    FullWidth,
    /// Primary content plus a fixed secondary panel.
    Sidebar,
}

impl Layout {
    pub const ALL: [Layout; 4] = [
        Layout::Default,
        Layout::Landing,
        Layout::FullWidth,
        Layout::Sidebar,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Layout::Default => "default",
            Layout::Landing => "landing",
            Layout::FullWidth => "fullwidth",
            Layout::Sidebar => "sidebar",
        }
    }

    /// Resolve a stored layout key.
    pub fn from_key(key: &str) -> Self {
        Layout::ALL
            .into_iter()
            .find(|l| l.as_str() == key.trim())
            .unwrap_or_default()
    }

    /// Template that wraps a document in this layout.
    pub fn template_name(self) -> &'static str {
        match self {
            Layout::Default => "layout--default.html",
            Layout::Landing => "layout--landing.html",
            Layout::FullWidth => "layout--fullwidth.html",
            Layout::Sidebar => "layout--sidebar.html",
        }
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Layout {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Layout {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Value::deserialize(deserializer)? {
            Value::String(key) => Layout::from_key(&key),
            _ => Layout::Default,
        })
    }
}

/// A static navigation link in the sidebar panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavLink {
    pub label: String,
    pub href: String,
}

impl NavLink {
    pub fn new(label: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            href: href.into(),
        }
    }
}

/// Site-wide chrome settings. Not document data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChromeSettings {
    pub site_name: String,
    pub sidebar_links: Vec<NavLink>,
    pub call_to_action: NavLink,
}

impl Default for ChromeSettings {
    fn default() -> Self {
        Self {
            site_name: "Folio".to_string(),
            sidebar_links: vec![
                NavLink::new("Home", "/"),
                NavLink::new("Services", "/page/services"),
                NavLink::new("Blog", "/blog"),
                NavLink::new("Contact", "/page/contact"),
            ],
            call_to_action: NavLink::new("Get in touch", "/page/contact"),
        }
    }
}

/// Everything a layout template needs to wrap a document body.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PageFrame {
    pub title: String,
    pub description: Option<String>,
    pub keywords: Option<String>,
    /// Already-rendered body HTML.
    pub body: String,
    /// Extra class on `<body>` (e.g. `editing`).
    pub body_class: Option<String>,
}

const BASE_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{% if page.title %}{{ page.title }} | {% endif %}{{ chrome.site_name }}</title>
{% if page.description %}<meta name="description" content="{{ page.description }}">
{% endif %}{% if page.keywords %}<meta name="keywords" content="{{ page.keywords }}">
{% endif %}</head>
<body class="layout-{{ layout }}{% if page.body_class %} {{ page.body_class }}{% endif %}">
{% block main %}{% endblock main %}
</body>
</html>
"#;

const DEFAULT_TEMPLATE: &str = r#"{% extends "base.html" %}
{% block main %}<main class="container mx-auto max-w-3xl px-4 py-12">{{ page.body | safe }}</main>{% endblock main %}
"#;

const LANDING_TEMPLATE: &str = r#"{% extends "base.html" %}
{% block main %}<main class="w-full py-4">{{ page.body | safe }}</main>{% endblock main %}
"#;

const FULLWIDTH_TEMPLATE: &str = r#"{% extends "base.html" %}
{% block main %}<main class="container mx-auto max-w-7xl px-4 py-12">{{ page.body | safe }}</main>{% endblock main %}
"#;

const SIDEBAR_TEMPLATE: &str = r#"{% extends "base.html" %}
{% block main %}<div class="container mx-auto max-w-6xl px-4 py-12 grid grid-cols-3 gap-8">
<main class="col-span-2">{{ page.body | safe }}</main>
<aside class="sidebar">
<nav><ul>{% for link in chrome.sidebar_links %}<li><a href="{{ link.href }}">{{ link.label }}</a></li>{% endfor %}</ul></nav>
<a class="cta" href="{{ chrome.call_to_action.href }}">{{ chrome.call_to_action.label }}</a>
</aside>
</div>{% endblock main %}
"#;

/// Tera-backed layout selector.
pub struct LayoutEngine {
    tera: Tera,
    chrome: ChromeSettings,
}

impl LayoutEngine {
    /// Create an engine with the built-in layout templates.
    pub fn new(chrome: ChromeSettings) -> Result<Self> {
        let tera = Self::builtin_templates()?;
        Ok(Self { tera, chrome })
    }

    /// Create an engine whose templates in `template_dir` override the
    /// built-in ones of the same name.
    pub fn with_template_dir(template_dir: &Path, chrome: ChromeSettings) -> Result<Self> {
        let pattern = template_dir.join("**/*.html");
        let pattern_str = pattern
            .to_str()
            .context("invalid template directory path")?;

        let mut tera = Tera::new(pattern_str).context("failed to load layout templates")?;
        let builtins = Self::builtin_templates()?;
        tera.extend(&builtins)
            .context("failed to merge built-in layout templates")?;
        tera.build_inheritance_chains()
            .context("failed to resolve layout template inheritance")?;

        let template_names: Vec<_> = tera.get_template_names().collect();
        debug!(count = template_names.len(), "loaded layout templates");

        Ok(Self { tera, chrome })
    }

    fn builtin_templates() -> Result<Tera> {
        let mut tera = Tera::default();
        tera.add_raw_templates(vec![
            ("base.html", BASE_TEMPLATE),
            (Layout::Default.template_name(), DEFAULT_TEMPLATE),
            (Layout::Landing.template_name(), LANDING_TEMPLATE),
            (Layout::FullWidth.template_name(), FULLWIDTH_TEMPLATE),
            (Layout::Sidebar.template_name(), SIDEBAR_TEMPLATE),
        ])
        .context("failed to compile built-in layout templates")?;
        Ok(tera)
    }

    pub fn chrome(&self) -> &ChromeSettings {
        &self.chrome
    }

    /// Resolve the template for `layout`, falling back to the default layout.
    pub fn resolve_template(&self, layout: Layout) -> &'static str {
        let name = layout.template_name();
        if self.tera.get_template(name).is_ok() {
            name
        } else {
            Layout::Default.template_name()
        }
    }

    /// Wrap a rendered body in the chrome of `layout`.
    pub fn wrap(&self, layout: Layout, frame: &PageFrame) -> Result<String> {
        let template = self.resolve_template(layout);
        let mut context = tera::Context::new();
        context.insert("layout", layout.as_str());
        context.insert("page", frame);
        context.insert("chrome", &self.chrome);

        self.tera
            .render(template, &context)
            .with_context(|| format!("failed to render layout '{layout}'"))
    }
}
