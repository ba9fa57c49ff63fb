//! Index page listing the bundles registered from `[[bundle]]` tables.

use anyhow::{Context, Result};
use bundlebox::config::BoxConfig;
use bundlebox::utils::html::escape;
use bundlebox::{AssetBox, log};

/// Rendered once at startup.
#[derive(Debug, Default)]
pub struct Index {
    /// Page body.
    pub html: String,
    /// `Link` header preloading every bundle.
    pub link: String,
}

impl Index {
    /// Register every configured bundle into `assets` and render the page.
    pub fn build(assets: &AssetBox, config: &BoxConfig) -> Result<Self> {
        let prefix = &config.serve.prefix;
        let mut tags = Vec::new();
        let mut rows = Vec::new();
        let mut links = Vec::new();

        for bundle in &config.bundles {
            if bundle.is_empty() {
                log!("serve"; "bundle `{}` has no fragment, skipped", bundle.name);
                continue;
            }
            let asset = assets
                .register(bundle)
                .with_context(|| format!("bundle `{}`", bundle.name))?;
            let path = asset.path(prefix);
            log!("serve"; "{} -> {}", bundle.name, path);

            tags.push(asset.tag(prefix));
            links.push(asset.link(prefix));
            rows.push(format!(
                "<li>{} <code>{}</code></li>",
                escape(&bundle.name),
                escape(&path)
            ));
        }

        let html = format!(
            r#"<!doctype html>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>bundlebox</title>
{}
<h1>bundlebox</h1>
<ul>
{}
</ul>
"#,
            tags.join("\n"),
            rows.join("\n")
        );
        Ok(Self {
            html,
            link: links.join(", "),
        })
    }
}
