//! `bundle` command: combine fragments given on the command line.

use anyhow::{Context, Result, bail};
use bundlebox::config::BoxConfig;
use bundlebox::{Asset, AssetBox, log};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use super::BundleArgs;

/// Assemble the bundle, write it out and print its HTML tag.
pub fn run_bundle(args: &BundleArgs, config: &BoxConfig) -> Result<()> {
    let assets = AssetBox::from_config(config);
    let asset = assemble(&assets, args)?;

    match &args.output {
        Some(path) => write_combined(&asset, path)?,
        None => {
            let path = asset.materialize()?;
            log!("build"; "{}", path.display());
        }
    }

    println!("{}", asset.tag(&config.serve.prefix));
    Ok(())
}

/// Asset holding `--inline`, `--file` and `--url` fragments, in that order.
fn assemble<'a>(assets: &'a AssetBox, args: &BundleArgs) -> Result<Asset<'a>> {
    let mut asset = if args.css {
        assets.new_css()
    } else {
        assets.new_js()
    };
    asset.add_string(&args.inline)?;
    asset.add_file(&args.file)?;
    asset.add_url(&args.url)?;

    if asset.bundle().is_empty() {
        bail!("nothing to bundle: pass --inline, --file or --url");
    }
    Ok(asset)
}

fn write_combined(asset: &Asset<'_>, path: &Path) -> Result<()> {
    let file = File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    let written = asset
        .combine(&mut writer)
        .map_err(anyhow::Error::from)
        .and_then(|()| writer.flush().map_err(Into::into));
    if let Err(e) = written {
        let _ = fs::remove_file(path);
        return Err(e);
    }
    log!("build"; "{}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn base_args(css: bool) -> BundleArgs {
        BundleArgs {
            css,
            js: !css,
            inline: Vec::new(),
            file: Vec::new(),
            url: Vec::new(),
            output: None,
        }
    }

    #[test]
    fn test_bundle_to_output_file() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("b.css"), ".b { display: none; }").unwrap();

        let mut config = BoxConfig::default();
        config.root = dir.path().to_path_buf();
        let out = dir.path().join("site.css");
        let args = BundleArgs {
            inline: vec![".a{color:#f00;}".into()],
            file: vec!["b.css".into()],
            output: Some(out.clone()),
            ..base_args(true)
        };

        run_bundle(&args, &config).unwrap();
        assert_eq!(fs::read_to_string(out).unwrap(), ".a{color:red}.b{display:none}");
    }

    #[test]
    fn test_bundle_materializes_into_dst() {
        let dir = TempDir::new().unwrap();
        let mut config = BoxConfig::default();
        config.root = dir.path().to_path_buf();
        let args = BundleArgs {
            inline: vec!["alert('hi')".into()],
            ..base_args(false)
        };

        run_bundle(&args, &config).unwrap();
        let built = fs::read_dir(config.dst_dir()).unwrap().count();
        assert_eq!(built, 1);
    }

    #[test]
    fn test_bundle_rejects_nothing() {
        let dir = TempDir::new().unwrap();
        let mut config = BoxConfig::default();
        config.root = dir.path().to_path_buf();
        let args = BundleArgs {
            inline: vec!["   ".into()],
            ..base_args(true)
        };
        assert!(run_bundle(&args, &config).is_err());
    }
}
