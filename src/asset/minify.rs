//! Asset minification for JS and CSS fragments.
//!
//! Uses oxc for JavaScript and lightningcss for CSS.

use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};
use oxc::allocator::Allocator;
use oxc::codegen::{Codegen, CodegenOptions, CommentOptions};
use oxc::mangler::MangleOptions;
use oxc::minifier::{CompressOptions, Minifier, MinifierOptions};
use oxc::parser::Parser;
use oxc::span::SourceType;
use thiserror::Error;

use super::MediaKind;

/// Minifier failure for a single source text.
#[derive(Debug, Clone, Error)]
pub enum MinifyError {
    #[error("source is not valid UTF-8")]
    Encoding,

    #[error("{media} parse error: {message}")]
    Parse { media: MediaKind, message: String },

    #[error("{media} print error: {message}")]
    Print { media: MediaKind, message: String },
}

/// Capability: turn raw text of a media kind into minified text.
pub trait Minify: Send + Sync {
    fn minify(&self, media: MediaKind, source: &str) -> Result<String, MinifyError>;

    /// Minify raw bytes, rejecting non UTF-8 input.
    fn minify_bytes(&self, media: MediaKind, source: &[u8]) -> Result<String, MinifyError> {
        let text = std::str::from_utf8(source).map_err(|_| MinifyError::Encoding)?;
        self.minify(media, text)
    }
}

/// Default minifier backed by oxc and lightningcss.
#[derive(Debug, Clone, Copy, Default)]
pub struct AssetMinifier;

impl Minify for AssetMinifier {
    fn minify(&self, media: MediaKind, source: &str) -> Result<String, MinifyError> {
        match media {
            MediaKind::Script => minify_js(source),
            MediaKind::Stylesheet => minify_css(source),
        }
    }
}

/// Minify JavaScript source code.
///
/// Parsed as a classic script: combined bundles are loaded with a plain
/// `<script src>`, so top-level declarations are globals that later
/// fragments and the page may use. They are neither renamed nor dropped.
pub fn minify_js(source: &str) -> Result<String, MinifyError> {
    let allocator = Allocator::default();
    let source_type = SourceType::script();
    let ret = Parser::new(&allocator, source, source_type).parse();
    if let Some(err) = ret.errors.first() {
        return Err(MinifyError::Parse {
            media: MediaKind::Script,
            message: err.to_string(),
        });
    }
    let mut program = ret.program;
    let options = MinifierOptions {
        mangle: Some(MangleOptions {
            top_level: Some(false),
            ..MangleOptions::default()
        }),
        compress: Some(CompressOptions::default()),
    };
    let ret = Minifier::new(options).minify(&allocator, &mut program);
    let code = Codegen::new()
        .with_options(CodegenOptions {
            minify: true,
            comments: CommentOptions::disabled(),
            ..CodegenOptions::default()
        })
        .with_scoping(ret.scoping)
        .build(&program)
        .code;
    Ok(code)
}

/// Minify CSS source code.
pub fn minify_css(source: &str) -> Result<String, MinifyError> {
    let stylesheet =
        StyleSheet::parse(source, ParserOptions::default()).map_err(|e| MinifyError::Parse {
            media: MediaKind::Stylesheet,
            message: e.to_string(),
        })?;
    let result = stylesheet
        .to_css(PrinterOptions {
            minify: true,
            ..PrinterOptions::default()
        })
        .map_err(|e| MinifyError::Print {
            media: MediaKind::Stylesheet,
            message: e.to_string(),
        })?;
    Ok(result.code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_css_trailing_semicolon_is_dropped() {
        let a = AssetMinifier.minify(MediaKind::Stylesheet, "body{color:red}").unwrap();
        let b = AssetMinifier
            .minify(MediaKind::Stylesheet, "body { color: red; }")
            .unwrap();
        assert_eq!(a, "body{color:red}");
        assert_eq!(a, b);
    }

    #[test]
    fn test_css_multiple_rules() {
        let out = AssetMinifier
            .minify(MediaKind::Stylesheet, ".rv{color:#333;}\n.hide{display:none;}")
            .unwrap();
        assert_eq!(out, ".rv{color:#333}.hide{display:none}");
    }

    #[test]
    fn test_non_utf8_rejected() {
        assert!(matches!(
            AssetMinifier.minify_bytes(MediaKind::Stylesheet, &[0xff, 0xfe]),
            Err(MinifyError::Encoding)
        ));
    }

    #[test]
    fn test_js_is_shorter() {
        let source = "function greet(name) {\n  // say hi\n  alert(name);\n}\ngreet('hi');\n";
        let out = AssetMinifier.minify(MediaKind::Script, source).unwrap();
        assert!(out.len() < source.len());
        assert!(!out.contains("say hi"));
    }

    #[test]
    fn test_js_keeps_top_level_declarations() {
        assert_eq!(minify_js("var a = 1;").unwrap(), "var a=1;");
        assert_eq!(minify_js("alert('hi')").unwrap(), "alert(`hi`);");

        let out = minify_js("var jQueryLib = 1; function helper(x){return x+1}").unwrap();
        assert!(out.contains("jQueryLib=1"));
        assert!(out.contains("function helper("));
    }

    #[test]
    fn test_js_parse_error() {
        let err = AssetMinifier.minify(MediaKind::Script, "var = ;").unwrap_err();
        assert!(matches!(err, MinifyError::Parse { media: MediaKind::Script, .. }));
    }
}
