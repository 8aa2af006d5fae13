//! Ordered multi-fragment templates.
//!
//! A [`TemplateSet`] loads several fragments (typically header, body and
//! footer), parses each one on its own, and renders them one after another
//! against the same data, concatenating the output in load order.
//!
//! Fragments use [Tera](https://keats.github.io/tera/docs/) syntax. Fragments
//! whose name ends in `.html`, `.htm` or `.xml` are autoescaped.
//!
//! # Example
//!
//! ```
//! use postbox::TemplateSet;
//! use serde_json::json;
//!
//! let mut set = TemplateSet::new();
//! set.parse_sources([
//!     ("header.html", "<h1>{{ title }}</h1>"),
//!     ("footer.html", "<footer>Bye</footer>"),
//! ])
//! .unwrap();
//!
//! let html = set.render(&json!({ "title": "Hello" })).unwrap();
//! assert_eq!(html, "<h1>Hello</h1><footer>Bye</footer>");
//! ```

use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tera::{Context, Tera};

use crate::error::{ParseError, RenderError};

/// Parsed fragments plus the order they render in.
///
/// The order is stored explicitly alongside the name-keyed namespace, so
/// concatenation never depends on the namespace's iteration order.
#[derive(Debug, Default)]
pub struct TemplateSet {
    loaded: Option<Loaded>,
}

#[derive(Debug)]
struct Loaded {
    engine: Tera,
    order: Vec<String>,
}

impl TemplateSet {
    /// Create an empty, unloaded set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load fragment files and return the parsed set.
    pub fn from_paths<I, P>(paths: I) -> Result<Self, ParseError>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut set = Self::new();
        set.parse(paths)?;
        Ok(set)
    }

    /// Read and parse fragment files, in order.
    ///
    /// Each path is read and then parsed before the next one is touched, so
    /// the error names the first failing path. Each fragment is keyed by its
    /// path as given. On success any previously loaded fragments are
    /// replaced; on failure the set is left unchanged.
    pub fn parse<I, P>(&mut self, paths: I) -> Result<(), ParseError>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        self.load(paths.into_iter().map(|path| {
            let path = path.as_ref();
            let content = fs::read_to_string(path).map_err(|source| ParseError::ReadError {
                path: PathBuf::from(path),
                source,
            })?;
            Ok((path.display().to_string(), content))
        }))
    }

    /// Parse inline `(name, source)` fragments, in order.
    ///
    /// Same semantics as [`TemplateSet::parse`] without touching the
    /// filesystem.
    pub fn parse_sources<I, N, S>(&mut self, sources: I) -> Result<(), ParseError>
    where
        I: IntoIterator<Item = (N, S)>,
        N: Into<String>,
        S: Into<String>,
    {
        self.load(
            sources
                .into_iter()
                .map(|(name, source)| Ok((name.into(), source.into()))),
        )
    }

    /// Pull fragments one at a time into a fresh namespace.
    fn load<I>(&mut self, sources: I) -> Result<(), ParseError>
    where
        I: Iterator<Item = Result<(String, String), ParseError>>,
    {
        let mut engine = Tera::default();
        let mut order = Vec::new();

        for fragment in sources {
            let (name, source) = fragment?;
            engine
                .add_raw_template(&name, &source)
                .map_err(|source| ParseError::SyntaxError {
                    name: name.clone(),
                    source,
                })?;
            order.push(name);
        }

        if order.is_empty() {
            return Err(ParseError::NoTemplatesProvided);
        }

        tracing::debug!(fragments = ?order, "Loaded email templates");

        self.loaded = Some(Loaded { engine, order });
        Ok(())
    }

    /// Whether a parse has succeeded.
    pub fn is_loaded(&self) -> bool {
        self.loaded.is_some()
    }

    /// Fragment names in render order. Empty when unloaded.
    pub fn fragments(&self) -> &[String] {
        self.loaded
            .as_ref()
            .map(|l| l.order.as_slice())
            .unwrap_or(&[])
    }

    /// Render every fragment against `data` and concatenate the results.
    ///
    /// `data` must serialize to a map (a struct or a map type). Rendering does
    /// not modify the set, so it can be repeated with different data.
    pub fn render<T: Serialize + ?Sized>(&self, data: &T) -> Result<String, RenderError> {
        let loaded = self.loaded.as_ref().ok_or(RenderError::TemplatesNotLoaded)?;
        let context = Context::from_serialize(data).map_err(RenderError::InvalidContext)?;

        let mut out = String::new();
        for name in &loaded.order {
            out.push_str(&loaded.execute(name, &context)?);
        }

        Ok(out)
    }

    /// Render a single loaded fragment by name.
    pub fn render_fragment<T: Serialize + ?Sized>(
        &self,
        name: &str,
        data: &T,
    ) -> Result<String, RenderError> {
        let loaded = self.loaded.as_ref().ok_or(RenderError::TemplatesNotLoaded)?;
        let context = Context::from_serialize(data).map_err(RenderError::InvalidContext)?;
        loaded.execute(name, &context)
    }
}

impl Loaded {
    fn execute(&self, name: &str, context: &Context) -> Result<String, RenderError> {
        if !self.engine.get_template_names().any(|n| n == name) {
            return Err(RenderError::FragmentMissing {
                name: name.to_string(),
            });
        }

        self.engine
            .render(name, context)
            .map_err(|source| RenderError::ExecutionError {
                name: name.to_string(),
                source,
            })
    }
}
