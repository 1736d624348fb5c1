//! Markdown rendering with GitHub Flavored Markdown and wiki link support.

use anyhow::{Context, Result};
use comrak::nodes::{AstNode, NodeHtmlBlock, NodeValue};
use comrak::{Arena, Options, format_html, parse_document};
use std::path::Path;
use syntect::html::{ClassStyle, ClassedHTMLGenerator};
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;

use super::links::{
    LinkKind, LinkResolver, LinkStatus, ResolvedLink, ResolverContext, WikiLinkResolver,
};
use super::registry::{ResolverFactory, ResolverRegistry};

/// Renders markdown to HTML, passing every link through registered resolvers.
///
/// Provides GFM extensions including tables, strikethrough, autolinks,
/// task lists, footnotes, and description lists, plus `[[label|target]]`
/// wiki links and `$...$` math. Link URLs are rewritten on the parsed
/// document before serialization, and fenced code blocks are highlighted
/// with syntect using CSS classes.
pub struct MarkdownRenderer<'a> {
    options: Options<'a>,
    syntax_set: SyntaxSet,
    resolvers: ResolverRegistry,
}

impl<'a> MarkdownRenderer<'a> {
    /// Creates renderer with no link resolvers registered.
    ///
    /// Configures all GFM extensions and rendering settings:
    /// - Tables, strikethrough, autolinks, task lists, footnotes
    /// - Wiki links with the label before the pipe
    /// - Dollar delimited math
    /// - Smart punctuation for quotes and dashes
    /// - Raw HTML passthrough (content is trusted)
    pub fn new() -> Self {
        let mut options = Options::default();

        // Extension options (GFM features)
        options.extension.strikethrough = true;
        options.extension.table = true;
        options.extension.autolink = true;
        options.extension.tasklist = true;
        options.extension.footnotes = true;
        options.extension.description_lists = true;

        // Wiki content
        options.extension.wikilinks_title_before_pipe = true;
        options.extension.math_dollars = true;

        options.parse.smart = true;
        options.render.unsafe_ = true;

        let syntax_set = SyntaxSet::load_defaults_newlines();

        Self {
            options,
            syntax_set,
            resolvers: ResolverRegistry::new(),
        }
    }

    /// Creates renderer that rewrites wiki link URLs.
    ///
    /// Wiki link targets are percent-encoded, with tag and user page
    /// prefixes preserved. Other links remain unchanged.
    pub fn with_wiki_links() -> Self {
        let mut renderer = Self::new();
        renderer.resolvers = ResolverRegistry::with_factory(WikiLinkResolver::factory());
        renderer
    }

    /// Registers an additional link resolver.
    ///
    /// # Errors
    ///
    /// Returns error if a resolver with the same name is already registered.
    pub fn register(&mut self, factory: ResolverFactory) -> Result<()> {
        self.resolvers.register(factory)
    }

    /// Returns the registered resolvers.
    pub fn resolvers(&self) -> &ResolverRegistry {
        &self.resolvers
    }

    /// Renders markdown content to HTML string.
    ///
    /// Parses markdown into AST, resolves link URLs, highlights code
    /// blocks, and serializes to HTML.
    ///
    /// # Errors
    ///
    /// Returns error if resolver ordering fails, highlighting fails, or the
    /// HTML output is not valid UTF8
    pub fn render(&self, content: &str) -> Result<String> {
        let context = ResolverContext::default();
        let chain = self
            .resolvers
            .create_chain(&context)
            .context("Failed to create link resolvers")?;

        let arena = Arena::new();
        let root = parse_document(&arena, content, &self.options);

        for node in root.descendants() {
            if !chain.is_empty() {
                Self::resolve_node_link(node, &chain);
            }
            Self::delimit_math_node(node);
            self.highlight_node(node)
                .context("Failed to highlight code block")?;
        }

        let mut html = Vec::with_capacity(content.len() * 2);
        format_html(root, &self.options, &mut html).context("Failed to format HTML")?;

        String::from_utf8(html).context("Rendered HTML is not valid UTF8")
    }

    /// Runs the resolver chain over a link, image or wiki link node.
    ///
    /// Resolvers run in order until one reports a status other than
    /// [`LinkStatus::Unknown`]. The resulting URL replaces the node's URL.
    fn resolve_node_link<'n>(node: &'n AstNode<'n>, chain: &[Box<dyn LinkResolver>]) {
        let mut ast = node.data.borrow_mut();
        let (kind, url) = match &mut ast.value {
            NodeValue::Link(link) => (LinkKind::Link, &mut link.url),
            NodeValue::Image(link) => (LinkKind::Image, &mut link.url),
            NodeValue::WikiLink(link) => (LinkKind::WikiLink, &mut link.url),
            _ => return,
        };

        let mut resolved = ResolvedLink::new(url.as_str());
        for resolver in chain {
            resolved = resolver.resolve_link(kind, resolved);
            if resolved.status() != LinkStatus::Unknown {
                break;
            }
        }

        if resolved.url() != url.as_str() {
            tracing::debug!(?kind, from = %url, to = %resolved.url(), "Rewrote link");
            *url = resolved.into_url();
        }
    }

    /// Replaces a parsed math span with TeX delimited text for MathJax.
    ///
    /// comrak strips the `$` delimiters from math nodes, so inline math is
    /// written back as `\(...\)` and display math as `\[...\]`.
    fn delimit_math_node<'n>(node: &'n AstNode<'n>) {
        let mut ast = node.data.borrow_mut();
        let NodeValue::Math(math) = &ast.value else {
            return;
        };

        let (style, open, close) = if math.display_math {
            ("display", "\\[", "\\]")
        } else {
            ("inline", "\\(", "\\)")
        };
        let html = format!(
            "<span class=\"math {}\">{}{}{}</span>",
            style,
            open,
            Self::html_escape(&math.literal),
            close
        );

        ast.value = NodeValue::HtmlInline(html);
    }

    /// Replaces a fenced code block with syntax highlighted HTML.
    ///
    /// Blocks without a language tag are left for comrak to render.
    fn highlight_node<'n>(&self, node: &'n AstNode<'n>) -> Result<()> {
        let mut ast = node.data.borrow_mut();
        let NodeValue::CodeBlock(block) = &ast.value else {
            return Ok(());
        };

        let language = block.info.split_whitespace().next().unwrap_or("");
        if language.is_empty() {
            return Ok(());
        }

        let highlighted = self.highlight_code(&block.literal, language)?;
        let literal = format!(
            "<pre><code class=\"language-{}\">{}</code></pre>\n",
            Self::html_escape(language),
            highlighted
        );

        ast.value = NodeValue::HtmlBlock(NodeHtmlBlock {
            block_type: 0,
            literal,
        });
        Ok(())
    }

    /// Highlights code with syntect using CSS classes.
    ///
    /// Uses ClassedHTMLGenerator to produce HTML with CSS class names
    /// instead of inline styles. The class prefix is "hljs-" so pages keep
    /// working with highlight.js stylesheets.
    ///
    /// # Arguments
    ///
    /// * `code`: Source code to highlight
    /// * `language`: Language identifier (rust, python, etc)
    ///
    /// # Returns
    ///
    /// HTML string with `<span class="hljs-*">` tags, or escaped plain text
    /// when the language is unknown
    ///
    /// # Errors
    ///
    /// Returns error if syntax highlighting fails
    fn highlight_code(&self, code: &str, language: &str) -> Result<String> {
        if code.is_empty() {
            return Ok(String::new());
        }

        let syntax = self
            .syntax_set
            .find_syntax_by_token(language)
            .or_else(|| self.syntax_set.find_syntax_by_extension(language));

        let Some(syntax) = syntax else {
            tracing::warn!(language, "Unknown code block language, rendering as plain text");
            return Ok(Self::html_escape(code));
        };

        let mut generator = ClassedHTMLGenerator::new_with_class_style(
            syntax,
            &self.syntax_set,
            ClassStyle::SpacedPrefixed { prefix: "hljs-" },
        );

        for line in LinesWithEndings::from(code) {
            generator
                .parse_html_for_line_which_includes_newline(line)
                .context("Failed to parse line for syntax highlighting")?;
        }

        Ok(generator.finalize())
    }

    /// Escapes HTML special characters.
    fn html_escape(text: &str) -> String {
        text.replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;")
            .replace('"', "&quot;")
            .replace('\'', "&#39;")
    }

    /// Renders markdown file at given path.
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be read or rendering fails
    pub fn render_file(&self, path: impl AsRef<Path>) -> Result<String> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read markdown file: {}", path.display()))?;
        self.render(&content)
    }
}

impl<'a> Default for MarkdownRenderer<'a> {
    fn default() -> Self {
        Self::new()
    }
}
