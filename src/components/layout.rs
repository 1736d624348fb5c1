//! Page layout wrapper component

use maud::{DOCTYPE, Markup, PreEscaped, html};

/// MathJax bundle loaded by standalone pages for `$...$` math.
const MATHJAX_SRC: &str = "https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-chtml.js";

/// MathJax settings, set before the bundle loads.
///
/// Adds `$...$` to the inline delimiters so math typed in raw HTML blocks
/// is typeset alongside the `\(...\)` spans the renderer emits.
const MATHJAX_CONFIG: &str = r#"window.MathJax = { tex: { inlineMath: [['$', '$'], ['\\(', '\\)']] } };"#;

/// Wraps rendered markdown with standard HTML structure
///
/// Provides DOCTYPE, html, head, and an article container around the
/// rendered fragment. The fragment is inserted verbatim, so callers must
/// pass HTML produced by the markdown renderer.
///
/// # Arguments
///
/// * `title`: Page title text
/// * `stylesheets`: CSS file paths to include
/// * `body_html`: Rendered markdown fragment
///
/// # Returns
///
/// Complete HTML document with wrapped content
pub fn page(title: &str, stylesheets: &[&str], body_html: &str) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                @for stylesheet in stylesheets {
                    link rel="stylesheet" href=(stylesheet);
                }
                script { (PreEscaped(MATHJAX_CONFIG)) }
                script id="MathJax-script" defer src=(MATHJAX_SRC) {}
            }
            body {
                article class="markdown-body" {
                    (PreEscaped(body_html))
                }
            }
        }
    }
}
