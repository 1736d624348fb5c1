//! Markdown renderer that rewrites wiki links into href-safe URLs.

pub mod components;
mod config;
mod markdown;

pub use components::layout::page;
pub use config::Config;
pub use markdown::{
    CreateResolver, ESCAPE_TABLE, LinkKind, LinkResolver, LinkStatus, MarkdownRenderer,
    ResolvedLink, ResolverContext, ResolverFactory, ResolverRegistry, TAG_PREFIX, USER_PREFIX,
    WikiLinkResolver, percent_encode, rewrite_wiki_link_url,
};
