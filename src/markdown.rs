//! Markdown rendering with wiki link resolution.
//!
//! This module provides markdown rendering using comrak with GFM extensions
//! (tables, strikethrough, autolinks, task lists) and a link resolver chain
//! that rewrites wiki link targets into href-safe URLs.

mod encode;
mod links;
mod registry;
mod renderer;

pub use encode::{ESCAPE_TABLE, percent_encode};
pub use links::{
    LinkKind, LinkResolver, LinkStatus, ResolvedLink, ResolverContext, TAG_PREFIX, USER_PREFIX,
    WikiLinkResolver, rewrite_wiki_link_url,
};
pub use registry::{CreateResolver, ResolverFactory, ResolverRegistry};
pub use renderer::MarkdownRenderer;
