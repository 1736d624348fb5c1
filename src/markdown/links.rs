//! Link resolution for wiki link references.

use super::encode::percent_encode;
use super::registry::ResolverFactory;

/// URL prefix of tag listing pages.
pub const TAG_PREFIX: &str = "/as-tag?tag=";

/// URL prefix of user pages.
pub const USER_PREFIX: &str = "/as-user?user=";

/// Outcome of resolving a single link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LinkStatus {
    /// No resolver has claimed the link yet.
    #[default]
    Unknown,
    /// A resolver produced a usable URL.
    Valid,
}

/// Markdown node type a link URL was taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    /// Inline, reference or autolink.
    Link,
    Image,
    /// Double bracket `[[...]]` link.
    WikiLink,
}

/// Link URL together with its resolution status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLink {
    url: String,
    status: LinkStatus,
}

impl ResolvedLink {
    /// Creates an unresolved link for `url`.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            status: LinkStatus::Unknown,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn status(&self) -> LinkStatus {
        self.status
    }

    /// Returns this link with its URL replaced.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Returns this link with its status replaced.
    pub fn with_status(mut self, status: LinkStatus) -> Self {
        self.status = status;
        self
    }

    /// Consumes the link, returning its URL.
    pub fn into_url(self) -> String {
        self.url
    }
}

/// Settings visible to resolvers created for a render pass.
///
/// Factories receive this when instantiating their resolver. It carries no
/// settings yet and the wiki link resolver ignores it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[non_exhaustive]
pub struct ResolverContext {}

/// Rewrites link URLs before they are written to HTML.
///
/// Resolvers run as a chain; the first one to return a status other than
/// [`LinkStatus::Unknown`] decides the final URL.
pub trait LinkResolver: Send + Sync {
    /// Resolves `link`, which was taken from a node of type `kind`.
    fn resolve_link(&self, kind: LinkKind, link: ResolvedLink) -> ResolvedLink;
}

/// Encodes wiki link targets and recognizes tag and user page links.
///
/// Transforms wiki link URLs (`[[c++ & co]]`) into href-safe paths
/// (`c%2B%2B%20%26%20co`). For tag and user page URLs only the part after
/// the prefix is encoded, so the query structure survives. Other link
/// types pass through untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct WikiLinkResolver;

impl WikiLinkResolver {
    /// Registry name of this resolver.
    pub const NAME: &'static str = "wiki-links";

    /// Creates resolver for a render pass.
    pub fn new(_context: &ResolverContext) -> Self {
        Self
    }

    /// Returns the registration record for this resolver.
    ///
    /// Has no ordering constraints against other resolvers.
    pub fn factory() -> ResolverFactory {
        ResolverFactory::new(Self::NAME, |context| Box::new(Self::new(context)))
    }
}

impl LinkResolver for WikiLinkResolver {
    fn resolve_link(&self, kind: LinkKind, link: ResolvedLink) -> ResolvedLink {
        if kind != LinkKind::WikiLink {
            return link;
        }

        let url = rewrite_wiki_link_url(link.url(), true);
        link.with_status(LinkStatus::Valid).with_url(url)
    }
}

/// Rewrites a link URL, encoding it when it came from a wiki link.
///
/// Non wiki links are returned unchanged. Wiki links starting with
/// [`TAG_PREFIX`] or [`USER_PREFIX`] keep the prefix and have the remainder
/// encoded; any other wiki link is encoded whole.
///
/// # Arguments
///
/// * `url`: Link target as resolved by the parser
/// * `is_wiki_link`: Whether the link came from `[[...]]` syntax
///
/// # Examples
///
/// ```
/// use wikirender::rewrite_wiki_link_url;
///
/// assert_eq!(
///     rewrite_wiki_link_url("/as-tag?tag=a b", true),
///     "/as-tag?tag=a%20b"
/// );
/// assert_eq!(rewrite_wiki_link_url("a b", false), "a b");
/// ```
pub fn rewrite_wiki_link_url(url: &str, is_wiki_link: bool) -> String {
    if !is_wiki_link {
        return url.to_string();
    }

    for prefix in [TAG_PREFIX, USER_PREFIX] {
        if let Some(rest) = url.strip_prefix(prefix) {
            return format!("{}{}", prefix, percent_encode(rest));
        }
    }

    percent_encode(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rewrite_tag_link() {
        // Arrange & Act
        let result = rewrite_wiki_link_url("/as-tag?tag=a b", true);

        // Assert
        assert_eq!(result, "/as-tag?tag=a%20b");
    }

    #[test]
    fn test_rewrite_user_link() {
        // Arrange & Act
        let result = rewrite_wiki_link_url("/as-user?user=jo@x", true);

        // Assert
        assert_eq!(result, "/as-user?user=jo%40x");
    }

    #[test]
    fn test_rewrite_plain_wiki_link_encodes_whole_url() {
        // Arrange & Act
        let result = rewrite_wiki_link_url("a/b c", true);

        // Assert
        assert_eq!(result, "a%2Fb%20c");
    }

    #[test]
    fn test_rewrite_non_wiki_link_unchanged() {
        // Arrange
        let urls = ["http://example.com/a b", "/as-tag?tag=a b", "", "100%"];

        for url in urls {
            // Act
            let result = rewrite_wiki_link_url(url, false);

            // Assert
            assert_eq!(result, url, "Non wiki links must pass through");
        }
    }

    #[test]
    fn test_rewrite_strips_prefix_once() {
        // Arrange
        let url = "/as-tag?tag=/as-tag?tag=x";

        // Act
        let result = rewrite_wiki_link_url(url, true);

        // Assert
        assert_eq!(
            result, "/as-tag?tag=%2Fas-tag%3Ftag%3Dx",
            "Repeated prefix is part of the tag and gets encoded"
        );
    }

    #[test]
    fn test_rewrite_prefix_only_at_start() {
        // Arrange
        let url = "see /as-user?user=bob";

        // Act
        let result = rewrite_wiki_link_url(url, true);

        // Assert
        assert_eq!(result, "see%20%2Fas-user%3Fuser%3Dbob");
    }

    #[test]
    fn test_rewrite_bare_prefix() {
        assert_eq!(rewrite_wiki_link_url(TAG_PREFIX, true), TAG_PREFIX);
        assert_eq!(rewrite_wiki_link_url(USER_PREFIX, true), USER_PREFIX);
    }

    #[test]
    fn test_rewrite_empty_wiki_link() {
        assert_eq!(rewrite_wiki_link_url("", true), "");
    }

    #[test]
    fn test_resolver_marks_wiki_link_valid() {
        // Arrange
        let resolver = WikiLinkResolver::new(&ResolverContext::default());
        let link = ResolvedLink::new("/as-tag?tag=c++ & co");

        // Act
        let resolved = resolver.resolve_link(LinkKind::WikiLink, link);

        // Assert
        assert_eq!(resolved.url(), "/as-tag?tag=c%2B%2B%20%26%20co");
        assert_eq!(resolved.status(), LinkStatus::Valid);
    }

    #[test]
    fn test_resolver_passes_other_kinds_through() {
        // Arrange
        let resolver = WikiLinkResolver::default();

        for kind in [LinkKind::Link, LinkKind::Image] {
            let link = ResolvedLink::new("http://example.com/a b");

            // Act
            let resolved = resolver.resolve_link(kind, link.clone());

            // Assert
            assert_eq!(resolved, link, "{:?} links must be left alone", kind);
        }
    }

    #[test]
    fn test_resolver_keeps_caller_status_on_pass_through() {
        // Arrange
        let resolver = WikiLinkResolver::default();
        let link = ResolvedLink::new("/page").with_status(LinkStatus::Valid);

        // Act
        let resolved = resolver.resolve_link(LinkKind::Link, link);

        // Assert
        assert_eq!(resolved.status(), LinkStatus::Valid);
    }

    #[test]
    fn test_factory_has_no_constraints() {
        // Arrange & Act
        let factory = WikiLinkResolver::factory();

        // Assert
        assert_eq!(factory.name(), WikiLinkResolver::NAME);
        assert!(factory.after().is_empty());
        assert!(factory.before().is_empty());
    }

    #[test]
    fn test_factory_creates_working_resolver() {
        // Arrange
        let factory = WikiLinkResolver::factory();

        // Act
        let resolver = factory.create(&ResolverContext::default());
        let resolved = resolver.resolve_link(LinkKind::WikiLink, ResolvedLink::new("a b"));

        // Assert
        assert_eq!(resolved.url(), "a%20b");
    }

    #[test]
    fn test_resolver_shared_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<WikiLinkResolver>();
        assert_send_sync::<Box<dyn LinkResolver>>();

        // Arrange
        let resolver = WikiLinkResolver::default();
        let urls = ["/as-tag?tag=a b", "/as-user?user=jo@x", "a/b c"];

        // Act
        let results: Vec<String> = std::thread::scope(|scope| {
            let handles: Vec<_> = urls
                .iter()
                .map(|url| {
                    let resolver = &resolver;
                    scope.spawn(move || {
                        resolver
                            .resolve_link(LinkKind::WikiLink, ResolvedLink::new(*url))
                            .into_url()
                    })
                })
                .collect();
            handles
                .into_iter()
                .map(|handle| handle.join().expect("Resolver thread should not panic"))
                .collect()
        });

        // Assert
        assert_eq!(
            results,
            ["/as-tag?tag=a%20b", "/as-user?user=jo%40x", "a%2Fb%20c"]
        );
    }

    #[test]
    fn test_resolved_link_defaults_to_unknown() {
        // Arrange & Act
        let link = ResolvedLink::new("x");

        // Assert
        assert_eq!(link.status(), LinkStatus::Unknown);
        assert_eq!(link.into_url(), "x");
    }
}
