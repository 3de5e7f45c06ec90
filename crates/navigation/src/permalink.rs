use site_kit_core::config::SiteConfig;

/// Resolves site-relative paths against the configured base path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Permalinks {
    base_path: String,
    blog_path: String,
    trailing_slash: bool,
}

impl Permalinks {
    pub fn new(base_path: &str, blog_path: &str, trailing_slash: bool) -> Self {
        Self {
            base_path: base_path.trim_matches('/').to_string(),
            blog_path: blog_path.trim_matches('/').to_string(),
            trailing_slash,
        }
    }

    pub fn from_site(site: &SiteConfig) -> Self {
        Self::new(&site.base_path, &site.blog_path, site.trailing_slash)
    }

    /// Permalink for a page path, keeping any `#fragment`.
    ///
    /// Absolute URLs are returned untouched.
    pub fn page(&self, path: &str) -> String {
        if is_external(path) {
            return path.to_string();
        }

        let (path, fragment) = match path.split_once('#') {
            Some((path, fragment)) => (path, Some(fragment)),
            None => (path, None),
        };

        let mut href = self.join(path);
        if self.trailing_slash && href != "/" && !last_segment_has_extension(&href) {
            href.push('/');
        }
        if let Some(fragment) = fragment {
            href.push('#');
            href.push_str(fragment);
        }
        href
    }

    /// Permalink for the blog index
    pub fn blog(&self) -> String {
        self.page(&self.blog_path)
    }

    /// Path for a static asset; never gets a trailing slash
    pub fn asset(&self, path: &str) -> String {
        if is_external(path) {
            return path.to_string();
        }
        self.join(path)
    }

    fn join(&self, path: &str) -> String {
        let segments: Vec<&str> = [self.base_path.as_str(), path.trim_matches('/')]
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect();

        format!("/{}", segments.join("/"))
    }
}

impl Default for Permalinks {
    fn default() -> Self {
        Self::new("/", "blog", false)
    }
}

fn is_external(path: &str) -> bool {
    path.contains("://") || path.starts_with("//") || path.starts_with("mailto:")
}

fn last_segment_has_extension(href: &str) -> bool {
    href.rsplit('/').next().is_some_and(|segment| segment.contains('.'))
}
