//! Per-project version history reconstructed from the flat tag namespace.

use std::collections::HashMap;
use std::ops::Deref;

use semver::Version;
use tracing::debug;

use crate::cancel::CancellationToken;
use crate::domain::{parse_tag_name, Tag};
use crate::error::{MonotagError, Result};
use crate::git::Repository;

static EMPTY_CHAIN: TagChain = TagChain { tags: Vec::new() };

/// Tags of one project, newest version first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagChain {
    tags: Vec<Tag>,
}

impl TagChain {
    /// Order tags by descending version precedence.
    pub fn from_tags(mut tags: Vec<Tag>) -> Self {
        tags.sort_by(|a, b| b.version.cmp(&a.version));
        TagChain { tags }
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Newest tag, prereleases included.
    pub fn head(&self) -> Option<ChainEntry<'_>> {
        self.get(0)
    }

    pub fn get(&self, index: usize) -> Option<ChainEntry<'_>> {
        (index < self.tags.len()).then_some(ChainEntry { chain: self, index })
    }

    /// Entries from newest to oldest.
    pub fn entries(&self) -> impl Iterator<Item = ChainEntry<'_>> {
        (0..self.tags.len()).map(move |index| ChainEntry { chain: self, index })
    }

    /// The chain head, or the newest release when prereleases are excluded.
    pub fn latest(&self, include_prerelease: bool) -> Option<ChainEntry<'_>> {
        self.entries()
            .find(|entry| include_prerelease || !entry.is_prerelease())
    }

    /// Entries selected by a query, newest first.
    pub fn query(&self, query: &TagQuery) -> Vec<ChainEntry<'_>> {
        self.entries()
            .filter(|entry| query.accepts(entry))
            .take(query.depth.unwrap_or(usize::MAX))
            .collect()
    }

    /// Insert a tag newer than every tag in the chain.
    pub fn prepend(&mut self, tag: Tag) -> Result<()> {
        if let Some(head) = self.tags.first() {
            if tag.version <= head.version {
                return Err(MonotagError::invariant(format!(
                    "new tag {} is not newer than {}",
                    tag, head
                )));
            }
        }
        self.tags.insert(0, tag);
        Ok(())
    }
}

/// A tag together with its position in the chain.
///
/// `previous` is the next-older version, `next` the next-newer one.
#[derive(Debug, Clone, Copy)]
pub struct ChainEntry<'a> {
    chain: &'a TagChain,
    index: usize,
}

impl<'a> ChainEntry<'a> {
    pub fn tag(&self) -> &'a Tag {
        &self.chain.tags[self.index]
    }

    pub fn previous(&self) -> Option<ChainEntry<'a>> {
        self.chain.get(self.index + 1)
    }

    pub fn next(&self) -> Option<ChainEntry<'a>> {
        self.index
            .checked_sub(1)
            .and_then(|index| self.chain.get(index))
    }
}

impl Deref for ChainEntry<'_> {
    type Target = Tag;

    fn deref(&self) -> &Tag {
        self.tag()
    }
}

impl PartialEq for ChainEntry<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.tag() == other.tag()
    }
}

/// Filters for listing a project's tags
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagQuery {
    pub include_prerelease: bool,
    /// Maximum number of tags returned
    pub depth: Option<usize>,
    /// Inclusive lower bound
    pub min_version: Option<Version>,
    /// Inclusive upper bound
    pub max_version: Option<Version>,
}

impl TagQuery {
    fn accepts(&self, tag: &Tag) -> bool {
        (self.include_prerelease || !tag.is_prerelease())
            && self.min_version.as_ref().map_or(true, |min| tag.version >= *min)
            && self.max_version.as_ref().map_or(true, |max| tag.version <= *max)
    }
}

/// Version chains of every project that has at least one valid tag.
#[derive(Debug, Clone, Default)]
pub struct TagCatalog {
    chains: HashMap<String, TagChain>,
}

impl TagCatalog {
    /// Read every tag from the backend and group the valid ones by project.
    ///
    /// Tags whose name is not `{name}_{semver}` or that do not peel to a commit
    /// are skipped. Stops reading when `cancel` is set, keeping what was read.
    pub fn build<R: Repository + ?Sized>(repo: &R, cancel: &CancellationToken) -> Result<Self> {
        let mut tags = Vec::new();

        for name in repo.list_tags()? {
            if cancel.is_cancelled() {
                debug!("tag enumeration cancelled");
                break;
            }

            if parse_tag_name(&name).is_none() {
                debug!(tag = %name, "skipping tag without a component version");
                continue;
            }

            match repo.peel_tag(&name)? {
                Some(target) => tags.extend(Tag::parse(&name, target)),
                None => debug!(tag = %name, "skipping tag that does not resolve to a commit"),
            }
        }

        Ok(Self::from_tags(tags))
    }

    pub fn from_tags(tags: impl IntoIterator<Item = Tag>) -> Self {
        let mut grouped: HashMap<String, Vec<Tag>> = HashMap::new();
        for tag in tags {
            grouped.entry(tag.project.clone()).or_default().push(tag);
        }

        let chains = grouped
            .into_iter()
            .map(|(project, tags)| (project, TagChain::from_tags(tags)))
            .collect();

        TagCatalog { chains }
    }

    /// Chain of a project; empty when it has no tags.
    pub fn chain(&self, project: &str) -> &TagChain {
        self.chains.get(project).unwrap_or(&EMPTY_CHAIN)
    }

    pub fn latest(&self, project: &str, include_prerelease: bool) -> Option<&Tag> {
        self.chain(project)
            .latest(include_prerelease)
            .map(|entry| entry.tag())
    }

    /// Make `tag` the new head of its project's chain.
    pub fn insert_head(&mut self, tag: Tag) -> Result<()> {
        self.chains
            .entry(tag.project.clone())
            .or_default()
            .prepend(tag)
    }

    /// Names of projects that have tags, in no particular order.
    pub fn projects(&self) -> impl Iterator<Item = &str> {
        self.chains.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::MockRepository;

    fn tag(name: &str) -> Tag {
        Tag::parse(name, MockRepository::oid(1)).unwrap()
    }

    fn versions(entries: &[ChainEntry<'_>]) -> Vec<String> {
        entries.iter().map(|e| e.version.to_string()).collect()
    }

    #[test]
    fn test_chain_order_and_links() {
        let catalog = TagCatalog::from_tags(vec![tag("A_1.0.0"), tag("A_2.0.0"), tag("A_1.1.0")]);
        let chain = catalog.chain("A");
        let entries: Vec<_> = chain.entries().collect();
        assert_eq!(versions(&entries), vec!["2.0.0", "1.1.0", "1.0.0"]);

        let newest = chain.head().unwrap();
        let oldest = chain.get(2).unwrap();
        assert_eq!(newest.previous().unwrap().version.to_string(), "1.1.0");
        assert!(newest.next().is_none());
        assert!(oldest.previous().is_none());
        assert_eq!(oldest.next().unwrap().version.to_string(), "1.1.0");
    }

    #[test]
    fn test_links_are_consistent() {
        let catalog = TagCatalog::from_tags(vec![
            tag("A_0.1.0"),
            tag("A_1.0.0-rc.1"),
            tag("A_1.0.0"),
            tag("A_1.0.0-beta"),
        ]);
        for entry in catalog.chain("A").entries() {
            if let Some(previous) = entry.previous() {
                assert!(previous.version < entry.version);
                assert_eq!(previous.next().unwrap(), entry);
            }
        }
    }

    #[test]
    fn test_prerelease_orders_below_release() {
        let catalog = TagCatalog::from_tags(vec![tag("A_1.0.0"), tag("A_1.1.0-rc1")]);
        assert_eq!(catalog.latest("A", false).unwrap().version.to_string(), "1.0.0");
        assert_eq!(catalog.latest("A", true).unwrap().version.to_string(), "1.1.0-rc1");

        let only_pre = TagCatalog::from_tags(vec![tag("B_1.0.0-alpha")]);
        assert!(only_pre.latest("B", false).is_none());
        assert!(only_pre.latest("Missing", true).is_none());
    }

    #[test]
    fn test_groups_by_project() {
        let catalog = TagCatalog::from_tags(vec![tag("A_1.0.0"), tag("B_3.0.0"), tag("A_1.0.1")]);
        assert_eq!(catalog.chain("A").len(), 2);
        assert_eq!(catalog.chain("B").len(), 1);
        assert!(catalog.chain("C").is_empty());
        let mut projects: Vec<_> = catalog.projects().collect();
        projects.sort();
        assert_eq!(projects, vec!["A", "B"]);
    }

    #[test]
    fn test_query_filters() {
        let catalog = TagCatalog::from_tags(vec![
            tag("A_1.0.0"),
            tag("A_1.1.0"),
            tag("A_1.2.0-rc.1"),
            tag("A_2.0.0"),
        ]);
        let chain = catalog.chain("A");

        let all = chain.query(&TagQuery::default());
        assert_eq!(versions(&all), vec!["2.0.0", "1.1.0", "1.0.0"]);

        let with_pre = chain.query(&TagQuery {
            include_prerelease: true,
            depth: Some(2),
            ..Default::default()
        });
        assert_eq!(versions(&with_pre), vec!["2.0.0", "1.2.0-rc.1"]);

        let bounded = chain.query(&TagQuery {
            min_version: Some(Version::new(1, 1, 0)),
            max_version: Some(Version::new(1, 9, 0)),
            ..Default::default()
        });
        assert_eq!(versions(&bounded), vec!["1.1.0"]);
    }

    #[test]
    fn test_insert_head() {
        let mut catalog = TagCatalog::from_tags(vec![tag("A_1.0.0")]);
        catalog.insert_head(tag("A_1.0.1")).unwrap();

        let chain = catalog.chain("A");
        let head = chain.head().unwrap();
        assert_eq!(head.version.to_string(), "1.0.1");
        assert!(head.next().is_none());
        assert_eq!(head.previous().unwrap().next().unwrap(), head);

        assert!(catalog.insert_head(tag("A_0.5.0")).is_err());
        catalog.insert_head(tag("New_0.1.0")).unwrap();
        assert_eq!(catalog.chain("New").len(), 1);
    }

    #[test]
    fn test_build_skips_malformed_and_dangling_tags() {
        let mut repo = MockRepository::new();
        repo.add_tag("A_1.0.0", MockRepository::oid(1));
        repo.add_tag("v1.0.0", MockRepository::oid(1));
        repo.add_tag("A_B_1.0.0", MockRepository::oid(1));
        repo.add_tag("A_latest", MockRepository::oid(1));
        repo.add_dangling_tag("A_2.0.0");

        let catalog = TagCatalog::build(&repo, &CancellationToken::new()).unwrap();
        let chain = catalog.chain("A");
        assert_eq!(chain.len(), 1);
        assert_eq!(chain.head().unwrap().reference, "A_1.0.0");
    }

    #[test]
    fn test_build_stops_when_cancelled() {
        let mut repo = MockRepository::new();
        repo.add_tag("A_1.0.0", MockRepository::oid(1));

        let cancel = CancellationToken::new();
        cancel.cancel();
        let catalog = TagCatalog::build(&repo, &cancel).unwrap();
        assert!(catalog.chain("A").is_empty());
    }
}
