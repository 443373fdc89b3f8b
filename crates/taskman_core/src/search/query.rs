//! Keyword/tag search predicate over activities.
//!
//! # Invariants
//! - Keyword matching is a case-sensitive substring test on the title.
//! - `{""}` as the keyword set means "no keywords".
//! - Malformed tag names never fail a query; they are dropped from the
//!   tag term instead. Supplying only malformed names still counts as a
//!   tag term, so such a query matches nothing.

use crate::model::activity::Activity;
use crate::model::tag::Tag;
use log::debug;
use std::collections::BTreeSet;

/// User-supplied search terms.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivityQuery {
    keywords: BTreeSet<String>,
    tags: BTreeSet<Tag>,
    has_tag_term: bool,
}

impl ActivityQuery {
    /// Builds a query from raw keyword and tag-name input.
    pub fn new<K, T>(keywords: K, tag_names: T) -> Self
    where
        K: IntoIterator,
        K::Item: Into<String>,
        T: IntoIterator,
        T::Item: AsRef<str>,
    {
        let mut keywords = keywords
            .into_iter()
            .map(Into::into)
            .collect::<BTreeSet<String>>();
        if keywords.len() == 1 && keywords.contains("") {
            keywords.clear();
        }

        let mut tags = BTreeSet::new();
        let mut has_tag_term = false;
        for name in tag_names {
            has_tag_term = true;
            match Tag::parse(name.as_ref()) {
                Ok(tag) => {
                    tags.insert(tag);
                }
                Err(err) => {
                    debug!("event=query_tag_skipped module=search status=ok reason=\"{err}\"");
                }
            }
        }

        Self {
            keywords,
            tags,
            has_tag_term,
        }
    }

    /// Whether this query accepts every activity.
    pub fn is_unfiltered(&self) -> bool {
        self.keywords.is_empty() && !self.has_tag_term
    }

    pub fn keywords(&self) -> &BTreeSet<String> {
        &self.keywords
    }

    pub fn tags(&self) -> &BTreeSet<Tag> {
        &self.tags
    }

    /// Evaluates `(no keywords || title contains a keyword) && (no tags || has a tag)`.
    pub fn matches(&self, activity: &Activity) -> bool {
        let title_term = self.keywords.is_empty()
            || self
                .keywords
                .iter()
                .any(|keyword| activity.title().contains(keyword.as_str()));
        let tag_term =
            !self.has_tag_term || self.tags.iter().any(|tag| activity.tags().contains(tag));
        title_term && tag_term
    }
}

/// Stateless form of [`ActivityQuery::matches`].
pub fn matches<K, T>(activity: &Activity, keywords: K, tag_names: T) -> bool
where
    K: IntoIterator,
    K::Item: Into<String>,
    T: IntoIterator,
    T::Item: AsRef<str>,
{
    ActivityQuery::new(keywords, tag_names).matches(activity)
}
