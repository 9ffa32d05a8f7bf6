//! Cache keys for originals and derived copies.
//!
//! A [`UniqueKey`] is a domain tag plus a list of 32-bit words. Equality
//! compares the domain and every word; the precomputed xxh3 hash only
//! speeds up map lookups. Two key shapes are built here:
//!
//! ```text
//! image id key:  [content_id, left, top, right, bottom]               (IMAGE_ID domain)
//! copy key:      [base domain, base words.., subset l/t/r/b,
//!                 filter, width, height, mipped]                     (COPY domain)
//! ```
//!
//! The caller's "will be mipped" flag is deliberately absent from copy
//! keys: a non-mipped copy and its mipped replacement share a key.

use std::hash::{Hash, Hasher};

use smallvec::SmallVec;
use texadj_core::IRect;
use xxhash_rust::xxh3::Xxh3;

use crate::copy::CopyParams;

/// Invalid content identity; no key can be built for it.
pub const INVALID_CONTENT_ID: u32 = 0;

/// Namespace tag separating unrelated key families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyDomain(pub u32);

impl KeyDomain {
    /// Keys of originals, by content identity and bounds.
    pub const IMAGE_ID: KeyDomain = KeyDomain(1);
    /// Keys of derived copies.
    pub const COPY: KeyDomain = KeyDomain(2);
}

/// Hashable cache key.
#[derive(Debug, Clone)]
pub struct UniqueKey {
    domain: KeyDomain,
    words: SmallVec<[u32; 16]>,
    hash: u64,
    tag: Option<&'static str>,
}

impl UniqueKey {
    /// Starts a key in `domain`.
    pub fn builder(domain: KeyDomain) -> UniqueKeyBuilder {
        UniqueKeyBuilder {
            domain,
            words: SmallVec::new(),
            tag: None,
        }
    }

    /// Starts a key in `domain` that extends `inner`.
    ///
    /// The inner key's domain and words are prepended so keys derived from
    /// different bases never compare equal.
    pub fn builder_from(inner: &UniqueKey, domain: KeyDomain) -> UniqueKeyBuilder {
        let mut b = Self::builder(domain);
        b.words.push(inner.domain.0);
        b.words.extend_from_slice(&inner.words);
        b.tag = inner.tag;
        b
    }

    #[inline]
    pub fn domain(&self) -> KeyDomain {
        self.domain
    }

    #[inline]
    pub fn words(&self) -> &[u32] {
        &self.words
    }

    #[inline]
    pub fn hash_value(&self) -> u64 {
        self.hash
    }

    /// Debug label carried from the base key.
    #[inline]
    pub fn tag(&self) -> Option<&'static str> {
        self.tag
    }
}

impl PartialEq for UniqueKey {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash && self.domain == other.domain && self.words == other.words
    }
}

impl Eq for UniqueKey {}

impl Hash for UniqueKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.hash);
    }
}

/// Accumulates words for a [`UniqueKey`].
#[derive(Debug)]
pub struct UniqueKeyBuilder {
    domain: KeyDomain,
    words: SmallVec<[u32; 16]>,
    tag: Option<&'static str>,
}

impl UniqueKeyBuilder {
    pub fn tag(mut self, tag: &'static str) -> Self {
        self.tag = Some(tag);
        self
    }

    pub fn push(mut self, word: u32) -> Self {
        self.words.push(word);
        self
    }

    pub fn extend(mut self, words: &[u32]) -> Self {
        self.words.extend_from_slice(words);
        self
    }

    pub fn finish(self) -> UniqueKey {
        let mut hasher = Xxh3::new();
        hasher.update(&self.domain.0.to_le_bytes());
        hasher.update(&(self.words.len() as u32).to_le_bytes());
        for w in &self.words {
            hasher.update(&w.to_le_bytes());
        }
        UniqueKey {
            domain: self.domain,
            words: self.words,
            hash: hasher.digest(),
            tag: self.tag,
        }
    }
}

/// Key for the original pixels of `content_id` covering `bounds`.
///
/// Returns `None` for [`INVALID_CONTENT_ID`].
pub fn image_id_key(content_id: u32, bounds: IRect) -> Option<UniqueKey> {
    if content_id == INVALID_CONTENT_ID {
        return None;
    }
    Some(
        UniqueKey::builder(KeyDomain::IMAGE_ID)
            .tag("Image")
            .push(content_id)
            .extend(&bounds.to_words())
            .finish(),
    )
}

/// Key for a derived copy of the content addressed by `base`.
pub fn copy_key(base: &UniqueKey, params: &CopyParams) -> UniqueKey {
    UniqueKey::builder_from(base, KeyDomain::COPY)
        .extend(&params.subset.to_words())
        .push(params.filter.as_word())
        .push(params.width)
        .push(params.height)
        .push(params.mipped as u32)
        .finish()
}
