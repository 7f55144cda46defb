//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use std::convert::Infallible;
use std::str::FromStr;

use itertools::Itertools;
use serde::Deserialize;

// Location in the configuration tree, as an ordered list of segments
// ("interfaces", "ethernet", "eth0", "address", "192.0.2.1/26").
#[derive(Clone, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[derive(Deserialize)]
#[serde(transparent)]
pub struct ConfigPath(Vec<String>);

// ===== impl ConfigPath =====

impl ConfigPath {
    pub fn new() -> ConfigPath {
        ConfigPath::default()
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    // Returns true if any segment is equal to `segment`.
    pub fn contains(&self, segment: &str) -> bool {
        self.iter().any(|s| s == segment)
    }

    // Returns a new path with `segment` appended.
    #[must_use]
    pub fn child(&self, segment: impl Into<String>) -> ConfigPath {
        let mut path = self.clone();
        path.0.push(segment.into());
        path
    }

    // Returns a new path with all segments of `other` appended.
    #[must_use]
    pub fn join<I, S>(&self, other: I) -> ConfigPath
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut path = self.clone();
        path.0.extend(other.into_iter().map(Into::into));
        path
    }
}

impl std::fmt::Display for ConfigPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.iter().join(" "))
    }
}

// Splits a whitespace-separated option string ("member interface eth0").
impl FromStr for ConfigPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<ConfigPath, Infallible> {
        Ok(s.split_whitespace().collect())
    }
}

impl<S: Into<String>> FromIterator<S> for ConfigPath {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> ConfigPath {
        ConfigPath(iter.into_iter().map(Into::into).collect())
    }
}

impl<const N: usize> From<[&str; N]> for ConfigPath {
    fn from(segments: [&str; N]) -> ConfigPath {
        segments.into_iter().collect()
    }
}

impl From<&[&str]> for ConfigPath {
    fn from(segments: &[&str]) -> ConfigPath {
        segments.iter().copied().collect()
    }
}

impl From<Vec<String>> for ConfigPath {
    fn from(segments: Vec<String>) -> ConfigPath {
        ConfigPath(segments)
    }
}

impl<'a> IntoIterator for &'a ConfigPath {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
