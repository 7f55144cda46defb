//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use std::collections::BTreeMap;

use crate::path::ConfigPath;

// Configuration tree.
//
// Every node is keyed by a path segment. Leaf values are modeled as child
// nodes of their leaf ("mtu" -> "1280"), so a multi-valued leaf such as
// "address" simply has several children.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ConfigTree {
    children: BTreeMap<String, ConfigTree>,
}

// ===== impl ConfigTree =====

impl ConfigTree {
    pub fn new() -> ConfigTree {
        ConfigTree::default()
    }

    // Creates all missing nodes along the given path.
    pub fn set(&mut self, path: &ConfigPath) {
        let mut node = self;
        for segment in path {
            node = node.children.entry(segment.clone()).or_default();
        }
    }

    // Removes the subtree rooted at the given path.
    //
    // Returns false if the path doesn't exist. Removing the empty path clears
    // the whole tree.
    pub fn delete(&mut self, path: &ConfigPath) -> bool {
        let Some((last, parent)) = path.segments().split_last() else {
            let existed = !self.children.is_empty();
            self.children.clear();
            return existed;
        };

        let mut node = self;
        for segment in parent {
            match node.children.get_mut(segment) {
                Some(child) => node = child,
                None => return false,
            }
        }
        node.children.remove(last).is_some()
    }

    // Returns the subtree rooted at the given path.
    pub fn get(&self, path: &ConfigPath) -> Option<&ConfigTree> {
        path.iter()
            .try_fold(self, |node, segment| node.children.get(segment))
    }

    pub fn exists(&self, path: &ConfigPath) -> bool {
        self.get(path).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    // Returns an iterator over the immediate children, ordered by key.
    pub fn children(&self) -> impl Iterator<Item = (&str, &ConfigTree)> {
        self.children
            .iter()
            .map(|(key, child)| (key.as_str(), child))
    }

    // Returns the keys of the immediate children. For a leaf node these are
    // its values.
    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.children.keys().map(String::as_str)
    }

    // Returns the value of a single-valued leaf.
    pub fn value(&self) -> Option<&str> {
        self.values().next()
    }

    // Returns every path from the root to a node without children, in the
    // order the tree would be displayed.
    pub fn leaf_paths(&self) -> Vec<ConfigPath> {
        fn walk(
            node: &ConfigTree,
            prefix: &ConfigPath,
            out: &mut Vec<ConfigPath>,
        ) {
            for (key, child) in &node.children {
                let path = prefix.child(key.as_str());
                if child.is_empty() {
                    out.push(path);
                } else {
                    walk(child, &path, out);
                }
            }
        }

        let mut paths = vec![];
        walk(self, &ConfigPath::new(), &mut paths);
        paths
    }
}
