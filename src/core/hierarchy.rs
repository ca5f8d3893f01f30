/// Semantic category hierarchy — "is-a" edges and their transitive closure.

use rustc_hash::{FxHashMap, FxHashSet};
use std::io::Read;
use std::path::Path;
use thiserror::Error;

/// Parent label marking a root category.
pub const NO_PARENT: &str = "(none)";

#[derive(Debug, Error)]
pub enum HierarchyError {
    #[error("category '{child}' names undefined parent '{parent}'")]
    UndefinedCategory { child: String, parent: String },
    #[error("category cycle through '{0}'")]
    Cycle(String),
    #[error("malformed hierarchy row {row}: expected child;parent")]
    MalformedRow { row: usize },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// A directed acyclic parent→children relation over category labels with
/// every category's descendants precomputed.
#[derive(Debug, Clone, Default)]
pub struct CategoryHierarchy {
    descendants: FxHashMap<String, FxHashSet<String>>,
}

impl CategoryHierarchy {
    /// Load `child;parent` edges from a headerless, semicolon-delimited file.
    pub fn load_from_csv(path: &Path) -> Result<CategoryHierarchy, HierarchyError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn parse_csv(input: &str) -> Result<CategoryHierarchy, HierarchyError> {
        Self::from_reader(input.as_bytes())
    }

    fn from_reader<R: Read>(reader: R) -> Result<CategoryHierarchy, HierarchyError> {
        let mut rdr = csv::ReaderBuilder::new()
            .delimiter(b';')
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut edges = Vec::new();
        for (row, record) in rdr.records().enumerate() {
            let record = record?;
            if record.iter().all(|field| field.is_empty()) {
                continue;
            }
            match (record.get(0), record.get(1)) {
                (Some(child), Some(parent)) if !child.is_empty() && !parent.is_empty() => {
                    let child = child.trim_start_matches('\u{feff}');
                    edges.push((child.to_string(), parent.to_string()));
                }
                _ => return Err(HierarchyError::MalformedRow { row: row + 1 }),
            }
        }
        Self::from_edges(edges)
    }

    /// Build the closure from `(child, parent)` edges.
    ///
    /// Every parent other than [`NO_PARENT`] must itself appear as a child
    /// somewhere, and no category may be its own ancestor.
    pub fn from_edges<I, C, P>(edges: I) -> Result<CategoryHierarchy, HierarchyError>
    where
        I: IntoIterator<Item = (C, P)>,
        C: Into<String>,
        P: Into<String>,
    {
        let mut children: FxHashMap<String, Vec<String>> = FxHashMap::default();
        let mut declared: FxHashSet<String> = FxHashSet::default();
        let mut parents = Vec::new();

        for (child, parent) in edges {
            let (child, parent) = (child.into(), parent.into());
            if child == NO_PARENT {
                continue;
            }
            declared.insert(child.clone());
            children.entry(child.clone()).or_default();
            if parent != NO_PARENT {
                let kids = children.entry(parent.clone()).or_default();
                if !kids.contains(&child) {
                    kids.push(child.clone());
                }
                parents.push((child, parent));
            }
        }

        if let Some((child, parent)) = parents.iter().find(|(_, p)| !declared.contains(p)) {
            return Err(HierarchyError::UndefinedCategory {
                child: child.clone(),
                parent: parent.clone(),
            });
        }

        let mut memo: FxHashMap<String, FxHashSet<String>> = FxHashMap::default();
        let mut names: Vec<&String> = children.keys().collect();
        names.sort();
        for name in names {
            let mut visiting = FxHashSet::default();
            collect_descendants(name, &children, &mut memo, &mut visiting)?;
        }

        log::debug!("built category hierarchy with {} categories", memo.len());
        Ok(CategoryHierarchy { descendants: memo })
    }

    /// Every category below `category`, at any depth. Empty for leaves,
    /// unknown categories and the root sentinel.
    pub fn descendants(&self, category: &str) -> Option<&FxHashSet<String>> {
        if category == NO_PARENT {
            return None;
        }
        self.descendants.get(category)
    }

    pub fn contains(&self, category: &str) -> bool {
        self.descendants.contains_key(category)
    }

    /// Whether `category` is `ancestor` or lies below it.
    pub fn is_a(&self, category: &str, ancestor: &str) -> bool {
        category == ancestor
            || self
                .descendants(ancestor)
                .is_some_and(|d| d.contains(category))
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.descendants.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.descendants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descendants.is_empty()
    }
}

/// Depth-first closure with a memo per category. `visiting` holds the
/// current path; meeting a category already on it is a cycle.
fn collect_descendants(
    name: &str,
    children: &FxHashMap<String, Vec<String>>,
    memo: &mut FxHashMap<String, FxHashSet<String>>,
    visiting: &mut FxHashSet<String>,
) -> Result<FxHashSet<String>, HierarchyError> {
    if let Some(done) = memo.get(name) {
        return Ok(done.clone());
    }
    if !visiting.insert(name.to_string()) {
        return Err(HierarchyError::Cycle(name.to_string()));
    }

    let mut result = FxHashSet::default();
    for child in children.get(name).into_iter().flatten() {
        result.insert(child.clone());
        result.extend(collect_descendants(child, children, memo, visiting)?);
    }

    visiting.remove(name);
    memo.insert(name.to_string(), result.clone());
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> CategoryHierarchy {
        CategoryHierarchy::from_edges([
            ("physical", NO_PARENT),
            ("animate", "physical"),
            ("human", "animate"),
            ("animal", "animate"),
            ("mammal", "animal"),
            ("edible", "physical"),
            ("fruit", "edible"),
            ("place", NO_PARENT),
        ])
        .unwrap()
    }

    #[test]
    fn descendants_are_transitive() {
        let h = sample();
        let d = h.descendants("physical").unwrap();
        for cat in ["animate", "human", "animal", "mammal", "edible", "fruit"] {
            assert!(d.contains(cat), "missing {}", cat);
        }
        assert!(!d.contains("physical"));
        assert!(!d.contains("place"));
    }

    #[test]
    fn leaves_have_no_descendants() {
        let h = sample();
        assert!(h.descendants("mammal").unwrap().is_empty());
        assert!(h.descendants("place").unwrap().is_empty());
    }

    #[test]
    fn sentinel_and_unknown_have_none() {
        let h = sample();
        assert!(h.descendants(NO_PARENT).is_none());
        assert!(h.descendants("mineral").is_none());
        assert!(!h.contains(NO_PARENT));
    }

    #[test]
    fn is_a_includes_self_and_ancestors() {
        let h = sample();
        assert!(h.is_a("mammal", "mammal"));
        assert!(h.is_a("mammal", "physical"));
        assert!(!h.is_a("physical", "mammal"));
        assert!(!h.is_a("place", "physical"));
    }

    #[test]
    fn diamond_shares_descendants() {
        let h = CategoryHierarchy::from_edges([
            ("top", NO_PARENT),
            ("left", "top"),
            ("right", "top"),
            ("bottom", "left"),
            ("bottom", "right"),
        ])
        .unwrap();
        let top = h.descendants("top").unwrap();
        assert_eq!(top.len(), 3);
        assert!(h.descendants("right").unwrap().contains("bottom"));
    }

    #[test]
    fn cycle_is_rejected() {
        let err = CategoryHierarchy::from_edges([
            ("a", NO_PARENT),
            ("b", "a"),
            ("c", "b"),
            ("a", "c"),
        ])
        .unwrap_err();
        assert!(matches!(err, HierarchyError::Cycle(_)));
    }

    #[test]
    fn self_parent_is_a_cycle() {
        let err = CategoryHierarchy::from_edges([("a", "a")]).unwrap_err();
        assert!(matches!(err, HierarchyError::Cycle(_)));
    }

    #[test]
    fn undefined_parent_is_rejected() {
        let err = CategoryHierarchy::from_edges([("fruit", "edible")]).unwrap_err();
        assert!(matches!(
            err,
            HierarchyError::UndefinedCategory { ref parent, .. } if parent == "edible"
        ));
    }

    #[test]
    fn parse_csv_with_bom_and_blank_lines() {
        let h = CategoryHierarchy::parse_csv("\u{feff}physical;(none)\n\nedible;physical\n").unwrap();
        assert!(h.contains("physical"));
        assert!(h.descendants("physical").unwrap().contains("edible"));
    }

    #[test]
    fn parse_csv_malformed_row() {
        let err = CategoryHierarchy::parse_csv("physical;(none)\nedible\n").unwrap_err();
        assert!(matches!(err, HierarchyError::MalformedRow { row: 2 }));
    }

    #[test]
    fn load_fixture_hierarchy() {
        let path = std::path::PathBuf::from("tests/fixtures/hierarchy.csv");
        let h = CategoryHierarchy::load_from_csv(&path).unwrap();
        assert!(h.is_a("fruit", "edible"));
    }
}
