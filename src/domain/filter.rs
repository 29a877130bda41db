use super::enums::StatusFilter;
use super::task::Task;
use std::collections::BTreeSet;

/// Category dimension of the list filter
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(String),
}

impl CategoryFilter {
    /// Build from a raw selector value; exactly "all" selects everything
    pub fn from_value(value: &str) -> Self {
        if value == "all" {
            Self::All
        } else {
            Self::Only(value.to_string())
        }
    }

    pub fn matches(&self, task: &Task) -> bool {
        match self {
            Self::All => true,
            Self::Only(category) => task.category == *category,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::All => "All Categories",
            Self::Only(category) => category,
        }
    }
}

/// Both filter dimensions; initialized to all/all and never persisted
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Filters {
    pub status: StatusFilter,
    pub category: CategoryFilter,
}

impl Filters {
    pub fn matches(&self, task: &Task) -> bool {
        self.status.matches(task) && self.category.matches(task)
    }
}

/// Distinct non-empty categories across the list, sorted lexicographically
pub fn derive_category_options(tasks: &[Task]) -> Vec<String> {
    tasks
        .iter()
        .filter(|t| t.has_category())
        .map(|t| t.category.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Keep the selected category if it still exists, otherwise fall back to all
pub fn reconcile_category(current: &CategoryFilter, options: &[String]) -> CategoryFilter {
    match current {
        CategoryFilter::Only(category) if options.contains(category) => current.clone(),
        _ => CategoryFilter::All,
    }
}

/// Step through [all, options...] from the current selection, wrapping around
pub fn cycle_category(current: &CategoryFilter, options: &[String], forward: bool) -> CategoryFilter {
    let len = options.len() + 1;
    let pos = match current {
        CategoryFilter::All => 0,
        CategoryFilter::Only(c) => options.iter().position(|o| o == c).map_or(0, |i| i + 1),
    };
    let next = if forward { (pos + 1) % len } else { (pos + len - 1) % len };

    match next {
        0 => CategoryFilter::All,
        i => CategoryFilter::Only(options[i - 1].clone()),
    }
}
