use serde::{Deserialize, Serialize};

use crate::session::{Category, Task};

/// Completed-task count for one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompetencyEntry {
    pub category_id: String,
    pub name: String,
    pub color: String,
    pub done_tasks: u32,
}

/// One entry per category, in category order. Categories with no done
/// tasks report zero; no categories yields an empty distribution.
pub fn competency_distribution(categories: &[Category], tasks: &[Task]) -> Vec<CompetencyEntry> {
    categories
        .iter()
        .map(|cat| {
            let done = tasks
                .iter()
                .filter(|t| t.is_done() && t.category_id.as_deref() == Some(cat.id.as_str()))
                .count();
            CompetencyEntry {
                category_id: cat.id.clone(),
                name: cat.name.clone(),
                color: cat.color.clone(),
                done_tasks: u32::try_from(done).unwrap_or(u32::MAX),
            }
        })
        .collect()
}
