//! File-backed plan document store.
//!
//! Goals and plans live in their own JSON documents; a plan refers to its
//! goal by id, and a goal keeps existing when its last plan is deleted. Ids
//! come from a counter that only moves forward. The store is a collaborator
//! of the scheduling core, not part of it: every
//! method runs its file I/O on a blocking thread and hands plain documents
//! back, and all scheduling happens on [`PlanModel`](crate::PlanModel)
//! snapshots built from those documents.
//!
//! ```rust,no_run
//! use waypoint_core::PlanStoreBuilder;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! // $XDG_DATA_HOME/waypoint/plans
//! let store = PlanStoreBuilder::new().build().await?;
//!
//! // Or an explicit directory
//! let store = PlanStoreBuilder::new()
//!     .with_directory(Some("/tmp/plans"))
//!     .build()
//!     .await?;
//!
//! for document in store.list().await? {
//!     println!("{}: {}", document.plan.id, document.plan.headline());
//! }
//! # Ok(())
//! # }
//! ```

use std::path::{Path, PathBuf};

use jiff::{civil::Date, Timestamp};
use tokio::task;

pub mod builder;
pub mod documents;

pub use builder::PlanStoreBuilder;
pub use documents::{DocumentDir, PlanDocument};

use crate::{
    error::{PlanError, Result},
    models::{Constraints, GeneratedPlan, Goal},
};

/// Async handle on a plan document directory.
#[derive(Debug, Clone)]
pub struct PlanStore {
    pub(crate) root: PathBuf,
}

impl PlanStore {
    pub(crate) fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn directory(&self) -> &Path {
        &self.root
    }

    async fn blocking<T, F>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(DocumentDir) -> Result<T> + Send + 'static,
    {
        let root = self.root.clone();
        task::spawn_blocking(move || f(DocumentDir::open(&root)?))
            .await
            .map_err(PlanError::join)?
    }

    /// All stored plans ordered by id.
    pub async fn list(&self) -> Result<Vec<PlanDocument>> {
        self.blocking(|dir| dir.list()).await
    }

    pub async fn get(&self, id: u64) -> Result<Option<PlanDocument>> {
        self.blocking(move |dir| dir.get(id)).await
    }

    /// Like [`PlanStore::get`] but a missing plan is an error.
    pub async fn load(&self, id: u64) -> Result<PlanDocument> {
        self.get(id).await?.ok_or(PlanError::PlanNotFound { id })
    }

    pub async fn save(&self, document: PlanDocument) -> Result<()> {
        self.blocking(move |dir| dir.save(&document)).await
    }

    pub async fn delete(&self, id: u64) -> Result<Option<PlanDocument>> {
        self.blocking(move |dir| dir.delete(id)).await
    }

    /// All stored goals ordered by id.
    pub async fn goals(&self) -> Result<Vec<Goal>> {
        self.blocking(|dir| dir.list_goals()).await
    }

    pub async fn goal(&self, id: u64) -> Result<Option<Goal>> {
        self.blocking(move |dir| dir.get_goal(id)).await
    }

    /// Like [`PlanStore::goal`] but a missing goal is an error.
    pub async fn load_goal(&self, id: u64) -> Result<Goal> {
        self.goal(id).await?.ok_or(PlanError::GoalNotFound { id })
    }

    /// Stores a goal without any plans. See [`DocumentDir::create_goal`].
    pub async fn create_goal(
        &self,
        goal_text: String,
        constraints: Constraints,
        now: Timestamp,
    ) -> Result<Goal> {
        self.blocking(move |dir| dir.create_goal(goal_text, constraints, now))
            .await
    }

    /// Stores a generated plan. See [`DocumentDir::create`].
    pub async fn create(
        &self,
        generated: GeneratedPlan,
        goal_id: Option<u64>,
        start_date: Date,
        now: Timestamp,
    ) -> Result<PlanDocument> {
        self.blocking(move |dir| dir.create(generated, goal_id, start_date, now))
            .await
    }
}
