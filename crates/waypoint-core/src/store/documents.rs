//! Synchronous JSON document directory backing [`super::PlanStore`].
//!
//! Layout:
//!
//! ```text
//! plans/
//! ├── ids.json        next plan and goal ids, only ever increased
//! ├── goal-1.json     Goal
//! ├── plan-1.json     Plan (refers to its goal by id)
//! └── plan-2.json
//! ```

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use jiff::{civil::Date, Timestamp};
use log::debug;
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::{
    error::{PlanError, Result},
    models::{Constraints, GeneratedPlan, Goal, Plan},
    PlanModel,
};

const PLAN_PREFIX: &str = "plan-";
const GOAL_PREFIX: &str = "goal-";
const EXTENSION: &str = "json";
const COUNTERS: &str = "ids.json";

/// One stored plan together with the goal it was generated for.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlanDocument {
    pub goal: Goal,
    pub plan: Plan,
}

impl PlanDocument {
    /// Computes the snapshot for this document.
    pub fn model(&self) -> Result<PlanModel> {
        PlanModel::build(self.plan.clone(), self.goal.constraints.clone())
    }

    /// Replaces the stored plan with the one in `model`.
    pub fn update_from(&mut self, model: &PlanModel) {
        self.plan = model.plan().clone();
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
struct IdCounters {
    next_plan_id: u64,
    next_goal_id: u64,
}

#[derive(Debug, Clone, Copy)]
enum IdKind {
    Plan,
    Goal,
}

/// Directory of `plan-<id>.json` and `goal-<id>.json` files.
pub struct DocumentDir {
    root: PathBuf,
}

impl DocumentDir {
    /// Opens the directory, creating it if needed.
    pub fn open<P: AsRef<Path>>(root: P) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root).map_err(|source| PlanError::FileSystem {
            path: root.clone(),
            source,
        })?;
        Ok(Self { root })
    }

    fn path_for(&self, prefix: &str, id: u64) -> PathBuf {
        self.root.join(format!("{prefix}{id}.{EXTENSION}"))
    }

    fn id_of(path: &Path, prefix: &str) -> Option<u64> {
        if path.extension()? != EXTENSION {
            return None;
        }
        path.file_stem()?
            .to_str()?
            .strip_prefix(prefix)?
            .parse()
            .ok()
    }

    /// Ids of every `<prefix><id>.json` file, ascending.
    fn ids(&self, prefix: &str) -> Result<Vec<u64>> {
        let entries = fs::read_dir(&self.root).map_err(|source| PlanError::FileSystem {
            path: self.root.clone(),
            source,
        })?;
        let mut ids = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| PlanError::FileSystem {
                path: self.root.clone(),
                source,
            })?;
            if let Some(id) = Self::id_of(&entry.path(), prefix) {
                ids.push(id);
            }
        }
        ids.sort_unstable();
        Ok(ids)
    }

    fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(PlanError::FileSystem {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        Ok(Some(serde_json::from_str(&text)?))
    }

    /// Writes through a temporary file so a crash never leaves half a document.
    fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
        let tmp = path.with_extension("json.tmp");
        let text = serde_json::to_string_pretty(value)?;
        fs::write(&tmp, text).map_err(|source| PlanError::FileSystem {
            path: tmp.clone(),
            source,
        })?;
        fs::rename(&tmp, path).map_err(|source| PlanError::FileSystem {
            path: path.to_path_buf(),
            source,
        })
    }

    fn counters(&self) -> Result<IdCounters> {
        let stored: IdCounters =
            Self::read_json(&self.root.join(COUNTERS))?.unwrap_or_default();
        // Files written without a counter still reserve their ids.
        let after = |ids: Vec<u64>| ids.last().map_or(1, |id| id + 1);
        Ok(IdCounters {
            next_plan_id: stored.next_plan_id.max(after(self.ids(PLAN_PREFIX)?)),
            next_goal_id: stored.next_goal_id.max(after(self.ids(GOAL_PREFIX)?)),
        })
    }

    /// Hands out the next id of `kind`. Deleted ids are never reused.
    fn allocate(&self, kind: IdKind) -> Result<u64> {
        let mut counters = self.counters()?;
        let slot = match kind {
            IdKind::Plan => &mut counters.next_plan_id,
            IdKind::Goal => &mut counters.next_goal_id,
        };
        let id = *slot;
        *slot += 1;
        Self::write_json(&self.root.join(COUNTERS), &counters)?;
        debug!("Allocated {kind:?} id {id}");
        Ok(id)
    }

    fn plan(&self, id: u64) -> Result<Option<Plan>> {
        Self::read_json(&self.path_for(PLAN_PREFIX, id))
    }

    pub fn get_goal(&self, id: u64) -> Result<Option<Goal>> {
        Self::read_json(&self.path_for(GOAL_PREFIX, id))
    }

    /// All goals ordered by id.
    pub fn list_goals(&self) -> Result<Vec<Goal>> {
        let mut goals = Vec::new();
        for id in self.ids(GOAL_PREFIX)? {
            if let Some(goal) = self.get_goal(id)? {
                goals.push(goal);
            }
        }
        Ok(goals)
    }

    /// Stores a goal that has no plans yet.
    pub fn create_goal(
        &self,
        goal_text: String,
        constraints: Constraints,
        now: Timestamp,
    ) -> Result<Goal> {
        if goal_text.trim().is_empty() {
            return Err(PlanError::invalid_input("goal_text").with_reason("Goal text cannot be empty"));
        }
        constraints.validate()?;
        let goal = Goal {
            id: self.allocate(IdKind::Goal)?,
            goal_text,
            constraints,
            created_at: now,
        };
        self.save_goal(&goal)?;
        Ok(goal)
    }

    fn save_goal(&self, goal: &Goal) -> Result<()> {
        let path = self.path_for(GOAL_PREFIX, goal.id);
        Self::write_json(&path, goal)?;
        debug!("Saved goal {} to {}", goal.id, path.display());
        Ok(())
    }

    /// A plan joined with its goal.
    ///
    /// A plan whose goal file is missing fails with `GoalNotFound`.
    pub fn get(&self, id: u64) -> Result<Option<PlanDocument>> {
        let Some(plan) = self.plan(id)? else {
            return Ok(None);
        };
        let goal = self
            .get_goal(plan.goal_id)?
            .ok_or(PlanError::GoalNotFound { id: plan.goal_id })?;
        Ok(Some(PlanDocument { goal, plan }))
    }

    /// All documents ordered by plan id.
    pub fn list(&self) -> Result<Vec<PlanDocument>> {
        let goals: BTreeMap<u64, Goal> = self
            .list_goals()?
            .into_iter()
            .map(|goal| (goal.id, goal))
            .collect();
        let mut documents = Vec::new();
        for id in self.ids(PLAN_PREFIX)? {
            let Some(plan) = self.plan(id)? else {
                continue;
            };
            let goal = goals
                .get(&plan.goal_id)
                .cloned()
                .ok_or(PlanError::GoalNotFound { id: plan.goal_id })?;
            documents.push(PlanDocument { goal, plan });
        }
        Ok(documents)
    }

    /// Writes the plan half of `document`; goals are never changed by a save.
    pub fn save(&self, document: &PlanDocument) -> Result<()> {
        let path = self.path_for(PLAN_PREFIX, document.plan.id);
        Self::write_json(&path, &document.plan)?;
        debug!("Saved plan {} to {}", document.plan.id, path.display());
        Ok(())
    }

    /// Removes a plan. Its goal stays, even when it has no plans left.
    pub fn delete(&self, id: u64) -> Result<Option<PlanDocument>> {
        let Some(document) = self.get(id)? else {
            return Ok(None);
        };
        let path = self.path_for(PLAN_PREFIX, id);
        fs::remove_file(&path).map_err(|source| PlanError::FileSystem { path, source })?;
        Ok(Some(document))
    }

    /// Stores a generated plan under the next plan id.
    ///
    /// With `goal_id` the plan joins that goal and inherits its text and
    /// constraints; otherwise a new goal is created from the generator
    /// output. The plan is scheduled once before any id is taken or file
    /// written, so a structurally broken plan leaves the directory as it was.
    pub fn create(
        &self,
        generated: GeneratedPlan,
        goal_id: Option<u64>,
        start_date: Date,
        now: Timestamp,
    ) -> Result<PlanDocument> {
        let existing_goal = match goal_id {
            Some(id) => Some(self.get_goal(id)?.ok_or(PlanError::GoalNotFound { id })?),
            None => None,
        };
        let constraints = match &existing_goal {
            Some(goal) => goal.constraints.clone(),
            None => generated.constraints.clone(),
        };

        let mut tasks = generated.tasks;
        for (i, task) in tasks.iter_mut().enumerate() {
            task.record_id = Some(i as u64 + 1);
        }
        let draft = Plan {
            id: 0,
            goal_id: 0,
            plan_type: generated.plan_type,
            plan_summary: generated.plan_summary,
            start_date,
            tasks,
            created_at: now,
        };
        let mut plan = PlanModel::build(draft, constraints.clone())?.plan().clone();

        let goal = match existing_goal {
            Some(goal) => goal,
            None => {
                let goal = Goal {
                    id: self.allocate(IdKind::Goal)?,
                    goal_text: generated.goal_text,
                    constraints,
                    created_at: now,
                };
                self.save_goal(&goal)?;
                goal
            }
        };
        plan.id = self.allocate(IdKind::Plan)?;
        plan.goal_id = goal.id;

        let document = PlanDocument { goal, plan };
        self.save(&document)?;
        Ok(document)
    }
}
