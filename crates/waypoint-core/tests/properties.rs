use std::collections::BTreeSet;

use jiff::{civil::date, Timestamp, ToSpan};
use proptest::prelude::*;
use waypoint_core::{
    critical_path,
    models::{Constraints, Plan, PlanType, Task, TaskStatus},
    DependencyPolicy, PlanError, PlanModel, Progress, TaskGraph,
};

// Acyclic by construction: task i may only depend on tasks 0..i.
fn dag_strategy(max_tasks: usize) -> impl Strategy<Value = Vec<Task>> {
    (1..=max_tasks).prop_flat_map(|count| {
        (
            proptest::collection::vec(1..=8u32, count),
            proptest::collection::vec(proptest::collection::vec(any::<usize>(), 0..4), count),
        )
            .prop_map(|(durations, raw_deps)| {
                durations
                    .into_iter()
                    .zip(raw_deps)
                    .enumerate()
                    .map(|(i, (duration, deps))| {
                        let deps: BTreeSet<usize> = if i == 0 {
                            BTreeSet::new()
                        } else {
                            deps.into_iter().map(|d| d % i).collect()
                        };
                        Task::new(format!("T{i}"), format!("Task {i}"), duration)
                            .with_dependencies(deps.into_iter().map(|d| format!("T{d}")))
                    })
                    .collect()
            })
    })
}

fn build(tasks: Vec<Task>) -> Result<PlanModel, PlanError> {
    build_with(tasks, Constraints::default())
}

fn build_with(tasks: Vec<Task>, constraints: Constraints) -> Result<PlanModel, PlanError> {
    let plan = Plan {
        id: 1,
        goal_id: 1,
        plan_type: PlanType::Moderate,
        plan_summary: "Generated".to_string(),
        start_date: date(2024, 1, 15),
        tasks,
        created_at: Timestamp::UNIX_EPOCH,
    };
    PlanModel::build(plan, constraints)
}

proptest! {
    #[test]
    fn test_acyclic_plans_schedule(tasks in dag_strategy(12)) {
        let model = build(tasks).unwrap();

        let order: Vec<&str> = model.graph().topological_order().collect();
        for task in model.tasks() {
            let position = order.iter().position(|id| *id == task.task_id).unwrap();
            for dep in &task.depends_on {
                let dep_position = order.iter().position(|id| *id == dep).unwrap();
                prop_assert!(dep_position < position);
            }
        }

        let project_finish = model.schedule().project_finish();
        prop_assert_eq!(model.total_duration_days(), project_finish);
        prop_assert!(!model.critical_path().is_empty());

        for (task, timing) in model.scheduled_tasks() {
            prop_assert!(timing.slack >= 0);
            prop_assert_eq!(timing.earliest_finish - timing.earliest_start, i64::from(task.duration_days));
            prop_assert!(timing.latest_finish <= project_finish);
            prop_assert_eq!(
                timing.slack == 0,
                model.critical_path().contains(&task.task_id)
            );
            for dep in &task.depends_on {
                let dep_timing = model.timing(dep).unwrap();
                prop_assert!(dep_timing.earliest_finish <= timing.earliest_start);
            }
        }
    }

    #[test]
    fn test_derived_values_are_stable(
        tasks in dag_strategy(10),
        done in proptest::collection::vec(any::<bool>(), 10),
    ) {
        let mut model = build(tasks).unwrap();
        let order: Vec<String> = model.graph().topological_order().map(str::to_string).collect();
        for (id, complete) in order.iter().zip(done) {
            if complete {
                model = model
                    .toggle_completion(id, Timestamp::UNIX_EPOCH, DependencyPolicy::Ignore)
                    .unwrap();
            }
        }

        let first = Progress::from_tasks(model.tasks());
        let second = Progress::from_tasks(model.tasks());
        prop_assert_eq!(first, second);
        prop_assert_eq!(first, model.progress());

        let path = critical_path(model.graph(), model.schedule());
        prop_assert_eq!(&path, &critical_path(model.graph(), model.schedule()));
        prop_assert_eq!(path.as_slice(), model.critical_path());
    }

    #[test]
    fn test_negative_deadline_slack_means_infeasible(
        tasks in dag_strategy(10),
        offset in -5i64..40,
        weekends in any::<bool>(),
    ) {
        let constraints = Constraints {
            deadline: Some(date(2024, 1, 15) + offset.days()),
            no_work_on_weekends: weekends,
            ..Constraints::default()
        };
        let model = build_with(tasks, constraints).unwrap();

        let timings = model.schedule().timings();
        prop_assert!(timings.iter().all(|t| t.deadline_slack.is_some()));
        let late = timings.iter().any(|t| t.deadline_slack.is_some_and(|s| s < 0));
        prop_assert_eq!(late, model.deadline_infeasible().is_some());
        if let Some(infeasible) = model.deadline_infeasible() {
            prop_assert!(infeasible.overrun_days > 0);
            prop_assert_eq!(infeasible.expected_finish, model.estimated_completion());
        }
    }

    #[test]
    fn test_back_edge_is_a_cycle(mut tasks in dag_strategy(10)) {
        // Chain every task to its predecessor so the last one reaches the first.
        for i in 1..tasks.len() {
            let previous = format!("T{}", i - 1);
            if !tasks[i].depends_on.contains(&previous) {
                tasks[i].depends_on.push(previous);
            }
        }
        let last = format!("T{}", tasks.len() - 1);
        tasks[0].depends_on.push(last);

        match TaskGraph::build(&tasks) {
            Err(PlanError::Cycle { path }) => {
                prop_assert!(path.len() >= 2);
                prop_assert_eq!(path.first(), path.last());
            }
            other => prop_assert!(false, "expected a cycle, got {:?}", other.map(|g| g.len())),
        }
    }

    #[test]
    fn test_completion_flag_tracks_status(
        tasks in dag_strategy(6),
        moves in proptest::collection::vec((any::<usize>(), 0..4usize), 0..40),
    ) {
        let mut model = build(tasks).unwrap();
        let ids: Vec<String> = model.tasks().iter().map(|t| t.task_id.clone()).collect();

        for (pick, status) in moves {
            let id = &ids[pick % ids.len()];
            let to = TaskStatus::ALL[status];
            match model.set_task_status(id, to, Timestamp::UNIX_EPOCH, DependencyPolicy::Ignore) {
                Ok(next) => {
                    prop_assert_eq!(next.task(id).unwrap().status(), to);
                    model = next;
                }
                Err(err) => prop_assert!(err.is_lifecycle()),
            }
            for task in model.tasks() {
                prop_assert_eq!(task.is_completed(), task.status() == TaskStatus::Completed);
                prop_assert_eq!(task.completed_at().is_some(), task.is_completed());
            }
        }
    }

    #[test]
    fn test_repeating_a_status_is_idempotent(tasks in dag_strategy(6), pick in any::<usize>()) {
        let model = build(tasks).unwrap();
        let id = model.tasks()[pick % model.tasks().len()].task_id.clone();

        let once = model
            .set_task_status(&id, TaskStatus::Blocked, Timestamp::UNIX_EPOCH, DependencyPolicy::Enforce)
            .unwrap();
        let twice = once
            .set_task_status(&id, TaskStatus::Blocked, Timestamp::from_second(60).unwrap(), DependencyPolicy::Enforce)
            .unwrap();
        prop_assert_eq!(once.tasks(), twice.tasks());
        prop_assert_eq!(once.progress(), twice.progress());
    }

    #[test]
    fn test_progress_never_decreases_while_completing(tasks in dag_strategy(10)) {
        let mut model = build(tasks).unwrap();
        let order: Vec<String> = model
            .graph()
            .topological_order()
            .map(str::to_string)
            .collect();
        let schedule = model.schedule().clone();

        let mut last = model.progress().percent;
        for id in &order {
            prop_assert!(model.actionable_tasks().iter().any(|t| &t.task_id == id));
            model = model
                .toggle_completion(id, Timestamp::UNIX_EPOCH, DependencyPolicy::Enforce)
                .unwrap();
            let percent = model.progress().percent;
            prop_assert!(percent >= last);
            last = percent;
        }

        prop_assert_eq!(last, 100);
        prop_assert!(model.progress().is_finished());
        prop_assert_eq!(model.schedule(), &schedule);
    }
}
