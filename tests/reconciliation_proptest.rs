//! Property-based tests for board reconciliation

use proptest::prelude::*;
use uuid::Uuid;

use taskcollab::client::TaskBoard;
use taskcollab::shared::{CreateTaskRequest, ServerEvent, Task, TaskStatus};

const POOL: usize = 6;

#[derive(Debug, Clone)]
enum Op {
    Create(usize),
    Update(usize, TaskStatus, String),
    Delete(usize),
}

fn status() -> impl Strategy<Value = TaskStatus> {
    prop_oneof![
        Just(TaskStatus::Todo),
        Just(TaskStatus::InProgress),
        Just(TaskStatus::Completed),
    ]
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..POOL).prop_map(Op::Create),
        (0..POOL, status(), "[a-z ]{0,12}").prop_map(|(i, s, d)| Op::Update(i, s, d)),
        (0..POOL).prop_map(Op::Delete),
    ]
}

fn pool(project: Uuid) -> Vec<Task> {
    (0..POOL)
        .map(|i| {
            Task::new(
                Uuid::new_v4(),
                CreateTaskRequest {
                    title: format!("Task {}", i),
                    project,
                    description: None,
                    assigned_to: None,
                    priority: None,
                    due_date: None,
                },
            )
            .unwrap()
        })
        .collect()
}

fn to_event(tasks: &[Task], op: &Op) -> ServerEvent {
    match op {
        Op::Create(i) => ServerEvent::TaskCreated(tasks[*i].clone()),
        Op::Update(i, status, description) => {
            let mut task = tasks[*i].clone();
            task.status = *status;
            task.description = description.clone();
            ServerEvent::TaskUpdated(task)
        }
        Op::Delete(i) => ServerEvent::TaskDeleted(tasks[*i].id),
    }
}

proptest! {
    #[test]
    fn test_ids_stay_unique(ops in prop::collection::vec(op(), 0..40)) {
        let project = Uuid::new_v4();
        let tasks = pool(project);
        let mut board = TaskBoard::new(project);
        for op in &ops {
            board.apply(to_event(&tasks, op));
        }

        let mut ids: Vec<Uuid> = board.tasks().iter().map(|t| t.id).collect();
        let total = ids.len();
        ids.sort();
        ids.dedup();
        prop_assert_eq!(ids.len(), total);
    }

    #[test]
    fn test_every_event_is_idempotent(
        prefix in prop::collection::vec(op(), 0..20),
        last in op(),
    ) {
        let project = Uuid::new_v4();
        let tasks = pool(project);
        let mut board = TaskBoard::new(project);
        for op in &prefix {
            board.apply(to_event(&tasks, op));
        }

        board.apply(to_event(&tasks, &last));
        let once = board.tasks().to_vec();
        board.apply(to_event(&tasks, &last));
        prop_assert_eq!(board.tasks(), once.as_slice());
    }

    #[test]
    fn test_echoes_do_not_change_outcome(ops in prop::collection::vec(op(), 0..30)) {
        let project = Uuid::new_v4();
        let tasks = pool(project);
        let mut plain = TaskBoard::new(project);
        let mut echoed = TaskBoard::new(project);

        for op in &ops {
            plain.apply(to_event(&tasks, op));
            echoed.apply(to_event(&tasks, op));
            echoed.apply(to_event(&tasks, op));
        }

        prop_assert_eq!(plain.tasks(), echoed.tasks());
    }

    #[test]
    fn test_delete_of_absent_is_noop(ops in prop::collection::vec(op(), 0..20)) {
        let project = Uuid::new_v4();
        let tasks = pool(project);
        let mut board = TaskBoard::new(project);
        for op in &ops {
            board.apply(to_event(&tasks, op));
        }

        let before = board.tasks().to_vec();
        board.apply(ServerEvent::TaskDeleted(Uuid::new_v4()));
        prop_assert_eq!(board.tasks(), before.as_slice());
    }

    #[test]
    fn test_columns_partition_board(ops in prop::collection::vec(op(), 0..30)) {
        let project = Uuid::new_v4();
        let tasks = pool(project);
        let mut board = TaskBoard::new(project);
        for op in &ops {
            board.apply(to_event(&tasks, op));
        }

        let columns = board.columns();
        let total: usize = TaskStatus::ALL.iter().map(|s| columns.column(*s).len()).sum();
        prop_assert_eq!(total, board.len());
        for status in TaskStatus::ALL {
            prop_assert!(columns.column(status).iter().all(|t| t.status == status));
        }
    }
}
