//! Presentation ordering for tasks and notes. Everything here is pure and
//! stable: inputs are never mutated and equal keys keep their snapshot order.

use std::cmp::Ordering;

use focusflow_core::ids::AreaId;
use focusflow_core::model::{priority_rank, Area, Note, Task};

/// Active tasks of one area in the grouped overview, in display order.
#[derive(Clone, Debug)]
pub struct TaskGroup {
    pub area: Area,
    pub tasks: Vec<Task>,
}

/// Ordering for area and detail views: incomplete before complete, then
/// (active tasks only) priority rank descending, then newest first.
pub fn sort_tasks_for_area_view(tasks: &[Task]) -> Vec<Task> {
    let mut out = tasks.to_vec();
    out.sort_by(|a, b| {
        a.completed
            .cmp(&b.completed)
            .then_with(|| {
                if a.completed {
                    Ordering::Equal
                } else {
                    priority_rank(b.priority).cmp(&priority_rank(a.priority))
                }
            })
            .then_with(|| b.created_at.cmp(&a.created_at))
    });
    out
}

/// The grouped "my tasks" overview: active tasks partitioned per area, in the
/// area collection's own order, areas without active tasks omitted. Within a
/// group: priority rank descending, then due-dated tasks (earliest first)
/// before undated ones, then newest first. Completed tasks come back as a
/// separate trailing list that is not priority-sorted.
pub fn group_tasks_for_overview(areas: &[Area], tasks: &[Task]) -> (Vec<TaskGroup>, Vec<Task>) {
    let groups = areas
        .iter()
        .filter_map(|area| {
            let mut bucket: Vec<Task> = tasks
                .iter()
                .filter(|t| !t.completed && t.area_id == Some(area.id))
                .cloned()
                .collect();
            if bucket.is_empty() {
                return None;
            }
            bucket.sort_by(overview_order);
            Some(TaskGroup {
                area: area.clone(),
                tasks: bucket,
            })
        })
        .collect();
    let completed = tasks.iter().filter(|t| t.completed).cloned().collect();
    (groups, completed)
}

fn overview_order(a: &Task, b: &Task) -> Ordering {
    priority_rank(b.priority)
        .cmp(&priority_rank(a.priority))
        .then_with(|| match (a.due_date, b.due_date) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        })
        .then_with(|| b.created_at.cmp(&a.created_at))
}

/// Last-edited first, for flat and area-scoped note lists alike.
pub fn sort_notes(notes: &[Note]) -> Vec<Note> {
    let mut out = notes.to_vec();
    out.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
    out
}

/// Tasks belonging to one area, in detail-view order.
pub fn area_tasks(tasks: &[Task], area: AreaId) -> Vec<Task> {
    let scoped: Vec<Task> = tasks
        .iter()
        .filter(|t| t.area_id == Some(area))
        .cloned()
        .collect();
    sort_tasks_for_area_view(&scoped)
}

/// Notes belonging to one area, last-edited first. An empty result is a
/// renderable empty state, not an omission.
pub fn area_notes(notes: &[Note], area: AreaId) -> Vec<Note> {
    let scoped: Vec<Note> = notes
        .iter()
        .filter(|n| n.area_id == Some(area))
        .cloned()
        .collect();
    sort_notes(&scoped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use focusflow_core::color::AreaColor;
    use focusflow_core::ids::{NoteId, TaskId};
    use focusflow_core::model::Priority;

    fn at(minutes: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 1, 12, 0, 0).unwrap() + Duration::minutes(minutes)
    }

    fn task(id: i64, completed: bool, priority: Option<Priority>, created_min: i64) -> Task {
        Task {
            id: TaskId::from_raw(id),
            title: format!("task-{id}"),
            description: None,
            area_id: None,
            priority,
            completed,
            due_date: None,
            created_at: at(created_min),
            updated_at: at(created_min),
        }
    }

    fn area(id: i64, name: &str) -> Area {
        Area {
            id: AreaId::from_raw(id),
            name: name.into(),
            color: AreaColor::Blue,
            created_at: at(0),
            updated_at: at(0),
        }
    }

    fn note(id: i64, updated_min: i64) -> Note {
        Note {
            id: NoteId::from_raw(id),
            title: format!("note-{id}"),
            content: String::new(),
            area_id: None,
            created_at: at(0),
            updated_at: at(updated_min),
        }
    }

    fn ids(tasks: &[Task]) -> Vec<i64> {
        tasks.iter().map(|t| t.id.as_i64()).collect()
    }

    #[test]
    fn completed_tasks_never_sort_first() {
        let input = vec![
            task(1, true, Some(Priority::High), 10),
            task(2, false, None, 0),
            task(3, true, None, 20),
            task(4, false, Some(Priority::Low), 5),
        ];
        let sorted = sort_tasks_for_area_view(&input);
        assert!(sorted.iter().take(2).all(|t| !t.completed));
        assert!(sorted.iter().skip(2).all(|t| t.completed));
    }

    #[test]
    fn active_tasks_order_by_priority_then_recency() {
        let input = vec![
            task(1, false, Some(Priority::Low), 30),
            task(2, false, Some(Priority::High), 0),
            task(3, false, None, 50),
            task(4, false, Some(Priority::High), 10),
            task(5, false, Some(Priority::Medium), 40),
        ];
        let sorted = sort_tasks_for_area_view(&input);
        // High (newer first), Medium, Low, then no priority.
        assert_eq!(ids(&sorted), vec![4, 2, 5, 1, 3]);
    }

    #[test]
    fn completed_tasks_ignore_priority_and_order_by_recency() {
        let input = vec![
            task(1, true, Some(Priority::Low), 20),
            task(2, true, Some(Priority::High), 10),
        ];
        let sorted = sort_tasks_for_area_view(&input);
        assert_eq!(ids(&sorted), vec![1, 2]);
    }

    #[test]
    fn sorting_is_idempotent() {
        let input = vec![
            task(1, true, Some(Priority::High), 10),
            task(2, false, Some(Priority::Medium), 0),
            task(3, false, Some(Priority::High), 5),
            task(4, false, None, 50),
        ];
        let once = sort_tasks_for_area_view(&input);
        let twice = sort_tasks_for_area_view(&once);
        assert_eq!(ids(&once), ids(&twice));
    }

    #[test]
    fn equal_keys_preserve_snapshot_order() {
        // Same completion, priority, and timestamp: stable sort keeps 1 before 2.
        let input = vec![
            task(1, false, Some(Priority::Medium), 15),
            task(2, false, Some(Priority::Medium), 15),
        ];
        let sorted = sort_tasks_for_area_view(&input);
        assert_eq!(ids(&sorted), vec![1, 2]);
    }

    #[test]
    fn overview_due_dated_task_sorts_before_undated_at_equal_priority() {
        let a = area(1, "Work");
        let mut undated = task(1, false, Some(Priority::High), 0);
        undated.area_id = Some(a.id);
        let mut due = task(2, false, Some(Priority::High), 0);
        due.area_id = Some(a.id);
        due.due_date = Some(at(24 * 60));

        let (groups, _) = group_tasks_for_overview(&[a], &[undated, due]);
        assert_eq!(ids(&groups[0].tasks), vec![2, 1]);
    }

    #[test]
    fn overview_orders_due_dates_ascending() {
        let a = area(1, "Work");
        let mk = |id: i64, due_min: i64| {
            let mut t = task(id, false, Some(Priority::Medium), 0);
            t.area_id = Some(AreaId::from_raw(1));
            t.due_date = Some(at(due_min));
            t
        };
        let (groups, _) = group_tasks_for_overview(&[a], &[mk(1, 500), mk(2, 100), mk(3, 300)]);
        assert_eq!(ids(&groups[0].tasks), vec![2, 3, 1]);
    }

    #[test]
    fn overview_groups_follow_area_collection_order_and_skip_empty_areas() {
        let areas = vec![area(1, "Work"), area(2, "Home"), area(3, "Fitness")];
        let mut t1 = task(1, false, None, 0);
        t1.area_id = Some(AreaId::from_raw(3));
        let mut t2 = task(2, false, None, 0);
        t2.area_id = Some(AreaId::from_raw(1));
        // Area 2 has only a completed task: it must not produce a group.
        let mut t3 = task(3, true, None, 0);
        t3.area_id = Some(AreaId::from_raw(2));

        let (groups, completed) = group_tasks_for_overview(&areas, &[t1, t2, t3]);
        let group_areas: Vec<i64> = groups.iter().map(|g| g.area.id.as_i64()).collect();
        assert_eq!(group_areas, vec![1, 3]);
        assert_eq!(completed.len(), 1);
        assert_eq!(completed[0].id.as_i64(), 3);
    }

    #[test]
    fn overview_priority_outranks_due_date() {
        let a = area(1, "Work");
        let mut high_undated = task(1, false, Some(Priority::High), 0);
        high_undated.area_id = Some(a.id);
        let mut medium_due = task(2, false, Some(Priority::Medium), 0);
        medium_due.area_id = Some(a.id);
        medium_due.due_date = Some(at(60));

        let (groups, _) = group_tasks_for_overview(&[a], &[medium_due, high_undated]);
        assert_eq!(ids(&groups[0].tasks), vec![1, 2]);
    }

    #[test]
    fn notes_order_by_last_edit() {
        let input = vec![note(1, 10), note(2, 30), note(3, 20)];
        let sorted = sort_notes(&input);
        let got: Vec<i64> = sorted.iter().map(|n| n.id.as_i64()).collect();
        assert_eq!(got, vec![2, 3, 1]);
    }

    #[test]
    fn note_ties_keep_snapshot_order() {
        let input = vec![note(1, 10), note(2, 10)];
        let sorted = sort_notes(&input);
        let got: Vec<i64> = sorted.iter().map(|n| n.id.as_i64()).collect();
        assert_eq!(got, vec![1, 2]);
    }

    #[test]
    fn area_scoped_lists_filter_by_area() {
        let target = AreaId::from_raw(1);
        let mut t1 = task(1, false, None, 0);
        t1.area_id = Some(target);
        let t2 = task(2, false, None, 0);
        let mut n1 = note(1, 0);
        n1.area_id = Some(target);
        let n2 = note(2, 0);

        assert_eq!(ids(&area_tasks(&[t1, t2], target)), vec![1]);
        assert_eq!(area_notes(&[n1, n2], target).len(), 1);
        // No notes in the area: an empty, still-renderable list.
        assert!(area_notes(&[], target).is_empty());
    }

    #[test]
    fn inputs_are_not_mutated() {
        let input = vec![task(1, true, None, 0), task(2, false, None, 10)];
        let _ = sort_tasks_for_area_view(&input);
        assert_eq!(ids(&input), vec![1, 2]);
    }
}
