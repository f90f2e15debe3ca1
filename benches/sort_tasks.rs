//! Benchmarks for task ordering and row building.

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use std::collections::HashMap;
use todoist_tui::state::{sort_tasks, visible_tasks};
use todoist_tui::todoist::{Due, Task};
use todoist_tui::ui::task_row;

fn tasks(count: usize) -> Vec<Task> {
    (0..count)
        .map(|i| Task {
            id: i.to_string(),
            content: format!("task {}", i),
            project_id: format!("p{}", i % 5),
            due: (i % 4 != 0).then(|| Due {
                date: format!("2024-{:02}-{:02}", (i * 7) % 12 + 1, (i * 13) % 28 + 1),
                ..Due::default()
            }),
            labels: vec!["work".to_string(); i % 3],
            checked: i % 5 == 0,
            ..Task::default()
        })
        .collect()
}

fn bench_sort_tasks(c: &mut Criterion) {
    let input = tasks(1000);
    c.bench_function("sort_tasks_1000", |b| {
        b.iter_batched(
            || input.clone(),
            |mut tasks| {
                sort_tasks(black_box(&mut tasks));
                tasks
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_visible_rows(c: &mut Criterion) {
    let mut input = tasks(1000);
    sort_tasks(&mut input);
    let names: HashMap<String, String> = (0..5).map(|i| (format!("p{}", i), format!("Project {}", i))).collect();
    c.bench_function("visible_rows_1000", |b| {
        b.iter(|| {
            visible_tasks(black_box(&input), false)
                .into_iter()
                .map(|task| task_row(task, &names, false, "⠋"))
                .collect::<Vec<_>>()
        })
    });
}

criterion_group!(benches, bench_sort_tasks, bench_visible_rows);
criterion_main!(benches);
