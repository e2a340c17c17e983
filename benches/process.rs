use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};

use noobhack_events::dispatch::infallible;
use noobhack_events::{Dispatcher, DungeonCatalog, Event, EventKind, RuleCatalogs, StatusCatalog};

const SCREEN: &str = "\
 Welcome to Asidonhopo's hardware store!
 You see here a wand.
 --More--
 You are hungry.
 Dlvl:4 $:120 HP:23(31) Pw:8(8) AC:6 Xp:5/211 T:4812 Hungry";

fn make_dispatcher() -> Dispatcher {
    // A catalog roughly the size of a real one: every pattern is evaluated per frame.
    let mut dungeon = DungeonCatalog::builder();
    let mut status = StatusCatalog::builder();
    for i in 0..64 {
        dungeon = dungeon.pattern(format!("feature_{i}"), format!("there is a feature number {i} here"));
        status = status.rule(format!("status_{i}"), format!("you feel condition {i}"), i);
    }
    let dungeon = dungeon
        .pattern("shop", "welcome to .*'s")
        .build()
        .unwrap();
    let status = status
        .rule("hunger", "you are hungry", "Hungry")
        .build()
        .unwrap();

    let dispatcher = Dispatcher::with_catalogs(RuleCatalogs::new(dungeon, status));
    for kind in EventKind::ALL {
        dispatcher.add_event_listener(kind, infallible(|e: &Event| {
            black_box(e);
        }));
    }
    dispatcher
}

fn bench_process_frame(c: &mut Criterion) {
    let dispatcher = make_dispatcher();

    let mut group = c.benchmark_group("process");
    group.throughput(Throughput::Bytes(SCREEN.len() as u64));
    group.bench_function("frame_with_matches", |b| {
        b.iter(|| dispatcher.process(black_box(SCREEN)).unwrap());
    });
    group.bench_function("frame_without_matches", |b| {
        b.iter(|| dispatcher.process(black_box("The door opens.")).unwrap());
    });
    group.finish();
}

criterion_group!(benches, bench_process_frame);
criterion_main!(benches);
