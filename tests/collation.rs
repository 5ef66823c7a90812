use omux::{Chunk, Collator, Error, Kind, MemorySink};

fn collator() -> (Collator, MemorySink) {
    let sink = MemorySink::new();
    (Collator::new(sink.clone()), sink)
}

fn texts(sink: &MemorySink) -> Vec<String> {
    sink.chunks()
        .iter()
        .map(|chunk| chunk.text.clone())
        .collect()
}

#[test]
fn single_task_forwards_live() {
    let (collator, sink) = collator();
    let a = collator.register("a").unwrap();
    a.write("Hello World", Kind::Primary).unwrap();
    assert_eq!(sink.chunks(), [Chunk::new("Hello World", Kind::Primary)]);
    assert!(a.peek_buffer().is_empty());
}

#[test]
fn non_front_task_buffers_until_its_close() {
    let (collator, sink) = collator();
    let a = collator.register("a").unwrap();
    let b = collator.register("b").unwrap();

    a.out("1").unwrap();
    assert_eq!(texts(&sink), ["1"]);

    b.out("2").unwrap();
    assert_eq!(texts(&sink), ["1"]);
    assert_eq!(b.peek_buffer(), [Chunk::new("2", Kind::Primary)]);

    a.out("3").unwrap();
    assert_eq!(texts(&sink), ["1", "3"]);

    // Closing the front task alone does not release a still-open
    // successor's buffer.
    a.close().unwrap();
    assert_eq!(texts(&sink), ["1", "3"]);
    assert_eq!(b.peek_buffer(), [Chunk::new("2", Kind::Primary)]);

    b.close().unwrap();
    assert_eq!(texts(&sink), ["1", "3", "2"]);
    assert!(b.peek_buffer().is_empty());
}

#[test]
fn successor_goes_live_after_front_finishes() {
    let (collator, sink) = collator();
    let a = collator.register("a").unwrap();
    let b = collator.register("b").unwrap();

    a.out("1").unwrap();
    a.close().unwrap();
    assert_eq!(texts(&sink), ["1"]);

    // b inherited the front with an empty buffer, so it writes straight
    // through from here on.
    b.out("2").unwrap();
    assert_eq!(texts(&sink), ["1", "2"]);
    assert!(b.peek_buffer().is_empty());

    b.close().unwrap();
    assert_eq!(texts(&sink), ["1", "2"]);
}

#[test]
fn early_close_of_buffered_task_waits_for_predecessor() {
    let (collator, sink) = collator();
    let a = collator.register("a").unwrap();
    let b = collator.register("b").unwrap();

    a.out("1").unwrap();
    b.out("2").unwrap();
    b.close().unwrap();
    assert_eq!(texts(&sink), ["1"]);

    a.close().unwrap();
    assert_eq!(texts(&sink), ["1", "2"]);
}

#[test]
fn front_task_with_backlog_keeps_buffering() {
    let (collator, sink) = collator();
    let a = collator.register("a").unwrap();
    let b = collator.register("b").unwrap();

    b.out("1").unwrap();
    a.close().unwrap();

    // b is now the front task, but its backlog has not been flushed, so
    // newer writes queue behind it rather than overtaking it.
    b.out("2").unwrap();
    assert!(texts(&sink).is_empty());
    assert_eq!(
        b.peek_buffer(),
        [
            Chunk::new("1", Kind::Primary),
            Chunk::new("2", Kind::Primary),
        ],
    );

    b.close().unwrap();
    assert_eq!(texts(&sink), ["1", "2"]);
}

#[test]
fn empty_tasks_cascade_through() {
    let (collator, sink) = collator();
    let a = collator.register("a").unwrap();
    let b = collator.register("b").unwrap();
    let c = collator.register("c").unwrap();

    b.close().unwrap();
    c.out("tail").unwrap();
    c.close().unwrap();
    assert!(texts(&sink).is_empty());

    a.out("head").unwrap();
    a.close().unwrap();
    assert_eq!(texts(&sink), ["head", "tail"]);
}

#[test]
fn late_registration_queues_after_all_existing_tasks() {
    let (collator, sink) = collator();
    let a = collator.register("a").unwrap();
    a.out("1").unwrap();
    a.close().unwrap();

    // Registered after collation already advanced past a; immediately
    // front, so its writes forward live.
    let b = collator.register("b").unwrap();
    b.out("2").unwrap();
    assert_eq!(texts(&sink), ["1", "2"]);

    let c = collator.register("c").unwrap();
    c.out("3").unwrap();
    assert_eq!(texts(&sink), ["1", "2"]);

    b.close().unwrap();
    assert_eq!(texts(&sink), ["1", "2"]);
    c.close().unwrap();
    assert_eq!(texts(&sink), ["1", "2", "3"]);
}

#[test]
fn duplicate_name_is_rejected() {
    let (collator, _sink) = collator();
    let _first = collator.register("build").unwrap();
    assert!(matches!(
        collator.register("build"),
        Err(Error::DuplicateTask { .. }),
    ));
}

#[test]
fn name_stays_reserved_after_task_finishes() {
    let (collator, _sink) = collator();
    let first = collator.register("build").unwrap();
    first.close().unwrap();
    assert!(matches!(
        collator.register("build"),
        Err(Error::DuplicateTask { .. }),
    ));
}

#[test]
fn closed_and_done_are_terminal_for_the_writer() {
    let (collator, sink) = collator();
    let a = collator.register("a").unwrap();
    let b = collator.register("b").unwrap();

    b.out("x").unwrap();
    b.close().unwrap();

    // Closed but not yet flushed.
    assert!(matches!(b.out("y"), Err(Error::ClosedWriter { .. })));
    assert!(matches!(b.close(), Err(Error::AlreadyClosed { .. })));
    assert_eq!(b.peek_buffer(), [Chunk::new("x", Kind::Primary)]);

    a.close().unwrap();
    assert_eq!(texts(&sink), ["x"]);

    // Flushed and finished.
    assert!(b.peek_buffer().is_empty());
    assert!(matches!(b.out("z"), Err(Error::ClosedWriter { .. })));
    assert!(matches!(b.close(), Err(Error::AlreadyClosed { .. })));
}

#[test]
fn kind_passes_through_unchanged() {
    let (collator, sink) = collator();
    let a = collator.register("a").unwrap();
    a.out("ok\n").unwrap();
    a.err("bad\n").unwrap();
    a.write("more\n", Kind::Primary).unwrap();
    assert_eq!(
        sink.chunks(),
        [
            Chunk::new("ok\n", Kind::Primary),
            Chunk::new("bad\n", Kind::Secondary),
            Chunk::new("more\n", Kind::Primary),
        ],
    );
}

#[test]
fn kind_survives_buffering() {
    let (collator, sink) = collator();
    let a = collator.register("a").unwrap();
    let b = collator.register("b").unwrap();
    b.err("warning\n").unwrap();
    b.close().unwrap();
    a.close().unwrap();
    assert_eq!(sink.chunks(), [Chunk::new("warning\n", Kind::Secondary)]);
}

#[test]
fn dropping_an_open_writer_counts_as_close() {
    let (collator, sink) = collator();
    let a = collator.register("a").unwrap();
    let b = collator.register("b").unwrap();

    b.out("late").unwrap();
    drop(a);
    assert!(texts(&sink).is_empty());

    b.close().unwrap();
    assert_eq!(texts(&sink), ["late"]);
}

#[test]
fn drop_after_explicit_close_is_inert() {
    let (collator, sink) = collator();
    let a = collator.register("a").unwrap();
    a.out("1").unwrap();
    a.close().unwrap();
    drop(a);
    assert_eq!(texts(&sink), ["1"]);
}

#[test]
fn parallel_writers_emit_in_registration_order() {
    const TASKS: usize = 24;
    const CHUNKS: usize = 40;

    let (collator, sink) = collator();
    let writers: Vec<_> = (0..TASKS)
        .map(|i| collator.register(format!("task-{i}")).unwrap())
        .collect();

    rayon::scope(|scope| {
        for writer in writers {
            scope.spawn(move |_| {
                for line in 0..CHUNKS {
                    writer.out(format!("{} line {line}\n", writer.name)).unwrap();
                }
                writer.close().unwrap();
            });
        }
    });

    // No loss, no duplication, per-task order preserved, tasks contiguous
    // in registration order: the stream is exactly the sequential run.
    let expected: Vec<String> = (0..TASKS)
        .flat_map(|i| (0..CHUNKS).map(move |line| format!("task-{i} line {line}\n")))
        .collect();
    assert_eq!(texts(&sink), expected);
}
