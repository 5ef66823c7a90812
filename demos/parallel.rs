use omux::{Collator, TaskWriter};
use rayon::ThreadPoolBuilder;
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::thread;
use std::time::Duration;

type Result<T> = std::result::Result<T, Box<dyn Error>>;

fn main() -> Result<()> {
    // Pretend every file in the current directory is a package that
    // needs building.
    let mut files = Vec::new();
    for entry in fs::read_dir(".")? {
        files.push(entry?.path());
    }
    files.sort();

    // Registration order fixes the order of the combined output, before
    // any work has started.
    let collator = Collator::stderr();
    let mut work = Vec::new();
    for path in files {
        let writer = collator.register(path.display().to_string())?;
        work.push((path, writer));
    }
    let work = Mutex::new(work.into_iter());

    // One worker per cpu.
    let cpus = num_cpus::get();
    let pool = ThreadPoolBuilder::new().num_threads(cpus).build()?;

    pool.scope(|scope| {
        for _ in 0..cpus {
            scope.spawn(|_| worker(&work));
        }
    });

    Ok(())
}

fn worker(work: &Mutex<std::vec::IntoIter<(PathBuf, TaskWriter)>>) {
    // Keep building until the queue runs dry.
    loop {
        let next = work.lock().unwrap().next();
        let (path, writer) = match next {
            Some(item) => item,
            None => return,
        };
        let _ = build(&writer, &path);
        let _ = writer.close();
    }
}

fn build(writer: &TaskWriter, path: &Path) -> omux::Result<()> {
    writer.out(format!("building {}\n", path.display()))?;

    // Simulate a build that takes a while...
    let name = path.to_string_lossy();
    thread::sleep(Duration::from_millis(25 * name.len() as u64));

    // ...and that can fail.
    if name.contains('c') {
        writer.err(format!("  error: {} contains the letter 'c'\n", name))?;
    }
    Ok(())
}
